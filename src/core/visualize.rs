//! Include graph rendering: Graphviz DOT, terminal tree, JSON.
//!
//! Every renderer takes the raw dependency graph, never an order or an
//! assembled text. Edges point from a unit to the unit it includes.

use std::collections::HashSet;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use ptree::TreeBuilder;
use tracing::debug;

use crate::cli::{AppContext, GraphArgs, GraphFormat};
use crate::core::error::MergeError;
use crate::core::graph::{DependencyGraph, GraphBuilder, UnitId};
use crate::core::merge::utf8_path;
use crate::core::order;
use crate::core::source::{FsSource, UnitSource};
use crate::infra::config::load_config;

/// Node width in inches for a unit of `lines` lines.
fn node_width(lines: usize) -> f64 {
    (0.75 + lines as f64 / 100.0).min(6.0)
}

/// Render as a DOT digraph, node width scaled by unit length.
pub fn to_dot<S: UnitSource>(graph: &DependencyGraph, source: &S) -> Result<String, MergeError> {
    let mut g: DiGraph<String, &str> = DiGraph::with_capacity(graph.len(), graph.edge_count());
    let mut index: IndexMap<&UnitId, NodeIndex> = IndexMap::with_capacity(graph.len());
    let mut widths: Vec<f64> = Vec::with_capacity(graph.len());

    for unit in graph.units() {
        index.insert(unit, g.add_node(unit.to_string()));
        widths.push(node_width(source.read_lines(unit)?.len()));
    }

    for (unit, deps) in graph.iter() {
        for dep in deps {
            if let Some(&to) = index.get(dep) {
                g.add_edge(index[unit], to, "");
            }
        }
    }

    let edge_attrs = |_: &DiGraph<String, &str>, _: EdgeReference<'_, &str>| String::new();
    let node_attrs = |_: &DiGraph<String, &str>, (idx, _): (NodeIndex, &String)| {
        format!("shape = box, width = {:.2}", widths[idx.index()])
    };
    let dot = Dot::with_attr_getters(&g, &[DotConfig::EdgeNoLabel], &edge_attrs, &node_attrs);

    Ok(format!("{dot}"))
}

fn label(unit: &UnitId, color: bool) -> String {
    if color {
        unit.as_str().blue().to_string()
    } else {
        unit.to_string()
    }
}

fn add_children(
    builder: &mut TreeBuilder,
    graph: &DependencyGraph,
    unit: &UnitId,
    expanded: &mut HashSet<UnitId>,
    shown: &mut HashSet<UnitId>,
    color: bool,
) {
    let deps = match graph.dependencies(unit) {
        Some(deps) => deps,
        None => return,
    };

    for dep in deps {
        shown.insert(dep.clone());
        let has_children = graph.dependencies(dep).is_some_and(|d| !d.is_empty());

        if !has_children {
            builder.add_empty_child(label(dep, color));
        } else if !expanded.insert(dep.clone()) {
            // Already shown in full
            builder.add_empty_child(format!("{} (*)", label(dep, color)));
        } else {
            builder.begin_child(label(dep, color));
            add_children(builder, graph, dep, expanded, shown, color);
            builder.end_child();
        }
    }
}

/// Render as an indented tree rooted at the entry (the first unit). Units
/// the entry's tree never reaches, such as paired definitions, get trees of
/// their own in discovery order.
pub fn to_tree(graph: &DependencyGraph, color: bool) -> Result<String> {
    let mut out = Vec::new();
    let mut expanded: HashSet<UnitId> = HashSet::new();
    let mut shown: HashSet<UnitId> = HashSet::new();

    for root in graph.units() {
        if !shown.insert(root.clone()) {
            continue;
        }
        expanded.insert(root.clone());
        let mut builder = TreeBuilder::new(label(root, color));
        add_children(&mut builder, graph, root, &mut expanded, &mut shown, color);
        ptree::write_tree(&builder.build(), &mut out).context("Failed to render tree")?;
    }

    String::from_utf8(out).context("Tree output is not UTF-8")
}

pub fn to_json(graph: &DependencyGraph) -> Result<String> {
    serde_json::to_string_pretty(graph).context("Failed to serialize graph")
}

/// `graph` subcommand.
pub fn run(args: GraphArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let entry = utf8_path(&args.main)?;
    let source = FsSource::current_dir();

    let graph = GraphBuilder::new(&source, &config.merge.pairs).build(&entry)?;
    debug!(units = graph.len(), "graph ready for rendering");

    if args.check {
        order::sort(&graph)?;
    }

    let rendered = match args.format {
        GraphFormat::Tree => to_tree(&graph, !ctx.no_color)?,
        GraphFormat::Dot => to_dot(&graph, &source)?,
        GraphFormat::Json => to_json(&graph)?,
    };

    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }

    Ok(())
}
