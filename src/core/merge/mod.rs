//! End-to-end merge: graph, order, assembly, then the output collaborators.

pub mod output;

pub use output::OutputTarget;

use std::path::Path;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use owo_colors::OwoColorize;
use tracing::{info, instrument, warn};

use crate::cli::{AppContext, MergeArgs};
use crate::core::assemble::{Assembler, Assembly, DefinitionsUnit};
use crate::core::error::MergeError;
use crate::core::graph::{DependencyGraph, GraphBuilder, PairingRule};
use crate::core::order::{self, Order};
use crate::core::source::{FsSource, UnitSource};
use crate::core::visualize;
use crate::infra::config::{MergeConfig, load_config};

/// Knobs of the core pipeline. The default pairs `.hpp` with `.cpp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub definitions: DefinitionsUnit,
    pub pairs: Vec<PairingRule>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            definitions: DefinitionsUnit::default(),
            pairs: vec![PairingRule::default()],
        }
    }
}

impl From<&MergeConfig> for MergeOptions {
    fn from(cfg: &MergeConfig) -> Self {
        Self {
            definitions: cfg.definitions(),
            pairs: cfg.pairs.clone(),
        }
    }
}

/// Everything a merge produced, for callers that want more than the text.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub graph: DependencyGraph,
    pub order: Order,
    pub assembly: Assembly,
}

impl MergeOutcome {
    pub fn text(&self) -> String {
        self.assembly.to_string()
    }
}

pub struct Merger<S: UnitSource> {
    source: S,
    options: MergeOptions,
}

impl<S: UnitSource> Merger<S> {
    pub fn new(source: S, options: MergeOptions) -> Self {
        Self { source, options }
    }

    /// Build, sort, assemble. Nothing is returned unless every stage succeeds.
    #[instrument(skip_all, fields(entry = %entry))]
    pub fn merge(&self, entry: &Utf8Path) -> Result<MergeOutcome, MergeError> {
        let graph = GraphBuilder::new(&self.source, &self.options.pairs).build(entry)?;
        let order = order::sort(&graph)?;
        let assembly = Assembler::new(&self.source, &self.options.definitions).assemble(&order)?;

        Ok(MergeOutcome {
            graph,
            order,
            assembly,
        })
    }
}

pub fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| anyhow::anyhow!("path is not valid UTF-8: {}", p.display()))
}

/// Output name derived from the entry file: its stem.
pub fn default_name(entry: &Utf8Path) -> String {
    entry.file_stem().unwrap_or("merged").to_string()
}

fn success(ctx: &AppContext, msg: &str) {
    if ctx.quiet {
        return;
    }
    if ctx.no_color {
        println!("✓ {msg}");
    } else {
        println!("{} {msg}", "✓".green());
    }
}

/// `merge` subcommand.
pub fn run(args: MergeArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let cfg = &config.merge;

    let entry = utf8_path(&args.main)?;
    let name = args.name.clone().unwrap_or_else(|| default_name(&entry));

    let source = FsSource::current_dir();
    let outcome = Merger::new(&source, MergeOptions::from(cfg))
        .merge(&entry)
        .with_context(|| format!("Failed to merge {entry}"))?;
    let text = outcome.text();

    let stamp = output::timestamp(&Local::now(), &cfg.timestamp_format)?;
    let out_dir = args.out_dir.clone().unwrap_or_else(|| cfg.output_dir.clone());
    let target = OutputTarget::new(out_dir, name, stamp, cfg.output_extension.clone());

    let clipboard = cfg.clipboard && !args.no_clipboard;

    if ctx.dry_run {
        if !ctx.quiet {
            let banner = "DRY RUN: Would merge:";
            if ctx.no_color {
                println!("{banner}");
            } else {
                println!("{}", banner.yellow());
            }
            for unit in &outcome.order {
                println!("  {unit}");
            }
            if !args.stdout {
                println!("Would write {} bytes to {}", text.len(), target.path().display());
            }
            if args.draw {
                println!("Would write include graph to {}", target.dot_path().display());
            }
            if clipboard {
                println!("Would copy merged code to clipboard");
            }
        }
        return Ok(());
    }

    let dot = if args.draw {
        Some(visualize::to_dot(&outcome.graph, &source)?)
    } else {
        None
    };

    if args.stdout {
        print!("{text}");
    } else {
        let path = target.write(&text)?;
        info!(path = %path.display(), bytes = text.len(), "merged file written");
        success(ctx, &format!("Merged {} units into {}", outcome.order.len(), path.display()));
    }

    if let Some(dot) = dot {
        let path = target.write_dot(&dot)?;
        success(ctx, &format!("Wrote include graph to {}", path.display()));
    }

    // Clipboard failures only warn
    if clipboard {
        match output::copy_to_clipboard(&text) {
            Ok(()) => success(ctx, "Copied to clipboard"),
            Err(e) => warn!("clipboard unavailable: {e:#}"),
        }
    }

    Ok(())
}
