//! Include graph discovery.
//!
//! Starting from an entry unit, every transitively reachable local include is
//! read once and recorded with its direct local dependencies. Keys keep
//! discovery order so that everything downstream is reproducible.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::core::error::MergeError;
use crate::core::include::local_target;
use crate::core::source::UnitSource;

/// Unit identifier: the path exactly as written in the include directive (or
/// on the command line for the entry unit).
pub type UnitId = Utf8PathBuf;

/// Mapping from each discovered unit to the units it directly includes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: IndexMap<UnitId, IndexSet<UnitId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, unit: &Utf8Path) -> bool {
        self.edges.contains_key(unit)
    }

    /// Units in discovery order.
    pub fn units(&self) -> impl Iterator<Item = &UnitId> {
        self.edges.keys()
    }

    /// Direct local dependencies of `unit`, if it is in the graph.
    pub fn dependencies(&self, unit: &Utf8Path) -> Option<&IndexSet<UnitId>> {
        self.edges.get(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitId, &IndexSet<UnitId>)> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(IndexSet::len).sum()
    }

    /// Insert a unit, replacing any previous dependency set. Targets that are
    /// not yet units are added as leaves.
    pub fn insert(&mut self, unit: UnitId, deps: IndexSet<UnitId>) {
        let targets: Vec<UnitId> = deps.iter().cloned().collect();
        self.edges.insert(unit, deps);
        for target in targets {
            self.edges.entry(target).or_default();
        }
    }
}

impl<U, D, I> FromIterator<(U, I)> for DependencyGraph
where
    U: Into<UnitId>,
    D: Into<UnitId>,
    I: IntoIterator<Item = D>,
{
    fn from_iter<T: IntoIterator<Item = (U, I)>>(iter: T) -> Self {
        let mut graph = DependencyGraph::new();
        for (unit, deps) in iter {
            let unit = unit.into();
            let deps = deps.into_iter().map(Into::into).collect();
            graph.insert(unit, deps);
        }
        graph
    }
}

/// Declaration/definition suffix pair, e.g. `.hpp` -> `.cpp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRule {
    pub declaration: String,
    pub definition: String,
}

impl PairingRule {
    pub fn new(declaration: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            definition: definition.into(),
        }
    }

    /// Sibling definition path for a declaration unit, by suffix swap.
    pub fn sibling(&self, unit: &Utf8Path) -> Option<UnitId> {
        unit.as_str()
            .strip_suffix(self.declaration.as_str())
            .map(|stem| UnitId::from(format!("{stem}{}", self.definition)))
    }
}

impl Default for PairingRule {
    fn default() -> Self {
        Self::new(".hpp", ".cpp")
    }
}

/// Depth-first discovery over local includes.
pub struct GraphBuilder<'a, S: UnitSource> {
    source: S,
    pairs: &'a [PairingRule],
}

impl<'a, S: UnitSource> GraphBuilder<'a, S> {
    pub fn new(source: S, pairs: &'a [PairingRule]) -> Self {
        Self { source, pairs }
    }

    /// Definition siblings of `unit` that exist in the source.
    fn paired_definitions(&self, unit: &Utf8Path) -> Vec<UnitId> {
        self.pairs
            .iter()
            .filter_map(|rule| rule.sibling(unit))
            .filter(|sibling| self.source.is_file(sibling))
            .collect()
    }

    /// Discover every unit reachable from `entry`.
    ///
    /// Each unit is read exactly once. Its paired definition file is visited
    /// before its includes, and includes in the order they appear, which is
    /// the pre-order a recursive walk would produce. Any unreadable unit
    /// fails the whole build.
    #[instrument(skip_all, fields(entry = %entry))]
    pub fn build(&self, entry: &Utf8Path) -> Result<DependencyGraph, MergeError> {
        let mut graph = DependencyGraph::new();
        let mut stack: Vec<UnitId> = vec![entry.to_owned()];

        while let Some(unit) = stack.pop() {
            if graph.contains(&unit) {
                continue;
            }

            info!("Parsing file {unit}");
            let lines = self.source.read_lines(&unit)?;

            let deps: IndexSet<UnitId> = lines
                .iter()
                .filter_map(|line| local_target(line))
                .map(UnitId::from)
                .collect();

            for dep in &deps {
                debug!("Edge from {unit} -> {dep}");
            }

            // Last pushed is visited first
            stack.extend(deps.iter().rev().cloned());
            for sibling in self.paired_definitions(&unit).into_iter().rev() {
                debug!("Paired definition {sibling} for {unit}");
                stack.push(sibling);
            }

            graph.edges.insert(unit, deps);
        }

        debug!(units = graph.len(), edges = graph.edge_count(), "graph built");
        Ok(graph)
    }
}
