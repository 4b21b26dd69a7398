//! Topological ordering of a dependency graph (dependencies first).

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::{info, instrument};

use crate::core::error::MergeError;
use crate::core::graph::{DependencyGraph, UnitId};

/// Units in merge order.
pub type Order = Vec<UnitId>;

/// Kahn's algorithm over `graph`.
///
/// A unit is ready once all of its local dependencies have been emitted.
/// Ready units are served first-in first-out, starting from the zero-dependency
/// units in discovery order, so the same graph always yields the same order.
#[instrument(skip_all, fields(units = graph.len()))]
pub fn sort(graph: &DependencyGraph) -> Result<Order, MergeError> {
    // Remaining unresolved dependencies and reverse edges, both in graph order
    let mut pending: IndexMap<&UnitId, usize> = IndexMap::with_capacity(graph.len());
    let mut dependents: IndexMap<&UnitId, Vec<&UnitId>> = IndexMap::with_capacity(graph.len());

    for unit in graph.units() {
        pending.insert(unit, 0);
        dependents.insert(unit, Vec::new());
    }

    for (unit, deps) in graph.iter() {
        for dep in deps {
            // Targets outside the graph cannot occur for built graphs
            if let Some(rev) = dependents.get_mut(dep) {
                rev.push(unit);
                pending[unit] += 1;
            }
        }
    }

    let mut ready: VecDeque<&UnitId> = pending
        .iter()
        .filter(|&(_, &count)| count == 0)
        .map(|(&unit, _)| unit)
        .collect();

    let mut order = Order::with_capacity(graph.len());

    while let Some(unit) = ready.pop_front() {
        order.push(unit.clone());

        for &dependent in &dependents[unit] {
            let count = &mut pending[dependent];
            *count -= 1;
            if *count == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() < graph.len() {
        let units: Vec<UnitId> = pending
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(unit, _)| unit.clone())
            .collect();
        return Err(MergeError::CycleDetected { units });
    }

    info!(
        "Order of files:\n{}",
        order
            .iter()
            .map(|unit| unit.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    );

    Ok(order)
}
