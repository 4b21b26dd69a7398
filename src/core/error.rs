//! Fatal merge errors. Every variant aborts the run before any output is
//! written.

use itertools::Itertools;

use crate::core::graph::UnitId;

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Entry file, local include target, or paired definition file could not
    /// be read
    #[error("cannot read unit {unit}")]
    UnreadableUnit {
        unit: UnitId,
        #[source]
        source: std::io::Error,
    },

    /// Units that never reached zero pending dependencies
    #[error("there is a cycle in includes among: {}", .units.iter().join(", "))]
    CycleDetected { units: Vec<UnitId> },

    #[error("{unit} must contain the marker line `{marker}`")]
    MissingMarker { unit: UnitId, marker: String },

    #[error("{unit} contains the marker line `{marker}` {count} times, expected exactly one")]
    DuplicateMarker {
        unit: UnitId,
        marker: String,
        count: usize,
    },
}
