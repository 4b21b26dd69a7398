//! **amalgam** - flattens a multi-file C++ project into one compilable source file
//!
//! Follows quoted includes from an entry file, orders units so dependencies come
//! first, and merges them with every angle-bracket include emitted exactly once.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core pipeline - include graph, ordering, assembly
pub mod core {
    /// Include-directive line classifier
    pub mod include;
    pub use include::{Include, classify, is_directive};

    /// Unit sources (filesystem, in-memory)
    pub mod source;
    pub use source::{FsSource, MemorySource, UnitSource};

    /// Fatal merge errors
    pub mod error;
    pub use error::MergeError;

    /// Dependency graph discovery with declaration/definition pairing
    pub mod graph;
    pub use graph::{DependencyGraph, GraphBuilder, PairingRule, UnitId};

    /// Deterministic topological sort (Kahn, FIFO)
    pub mod order;
    pub use order::{Order, sort};

    /// Front matter / external includes / body merge policy
    pub mod assemble;
    pub use assemble::{Assembler, Assembly, DefinitionsUnit};

    /// Pipeline wiring and output collaborators
    pub mod merge;
    pub use merge::{MergeOptions, MergeOutcome, Merger, run as merge_run};

    /// DOT, tree and JSON rendering of the include graph
    pub mod visualize;
    pub use visualize::run as graph_run;
}

/// Infrastructure - configuration, I/O, logging
pub mod infra {
    /// Layered configuration (amalgam.toml + AMALGAM_* env)
    pub mod config;
    pub use config::{Config, MergeConfig, init as config_init, load_config};

    /// Whole-file reads with memory mapping above 1 MiB
    pub mod io;
    pub use io::{FileContent, read_file_smart};

    /// tracing-subscriber setup
    pub mod logging;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{graph_run, merge_run};
pub use infra::{Config, load_config};

// Core types for external consumers
pub use crate::core::{
    Assembler, DependencyGraph, FsSource, GraphBuilder, MemorySource, MergeError, Merger, Order,
    UnitSource,
};
