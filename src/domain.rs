//! Domain models for feat dependency graphs.
//!
//! This module contains the feat and dependency records, the graph built
//! from them, and the rendering configuration.

/// Feat and dependency records.
pub mod feat;
pub use feat::{Dependency, DependencyKind, Feat};

mod config;
pub use config::{Config, OutputFormat, UnknownFormatError, VERSION_PLACEHOLDER};

/// The dependency graph built from parsed feats.
pub mod graph;
pub use graph::{FeatGraph, Node, Shape};
