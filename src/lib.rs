//! Feat Dependency Graphs
//!
//! Feats and their prerequisites are read from a character planner's
//! `FeatsFile.txt` and drawn as a directed graph.

pub mod domain;
pub use domain::{Config, Dependency, DependencyKind, Feat, FeatGraph, OutputFormat};

/// Reading feats from the planner's data files.
pub mod storage;
pub use storage::{FeatsFileError, ParseError, PlannerDir};

/// Rendering the graph with Graphviz.
pub mod render;
pub use render::{Attributes, Layout, RenderError};
