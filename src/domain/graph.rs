//! The feat dependency graph.
//!
//! The [`FeatGraph`] knows nothing about files or rendering. Nodes are
//! identified by their label, so a feat referenced by many others is drawn
//! once. Edges point from a prerequisite to the feat that requires it.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use tracing::{debug, instrument};

use crate::domain::{Dependency, Feat};

/// Heading of the node standing in for a `NEEDSONE` list.
pub const CHOICE_HEADING: &str = "One of:\n";

/// How a node is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Shape {
    /// The layout engine's default shape.
    #[default]
    Default,
    /// A box. Used for feats and for choices between alternatives.
    Rectangle,
}

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The text drawn in the node, which also identifies it.
    pub label: String,
    /// How the node is drawn.
    pub shape: Shape,
}

/// A directed graph of feats and their prerequisites.
#[derive(Debug, Default)]
pub struct FeatGraph {
    graph: DiGraph<Node, ()>,

    /// Lookup from label to node.
    index: HashMap<String, NodeIndex>,
}

impl FeatGraph {
    /// Builds the graph for a set of feats.
    ///
    /// Feats without prerequisites are left out, unless another feat requires
    /// them.
    ///
    /// - every required feat (`Feat` or `Epic:`) gets a box of its own
    /// - other required things (abilities, classes, BAB, ...) are added with
    ///   the default shape when first used as an edge source
    /// - the alternatives of a feat are collapsed into a single `One of:` box
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(feats = feats.len()))]
    pub fn build(feats: &[Feat]) -> Self {
        let mut graph = Self::default();

        for feat in feats {
            graph.add_feat(feat);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built feat graph"
        );
        graph
    }

    fn add_feat(&mut self, feat: &Feat) {
        if !feat.has_deps() {
            return;
        }

        let full_name = feat.full_name();
        let target = self.add_node(&full_name, Shape::Rectangle);

        for dep in &feat.required_deps {
            if dep.kind.is_feat() {
                self.add_node(&dep.target, Shape::Rectangle);
            }
            let source = self.add_node(&dep.label(), Shape::Default);
            self.graph.update_edge(source, target, ());
        }

        if let Some(label) = choice_label(&feat.alternative_deps) {
            let source = self.add_node(&label, Shape::Rectangle);
            self.graph.update_edge(source, target, ());
        }
    }

    /// Adds a node, or returns the existing node with that label.
    ///
    /// A node added as a rectangle stays a rectangle, whichever order it is
    /// first seen in.
    fn add_node(&mut self, label: &str, shape: Shape) -> NodeIndex {
        if let Some(&index) = self.index.get(label) {
            if shape == Shape::Rectangle {
                self.graph[index].shape = Shape::Rectangle;
            }
            return index;
        }

        let index = self.graph.add_node(Node {
            label: label.to_string(),
            shape,
        });
        self.index.insert(label.to_string(), index);
        index
    }

    /// The number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up a node by its label.
    #[must_use]
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.index.get(label).map(|&index| &self.graph[index])
    }

    /// Whether there is an edge from `source` to `target`.
    #[must_use]
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(&source), Some(&target)) => self.graph.contains_edge(source, target),
            _ => false,
        }
    }

    /// The labels of the direct prerequisites of a node.
    #[must_use]
    pub fn prerequisites(&self, label: &str) -> Vec<&str> {
        let Some(&index) = self.index.get(label) else {
            return Vec::new();
        };
        let mut labels: Vec<_> = self
            .graph
            .neighbors_directed(index, Direction::Incoming)
            .map(|source| self.graph[source].label.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// All nodes, in the order they were added.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// All edges as `(source, target)` labels, in the order they were added.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].label.as_str(),
                self.graph[edge.target()].label.as_str(),
            )
        })
    }
}

/// The label of the node standing in for a list of alternatives: a heading
/// followed by one line per alternative.
fn choice_label(alternatives: &[Dependency]) -> Option<String> {
    if alternatives.is_empty() {
        return None;
    }

    let mut label = CHOICE_HEADING.to_string();
    for dep in alternatives {
        label.push_str(&dep.label());
        label.push('\n');
    }
    Some(label)
}
