use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;

use crate::core::PackageKey;
use crate::error::{PipgraphError, Result};

pub mod builder;
pub mod viz;

/// Visual weight assigned to every node before degrees are known.
pub const BASE_NODE_SIZE: usize = 30;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: PackageKey,
    pub label: String,
    pub size: usize,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: PackageKey,
    pub target: PackageKey,
}

/// Directed dependency graph plus a key-based index over it. Rebuilt from
/// scratch by [`builder::build`] on every invocation; never mutated after.
#[derive(Debug, Default)]
pub struct DepGraph {
    graph: DiGraph<GraphNode, ()>,
    indices: HashMap<PackageKey, NodeIndex>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, node: GraphNode) -> Result<()> {
        if self.indices.contains_key(&node.id) {
            return Err(PipgraphError::MalformedRecord(format!(
                "duplicate package key {}",
                node.id.as_str()
            )));
        }
        let key = node.id.clone();
        let idx = self.graph.add_node(node);
        self.indices.insert(key, idx);
        Ok(())
    }

    /// Both endpoints must already be registered.
    pub(crate) fn add_edge(&mut self, source: &PackageKey, target: &PackageKey) {
        if let (Some(&from), Some(&to)) = (self.indices.get(source), self.indices.get(target)) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Recomputes the degree-derived display attributes on every node.
    pub(crate) fn annotate(&mut self) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for idx in indices {
            let degree = self.degree_at(idx);
            let node = &mut self.graph[idx];
            node.size = degree * 5 + 10;
            node.highlight = degree < 1;
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, key: &PackageKey) -> bool {
        self.indices.contains_key(key)
    }

    pub fn node(&self, key: &PackageKey) -> Option<&GraphNode> {
        self.indices.get(key).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(from, to)| GraphEdge {
                source: self.graph[from].id.clone(),
                target: self.graph[to].id.clone(),
            })
            .collect()
    }

    /// Total degree: incident edges counted in both directions.
    pub fn degree(&self, key: &PackageKey) -> usize {
        self.indices
            .get(key)
            .map(|&idx| self.degree_at(idx))
            .unwrap_or(0)
    }

    /// Packages that need `key`: sources of edges pointing at it.
    pub fn predecessors(&self, key: &PackageKey) -> Vec<PackageKey> {
        self.neighbors(key, Direction::Incoming)
    }

    /// Packages that `key` needs: targets of edges leaving it.
    pub fn successors(&self, key: &PackageKey) -> Vec<PackageKey> {
        self.neighbors(key, Direction::Outgoing)
    }

    /// Fully disconnected nodes, in input order.
    pub fn orphans(&self) -> Vec<&GraphNode> {
        self.graph
            .node_weights()
            .filter(|node| node.highlight)
            .collect()
    }

    fn degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
            + self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    fn neighbors(&self, key: &PackageKey, direction: Direction) -> Vec<PackageKey> {
        let Some(&idx) = self.indices.get(key) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, direction)
            .map(|neighbor| self.graph[neighbor].id.clone())
            .collect()
    }
}
