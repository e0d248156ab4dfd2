//! Road network store.
//!
//! # Overview
//!
//! A [`Territory`] holds the locations (vertices) and roads (directed edges)
//! every solver stage reads. Locations are identified by name; each name is
//! assigned a dense [`NodeIndex`] in insertion order, which is the order the
//! solver uses whenever it needs a deterministic walk over all vertices.
//!
//! ## Edge Multiplicity
//!
//! Roads are never deduplicated. Two `A → B` roads are two edges, and a
//! patrol must drive both of them. Self-loops are kept as well.
//!
//! ## Adjacency Order
//!
//! petgraph lists a node's neighbors newest-first. [`Territory::successors`]
//! and [`Territory::predecessors`] reverse that so callers see roads in the
//! order they were added.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

// ---------------------------------------------------------------------------
// Territory
// ---------------------------------------------------------------------------

/// A directed road network.
///
/// Mutable only while loading; every algorithm in this crate takes it by
/// shared reference.
#[derive(Debug, Clone, Default)]
pub struct Territory {
    /// Directed multigraph: nodes = location names, edges = roads.
    graph: DiGraph<String, ()>,
    /// Mapping from location name to petgraph `NodeIndex`.
    node_map: HashMap<String, NodeIndex>,
}

impl Territory {
    /// Create an empty territory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a territory from a list of `(from, to)` roads.
    ///
    /// Endpoints are added in the order they first appear.
    #[must_use]
    pub fn from_edges(edges: &[(&str, &str)]) -> Self {
        let mut territory = Self::new();
        for (from, to) in edges {
            territory.add_edge(from, to);
        }
        territory
    }

    /// Add a location. Re-adding an existing name is a no-op.
    ///
    /// Returns the index of the (possibly pre-existing) location.
    pub fn add_vertex(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Add a directed road `from → to`.
    ///
    /// Unknown endpoints are created first (`from` before `to`). Parallel
    /// roads and self-loops are preserved.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from_idx = self.add_vertex(from);
        let to_idx = self.add_vertex(to);
        self.graph.add_edge(from_idx, to_idx, ());
    }

    /// Borrow the underlying petgraph graph.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Return the number of locations.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of roads, counting parallel roads separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if no location has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a location name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Return the name of a location.
    ///
    /// Indices handed out by this territory always resolve; a foreign index
    /// renders as `#?`.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> &str {
        self.graph
            .node_weight(idx)
            .map_or("#?", String::as_str)
    }

    /// Resolve a sequence of indices to owned names.
    #[must_use]
    pub fn names(&self, indices: &[NodeIndex]) -> Vec<String> {
        indices.iter().map(|&idx| self.name(idx).to_string()).collect()
    }

    /// Iterate location indices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Outgoing road targets of `v`, in insertion order, with multiplicity.
    #[must_use]
    pub fn successors(&self, v: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(v, Direction::Outgoing)
    }

    /// Incoming road sources of `v`, in insertion order, with multiplicity.
    #[must_use]
    pub fn predecessors(&self, v: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(v, Direction::Incoming)
    }

    /// Number of roads `from → to`.
    #[must_use]
    pub fn edge_multiplicity(&self, from: NodeIndex, to: NodeIndex) -> usize {
        self.graph.edges_connecting(from, to).count()
    }

    fn ordered_neighbors(&self, v: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(v, direction).collect();
        out.reverse();
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
