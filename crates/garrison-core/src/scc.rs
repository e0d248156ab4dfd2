//! Strongly connected components (Kosaraju).
//!
//! # Algorithm
//!
//! 1. Forward DFS over every location in insertion order. A location is
//!    pushed onto the finish stack once all of its descendants finish.
//! 2. Pop the finish stack. Each location not yet assigned seeds a DFS over
//!    *incoming* roads; every unassigned location it reaches joins the new
//!    component.
//!
//! Both passes use iterative DFS with explicit `(node, next neighbor)` frames
//! so deep road chains cannot overflow the call stack.
//!
//! # Output Order
//!
//! Components come out in the order their seeds are popped (decreasing
//! finish time). Members are listed in reverse-pass discovery order, seed
//! first. Both orders are fully determined by insertion order, so repeated
//! calls on the same territory return identical results.

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::territory::Territory;

/// Compute SCCs as index lists.
#[must_use]
#[instrument(skip(territory), fields(vertices = territory.vertex_count()))]
pub fn scc_indices(territory: &Territory) -> Vec<Vec<NodeIndex>> {
    let finish_order = finish_order(territory);

    let mut assigned = vec![false; territory.vertex_count()];
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();

    for &seed in finish_order.iter().rev() {
        if assigned[seed.index()] {
            continue;
        }
        components.push(collect_reverse(territory, seed, &mut assigned));
    }

    debug!(components = components.len(), "kosaraju finished");
    components
}

/// Compute SCCs as lists of location names.
#[must_use]
pub fn find_sccs(territory: &Territory) -> Vec<Vec<String>> {
    scc_indices(territory)
        .iter()
        .map(|component| territory.names(component))
        .collect()
}

/// First pass: post-order over outgoing roads.
fn finish_order(territory: &Territory) -> Vec<NodeIndex> {
    let mut visited = vec![false; territory.vertex_count()];
    let mut finished: Vec<NodeIndex> = Vec::with_capacity(territory.vertex_count());

    // Each frame: (node, its successors, index of the next successor to try).
    let mut call_stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();

    for root in territory.vertices() {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        call_stack.push((root, territory.successors(root), 0));

        while let Some(frame) = call_stack.last_mut() {
            let (current, neighbors, next) = frame;

            if *next < neighbors.len() {
                let neighbor = neighbors[*next];
                *next += 1;
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    call_stack.push((neighbor, territory.successors(neighbor), 0));
                }
            } else {
                finished.push(*current);
                call_stack.pop();
            }
        }
    }

    finished
}

/// Second pass: pre-order over incoming roads, restricted to unassigned nodes.
fn collect_reverse(
    territory: &Territory,
    seed: NodeIndex,
    assigned: &mut [bool],
) -> Vec<NodeIndex> {
    let mut component = vec![seed];
    assigned[seed.index()] = true;

    let mut call_stack: Vec<(Vec<NodeIndex>, usize)> = vec![(territory.predecessors(seed), 0)];

    while let Some((neighbors, next)) = call_stack.last_mut() {
        if *next < neighbors.len() {
            let neighbor = neighbors[*next];
            *next += 1;
            if !assigned[neighbor.index()] {
                assigned[neighbor.index()] = true;
                component.push(neighbor);
                call_stack.push((territory.predecessors(neighbor), 0));
            }
        } else {
            call_stack.pop();
        }
    }

    component
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
