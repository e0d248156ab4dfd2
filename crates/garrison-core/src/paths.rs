//! Unweighted shortest paths.
//!
//! Every road costs one hop, so plain BFS gives exact distances. Two queries
//! are provided:
//!
//! - [`shortest_paths`]: hop count from one source to every location, used by
//!   capital and battalion selection.
//! - [`shortest_path_within`]: the concrete route between two locations using
//!   only roads inside a member set, used to splice patrol detours.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use crate::territory::Territory;

// ---------------------------------------------------------------------------
// Distances
// ---------------------------------------------------------------------------

/// Hop counts from one source to every location of a [`Territory`].
///
/// Unreachable locations hold `None` (the "infinite" distance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distances {
    hops: Vec<Option<usize>>,
}

impl Distances {
    /// Distance from the source to `v`, or `None` if `v` is unreachable.
    #[must_use]
    pub fn get(&self, v: NodeIndex) -> Option<usize> {
        self.hops.get(v.index()).copied().flatten()
    }

    /// Return `true` if every location is reachable from the source.
    #[must_use]
    pub fn reaches_all(&self) -> bool {
        self.hops.iter().all(Option::is_some)
    }

    /// Sum of distances to every location, or `None` if any is unreachable.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        self.hops.iter().copied().sum()
    }

    /// Sum of distances to `members`, or `None` if any member is unreachable.
    #[must_use]
    pub fn total_over(&self, members: &[NodeIndex]) -> Option<usize> {
        members.iter().map(|&v| self.get(v)).sum()
    }
}

/// BFS from `source` over outgoing roads.
///
/// Each location is enqueued at most once, so the cost is `O(V + E)`.
#[must_use]
pub fn shortest_paths(territory: &Territory, source: NodeIndex) -> Distances {
    let mut hops: Vec<Option<usize>> = vec![None; territory.vertex_count()];
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    if let Some(slot) = hops.get_mut(source.index()) {
        *slot = Some(0);
        queue.push_back(source);
    }

    while let Some(current) = queue.pop_front() {
        let next_hop = hops[current.index()].map_or(0, |d| d + 1);
        for next in territory.successors(current) {
            let slot = &mut hops[next.index()];
            if slot.is_none() {
                *slot = Some(next_hop);
                queue.push_back(next);
            }
        }
    }

    Distances { hops }
}

/// Shortest route `from → … → to` using only roads between `members`.
///
/// Returns the full vertex sequence including both endpoints (a single
/// element when `from == to`), or `None` when `to` cannot be reached inside
/// the member set.
#[must_use]
pub fn shortest_path_within(
    territory: &Territory,
    from: NodeIndex,
    to: NodeIndex,
    members: &HashSet<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut queue: VecDeque<NodeIndex> = VecDeque::from([from]);
    let mut visited: HashSet<NodeIndex> = HashSet::from([from]);
    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == to {
            return Some(reconstruct_path(from, to, &parent));
        }

        for next in territory.successors(current) {
            if members.contains(&next) && visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

fn reconstruct_path(
    from: NodeIndex,
    to: NodeIndex,
    parent: &HashMap<NodeIndex, NodeIndex>,
) -> Vec<NodeIndex> {
    let mut path = vec![to];
    let mut cursor = to;

    while cursor != from {
        match parent.get(&cursor) {
            Some(&prev) => {
                cursor = prev;
                path.push(cursor);
            }
            None => break,
        }
    }

    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
