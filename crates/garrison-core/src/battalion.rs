//! Secondary battalion selection.
//!
//! Every strongly connected component gets a representative. The capital
//! represents its own component; each other component is represented by a
//! *secondary battalion*: the member closest to the capital, ties broken by
//! the smallest total distance to the rest of its component.
//!
//! # Scoring
//!
//! Members are compared on the pair
//! `(distance_from_capital, internal_distance_sum)`, lexicographically.
//! `distance_from_capital` is the BFS hop count from the capital to the
//! member; `internal_distance_sum` is the sum of BFS hop counts from the
//! member to every location in its component. The first member in
//! [`TieBreak`] order wins an exact tie.

use petgraph::graph::NodeIndex;
use tracing::{debug, info, instrument};

use crate::capital::ordered_candidates;
use crate::config::TieBreak;
use crate::paths::{Distances, shortest_paths};
use crate::territory::Territory;

/// A component together with the location that represents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The capital or a secondary battalion.
    pub representative: NodeIndex,
    /// Component members, in component order.
    pub members: Vec<NodeIndex>,
    /// `true` for the capital's own component.
    pub is_capital: bool,
}

/// Assign a representative to every component, in component order.
///
/// The capital's component is included (with `is_capital` set); it does not
/// produce a battalion but its patrol still needs the representative.
#[must_use]
#[instrument(skip_all, fields(components = components.len()))]
pub fn assign_representatives(
    territory: &Territory,
    capital: NodeIndex,
    components: &[Vec<NodeIndex>],
    tie_break: TieBreak,
) -> Vec<Assignment> {
    let from_capital = shortest_paths(territory, capital);

    let assignments: Vec<Assignment> = components
        .iter()
        .map(|members| {
            if members.contains(&capital) {
                return Assignment {
                    representative: capital,
                    members: members.clone(),
                    is_capital: true,
                };
            }
            Assignment {
                representative: closest_member(territory, &from_capital, members, tie_break),
                members: members.clone(),
                is_capital: false,
            }
        })
        .collect();

    info!(
        battalions = assignments.iter().filter(|a| !a.is_capital).count(),
        "battalions assigned"
    );
    assignments
}

/// The secondary battalions in component order (capital's component skipped).
#[must_use]
pub fn battalions(assignments: &[Assignment]) -> Vec<NodeIndex> {
    assignments
        .iter()
        .filter(|a| !a.is_capital)
        .map(|a| a.representative)
        .collect()
}

fn closest_member(
    territory: &Territory,
    from_capital: &Distances,
    members: &[NodeIndex],
    tie_break: TieBreak,
) -> NodeIndex {
    let mut best: Option<(NodeIndex, usize, usize)> = None;

    for member in ordered_candidates(territory, members, tie_break) {
        let distance = from_capital.get(member).unwrap_or(usize::MAX);

        // Internal sums cost a BFS each; skip members already beaten on distance.
        if best.is_some_and(|(_, best_distance, _)| distance > best_distance) {
            continue;
        }

        let internal = internal_distance_sum(territory, member, members);
        let better = best.is_none_or(|(_, best_distance, best_internal)| {
            (distance, internal) < (best_distance, best_internal)
        });
        if better {
            best = Some((member, distance, internal));
        }
    }

    // Components are never empty; fall back to the first member regardless.
    let (winner, distance, internal) =
        best.unwrap_or((members[0], usize::MAX, usize::MAX));
    debug!(
        battalion = territory.name(winner),
        distance,
        internal,
        size = members.len(),
        "battalion selected"
    );
    winner
}

/// Sum of BFS distances from `v` to every member of its component.
#[must_use]
pub fn internal_distance_sum(territory: &Territory, v: NodeIndex, members: &[NodeIndex]) -> usize {
    shortest_paths(territory, v)
        .total_over(members)
        .unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
