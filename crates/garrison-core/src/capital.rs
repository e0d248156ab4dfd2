//! Capital selection.
//!
//! The capital is the location that can reach every other location and, among
//! those, has the smallest total BFS distance to all of them (its own zero
//! distance included). Ties keep the first candidate in [`TieBreak`] order.
//!
//! When no location reaches everyone (a disconnected territory, an empty one,
//! or simply one without a universal source) there is no capital. That is a
//! normal outcome and is reported as `None`.

use petgraph::graph::NodeIndex;
use tracing::{debug, info, instrument, trace};

use crate::config::TieBreak;
use crate::paths::shortest_paths;
use crate::territory::Territory;

/// A chosen capital and its total distance to every location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapitalChoice {
    pub index: NodeIndex,
    pub distance_sum: usize,
}

/// Run one BFS per location and pick the capital.
#[must_use]
#[instrument(skip(territory), fields(vertices = territory.vertex_count()))]
pub fn select_capital(territory: &Territory, tie_break: TieBreak) -> Option<CapitalChoice> {
    let candidates: Vec<NodeIndex> = territory.vertices().collect();
    let mut best: Option<CapitalChoice> = None;

    for candidate in ordered_candidates(territory, &candidates, tie_break) {
        let Some(distance_sum) = shortest_paths(territory, candidate).total() else {
            trace!(candidate = territory.name(candidate), "cannot reach every location");
            continue;
        };

        if best.is_none_or(|b| distance_sum < b.distance_sum) {
            debug!(candidate = territory.name(candidate), distance_sum, "new best capital");
            best = Some(CapitalChoice {
                index: candidate,
                distance_sum,
            });
        }
    }

    match best {
        Some(choice) => info!(
            capital = territory.name(choice.index),
            distance_sum = choice.distance_sum,
            "capital selected"
        ),
        None => info!("no location reaches every other location"),
    }

    best
}

/// Name of the capital, or `None` if no location qualifies.
#[must_use]
pub fn find_capital(territory: &Territory, tie_break: TieBreak) -> Option<String> {
    select_capital(territory, tie_break).map(|choice| territory.name(choice.index).to_string())
}

/// Order `candidates` so the tie winner comes first.
///
/// [`TieBreak::Insertion`] keeps the given order; the sort used for
/// [`TieBreak::Lexicographic`] is stable, so equal names keep it too.
pub(crate) fn ordered_candidates(
    territory: &Territory,
    candidates: &[NodeIndex],
    tie_break: TieBreak,
) -> Vec<NodeIndex> {
    let mut ordered = candidates.to_vec();
    if tie_break == TieBreak::Lexicographic {
        ordered.sort_by(|&a, &b| territory.name(a).cmp(territory.name(b)));
    }
    ordered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn capital(edges: &[(&str, &str)]) -> Option<String> {
        find_capital(&Territory::from_edges(edges), TieBreak::Insertion)
    }

    #[test]
    fn three_cycle_tie_goes_to_first_inserted() {
        assert_eq!(
            capital(&[("A", "B"), ("B", "C"), ("C", "A")]).as_deref(),
            Some("A")
        );
    }

    #[test]
    fn lexicographic_tie_break() {
        let t = Territory::from_edges(&[("C", "B"), ("B", "A"), ("A", "C")]);
        assert_eq!(find_capital(&t, TieBreak::Insertion).as_deref(), Some("C"));
        assert_eq!(find_capital(&t, TieBreak::Lexicographic).as_deref(), Some("A"));
    }

    #[test]
    fn hub_reaches_all() {
        let choice = select_capital(
            &Territory::from_edges(&[("H", "X"), ("H", "Y"), ("H", "Z")]),
            TieBreak::Insertion,
        )
        .unwrap();
        assert_eq!(choice.distance_sum, 3);
        assert_eq!(choice.index.index(), 0);
    }

    #[test]
    fn smaller_sum_beats_earlier_candidate() {
        // A → B → C → D, D → A, B → D, B → A.
        // Sums: A = 1+2+2 = 5, B = 1+1+1 = 3.
        let t = Territory::from_edges(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "D"),
            ("D", "A"),
            ("B", "D"),
            ("B", "A"),
        ]);
        let choice = select_capital(&t, TieBreak::Insertion).unwrap();
        assert_eq!(t.name(choice.index), "B");
        assert_eq!(choice.distance_sum, 3);
    }

    #[test]
    fn disconnected_has_no_capital() {
        let mut t = Territory::new();
        t.add_vertex("P");
        t.add_vertex("Q");
        assert_eq!(find_capital(&t, TieBreak::Insertion), None);
    }

    #[test]
    fn empty_has_no_capital() {
        assert_eq!(find_capital(&Territory::new(), TieBreak::Insertion), None);
    }

    #[test]
    fn single_vertex_is_its_own_capital() {
        let mut t = Territory::new();
        t.add_vertex("Solo");
        assert_eq!(find_capital(&t, TieBreak::Insertion).as_deref(), Some("Solo"));
    }
}
