//! Patrol route construction.
//!
//! # Overview
//!
//! A patrol is a closed walk that starts at a component's representative and
//! drives every road inside that component (the *induced* roads: both ends in
//! the component, parallel roads counted separately) at least once.
//!
//! # Algorithm
//!
//! The induced roads are copied into an index arena: component members become
//! dense local indices and each member owns the list of roads it has not yet
//! driven.
//!
//! - **Balanced components** (every member has equal induced in- and
//!   out-degree) have an Eulerian circuit. Iterative Hierholzer finds it, so
//!   every road is driven exactly once.
//! - **Unbalanced components** use a greedy walk: follow an undriven road out
//!   of the current location while one exists; when stuck, splice in the
//!   shortest induced route to the first member (component order) that still
//!   has undriven roads, marking any undriven roads along that route as
//!   driven. Once every road is driven, a final shortest route returns to the
//!   representative if needed.
//!
//! # Route Convention
//!
//! [`Patrol::route`] starts at the representative and omits the closing
//! return to it. Consecutive pairs plus the wrap-around pair `(last, first)`
//! are exactly the roads driven.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use tracing::{debug, info, instrument, warn};

use crate::battalion::Assignment;
use crate::config::PatrolPolicy;
use crate::paths::shortest_path_within;
use crate::territory::Territory;

// ---------------------------------------------------------------------------
// Patrol
// ---------------------------------------------------------------------------

/// A closed patrol walk through one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patrol {
    /// Where the walk starts and ends.
    pub representative: NodeIndex,
    /// Visited locations, representative first, closing return omitted.
    pub route: Vec<NodeIndex>,
    /// Number of induced roads in the component.
    pub induced_edges: usize,
}

impl Patrol {
    /// Roads driven by the walk, including the closing one.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let n = self.route.len();
        (0..n)
            .map(|i| (self.route[i], self.route[(i + 1) % n]))
            .collect()
    }

    /// How many road traversals repeat an already driven road.
    #[must_use]
    pub fn repeated_edges(&self) -> usize {
        self.route.len().saturating_sub(self.induced_edges)
    }
}

/// Build patrols for every assignment that has roads to cover.
///
/// Multi-location components always get a patrol. Single-location components
/// get one only when `policy.sweep_self_loops` is set and the location has at
/// least one self-loop. Patrols come out in assignment order.
#[must_use]
#[instrument(skip_all, fields(assignments = assignments.len()))]
pub fn define_patrols(
    territory: &Territory,
    assignments: &[Assignment],
    policy: PatrolPolicy,
) -> Vec<Patrol> {
    let patrols: Vec<Patrol> = assignments
        .iter()
        .filter_map(|assignment| {
            if assignment.members.len() > 1 {
                return Some(build_patrol(
                    territory,
                    assignment.representative,
                    &assignment.members,
                ));
            }
            if policy.sweep_self_loops {
                return self_loop_patrol(territory, assignment.representative);
            }
            None
        })
        .collect();

    info!(
        patrols = patrols.len(),
        repeated = patrols.iter().map(Patrol::repeated_edges).sum::<usize>(),
        "patrols defined"
    );
    patrols
}

/// Build the patrol for one component starting at `representative`.
#[must_use]
pub fn build_patrol(territory: &Territory, representative: NodeIndex, members: &[NodeIndex]) -> Patrol {
    let mut arena = RoadArena::new(territory, members);
    let induced_edges = arena.remaining;

    let mut walk = match arena.local(representative) {
        Some(start) if arena.is_balanced() => arena.eulerian_circuit(start),
        Some(start) => arena.detour_walk(territory, start),
        None => {
            warn!(
                representative = territory.name(representative),
                "representative is not a member of its component"
            );
            vec![representative]
        }
    };

    // Drop the closing return to the representative.
    if walk.len() > 1 {
        walk.pop();
    }

    debug!(
        representative = territory.name(representative),
        members = members.len(),
        induced_edges,
        length = walk.len(),
        "patrol built"
    );

    Patrol {
        representative,
        route: walk,
        induced_edges,
    }
}

fn self_loop_patrol(territory: &Territory, v: NodeIndex) -> Option<Patrol> {
    let loops = territory.edge_multiplicity(v, v);
    (loops > 0).then(|| Patrol {
        representative: v,
        route: vec![v; loops],
        induced_edges: loops,
    })
}

// ---------------------------------------------------------------------------
// RoadArena
// ---------------------------------------------------------------------------

/// Undriven induced roads, indexed by local member position.
struct RoadArena<'a> {
    members: &'a [NodeIndex],
    member_set: HashSet<NodeIndex>,
    local_of: HashMap<NodeIndex, usize>,
    /// Per member: undriven road targets, stored reversed so `pop` yields
    /// insertion order.
    undriven: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
    remaining: usize,
}

impl<'a> RoadArena<'a> {
    fn new(territory: &Territory, members: &'a [NodeIndex]) -> Self {
        let local_of: HashMap<NodeIndex, usize> =
            members.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let member_set: HashSet<NodeIndex> = members.iter().copied().collect();

        let mut undriven: Vec<Vec<usize>> = vec![Vec::new(); members.len()];
        let mut in_degree = vec![0; members.len()];
        let mut remaining = 0;

        for (from, &v) in members.iter().enumerate() {
            for target in territory.successors(v) {
                if let Some(&to) = local_of.get(&target) {
                    undriven[from].push(to);
                    in_degree[to] += 1;
                    remaining += 1;
                }
            }
            undriven[from].reverse();
        }

        let out_degree = undriven.iter().map(Vec::len).collect();

        Self {
            members,
            member_set,
            local_of,
            undriven,
            in_degree,
            out_degree,
            remaining,
        }
    }

    fn local(&self, v: NodeIndex) -> Option<usize> {
        self.local_of.get(&v).copied()
    }

    fn is_balanced(&self) -> bool {
        self.in_degree == self.out_degree
    }

    /// Iterative Hierholzer. Uses every road exactly once.
    fn eulerian_circuit(&mut self, start: usize) -> Vec<NodeIndex> {
        let mut stack: Vec<usize> = vec![start];
        let mut circuit: Vec<NodeIndex> = Vec::with_capacity(self.remaining + 1);

        while let Some(&current) = stack.last() {
            if let Some(next) = self.undriven[current].pop() {
                self.remaining -= 1;
                stack.push(next);
            } else {
                circuit.push(self.members[current]);
                stack.pop();
            }
        }

        circuit.reverse();
        circuit
    }

    /// Greedy walk with shortest-route detours. Returns to `start`.
    fn detour_walk(&mut self, territory: &Territory, start: usize) -> Vec<NodeIndex> {
        let mut walk: Vec<NodeIndex> = vec![self.members[start]];
        let mut current = start;

        while self.remaining > 0 {
            if let Some(next) = self.undriven[current].pop() {
                self.remaining -= 1;
                walk.push(self.members[next]);
                current = next;
                continue;
            }

            let Some(target) = self.undriven.iter().position(|roads| !roads.is_empty()) else {
                break;
            };
            if !self.splice(territory, current, target, &mut walk) {
                break;
            }
            current = target;
        }

        if current != start && !self.splice(territory, current, start, &mut walk) {
            warn!("patrol could not return to its representative");
        }

        walk
    }

    /// Append the shortest induced route `from → to` (without `from`) to
    /// `walk`, marking undriven roads along it as driven.
    fn splice(
        &mut self,
        territory: &Territory,
        from: usize,
        to: usize,
        walk: &mut Vec<NodeIndex>,
    ) -> bool {
        let Some(route) =
            shortest_path_within(territory, self.members[from], self.members[to], &self.member_set)
        else {
            warn!(
                from = territory.name(self.members[from]),
                to = territory.name(self.members[to]),
                "no route inside component"
            );
            return false;
        };

        for pair in route.windows(2) {
            let (Some(u), Some(w)) = (self.local(pair[0]), self.local(pair[1])) else {
                continue;
            };
            if let Some(pos) = self.undriven[u].iter().rposition(|&t| t == w) {
                self.undriven[u].remove(pos);
                self.remaining -= 1;
            }
            walk.push(pair[1]);
        }

        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn patrol_for(t: &Territory, representative: &str) -> Patrol {
        let members: Vec<NodeIndex> = t.vertices().collect();
        build_patrol(t, t.index_of(representative).unwrap(), &members)
    }

    fn edge_counts(edges: &[(NodeIndex, NodeIndex)]) -> HashMap<(NodeIndex, NodeIndex), usize> {
        let mut counts = HashMap::new();
        for &e in edges {
            *counts.entry(e).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn three_cycle_is_driven_once() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let patrol = patrol_for(&t, "A");
        assert_eq!(t.names(&patrol.route), vec!["A", "B", "C"]);
        assert_eq!(patrol.repeated_edges(), 0);
    }

    #[test]
    fn starting_mid_cycle_rotates_route() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let patrol = patrol_for(&t, "B");
        assert_eq!(t.names(&patrol.route), vec!["B", "C", "A"]);
    }

    #[test]
    fn figure_eight_is_eulerian() {
        // Two cycles sharing A: A → B → A and A → C → A.
        let t = Territory::from_edges(&[("A", "B"), ("B", "A"), ("A", "C"), ("C", "A")]);
        let patrol = patrol_for(&t, "A");

        assert_eq!(patrol.route.len(), 4);
        assert_eq!(patrol.repeated_edges(), 0);
        let counts = edge_counts(&patrol.edges());
        assert!(counts.values().all(|&c| c == 1));
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn parallel_roads_are_each_driven() {
        // A → B twice, B → A twice: balanced, four traversals.
        let t = Territory::from_edges(&[("A", "B"), ("A", "B"), ("B", "A"), ("B", "A")]);
        let patrol = patrol_for(&t, "A");
        assert_eq!(t.names(&patrol.route), vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn unbalanced_component_repeats_a_detour() {
        // A → B → C → A plus shortcut A → C: A has out 2 / in 1.
        let t = Territory::from_edges(&[("A", "B"), ("B", "C"), ("C", "A"), ("A", "C")]);
        let a = t.index_of("A").unwrap();
        let patrol = patrol_for(&t, "A");

        assert_eq!(patrol.route[0], a);
        assert_eq!(patrol.induced_edges, 4);
        assert!(patrol.repeated_edges() >= 1);

        let counts = edge_counts(&patrol.edges());
        for (from, to) in [("A", "B"), ("B", "C"), ("C", "A"), ("A", "C")] {
            let key = (t.index_of(from).unwrap(), t.index_of(to).unwrap());
            assert!(counts.get(&key).copied().unwrap_or(0) >= 1, "{from}→{to} not driven");
        }
        for (from, to) in patrol.edges() {
            assert!(t.edge_multiplicity(from, to) > 0, "walk used a missing road");
        }
    }

    #[test]
    fn self_loop_inside_component_is_driven() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "A"), ("B", "B")]);
        let b = t.index_of("B").unwrap();
        let patrol = patrol_for(&t, "A");

        assert_eq!(patrol.repeated_edges(), 0);
        assert!(patrol.edges().contains(&(b, b)));
    }

    #[test]
    fn singleton_policy() {
        let t = Territory::from_edges(&[("A", "A"), ("A", "A")]);
        let a = t.index_of("A").unwrap();
        let assignments = vec![Assignment {
            representative: a,
            members: vec![a],
            is_capital: true,
        }];

        assert!(define_patrols(&t, &assignments, PatrolPolicy::default()).is_empty());

        let swept = define_patrols(
            &t,
            &assignments,
            PatrolPolicy {
                sweep_self_loops: true,
            },
        );
        assert_eq!(swept.len(), 1);
        assert_eq!(swept[0].route, vec![a, a]);
        assert_eq!(swept[0].repeated_edges(), 0);
    }

    #[test]
    fn singleton_without_loops_never_patrols() {
        let mut t = Territory::new();
        let a = t.add_vertex("A");
        let assignments = vec![Assignment {
            representative: a,
            members: vec![a],
            is_capital: false,
        }];
        let swept = define_patrols(
            &t,
            &assignments,
            PatrolPolicy {
                sweep_self_loops: true,
            },
        );
        assert!(swept.is_empty());
    }
}
