//! Solver pipeline.
//!
//! # Overview
//!
//! [`Solver`] runs the stages in dependency order and caches what later
//! stages need:
//!
//! ```text
//! Territory
//!    ↓  capital::select_capital()        (one BFS per location)
//! capital
//!    ↓  scc::scc_indices()               (computed once, shared)
//! components
//!    ↓  battalion::assign_representatives()
//! assignments (capital's component + one battalion per other component)
//!    ↓  patrol::define_patrols()
//! patrols
//! ```
//!
//! Each public method may be called in any order; missing prerequisites are
//! computed on demand. Without a capital there are no assignments, so both
//! battalions and patrols come back empty.

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::instrument;

use crate::battalion::{Assignment, assign_representatives, battalions};
use crate::capital::{CapitalChoice, select_capital};
use crate::config::SolverConfig;
use crate::patrol::{Patrol, define_patrols};
use crate::scc::scc_indices;
use crate::territory::Territory;
use crate::timing::timed;

/// Every derived fact about a territory, as location names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// The capital, or `None` if no location reaches every other one.
    pub capital: Option<String>,
    /// Strongly connected components, in Kosaraju output order.
    pub sccs: Vec<Vec<String>>,
    /// One secondary battalion per component without the capital.
    pub battalions: Vec<String>,
    /// One patrol route per multi-location component with a representative.
    pub patrols: Vec<Vec<String>>,
}

/// Stage runner with cached intermediate results.
#[derive(Debug)]
pub struct Solver<'a> {
    territory: &'a Territory,
    config: SolverConfig,
    capital: Option<Option<CapitalChoice>>,
    components: Option<Vec<Vec<NodeIndex>>>,
    assignments: Option<Vec<Assignment>>,
}

impl<'a> Solver<'a> {
    #[must_use]
    pub const fn new(territory: &'a Territory, config: SolverConfig) -> Self {
        Self {
            territory,
            config,
            capital: None,
            components: None,
            assignments: None,
        }
    }

    /// The capital's name, if any location qualifies.
    pub fn find_capital(&mut self) -> Option<String> {
        self.capital_choice()
            .map(|choice| self.territory.name(choice.index).to_string())
    }

    /// Strongly connected components as location names.
    pub fn find_sccs(&mut self) -> Vec<Vec<String>> {
        let territory = self.territory;
        self.components()
            .iter()
            .map(|component| territory.names(component))
            .collect()
    }

    /// Secondary battalions, in component order.
    pub fn find_secondary_battalions(&mut self) -> Vec<String> {
        let territory = self.territory;
        territory.names(&battalions(self.assignments()))
    }

    /// Patrol routes, representative first, closing return omitted.
    pub fn define_patrols(&mut self) -> Vec<Vec<String>> {
        let territory = self.territory;
        self.patrols()
            .iter()
            .map(|patrol| territory.names(&patrol.route))
            .collect()
    }

    /// Patrols with their index-level detail.
    pub fn patrols(&mut self) -> Vec<Patrol> {
        let territory = self.territory;
        let policy = self.config.patrol;
        let assignments = self.assignments();
        timed("solve.patrols", || {
            define_patrols(territory, assignments, policy)
        })
    }

    /// Run every stage and collect the results.
    #[instrument(skip_all, fields(vertices = self.territory.vertex_count(), edges = self.territory.edge_count()))]
    pub fn solve(mut self) -> Solution {
        let capital = self.find_capital();
        let sccs = self.find_sccs();
        let battalions = self.find_secondary_battalions();
        let patrols = self.define_patrols();

        Solution {
            capital,
            sccs,
            battalions,
            patrols,
        }
    }

    fn capital_choice(&mut self) -> Option<CapitalChoice> {
        if let Some(cached) = self.capital {
            return cached;
        }
        let territory = self.territory;
        let tie_break = self.config.selection.tie_break;
        let choice = timed("solve.capital", || select_capital(territory, tie_break));
        self.capital = Some(choice);
        choice
    }

    fn components(&mut self) -> &[Vec<NodeIndex>] {
        let territory = self.territory;
        self.components
            .get_or_insert_with(|| timed("solve.sccs", || scc_indices(territory)))
    }

    fn assignments(&mut self) -> &[Assignment] {
        if self.assignments.is_none() {
            let computed = match self.capital_choice() {
                Some(choice) => {
                    let territory = self.territory;
                    let tie_break = self.config.selection.tie_break;
                    let components = self.components();
                    timed("solve.battalions", || {
                        assign_representatives(territory, choice.index, components, tie_break)
                    })
                }
                None => Vec::new(),
            };
            self.assignments = Some(computed);
        }
        self.assignments.as_deref().unwrap_or_default()
    }
}

/// Solve a territory in one call.
#[must_use]
pub fn solve(territory: &Territory, config: SolverConfig) -> Solution {
    Solver::new(territory, config).solve()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
