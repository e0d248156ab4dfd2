#![forbid(unsafe_code)]
//! garrison-core library.
//!
//! Plans the defence of a road network: picks a capital, a secondary
//! battalion for every strongly connected component the capital does not
//! belong to, and a patrol route through every component with roads to cover.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library failures (only loading can
//!   fail), `anyhow::Result` for config helpers.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!
//! # Typical Usage
//!
//! ```rust
//! use garrison_core::{SolverConfig, Territory, solve};
//!
//! let mut territory = Territory::new();
//! territory.add_edge("A", "B");
//! territory.add_edge("B", "C");
//! territory.add_edge("C", "A");
//!
//! let solution = solve(&territory, SolverConfig::default());
//! assert_eq!(solution.capital.as_deref(), Some("A"));
//! assert!(solution.battalions.is_empty());
//! assert_eq!(solution.patrols, vec![vec!["A", "B", "C"]]);
//! ```

pub mod battalion;
pub mod capital;
pub mod config;
pub mod error;
pub mod load;
pub mod paths;
pub mod patrol;
pub mod scc;
pub mod solve;
pub mod territory;
pub mod timing;

pub use capital::find_capital;
pub use config::{PatrolPolicy, SelectionConfig, SolverConfig, TieBreak};
pub use error::ErrorCode;
pub use load::{LoadError, parse_territory, read_territory};
pub use paths::{Distances, shortest_paths};
pub use scc::find_sccs;
pub use solve::{Solution, Solver, solve};
pub use territory::Territory;
