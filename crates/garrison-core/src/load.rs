//! Text input loader.
//!
//! # Format
//!
//! Whitespace-separated tokens (line breaks are not significant):
//!
//! ```text
//! <vertex count> <edge count>
//! <from> <to>
//! <from> <to>
//! ...
//! ```
//!
//! Locations are created from the edge list in the order they first appear.
//! The vertex count is advisory: a mismatch with the number of distinct
//! names is logged, not rejected. Tokens after the declared edges are
//! ignored with a warning.

use std::io::Read;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::ErrorCode;
use crate::territory::Territory;

/// Errors produced while loading a territory from text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing {field} count in header")]
    MissingHeader { field: &'static str },

    #[error("invalid {field} count {value:?}")]
    InvalidCount { field: &'static str, value: String },

    #[error("edge list ended after {found} of {expected} edges")]
    Truncated { expected: usize, found: usize },
}

impl LoadError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::InputUnreadable,
            Self::MissingHeader { .. } => ErrorCode::MissingHeader,
            Self::InvalidCount { .. } => ErrorCode::InvalidCount,
            Self::Truncated { .. } => ErrorCode::TruncatedEdgeList,
        }
    }
}

/// Read the whole of `reader` and parse it.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if reading fails, otherwise see
/// [`parse_territory`].
pub fn read_territory<R: Read>(mut reader: R) -> Result<Territory, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_territory(&text)
}

/// Parse a territory from text.
///
/// # Errors
///
/// Returns an error if the header is missing or not numeric, or if fewer
/// edges follow than the header declares.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_territory(text: &str) -> Result<Territory, LoadError> {
    let mut tokens = text.split_whitespace();

    let declared_vertices = parse_count(tokens.next(), "vertex")?;
    let declared_edges = parse_count(tokens.next(), "edge")?;

    let mut territory = Territory::new();
    for found in 0..declared_edges {
        let (Some(from), Some(to)) = (tokens.next(), tokens.next()) else {
            return Err(LoadError::Truncated {
                expected: declared_edges,
                found,
            });
        };
        territory.add_edge(from, to);
    }

    let trailing = tokens.count();
    if trailing > 0 {
        warn!(trailing, "ignoring tokens after the declared edge list");
    }
    if declared_vertices != territory.vertex_count() {
        debug!(
            declared = declared_vertices,
            actual = territory.vertex_count(),
            "vertex count differs from header"
        );
    }

    Ok(territory)
}

fn parse_count(token: Option<&str>, field: &'static str) -> Result<usize, LoadError> {
    let token = token.ok_or(LoadError::MissingHeader { field })?;
    token.parse::<usize>().map_err(|_| LoadError::InvalidCount {
        field,
        value: token.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
