use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ErrorCode;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "garrison.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub patrol: PatrolPolicy,
}

/// Order in which equally scored candidates are considered.
///
/// The first candidate in this order wins a tie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Location insertion order (capital) or component order (battalions).
    #[default]
    Insertion,
    /// Byte-wise lexicographic order of location names.
    Lexicographic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub tie_break: TieBreak,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolPolicy {
    /// Give a single-location component with self-loops its own patrol.
    #[serde(default)]
    pub sweep_self_loops: bool,
}

/// Parse a config from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML for [`SolverConfig`].
pub fn parse_config(content: &str) -> Result<SolverConfig> {
    toml::from_str::<SolverConfig>(content).context("Failed to parse solver config")
}

/// Load the solver config.
///
/// An explicit `path` must exist. Without one, `garrison.toml` in `dir` is
/// used when present, otherwise defaults apply.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<SolverConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = dir.join(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(SolverConfig::default());
            }
            fallback
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<SolverConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Classify a [`load_config`] failure.
///
/// I/O failures anywhere in the chain are [`ErrorCode::ConfigUnreadable`];
/// everything else is a parse failure.
#[must_use]
pub fn config_error_code(err: &anyhow::Error) -> ErrorCode {
    if err.chain().any(|cause| cause.is::<std::io::Error>()) {
        ErrorCode::ConfigUnreadable
    } else {
        ErrorCode::ConfigParseError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.selection.tie_break, TieBreak::Insertion);
        assert!(!config.patrol.sweep_self_loops);
    }

    #[test]
    fn parses_all_sections() {
        let config = parse_config(
            r#"
            [selection]
            tie_break = "lexicographic"

            [patrol]
            sweep_self_loops = true
            "#,
        )
        .unwrap();

        assert_eq!(config.selection.tie_break, TieBreak::Lexicographic);
        assert!(config.patrol.sweep_self_loops);
    }

    #[test]
    fn rejects_unknown_tie_break() {
        assert!(parse_config("[selection]\ntie_break = \"random\"\n").is_err());
    }

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn default_file_is_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[patrol]\nsweep_self_loops = true\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert!(config.patrol.sweep_self_loops);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
        assert_eq!(config_error_code(&err), ErrorCode::ConfigUnreadable);
    }

    #[test]
    fn broken_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[selection\n").unwrap();

        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("custom.toml"));
        assert_eq!(config_error_code(&err), ErrorCode::ConfigParseError);
    }
}
