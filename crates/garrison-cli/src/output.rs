//! Output layer: plain text, pretty, or JSON rendering of a [`Solution`].
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`
//! 2. `--json`
//! 3. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 4. Default: [`OutputMode::Text`].
//!
//! # Text layout
//!
//! ```text
//! <capital, or an empty line>
//! <battalion count>
//! <battalion>            (one per line)
//! <patrol count>
//! <v1> <v2> ... <vk>     (one patrol per line)
//! ```

use clap::ValueEnum;
use garrison_core::{LoadError, Solution};
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 48;

/// The output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Labelled sections for humans.
    Pretty,
    /// Line-oriented text for pipes and scripts.
    Text,
    /// A single JSON object.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "pretty" => return OutputMode::Pretty,
            _ => {}
        }
    }

    OutputMode::Text
}

/// Resolve the output mode from CLI flags and the `FORMAT` env var.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref())
}

// ---------------------------------------------------------------------------
// Solution rendering
// ---------------------------------------------------------------------------

/// Render a solution to `w` in the requested mode.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_solution(mode: OutputMode, solution: &Solution, w: &mut dyn Write) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, solution)?;
            writeln!(w)
        }
        OutputMode::Text => write_text(solution, w),
        OutputMode::Pretty => write_pretty(solution, w),
    }
}

fn write_text(solution: &Solution, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", solution.capital.as_deref().unwrap_or_default())?;

    writeln!(w, "{}", solution.battalions.len())?;
    for battalion in &solution.battalions {
        writeln!(w, "{battalion}")?;
    }

    writeln!(w, "{}", solution.patrols.len())?;
    for patrol in &solution.patrols {
        writeln!(w, "{}", patrol.join(" "))?;
    }
    Ok(())
}

fn write_pretty(solution: &Solution, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Capital")?;
    writeln!(w, "{}", solution.capital.as_deref().unwrap_or("(none)"))?;
    writeln!(w)?;

    pretty_section(w, &format!("Components ({})", solution.sccs.len()))?;
    for (i, component) in solution.sccs.iter().enumerate() {
        writeln!(w, "{:>3}. {}", i + 1, component.join(", "))?;
    }
    writeln!(w)?;

    pretty_section(w, &format!("Battalions ({})", solution.battalions.len()))?;
    for battalion in &solution.battalions {
        writeln!(w, "  {battalion}")?;
    }
    writeln!(w)?;

    pretty_section(w, &format!("Patrols ({})", solution.patrols.len()))?;
    for patrol in &solution.patrols {
        // Show the closing return so the loop reads naturally.
        let back = patrol.first().map_or("", String::as_str);
        writeln!(w, "  {} → {back}", patrol.join(" → "))?;
    }
    Ok(())
}

fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1004").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error with a suggestion and error code.
    pub fn with_details(
        message: impl Into<String>,
        suggestion: Option<&str>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
            error_code: Some(error_code.into()),
        }
    }
}

impl From<&LoadError> for CliError {
    fn from(err: &LoadError) -> Self {
        let code = err.code();
        Self::with_details(err.to_string(), code.hint(), code.code())
    }
}

/// Render an error to `w` in the requested format.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_error(mode: OutputMode, error: &CliError, w: &mut dyn Write) -> io::Result<()> {
    if mode.is_json() {
        let wrapper = serde_json::json!({ "error": error });
        serde_json::to_writer_pretty(&mut *w, &wrapper)?;
        return writeln!(w);
    }

    match &error.error_code {
        Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
        None => writeln!(w, "error: {}", error.message)?,
    }
    if let Some(suggestion) = &error.suggestion {
        writeln!(w, "  suggestion: {suggestion}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use garrison_core::{ErrorCode, SolverConfig, Territory, parse_territory, solve};

    fn rendered(mode: OutputMode, solution: &Solution) -> String {
        let mut buf = Vec::new();
        render_solution(mode, solution, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn format_flag_wins() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Pretty), true, Some("json"));
        assert_eq!(mode, OutputMode::Pretty);
    }

    #[test]
    fn json_flag_beats_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"));
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_is_case_insensitive() {
        assert_eq!(resolve_output_mode_inner(None, false, Some("JSON")), OutputMode::Json);
        assert_eq!(resolve_output_mode_inner(None, false, Some("Pretty")), OutputMode::Pretty);
    }

    #[test]
    fn unknown_env_falls_back_to_text() {
        assert_eq!(resolve_output_mode_inner(None, false, Some("yaml")), OutputMode::Text);
        assert_eq!(resolve_output_mode_inner(None, false, None), OutputMode::Text);
    }

    #[test]
    fn text_layout_for_three_cycle() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let out = rendered(OutputMode::Text, &solve(&t, SolverConfig::default()));
        assert_eq!(out, "A\n0\n1\nA B C\n");
    }

    #[test]
    fn text_layout_without_capital() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "A"), ("C", "D"), ("D", "C")]);
        let out = rendered(OutputMode::Text, &solve(&t, SolverConfig::default()));
        assert_eq!(out, "\n0\n0\n");
    }

    #[test]
    fn text_layout_for_hub() {
        let t = Territory::from_edges(&[("H", "X"), ("H", "Y"), ("H", "Z")]);
        let out = rendered(OutputMode::Text, &solve(&t, SolverConfig::default()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "H");
        assert_eq!(lines[1], "3");
        let mut battalions = lines[2..5].to_vec();
        battalions.sort_unstable();
        assert_eq!(battalions, vec!["X", "Y", "Z"]);
        assert_eq!(lines[5], "0");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn json_layout_has_every_field() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "A")]);
        let out = rendered(OutputMode::Json, &solve(&t, SolverConfig::default()));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["capital"], "A");
        assert_eq!(value["battalions"], serde_json::json!([]));
        assert_eq!(value["patrols"], serde_json::json!([["A", "B"]]));
        assert_eq!(value["sccs"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn pretty_layout_closes_the_loop() {
        let t = Territory::from_edges(&[("A", "B"), ("B", "A")]);
        let out = rendered(OutputMode::Pretty, &solve(&t, SolverConfig::default()));
        assert!(out.contains("Capital\n"));
        assert!(out.contains("Patrols (1)"));
        assert!(out.contains("A → B → A"));
    }

    #[test]
    fn load_error_carries_code_and_hint() {
        let err = parse_territory("1 2\nA B\n").unwrap_err();
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some(ErrorCode::TruncatedEdgeList.code()));
        assert!(cli.suggestion.is_some());

        let mut buf = Vec::new();
        render_error(OutputMode::Text, &cli, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("error[E1004]: "));
        assert!(text.contains("suggestion:"));
    }

    #[test]
    fn json_error_is_wrapped() {
        let cli = CliError::with_details("bad input", Some("try again"), "E1002");
        let mut buf = Vec::new();
        render_error(OutputMode::Json, &cli, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["error_code"], "E1002");
        assert_eq!(value["error"]["suggestion"], "try again");
    }
}
