#![forbid(unsafe_code)]

mod output;

use anyhow::Context;
use clap::Parser;
use garrison_core::config::{config_error_code, load_config};
use garrison_core::{LoadError, Solver, SolverConfig, Territory, TieBreak, read_territory, timing};
use output::{CliError, OutputMode};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "garrison: capital, battalion and patrol planning for road networks",
    long_about = "Read a directed road network, pick the capital, place a secondary battalion in \
                  every other strongly connected region, and lay out patrol routes.",
    after_help = "EXAMPLES:\n    # Solve a network file\n    garrison roads.txt\n\n    # Read from stdin, emit JSON\n    printf '3 3\\nA B\\nB C\\nC A\\n' | garrison --json\n\n    # Break ties by name and time each stage\n    garrison roads.txt --lexicographic --timing"
)]
struct Cli {
    /// Road network file: `V E` header, then `E` pairs of `from to`.
    /// Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Solver config file (default: ./garrison.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of text.
    #[arg(long)]
    json: bool,

    /// Break capital and battalion ties by location name.
    #[arg(long)]
    lexicographic: bool,

    /// Give single locations with self-loops their own patrol.
    #[arg(long)]
    sweep_self_loops: bool,

    /// Emit a stage timing report to stderr.
    #[arg(long)]
    timing: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    /// Config file (or defaults) with command-line overrides applied.
    fn solver_config(&self, dir: &Path) -> anyhow::Result<SolverConfig> {
        let mut config = load_config(self.config.as_deref(), dir)?;
        if self.lexicographic {
            config.selection.tie_break = TieBreak::Lexicographic;
        }
        if self.sweep_self_loops {
            config.patrol.sweep_self_loops = true;
        }
        Ok(config)
    }
}

/// Default filter when `GARRISON_LOG` is unset.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose || env::var("DEBUG").is_ok() {
        "garrison=debug,info"
    } else {
        "garrison=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("GARRISON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    let format = env::var("GARRISON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn load_territory(input: Option<&Path>) -> Result<Territory, LoadError> {
    match input {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "reading territory file");
            read_territory(fs::File::open(path)?)
        }
        _ => {
            debug!("reading territory from stdin");
            read_territory(io::stdin().lock())
        }
    }
}

/// Report `error` on stderr and exit non-zero.
fn fail(mode: OutputMode, error: &CliError) -> ! {
    if output::render_error(mode, error, &mut io::stderr().lock()).is_err() {
        eprintln!("error: {}", error.message);
    }
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    let mode = cli.output_mode();
    let working_dir = env::current_dir()?;

    let config = match cli.solver_config(&working_dir) {
        Ok(config) => config,
        Err(err) => {
            let code = config_error_code(&err);
            fail(
                mode,
                &CliError::with_details(format!("{err:#}"), code.hint(), code.code()),
            );
        }
    };
    debug!(?config, "solver config resolved");

    let territory = match timing::timed("cli.load", || load_territory(cli.input.as_deref())) {
        Ok(territory) => territory,
        Err(err) => fail(mode, &CliError::from(&err)),
    };
    info!(
        vertices = territory.vertex_count(),
        edges = territory.edge_count(),
        "territory loaded"
    );

    let solution = timing::timed("cli.solve", || Solver::new(&territory, config).solve());

    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        output::render_solution(mode, &solution, &mut out).context("Failed to write solution")?;
        out.flush()?;
    }

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else if mode.is_json() {
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_optional() {
        let cli = Cli::parse_from(["garrison"]);
        assert!(cli.input.is_none());

        let cli = Cli::parse_from(["garrison", "roads.txt"]);
        assert_eq!(cli.input.as_deref(), Some(Path::new("roads.txt")));
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["garrison", "--format", "pretty"]);
        assert_eq!(cli.format, Some(OutputMode::Pretty));
    }

    #[test]
    fn json_flag_parses_after_input() {
        let cli = Cli::parse_from(["garrison", "roads.txt", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let dir = std::env::temp_dir().join("garrison-cli-overrides-missing");
        let cli = Cli::parse_from(["garrison", "--lexicographic", "--sweep-self-loops"]);
        let config = cli.solver_config(&dir).unwrap();
        assert_eq!(config.selection.tie_break, TieBreak::Lexicographic);
        assert!(config.patrol.sweep_self_loops);
    }

    #[test]
    fn defaults_without_flags() {
        let dir = std::env::temp_dir().join("garrison-cli-defaults-missing");
        let cli = Cli::parse_from(["garrison"]);
        assert_eq!(cli.solver_config(&dir).unwrap(), SolverConfig::default());
    }

    #[test]
    fn verbose_raises_default_filter_to_debug() {
        assert_eq!(default_log_filter(true), "garrison=debug,info");
    }

    #[test]
    fn timing_and_verbose_flags() {
        let cli = Cli::parse_from(["garrison", "-v", "--timing"]);
        assert!(cli.verbose);
        assert!(cli.timing);
    }
}
