//! treeforge - Parse ASCII tree diagrams into validated path hierarchies.
//!
//! Usage:
//!   treeforge check FILE     Parse and validate, reporting violations
//!   treeforge parse FILE     Print the parsed forest as JSON
//!   treeforge fmt FILE       Re-render the tree in a canonical style
//!   treeforge --help         Show help
//!
//! FILE may be `-` to read from stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use treeforge_parse::{RenderStyle, TreeParser, render_forest};
use treeforge_validate::{Settings, Violation, check};

#[derive(Parser)]
#[command(
    name = "treeforge",
    version,
    about = "Parse ASCII tree diagrams into validated, conflict-free paths",
    long_about = "treeforge reads tree diagrams (plain indentation, `tree` output, \
                  or box-drawing guides), rebuilds the hierarchy, and checks every \
                  path against configurable rules, suggesting repairs for conflicts."
)]
struct Cli {
    /// Settings file (TOML with [parse], [rules] and [strategy] tables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate a tree, reporting path violations
    Check {
        /// Tree file, or `-` for stdin
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a tree and print the forest as JSON
    Parse {
        /// Tree file, or `-` for stdin
        file: PathBuf,
    },

    /// Re-render a tree in a canonical style
    Fmt {
        /// Tree file, or `-` for stdin
        file: PathBuf,

        /// Rendering style
        #[arg(short, long, default_value = "unicode")]
        style: StyleArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleArg {
    Plain,
    #[default]
    Unicode,
    Ascii,
}

impl From<StyleArg> for RenderStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Plain => RenderStyle::Plain,
            StyleArg::Unicode => RenderStyle::Unicode,
            StyleArg::Ascii => RenderStyle::Ascii,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    debug!(
        config = ?cli.config,
        max_depth = settings.rules.max_depth,
        max_path_length = settings.rules.max_path_length,
        "loaded settings"
    );

    match cli.command {
        Command::Check { file, format } => run_check(&file, &settings, format),
        Command::Parse { file } => run_parse(&file, &settings),
        Command::Fmt { file, style } => run_fmt(&file, &settings, style),
    }
}

/// Install a stderr subscriber honoring `RUST_LOG`, raised by `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read tree text from a file, or stdin for `-`.
fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Parse, validate and report.
fn run_check(file: &Path, settings: &Settings, format: OutputFormat) -> Result<()> {
    let text = read_input(file)?;
    let outcome = check(&text, settings).context("Check failed")?;
    let report = &outcome.report;

    match format {
        OutputFormat::Text => {
            for warning in &outcome.parse.warnings {
                println!(" warning: line {}: {}", warning.line, warning.message);
            }

            if report.is_clean() {
                println!(" {} entries, no violations.", report.nodes_checked);
            } else {
                println!();
                println!("{}", "─".repeat(70));
                println!(
                    " {} entries, {} error(s), {} warning(s)",
                    report.nodes_checked,
                    report.errors().count(),
                    report.warnings().count()
                );
                println!("{}", "─".repeat(70));
                println!();

                for (code, violations) in report.by_code() {
                    println!(" {code} ({})", violations.len());
                    for violation in violations {
                        print_violation(violation);
                    }
                    println!();
                }
            }
        }
        OutputFormat::Json => {
            let out = json!({
                "forest": outcome.parse.forest,
                "warnings": outcome.parse.warnings,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    if report.has_errors() {
        bail!("{} path violation(s) found", report.errors().count());
    }
    Ok(())
}

fn print_violation(violation: &Violation) {
    let line = violation
        .details
        .get("line")
        .map(|l| format!("line {l}: "))
        .unwrap_or_default();
    println!(
        "   [{}] {line}{}: {}",
        violation.severity, violation.path, violation.message
    );
    if let Some(resolved) = &violation.resolved_path {
        if violation.details.contains_key("unresolved") {
            println!("     could not resolve automatically");
        } else {
            println!("     suggest: {resolved}");
        }
    }
}

/// Parse and dump the forest.
fn run_parse(file: &Path, settings: &Settings) -> Result<()> {
    let text = read_input(file)?;
    let output = TreeParser::new(settings.parse.clone())
        .parse(&text)
        .context("Parse failed")?;

    for warning in &output.warnings {
        eprintln!("warning: line {}: {}", warning.line, warning.message);
    }
    println!("{}", serde_json::to_string_pretty(&output.forest)?);
    Ok(())
}

/// Parse and re-render.
fn run_fmt(file: &Path, settings: &Settings, style: StyleArg) -> Result<()> {
    let text = read_input(file)?;
    let output = TreeParser::new(settings.parse.clone())
        .parse(&text)
        .context("Parse failed")?;

    print!("{}", render_forest(&output.forest, style.into()));
    Ok(())
}
