//! Top-level CLI definition and dispatch.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::{Colorize, control};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use cuke_report_converter::convert::run::Converter;
use cuke_report_converter::core::config::{Config, ConfigOverrides};
use cuke_report_converter::core::errors::CrcError;
use cuke_report_converter::core::paths::{expand_report_inputs, resolve_absolute_path};
use cuke_report_converter::model::run::TestRun;

/// Cucumber report converter: flat cucumber JSON reports to a hierarchical run model.
#[derive(Debug, Parser)]
#[command(
    name = "cukeconv",
    author,
    version,
    about = "Cucumber JSON report converter",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Default log filter implied by `-v` / `-q`.
    pub const fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Convert reports and write the run model as JSON.
    Convert(ConvertArgs),
    /// Print per-feature verdict counts and run totals.
    Summary(SummaryArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Clone, Args, Default)]
struct ReportArgs {
    /// Report files, or directories holding `*.json` reports.
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,
    /// Abort on the first undecodable report or unnamed feature.
    #[arg(long)]
    fail_on_error: bool,
    /// Keep same-named features from different reports apart.
    #[arg(long)]
    no_merge: bool,
}

impl ReportArgs {
    const fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            fail_on_error: if self.fail_on_error { Some(true) } else { None },
            merge_features: if self.no_merge { Some(false) } else { None },
        }
    }
}

#[derive(Debug, Clone, Args, Default)]
struct ConvertArgs {
    #[command(flatten)]
    reports: ReportArgs,
    /// Write the run model here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct SummaryArgs {
    #[command(flatten)]
    reports: ReportArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Conversion or configuration failure.
    #[error(transparent)]
    Convert(#[from] CrcError),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Convert(args) => run_convert(cli, args),
        Command::Summary(args) => run_summary(cli, args),
        Command::Config => run_config(cli),
    }
}

fn convert_inputs(cli: &Cli, args: &ReportArgs) -> Result<TestRun, CliError> {
    let config = Config::load_with_overrides(cli.config.as_deref(), args.overrides())?;
    let files = expand_report_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(CliError::User(
            "no report files found in the given inputs".to_string(),
        ));
    }
    Ok(Converter::new(config).convert_files(&files)?)
}

fn run_convert(cli: &Cli, args: &ConvertArgs) -> Result<(), CliError> {
    let run = convert_inputs(cli, &args.reports)?;
    let rendered = serde_json::to_string_pretty(&run)?;

    let Some(output) = &args.output else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        return Ok(());
    };

    fs::write(output, format!("{rendered}\n")).map_err(|source| CrcError::io(output, source))?;
    let output = resolve_absolute_path(output);
    match output_mode(cli) {
        OutputMode::Human => {
            eprintln!(
                "Wrote {} features ({} scenarios) to {}",
                run.features.len(),
                run.num_of_scenarios(),
                output.display()
            );
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "convert",
                "output": output.to_string_lossy(),
                "features": run.features.len(),
                "scenarios": run.num_of_scenarios(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct FeatureSummary {
    name: String,
    scenarios: usize,
    passed: u32,
    failed: u32,
    duration_ns: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RunSummary {
    features: Vec<FeatureSummary>,
    scenarios: usize,
    passed: u32,
    failed: u32,
    duration_ns: u64,
    start_time: Option<String>,
}

impl RunSummary {
    fn from_run(run: &TestRun) -> Self {
        Self {
            features: run
                .features
                .iter()
                .map(|feature| FeatureSummary {
                    name: feature.name.clone(),
                    scenarios: feature.num_of_scenarios(),
                    passed: feature.num_of_passed_scenarios,
                    failed: feature.num_of_failed_scenarios,
                    duration_ns: feature.total_duration,
                })
                .collect(),
            scenarios: run.num_of_scenarios(),
            passed: run.num_of_passed_scenarios(),
            failed: run.num_of_failed_scenarios(),
            duration_ns: run.total_duration(),
            start_time: run
                .start_time
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()),
        }
    }
}

fn run_summary(cli: &Cli, args: &SummaryArgs) -> Result<(), CliError> {
    let run = convert_inputs(cli, &args.reports)?;
    let summary = RunSummary::from_run(&run);

    match output_mode(cli) {
        OutputMode::Human => print_summary_human(&summary),
        OutputMode::Json => {
            let mut payload = serde_json::to_value(&summary)?;
            if let Value::Object(map) = &mut payload {
                map.insert("command".to_string(), json!("summary"));
            }
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn print_summary_human(summary: &RunSummary) {
    let width = summary
        .features
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);

    for feature in &summary.features {
        println!(
            "{:<width$}  scenarios: {:>3}  passed: {}  failed: {}  duration: {}",
            feature.name,
            feature.scenarios,
            colour_passed(feature.passed),
            colour_failed(feature.failed),
            format_nanos(feature.duration_ns),
        );
    }
    if !summary.features.is_empty() {
        println!();
    }
    println!(
        "{} {} features, {} scenarios, {} passed, {} failed, {}",
        "Total:".bold(),
        summary.features.len(),
        summary.scenarios,
        colour_passed(summary.passed),
        colour_failed(summary.failed),
        format_nanos(summary.duration_ns),
    );
    if let Some(start) = &summary.start_time {
        println!("Started: {start}");
    }
}

fn colour_passed(count: u32) -> String {
    count.to_string().green().to_string()
}

fn colour_failed(count: u32) -> String {
    if count == 0 {
        count.to_string()
    } else {
        count.to_string().red().bold().to_string()
    }
}

fn run_config(cli: &Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;

    match output_mode(cli) {
        OutputMode::Human => {
            if let Some(path) = &config.source_path {
                println!("# {}", resolve_absolute_path(path).display());
            }
            print!("{}", config.to_toml()?);
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "config",
                "path": config.source_path.as_ref().map(|p| p.to_string_lossy()),
                "hash": config.stable_hash()?,
                "config": serde_json::to_value(&config)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn format_nanos(nanos: u64) -> String {
    const MILLI: u64 = 1_000_000;
    const SEC: u64 = 1_000 * MILLI;

    if nanos < MILLI {
        format!("{nanos}ns")
    } else if nanos < SEC {
        format!("{}ms", nanos / MILLI)
    } else if nanos < 60 * SEC {
        format!("{}.{:03}s", nanos / SEC, (nanos % SEC) / MILLI)
    } else {
        let secs = nanos / SEC;
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("CUKECONV_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}
