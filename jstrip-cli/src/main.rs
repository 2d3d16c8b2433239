//! jstrip CLI - Remove JSON object members by key name
//!
//! `jstrip <input> <key1> [key2 ... keyN]` drops every object member whose
//! key matches one of the given names (ignoring case) at any depth, and
//! writes the result to `<input stem>.filtered.json` beside the input.
//!
//! Every argument after the input is a key name, including ones that start
//! with a hyphen (`jstrip in.json -trace`), so options go before the input.
//! Use `--` to pass a key spelled like a known flag: `jstrip in.json -- -v`.

use clap::{ArgAction, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use jstrip_io::{
    execute_filter, ErrorKind, ExclusionSet, FilterOptions, FilterRequest, FilterSummary,
    IoPipelineError, NamingRule, OutputTarget,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Exit status for malformed input (sysexits EX_DATAERR)
const EXIT_DATA_ERROR: u8 = 65;
/// Exit status for file access failures (sysexits EX_IOERR)
const EXIT_IO_ERROR: u8 = 74;

#[derive(Parser)]
#[command(name = "jstrip")]
#[command(about = "Remove JSON object members by key name, at any depth")]
#[command(version)]
struct Cli {
    /// Input JSON file
    input: Option<PathBuf>,
    /// Key names to remove (matched ignoring case)
    #[arg(allow_hyphen_values = true)]
    keys: Vec<String>,
    /// Output file (default: <input stem>.filtered.json beside the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Name the output <input>.filtered.json, keeping the input extension
    #[arg(long, conflicts_with = "output")]
    append_suffix: bool,
    /// Write single-line JSON instead of pretty-printing
    #[arg(long)]
    compact: bool,
    /// Spaces per indentation level when pretty-printing
    #[arg(long, default_value = "2")]
    indent: usize,
    /// Report how many members would be removed without writing output
    #[arg(long)]
    dry_run: bool,
    /// Show progress spinner while filtering
    #[arg(long)]
    progress: bool,
    /// Suppress progress lines on stdout
    #[arg(short, long)]
    quiet: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pipeline(#[from] IoPipelineError),
    #[error("failed to write to console: {0}")]
    Console(#[from] std::io::Error),
}

impl CliError {
    fn exit_status(&self) -> u8 {
        match self {
            CliError::Pipeline(err) => match err.kind() {
                ErrorKind::Parse => EXIT_DATA_ERROR,
                ErrorKind::Io => EXIT_IO_ERROR,
            },
            CliError::Console(_) => EXIT_IO_ERROR,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(request) = build_request(&cli) else {
        println!("{}", Cli::command().render_usage());
        return ExitCode::SUCCESS;
    };

    let mut stdout = std::io::stdout().lock();
    match handle_strip(request, &mut stdout, cli.quiet, cli.progress) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_status())
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns `None` when fewer than two positional arguments were given
fn build_request(cli: &Cli) -> Option<FilterRequest> {
    let input = cli.input.clone()?;
    if cli.keys.is_empty() {
        return None;
    }

    let output = match (&cli.output, cli.append_suffix) {
        (Some(path), _) => OutputTarget::Path(path.clone()),
        (None, true) => OutputTarget::Derived(NamingRule::Append),
        (None, false) => OutputTarget::Derived(NamingRule::Stem),
    };
    let options = FilterOptions {
        pretty: !cli.compact,
        indent: cli.indent,
        trailing_newline: false,
    };

    Some(FilterRequest {
        input,
        excluded: cli.keys.iter().collect::<ExclusionSet>(),
        output,
        options,
        dry_run: cli.dry_run,
    })
}

fn handle_strip<W: Write>(
    request: FilterRequest,
    out: &mut W,
    quiet: bool,
    show_progress: bool,
) -> Result<FilterSummary, CliError> {
    if !quiet {
        report_start(
            out,
            &request.input,
            &request.output_path(),
            request.excluded.len(),
            request.dry_run,
        )?;
    }

    let progress_bar = show_progress.then(|| create_spinner("Filtering"));
    let result = execute_filter(request);
    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }
    let summary = result?;

    if !quiet {
        report_summary(out, &summary)?;
    }
    Ok(summary)
}

fn report_start<W: Write>(
    out: &mut W,
    input: &Path,
    output: &Path,
    key_count: usize,
    dry_run: bool,
) -> std::io::Result<()> {
    writeln!(out, "Reading JSON from: {}", input.display())?;
    if dry_run {
        writeln!(
            out,
            "Dry run: counting members for {} node types (no output written)",
            key_count
        )
    } else {
        writeln!(
            out,
            "Writing filtered JSON (removing {} node types) to: {}",
            key_count,
            output.display()
        )
    }
}

fn report_summary<W: Write>(out: &mut W, summary: &FilterSummary) -> std::io::Result<()> {
    if summary.dry_run {
        writeln!(
            out,
            "Dry run complete: {} nodes would be removed.",
            summary.removed
        )
    } else {
        writeln!(
            out,
            "JSON document recreated successfully with {} nodes removed.",
            summary.removed
        )
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
