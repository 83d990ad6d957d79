mod boundary;
mod collector;
mod config;
mod cursor;
mod error;
mod probe;
mod record;
mod report;
mod sections;
mod units;

use clap::Parser;
use collector::{InputManifest, ParseSession};
use config::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Extract per-job IOPS, bandwidth, latency, clat percentiles and CPU
/// usage from fio text reports and print them as a table, LaTeX or JSON.
#[derive(Parser, Debug)]
#[command(name = "fioclean", version, about)]
pub struct Cli {
    /// fio report files, processed in order (`.zst` files are decompressed)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Job descriptors at the top of each file (default: from config)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Expected number of input files; a mismatch is logged
    #[arg(long)]
    count: Option<usize>,

    /// Config file path [default: fioclean.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra logging (probe results, section matches)
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Run one batch and return the process exit status: 0 when every file
/// was extracted, 1 when some file failed or the report could not be
/// written, 2 for configuration or usage errors.
fn run(cli: &Cli) -> u8 {
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from("fioclean.toml"), false),
    };
    let mut config = match config::load(&config_path, required) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return EXIT_USAGE;
        }
    };
    if let Some(jobs) = cli.jobs {
        config.parse.jobs_per_file = jobs;
    }
    let format = cli.format.unwrap_or(config.output.format);
    let output = cli.output.clone().or(config.output.file.clone());

    let mut files = cli.files.clone();
    match config::expand_inputs(&config.output.inputs) {
        Ok(mut globbed) => files.append(&mut globbed),
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return EXIT_USAGE;
        }
    }
    if files.is_empty() {
        tracing::error!("no input files given");
        return EXIT_USAGE;
    }

    let manifest = match cli.count {
        Some(declared) => InputManifest::with_declared_count(declared, files),
        None => InputManifest::new(files),
    };
    tracing::info!(
        files = manifest.files.len(),
        jobs_per_file = config.parse.jobs_per_file,
        "fioclean starting"
    );

    let mut session = ParseSession::new(config.parse.clone());
    session.run(&manifest);
    let batch = session.finish();

    let rendered = match format {
        OutputFormat::Json => match report::render_json(&batch) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize report");
                return EXIT_FAILURE;
            }
        },
        OutputFormat::Latex => report::render_latex(&batch.records),
        OutputFormat::Summary => report::render_summary(&batch),
    };

    match &output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered.as_bytes()) {
                tracing::error!(error = %e, path = %path.display(), "failed to write report");
                return EXIT_FAILURE;
            }
        }
        None => print!("{rendered}"),
    }

    tracing::info!(
        records = batch.records.len(),
        failed_files = batch.failures.len(),
        "fioclean finished"
    );
    if batch.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    tracing::debug!(?cli, "parsed CLI arguments");
    ExitCode::from(run(&cli))
}
