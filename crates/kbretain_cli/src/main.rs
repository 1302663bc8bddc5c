//! kbretain CLI
//!
//! Finds (and deletes) old kafka-backup segment files.
//!
//! Every topic directory under the backup root keeps its newest `--keep`
//! segments per partition; older segments are described (default), listed
//! (`--list`), or deleted (`--delete`).

mod report;

use clap::{Parser, ValueEnum};
use kbretain_core::{ActionMode, Keep, RetentionConfig, RunSummary, ScanPolicy};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Find (and delete) kafka-backup segment files.
#[derive(Debug, Parser)]
#[command(name = "kbretain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backup directory (kafka-backup target.dir)
    target_dir: PathBuf,

    /// Keep N segment files per partition (one by default)
    #[arg(short, long, default_value = "1", value_name = "N")]
    keep: Keep,

    /// List segment files
    #[arg(short, long)]
    list: bool,

    /// Delete segment files
    #[arg(short, long)]
    delete: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Abort on the first unreadable directory instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Exit with status 1 if any file or directory failed
    #[arg(long)]
    strict: bool,

    /// Print index files that have no records file
    #[arg(long)]
    report_orphans: bool,

    /// Print a summary to stderr when done
    #[arg(long)]
    summary: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line per segment
    Text,
    /// The run summary as JSON
    Json,
}

impl Cli {
    fn config(&self) -> RetentionConfig {
        let policy = if self.fail_fast {
            ScanPolicy::FailFast
        } else {
            ScanPolicy::BestEffort
        };

        RetentionConfig::new(&self.target_dir)
            .keep(self.keep)
            .action(ActionMode::from_flags(self.list, self.delete))
            .scan_policy(policy)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for segment output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("error")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let outcome = execute(&cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    if let Err(e) = &outcome {
        eprintln!("error: {e}");
    }
    ExitCode::from(exit_status(&cli, &outcome))
}

/// Maps a finished run to the process exit status.
///
/// Per-file and per-directory failures only fail the run under `--strict`.
fn exit_status(cli: &Cli, outcome: &Result<RunSummary, Box<dyn Error>>) -> u8 {
    match outcome {
        Ok(summary) if cli.strict && summary.has_failures() => 1,
        Ok(_) => 0,
        Err(_) => 1,
    }
}

fn execute(
    cli: &Cli,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<RunSummary, Box<dyn Error>> {
    let config = cli.config();
    tracing::debug!(?config, "parsed configuration");

    let summary = match cli.format {
        Format::Text => kbretain_core::run(&config, &mut *stdout)?,
        Format::Json => {
            let summary = kbretain_core::run(&config, io::sink())?;
            serde_json::to_writer_pretty(&mut *stdout, &summary)?;
            writeln!(stdout)?;
            summary
        }
    };
    stdout.flush()?;

    report::write_failures(&summary, stderr)?;
    if cli.report_orphans {
        report::write_orphans(&summary, stderr)?;
    }
    if cli.summary && cli.format == Format::Text {
        report::write_summary(&summary, stderr)?;
    }

    Ok(summary)
}
