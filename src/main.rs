//! Main entry point for the wadextract CLI application.
//!
//! Every archive given on the command line runs its own pipeline (open,
//! parse, extract, close) on a blocking task; archives share nothing.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use wadextract::{
    ArchiveController, Cli, Directory, DirectorySink, ExtractObserver, LocalFileSource, LumpEntry,
    WadError, WadHeader,
};

/// Application entry point.
///
/// Parses command-line arguments, rejects archives that would share an
/// output directory, then runs every remaining archive on its own blocking
/// task.
///
/// Exits non-zero if any archive was rejected or could not be opened or
/// parsed. Per-lump failures are reported but do not change the exit status.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut failed = false;

    // An output directory belongs to one archive: later claimants are refused
    let conflicts = cli.output_conflicts();
    for conflict in &conflicts {
        eprintln!("wadextract: {}: {conflict}", conflict.archive.display());
        failed = true;
    }

    let cli = Arc::new(cli);
    let tasks: Vec<_> = cli
        .files
        .iter()
        .enumerate()
        .filter(|(index, _)| !conflicts.iter().any(|c| c.index == *index))
        .map(|(_, path)| {
            let cli = Arc::clone(&cli);
            let task = tokio::task::spawn_blocking({
                let path = path.clone();
                move || process_archive(&path, &cli)
            });
            (path.clone(), task)
        })
        .collect();

    // Collect results in argument order
    for (path, task) in tasks {
        let result = match task.await {
            Ok(result) => result,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = result {
            eprintln!("wadextract: {}: {err:#}", path.display());
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Install the stderr `tracing` subscriber; `RUST_LOG` overrides the CLI default.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Process one archive based on CLI options.
///
/// This function handles both listing and extraction modes:
/// - List mode (`-l` or `-v`): print the directory, write nothing
/// - Extract mode: write every non-marker lump into the output directory
///
/// # Arguments
///
/// * `path` - Archive to read
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` once the archive was processed, even if single lumps
/// failed. Returns an error if the archive cannot be opened or parsed, or
/// the output directory cannot be created.
fn process_archive(path: &Path, cli: &Cli) -> Result<()> {
    let mut archive = ArchiveController::new(LocalFileSource::new(path));

    // List mode: display the directory and stop
    if cli.is_listing() {
        let (header, directory) = archive.inspect()?;
        list_lumps(header, directory, cli.verbose);
        return Ok(());
    }

    // Extract mode: parse both tables before touching the filesystem, so a
    // corrupt archive leaves no output directory behind
    archive.read_header()?;
    archive.read_directory()?;

    let out_dir = cli.output_dir(path);
    let mut sink = DirectorySink::create(&out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let mut observer = ConsoleObserver {
        out_dir: out_dir.clone(),
        quiet: cli.is_quiet(),
    };

    let report = archive.extract(&mut sink, &mut observer)?;
    archive.close();

    // Summarize per-lump failures; they were already reported one by one
    if !report.is_clean() && !cli.is_very_quiet() {
        eprintln!(
            "{}: {} lumps extracted, {} failed",
            path.display(),
            report.extracted,
            report.failures.len()
        );
    }

    Ok(())
}

/// Reports extraction progress on the console.
///
/// Each written lump is printed as `<output dir>/<NAME>` on stdout unless
/// quiet; each failed lump gets one line on stderr.
struct ConsoleObserver {
    out_dir: PathBuf,
    quiet: bool,
}

impl ExtractObserver for ConsoleObserver {
    fn lump_extracted(&mut self, entry: &LumpEntry) {
        if !self.quiet {
            println!("{}", self.out_dir.join(&entry.name).display());
        }
    }

    fn lump_failed(&mut self, _entry: &LumpEntry, error: &WadError) {
        eprintln!("  error: {error}");
    }
}

/// Print the lump directory.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just lump names, one per line, in directory order
/// - Verbose format (`-v`): Table with index, offset and size, plus a summary
///
/// # Arguments
///
/// * `header` - The parsed archive header
/// * `directory` - The lump table, in directory order
/// * `verbose` - If true, display the detailed table
fn list_lumps(header: &WadHeader, directory: &Directory, verbose: bool) {
    // Simple format: just the lump name
    if !verbose {
        for entry in directory {
            println!("{}", entry.name);
        }
        return;
    }

    println!("{:>6}  {:>10}  {:>10}  Name", "Index", "Offset", "Size");
    println!("{}", "-".repeat(40));

    let mut total_size = 0u64;
    for (index, entry) in directory.iter().enumerate() {
        println!(
            "{:>6}  {:>10}  {:>10}  {}",
            index, entry.data_offset, entry.byte_length, entry.name
        );
        // Negative lengths are corrupt entries, count them as empty
        total_size += entry.byte_length.max(0) as u64;
    }

    // Summary line
    println!("{}", "-".repeat(40));
    println!(
        "{} {} entries ({} markers), {} bytes of lump data, directory at {}",
        header.kind,
        directory.len(),
        directory.markers().count(),
        total_size,
        header.directory_offset
    );
}
