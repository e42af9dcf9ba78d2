//! sumwalk - build and verify checksum work lists.
//!
//! Usage:
//!   sumwalk [PATHS]...                List the work items for a selection
//!   sumwalk list [PATHS]...           Same, explicitly
//!   sumwalk export [PATHS]...         Emit the processed list as JSON
//!   sumwalk hash [PATHS]... -a ALGO   Compute digests, coreutils-style
//!   sumwalk verify [PATHS]...         Check expectations from a manifest
//!   sumwalk --help                    Show help

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail, eyre};
use tracing_subscriber::EnvFilter;

use sumwalk_core::{DEFAULT_ALGORITHMS, ProcessedFileList, SumfileKind, find_by_name};
use sumwalk_digest::{Verifier, VerifyStatus, hash_file, to_hex};
use sumwalk_list::{ListProcessor, StdFs};
use sumwalk_sumfile::LineSumfileParser;

#[derive(Parser)]
#[command(
    name = "sumwalk",
    version,
    about = "Build and verify checksum work lists",
    long_about = "sumwalk turns a selection of files and directories - possibly \
                  including a checksum manifest - into one deduplicated work \
                  list, and can hash and verify it.\n\n\
                  Run `sumwalk <PATHS>...` for a quick listing, or use \
                  subcommands for hashing and verification."
)]
struct Cli {
    /// Paths to process when no subcommand is given (same as `list`).
    paths: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the work items for a selection
    List {
        /// Files and/or directories to process
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Emit the processed list as JSON
    Export {
        /// Files and/or directories to process
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Compute digests for a selection, coreutils-style
    Hash {
        /// Files and/or directories to process
        #[arg(required = true)]
        paths: Vec<String>,

        /// Algorithm name or sumfile extension (e.g. SHA-256, md5, b3)
        #[arg(short, long, default_value = "SHA-256")]
        algorithm: String,
    },

    /// Check expectations declared by a selected manifest
    Verify {
        /// Files and/or directories to process
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::List { paths }) => run_list(paths),
        Some(Command::Export { paths }) => run_export(paths),
        Some(Command::Hash { paths, algorithm }) => run_hash(paths, &algorithm),
        Some(Command::Verify { paths }) => run_verify(paths),
        None => {
            if cli.paths.is_empty() {
                bail!("no paths selected; run `sumwalk --help` for usage");
            }
            run_list(cli.paths)
        }
    }
}

/// Run the engine over a selection.
fn process(selection: Vec<String>) -> ProcessedFileList {
    let fs = StdFs::new();
    let parser = LineSumfileParser::new();
    let engine = ListProcessor::new(&fs, &parser, DEFAULT_ALGORITHMS);
    engine.process(selection)
}

fn sumfile_label(kind: SumfileKind) -> String {
    match kind {
        SumfileKind::None => "none".to_owned(),
        SumfileKind::Unknown => "unknown algorithm".to_owned(),
        SumfileKind::Algorithm(index) => DEFAULT_ALGORITHMS
            .get(index)
            .map_or_else(|| format!("algorithm #{index}"), |desc| desc.name.to_owned()),
    }
}

fn print_warnings(list: &ProcessedFileList) {
    if !list.warnings.is_empty() {
        println!();
        for warning in &list.warnings {
            eprintln!("warning: {}", warning.message);
        }
    }
}

/// List the work items for a selection.
fn run_list(paths: Vec<String>) -> Result<()> {
    let list = process(paths);

    println!("{}", "─".repeat(60));
    if list.base_path.is_empty() {
        println!(" base: (no common base)");
    } else {
        println!(" base: {}", list.base_path);
    }
    println!(" manifest: {}", sumfile_label(list.sumfile));
    println!(" {} file(s)", list.len());
    println!("{}", "─".repeat(60));

    for data in list.files.values() {
        if data.has_expectation() {
            println!(" {}  [expected digest]", data.relative_path);
        } else {
            println!(" {}", data.relative_path);
        }
    }

    print_warnings(&list);
    Ok(())
}

/// Emit the processed list as JSON on stdout.
fn run_export(paths: Vec<String>) -> Result<()> {
    let list = process(paths);
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}

/// Compute and print digests for every file in the selection.
fn run_hash(paths: Vec<String>, algorithm: &str) -> Result<()> {
    let index = find_algorithm(algorithm)
        .ok_or_else(|| eyre!("unknown algorithm {algorithm:?}; known: {}", known_names()))?;

    let list = process(paths);
    let mut failures = 0usize;
    for (canonical, data) in &list.files {
        match hash_file(DEFAULT_ALGORITHMS, index, canonical) {
            Ok(digest) => println!("{}  {}", to_hex(&digest), data.relative_path),
            Err(error) => {
                eprintln!("sumwalk: {error}");
                failures += 1;
            }
        }
    }

    print_warnings(&list);
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Verify manifest expectations over the selection.
fn run_verify(paths: Vec<String>) -> Result<()> {
    let list = process(paths);
    if !list.sumfile.is_sumfile() {
        bail!("the selection does not include a recognizable checksum manifest");
    }

    let report = Verifier::new(DEFAULT_ALGORITHMS).verify(&list);
    for outcome in &report.outcomes {
        let tag = match outcome.status {
            VerifyStatus::Match => "OK      ",
            VerifyStatus::Mismatch => "FAILED  ",
            VerifyStatus::NoExpectation => "SKIPPED ",
            VerifyStatus::Unreadable => "UNREADABLE",
        };
        println!("{tag} {}", outcome.relative_path);
    }

    println!("{}", "─".repeat(60));
    println!(
        " {} matched, {} mismatched, {} unreadable, {} skipped",
        report.matches, report.mismatches, report.unreadable, report.unchecked
    );

    print_warnings(&list);
    if !report.all_ok() {
        std::process::exit(1);
    }
    Ok(())
}

/// Accept an algorithm by display name or by sumfile extension.
fn find_algorithm(wanted: &str) -> Option<usize> {
    find_by_name(DEFAULT_ALGORITHMS, wanted).or_else(|| {
        let folded = wanted.to_ascii_lowercase();
        DEFAULT_ALGORITHMS
            .iter()
            .position(|desc| desc.extensions.contains(&folded.as_str()))
    })
}

fn known_names() -> String {
    DEFAULT_ALGORITHMS
        .iter()
        .map(|desc| desc.name)
        .collect::<Vec<_>>()
        .join(", ")
}
