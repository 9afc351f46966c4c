mod config;
mod corpus;
mod error;
mod links;
mod report;
mod resolver;
mod scanner;
mod symbols;
mod types;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use crate::config::Config;
use crate::report::Report;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

/// Top-level paths that must exist for the working directory to be the
/// repository root.
const REPO_ROOT_MARKERS: &[&str] = &["Makefile", "modules", "methods"];

#[derive(Parser)]
#[command(
    name = "doccheck",
    about = "Validate documentation references and links against the source tree"
)]
struct Cli {
    /// Print per-document excluded-line counts.
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Build the symbol table, scan the corpus, resolve everything, report.
///
/// # Errors
///
/// Returns `Error::NotRepoRoot` when run outside the repository root and
/// config errors from `.doccheck.toml`. Everything else is a diagnostic,
/// not an error.
fn run(cli: &Cli) -> Result<ExitCode, error::Error> {
    let root = PathBuf::from(".");
    ensure_repo_root(&root)?;

    let config = Config::load(&root)?;
    let table = symbols::build(&root, config.source_dir());
    let documents = corpus::load(&root, &config);

    println!("=== Documentation Check ===");

    if documents.is_empty() {
        println!("Documentation check: no markdown files found");
        return Ok(ExitCode::SUCCESS);
    }

    let mut report = Report::new();
    if table.is_empty() {
        println!(
            "warning: no source declarations found under {}/; symbol checks skipped",
            config.source_dir()
        );
        report.mark_symbol_checks_skipped();
    }

    let scanner = Scanner::new();
    let resolver = Resolver::new(&root, config.source_dir(), &table);

    for doc in &documents {
        let scan = scanner.scan(doc);
        if cli.verbose && scan.excluded_lines > 0 {
            println!(
                "{}: {} lines excluded by markers",
                doc.path.display(),
                scan.excluded_lines
            );
        }

        resolver.resolve_document(doc, &scan, &mut report);
        links::resolve_links(&root, doc, &scan, &mut report);
    }

    print!("{}", report.render(documents.len()));
    Ok(report.exit_code())
}

/// Fail fast when the expected top-level marker paths are absent.
///
/// # Errors
///
/// Returns `Error::NotRepoRoot` naming the missing markers.
fn ensure_repo_root(root: &Path) -> Result<(), error::Error> {
    let missing: Vec<String> = REPO_ROOT_MARKERS
        .iter()
        .filter(|marker| !root.join(marker).exists())
        .map(|marker| (*marker).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(error::Error::NotRepoRoot { missing })
    }
}
