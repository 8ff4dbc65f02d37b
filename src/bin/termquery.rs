//! termquery command-line interface.
//!
//! Thin orchestration over the library: `init` creates a store and
//! records its location, `import` bulk-loads a CSV-style file, `query`
//! resolves a string. All real invariants live in the library; this
//! binary only parses arguments, renders results, and maps fatal
//! errors to a non-zero exit code.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use termquery::storage::{open_store, BackendKind};
use termquery::{merge, parse_rows, query, Resolution, StoreConfig, TermqueryError};

/// A personal terminology store.
#[derive(Debug, Parser)]
#[command(name = "termquery", version, about)]
struct Cli {
    /// Path to the configuration file (defaults to the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize a terminology store and record its location.
    Init {
        /// Backend kind: snapshot or lazy.
        kind: BackendKind,
        /// Filesystem path for the new store.
        path: PathBuf,
        /// Overwrite an existing store at that path.
        #[arg(short, long)]
        force: bool,
    },
    /// Import records from a CSV file; existing entries are never
    /// overwritten.
    Import {
        /// Path to the CSV file (key;type;definition;terms;rejected).
        file: PathBuf,
    },
    /// Query the store by key, synonym, or rejected alias.
    Query {
        /// The term to look up.
        text: String,
    },
}

fn config_path(cli: &Cli) -> Result<PathBuf, TermqueryError> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => StoreConfig::default_path(),
    }
}

fn cmd_init(cli: &Cli, kind: BackendKind, path: &Path, force: bool) -> Result<(), TermqueryError> {
    if path.exists() {
        if !force {
            return Err(TermqueryError::config(format!(
                "store already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }
        let removed = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| {
            TermqueryError::config(format!("could not remove {}: {e}", path.display()))
        })?;
    }

    let mut store = open_store(path, kind, true)?;
    store.close()?;

    let config = StoreConfig {
        kind,
        path: path.to_path_buf(),
    };
    config.save(&config_path(cli)?)?;

    println!("initialized {kind} store at {}", path.display());
    Ok(())
}

fn cmd_import(cli: &Cli, file: &Path) -> Result<(), TermqueryError> {
    let config = StoreConfig::load(&config_path(cli)?)?;

    let input = fs::read_to_string(file).map_err(|e| {
        TermqueryError::config(format!("could not read {}: {e}", file.display()))
    })?;

    let mut store = open_store(&config.path, config.kind, false)?;
    let report = merge(store.as_mut(), parse_rows(&input))?;
    store.close()?;

    print!("{report}");
    Ok(())
}

fn cmd_query(cli: &Cli, text: &str) -> Result<(), TermqueryError> {
    let config = StoreConfig::load(&config_path(cli)?)?;
    let mut store = open_store(&config.path, config.kind, false)?;

    let resolution = query(store.as_ref(), text);
    store.close()?;

    match resolution? {
        Resolution::Found {
            key,
            entry,
            matched_via,
        } => {
            println!("{key} ({}) [matched via {matched_via}]", entry.term_type);
            println!("  {}", entry.definition);
            if !entry.terms.is_empty() {
                println!("  also: {}", entry.terms.join(", "));
            }
        }
        Resolution::Redirect { key, entry } => {
            println!("'{text}' is not a valid term; use '{key}' instead");
            if !entry.terms.is_empty() {
                println!("  or one of: {}", entry.terms.join(", "));
            }
        }
        Resolution::NotFound => {
            println!("no entry found for '{text}'");
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), TermqueryError> {
    match &cli.command {
        Command::Init { kind, path, force } => cmd_init(cli, *kind, path, *force),
        Command::Import { file } => cmd_import(cli, file),
        Command::Query { text } => cmd_query(cli, text),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("ERROR: {error}");
        process::exit(10);
    }
}
