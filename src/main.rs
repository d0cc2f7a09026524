//! Command-line front end for checking and reformatting SIEVE scripts.
//!
//! ```bash
//! # Parse against the saved (or default) capability list
//! sieve-grammar check filters.sieve
//!
//! # Restrict to what the server advertises
//! sieve-grammar -c fileinto -c vacation check filters.sieve
//!
//! # Re-serialize, adding a require for anything used but not declared
//! sieve-grammar format --add-requires filters.sieve
//!
//! # Remember a server's capabilities for later runs
//! sieve-grammar -c fileinto -c imap4flags capabilities --save
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sieve_grammar::config;
use sieve_grammar::sieve::{emitter, parse, SyntaxError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sieve-grammar")]
#[command(about = "Parse, check and reformat SIEVE mail filter scripts")]
#[command(version)]
struct Cli {
    /// Log parser decisions (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Server capability; repeat for several. Defaults to the saved list.
    #[arg(short = 'c', long = "capability")]
    capabilities: Vec<String>,

    /// Script name used in error messages (defaults to the file name)
    #[arg(long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a script and report required capabilities and unknown identifiers
    Check { file: PathBuf },
    /// Print the script re-serialized from its syntax tree
    Format {
        file: PathBuf,
        /// Prepend a require for capabilities used but not declared
        #[arg(long)]
        add_requires: bool,
    },
    /// Print the syntax tree as JSON
    Dump { file: PathBuf },
    /// Print the capability list parses would use
    Capabilities {
        /// Store the list given with -c as the default
        #[arg(long)]
        save: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}\n  near: {snippet}", snippet = .0.snippet)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let capabilities = config::resolve_capabilities(&cli.capabilities);

    let file = match &cli.command {
        Command::Check { file } | Command::Format { file, .. } | Command::Dump { file } => file,
        Command::Capabilities { save } => {
            if *save {
                let path = config::save_capabilities(&capabilities)?;
                println!("saved to {}", path.display());
            }
            for cap in &capabilities {
                println!("{cap}");
            }
            return Ok(());
        }
    };

    let text = fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.clone(),
        source,
    })?;
    let name = cli
        .name
        .clone()
        .or_else(|| file.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let script = parse(&text, &name, &capabilities)?;

    match &cli.command {
        Command::Check { .. } => {
            println!("{name}: ok");
            if !script.requires.is_empty() {
                println!("requires: {}", script.requires.join(", "));
            }
            let placeholders = script.placeholders();
            if !placeholders.is_empty() {
                println!("unknown: {}", placeholders.join(", "));
            }
        }
        Command::Format { add_requires, .. } => {
            let out = if *add_requires {
                emitter::emit_with_requires(&script)
            } else {
                emitter::emit(&script)
            };
            print!("{out}");
        }
        Command::Dump { .. } => println!("{}", serde_json::to_string_pretty(&script)?),
        Command::Capabilities { .. } => {}
    }
    Ok(())
}
