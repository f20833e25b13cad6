//! co-drv - the command-line driver for Co
//!
//! Wires the four passes together in order: lex (inside the parser),
//! parse, analyze, interpret. Each pass either hands its output to the
//! next or raises a [`CoError`]; the driver reports whichever one fires
//! with the same formatted message regardless of which pass it came
//! from, and otherwise stays out of the way.

use std::fs;
use std::path::PathBuf;

use clap::Parser as ClapParser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use co_par::Parser as CoParser;
use co_util::CoError;

/// `co <filename>.co` - there are no subcommands or output options:
/// a Co program is run, not built.
#[derive(ClapParser, Debug)]
#[command(name = "co")]
#[command(author = "Co Language Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runs a Co source file", long_about = None)]
struct Cli {
    /// Source file to run. Must have a `.co` extension.
    ///
    /// Optional at the type level only so a missing argument can be
    /// reported with Co's own `Usage: …` message and exit code instead
    /// of clap's.
    file: Option<PathBuf>,

    /// Enable debug-level tracing of pass and frame activity.
    #[arg(short, long, env = "CO_VERBOSE")]
    verbose: bool,
}

/// Parses `argv`, runs the requested file, and returns the process exit
/// code. Never panics on a user-facing error - only an internal
/// invariant violation (a bug in an earlier pass) does that, via the
/// `unreachable!`/`panic!` sites documented in `co-interp`.
pub fn run() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(file) = cli.file else {
        eprintln!("Usage: co <filename>.co");
        return 1;
    };

    if file.extension().and_then(|ext| ext.to_str()) != Some("co") {
        eprintln!("Error: File must be a .co file.");
        return 1;
    }

    let source = match fs::read_to_string(&file) {
        Ok(source) => source,
        Err(_) => {
            eprintln!("Error: File '{}' not found or could not be opened.", file.display());
            return 1;
        }
    };

    match interpret(&source) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

fn interpret(source: &str) -> Result<(), CoError> {
    tracing::debug!(bytes = source.len(), "parsing source");
    let program = CoParser::new(source)?.parse()?;
    tracing::debug!(statements = program.statements.len(), "running semantic analysis");
    co_sem::analyze(&program)?;
    tracing::debug!("interpreting program");
    co_interp::run(&program)
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpret_runs_a_well_formed_program() {
        assert!(interpret("println(\"hi\");").is_ok());
    }

    #[test]
    fn interpret_surfaces_a_parser_error() {
        let err = interpret("var(int x = 1;").unwrap_err();
        assert!(err.to_string().starts_with("ParserError:"));
    }

    #[test]
    fn interpret_surfaces_a_semantic_error() {
        let err = interpret("println(missing);").unwrap_err();
        assert!(err.to_string().starts_with("SemanticError:"));
    }

    #[test]
    fn interpret_surfaces_an_interpreter_error() {
        let err = interpret("var(int) x = 1 / 0;").unwrap_err();
        assert!(err.to_string().starts_with("InterpreterError:"));
    }
}
