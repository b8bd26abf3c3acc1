//! PAL CLI - Asset reference rewriter.
//!
//! Provides commands for:
//! - `rewrite`: Replace `pal(path)` directives with resolved asset references
//! - `scan`: List the directives found in a document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RewriteArgs, ScanArgs};
use error::CliError;
use output::Output;

/// PAL - Asset reference rewriter.
#[derive(Parser)]
#[command(name = "pal", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite asset directives in a document.
    Rewrite(RewriteArgs),
    /// List asset directives without resolving them.
    Scan(ScanArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Rewrite(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Rewrite(args) => run_async(args),
        Commands::Scan(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Drive the rewrite pipeline on a single-threaded runtime.
fn run_async(args: RewriteArgs) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(args.execute())
}
