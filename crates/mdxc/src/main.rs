//! mdxc CLI - renders document node trees through component bindings.
//!
//! Provides commands for:
//! - `render`: Render JSON documents to HTML or JSON
//! - `check`: Fail when any document has unbound tags
//! - `bindings`: Print the effective binding table

mod commands;
mod components;
mod document;
mod error;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BindingsArgs, CheckArgs, RenderArgs};
use report::Reporter;

/// mdxc - Document component renderer.
#[derive(Parser)]
#[command(name = "mdxc", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render documents.
    Render(RenderArgs),
    /// Render documents and fail on any diagnostic.
    Check(CheckArgs),
    /// Print the effective binding table.
    Bindings(BindingsArgs),
}

fn main() {
    let cli = Cli::parse();
    let reporter = Reporter::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Bindings(args) => args.execute(),
    };

    if let Err(err) = result {
        reporter.error(&err);
        std::process::exit(1);
    }
}
