//! Herald — render templated alert notifications and dispatch them.
//!
//! # Usage
//!
//! ```text
//! herald check <template>
//! herald render <template> [--vars <file>] [--set key=value]... [--yaml]
//! herald send <template> --recipient <key> [--vars <file>] [--set key=value]...
//!             [--config <file>] [--dry-run]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, render::RenderArgs, send::SendArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "herald",
    version,
    about = "Render templated alert notifications and send them to Opsgenie",
    long_about = None,
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a notification template and list its templated fields.
    Check(CheckArgs),

    /// Render a notification template against variables and print the result.
    Render(RenderArgs),

    /// Render a notification template and create an alert for a recipient.
    Send(SendArgs),
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Check(args) => args.run(),
        Commands::Render(args) => args.run(),
        Commands::Send(args) => args.run(),
    }
}
