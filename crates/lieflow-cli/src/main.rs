//! lieflow Command-Line Interface
//!
//! The main entry point for the lieflow CLI tool.
//!
//! ```text
//!   exp(:f:) exp(:g:) exp(:f:)
//!
//!           L I E F L O W
//!   Symplectic maps for beam optics
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{coefficients, drift, map, version};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Drift {
            length,
            steps,
            order_increase,
            beta0,
            latex,
        } => drift::execute(&length, steps, order_increase, beta0, latex),

        Commands::Map { config, format } => map::execute(&config, format),

        Commands::Coefficients { order } => coefficients::execute(order),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
