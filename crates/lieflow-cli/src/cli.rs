//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};

/// lieflow - symplectic Lie-transform integrators for beam optics
#[derive(Parser, Debug)]
#[command(name = "lieflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transfer map of a field-free drift space
    Drift {
        /// Element length (number or expression)
        #[arg(short, long, default_value = "L")]
        length: String,

        /// Number of integration steps
        #[arg(short, long, default_value = "1")]
        steps: u32,

        /// Yoshida order increase (even, 0 keeps second order)
        #[arg(long, default_value = "0")]
        order_increase: u32,

        /// Reference velocity; substitutes beta_0 and gamma_0
        #[arg(long)]
        beta0: Option<f64>,

        /// Print the map as LaTeX
        #[arg(long)]
        latex: bool,
    },

    /// Build an integrator from a YAML or JSON configuration
    Map {
        /// Configuration file (.yaml, .yml or .json)
        #[arg(short, long, env = "LIEFLOW_CONFIG")]
        config: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the Yoshida coefficients for raising an integrator by two orders
    Coefficients {
        /// Order of the integrator being raised
        #[arg(short, long, default_value = "2")]
        order: u32,
    },

    /// Show version information
    Version,
}

/// How a transfer map is printed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Latex,
}
