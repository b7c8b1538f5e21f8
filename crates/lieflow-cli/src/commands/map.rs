//! Map command implementation.

use anyhow::Result;
use console::style;

use super::common::{MapReport, load_config, print_map};
use crate::cli::OutputFormat;

/// Execute the map command.
pub fn execute(config_path: &str, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;

    if format == OutputFormat::Text {
        println!(
            "{} Building {} factor(s) from {}",
            style("→").cyan().bold(),
            config.factors.len(),
            style(config_path).green()
        );
    }

    let built = config.build()?;
    let report = MapReport::new(built.order, built.chain.len(), &built.map, built.tracking);
    print_map(&report, &built.map, format)
}
