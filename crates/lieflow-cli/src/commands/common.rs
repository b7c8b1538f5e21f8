//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use lieflow_ops::{IntegratorConfig, TransferMap};

use crate::cli::OutputFormat;

/// Load an integrator configuration from a YAML or JSON file.
pub fn load_config(path: &str) -> Result<IntegratorConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON configuration: {path}")),
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML configuration: {path}")),
    }
}

/// JSON form of a built map.
#[derive(Debug, Serialize)]
pub struct MapReport {
    pub order: u32,
    pub members: usize,
    pub map: Vec<MapEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<Vec<Vec<f64>>>,
}

/// Image of one state variable.
#[derive(Debug, Serialize)]
pub struct MapEntry {
    pub variable: String,
    pub image: String,
}

impl MapReport {
    pub fn new(
        order: u32,
        members: usize,
        map: &TransferMap,
        tracking: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let entries = map
            .space()
            .variables()
            .zip(map.components())
            .map(|(symbol, image)| MapEntry {
                variable: symbol.to_string(),
                image: image.to_string(),
            })
            .collect();
        Self {
            order,
            members,
            map: entries,
            tracking,
        }
    }
}

/// Print a map in the requested format.
pub fn print_map(report: &MapReport, map: &TransferMap, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Latex => {
            println!("{}", map.to_latex());
        }
        OutputFormat::Text => {
            println!(
                "\n{} Order {} map ({} factors):",
                style("✓").green().bold(),
                style(report.order).yellow(),
                report.members
            );
            for entry in &report.map {
                println!("  {} -> {}", style(&entry.variable).cyan(), entry.image);
            }
            if let Some(tracking) = &report.tracking {
                println!("\n  Tracking ({} turns):", tracking.len());
                for (turn, state) in tracking.iter().enumerate() {
                    let values: Vec<String> = state.iter().map(|v| format!("{v:>12.6e}")).collect();
                    println!("  {:>5}: {}", turn + 1, values.join(" "));
                }
            }
        }
    }
    Ok(())
}
