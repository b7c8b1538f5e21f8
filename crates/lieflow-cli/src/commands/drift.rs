//! Drift command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lieflow_expr::{Expr, parse};
use lieflow_ops::beamline::BASE_ORDER;
use lieflow_ops::{BeamlineCoordinates, Operand, TransferMap, VectorPotential, beta_to_gamma};

use super::common::MapReport;
use crate::cli::OutputFormat;

/// Execute the drift command.
pub fn execute(
    length: &str,
    steps: u32,
    order_increase: u32,
    beta0: Option<f64>,
    latex: bool,
) -> Result<()> {
    let length_expr =
        parse(length).with_context(|| format!("Invalid length expression: {length}"))?;
    let order = BASE_ORDER
        .checked_add(order_increase)
        .with_context(|| format!("Order increase {order_increase} is out of range"))?;

    println!(
        "{} Drift of length {} in {} step(s), order {}",
        style("→").cyan().bold(),
        style(length).green(),
        steps,
        style(order).yellow()
    );

    let coords = BeamlineCoordinates::standard();
    let chain = coords.step_chain(&VectorPotential::zero(), &length_expr, steps, order_increase)?;
    info!(members = chain.len(), steps, "built drift step");

    let bar = ProgressBar::new(u64::from(steps));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );
    bar.set_message("applying steps");

    let mut image = coords.space().state_vector();
    for _ in 0..steps {
        image = chain.apply_all(&image);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let mut map = TransferMap::from_operand(coords.space(), Operand::Vector(image))?;
    if let Some(beta) = beta0 {
        let mut values = BTreeMap::new();
        values.insert(coords.beta_0().clone(), Expr::number(beta));
        values.insert(coords.gamma_0().clone(), Expr::number(beta_to_gamma(beta)));
        map = map.substitute(&values);
    }

    let format = if latex {
        OutputFormat::Latex
    } else {
        OutputFormat::Text
    };
    let report = MapReport::new(order, chain.len(), &map, None);
    super::common::print_map(&report, &map, format)
}
