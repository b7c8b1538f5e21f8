//! Coefficients command implementation.

use anyhow::Result;
use console::style;

use lieflow_ops::YoshidaComposer;

/// Execute the coefficients command.
pub fn execute(order: u32) -> Result<()> {
    if order == 0 || order % 2 != 0 {
        anyhow::bail!("Order has to be a positive even number, got {order}");
    }
    let (x0, x1) = YoshidaComposer::coefficients(order);

    println!(
        "{} Yoshida step from order {} to {}",
        style("→").cyan().bold(),
        style(order).yellow(),
        style(order + 2).yellow()
    );
    println!("  x0 = {x0:+.16}");
    println!("  x1 = {x1:+.16}");
    println!("  2*x1 + x0 = {:.16}", 2.0 * x1 + x0);
    Ok(())
}
