//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Lie-transform splitting integrators for beam optics",
        style("lieflow").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  lieflow-expr  Symbolic expressions and parser");
    println!("  lieflow-ops   Lie operators, chains and Yoshida composition");
    println!("  lieflow-cli   Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
