//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - circuit conversion and time/memory benchmarking",
        style("qbridge").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qbridge-ir       Source circuit model");
    println!("  qbridge-qasm     OpenQASM exchange documents");
    println!("  qbridge-pattern  Target instruction vocabulary");
    println!("  qbridge-convert  Source-to-target converter");
    println!("  qbridge-bench    Time and peak-memory sampler");
    println!("  qbridge-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
