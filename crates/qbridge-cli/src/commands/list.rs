//! List command implementation.

use console::style;

use qbridge_bench::{CircuitSource, StandardSuite};
use qbridge_pattern::Backend;

use super::common::default_registry;

/// Execute the list command.
pub fn execute() {
    let suite = StandardSuite::new();
    println!("{}", style("Benchmarks:").bold());
    for name in suite.names() {
        let domain = suite
            .domain(&name)
            .map(|d| format!("{d} qubits"))
            .unwrap_or_default();
        println!("  {:<14} {}", style(name).cyan(), style(domain).dim());
    }

    let registry = default_registry(suite.seed());
    println!();
    println!("{}", style("Backends:").bold());
    for backend in Backend::ALL {
        let status = match registry.get(backend) {
            Ok(executor) => style(format!("available ({})", executor.name())).green(),
            Err(_) => style("no executor".to_string()).dim(),
        };
        println!("  {:<14} {}", style(backend).cyan(), status);
    }
}
