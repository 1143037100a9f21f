//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use qbridge_adapter_sim::StatevectorExecutor;
use qbridge_ir::Circuit;
use qbridge_pattern::{ExecutorRegistry, PatternCircuit};
use qbridge_qasm::parse;

/// Load a circuit from an OpenQASM file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "json" => anyhow::bail!("JSON input is not supported; expected OpenQASM"),
        _ => parse(&source).with_context(|| format!("Parse error in {}", path.display())),
    }
}

/// Executors available to the CLI.
pub fn default_registry(seed: u64) -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();
    registry.register(StatevectorExecutor::new().with_seed(seed));
    registry
}

/// Target circuit as a listing, one instruction per line.
pub fn listing(circuit: &PatternCircuit) -> String {
    let mut out = format!(
        "# width {}, {} classical bits, {} instructions\n",
        circuit.width(),
        circuit.num_clbits(),
        circuit.len()
    );
    for instruction in circuit.instructions() {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}

/// Write `content` to `output`, or print it when no file is given.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
