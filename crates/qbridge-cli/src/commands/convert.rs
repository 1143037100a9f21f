//! Convert command implementation.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use qbridge_convert::Converter;

use super::common::{listing, load_circuit, write_output};

/// Execute the convert command.
pub fn execute(input: &Path, exchange: bool, output: Option<&Path>) -> Result<()> {
    let circuit = load_circuit(input)?;
    eprintln!(
        "{} Converting {} ({} qubits, {} instructions)",
        style("→").cyan().bold(),
        style(input.display()).green(),
        circuit.num_qubits(),
        circuit.len()
    );

    let converter = Converter::standard();
    let content = if exchange {
        converter.to_exchange(&circuit)?.into_string()
    } else {
        let target = converter.convert(&circuit)?;
        let as_json = output
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if as_json {
            serde_json::to_string_pretty(&target).context("Failed to serialize circuit")?
        } else {
            listing(&target)
        }
    };

    write_output(&content, output)?;
    if let Some(path) = output {
        eprintln!(
            "{} Wrote {}",
            style("✓").green().bold(),
            style(path.display()).green()
        );
    }
    Ok(())
}
