//! The conversion pipeline.

use std::sync::Arc;
use tracing::{debug, instrument};

use qbridge_ir::Circuit;
use qbridge_pattern::PatternCircuit;
use qbridge_qasm::{ExchangeDocument, emit};

use crate::decompose::{BasisTranslator, Decomposer};
use crate::error::{ConvertError, ConvertResult};
use crate::exchange::lower_document;
use crate::gate_set::{CanonicalGateSet, MEASURE};
use crate::normalize::normalize_registers;

/// Converts source circuits into target circuits.
///
/// Holds only shared, immutable state, so one converter can serve any
/// number of threads at once.
#[derive(Clone)]
pub struct Converter {
    gate_set: Arc<CanonicalGateSet>,
    decomposer: Arc<dyn Decomposer>,
}

impl Converter {
    /// A converter for `gate_set` using the built-in [`BasisTranslator`].
    pub fn new(gate_set: Arc<CanonicalGateSet>) -> Self {
        Self {
            gate_set,
            decomposer: Arc::new(BasisTranslator::new()),
        }
    }

    /// A converter over the standard alias table.
    pub fn standard() -> Self {
        Self::new(Arc::new(CanonicalGateSet::standard()))
    }

    /// Replace the decomposition capability.
    #[must_use]
    pub fn with_decomposer(mut self, decomposer: impl Decomposer + 'static) -> Self {
        self.decomposer = Arc::new(decomposer);
        self
    }

    pub fn gate_set(&self) -> &Arc<CanonicalGateSet> {
        &self.gate_set
    }

    /// Convert a source circuit into the target vocabulary.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn convert(&self, circuit: &Circuit) -> ConvertResult<PatternCircuit> {
        let document = self.to_exchange(circuit)?;
        self.parse_exchange(&document)
    }

    /// Canonicalize, normalize registers and serialize.
    pub fn to_exchange(&self, circuit: &Circuit) -> ConvertResult<ExchangeDocument> {
        let canonical = self.canonicalize(circuit)?;
        let normalized = normalize_registers(&canonical)?;
        let document = emit(&normalized);
        debug!("Emitted exchange document: {} lines", document.lines().count());
        Ok(document)
    }

    /// Rewrite `circuit` so every instruction is in the gate set.
    ///
    /// The decomposer's output is checked: any name outside the set is
    /// reported as unsupported, and slot counts must be unchanged.
    pub fn canonicalize(&self, circuit: &Circuit) -> ConvertResult<Circuit> {
        let basis = self.gate_set.basis_names();
        let canonical = self.decomposer.decompose(circuit, &basis)?;

        if canonical.num_qubits() != circuit.num_qubits()
            || canonical.num_clbits() != circuit.num_clbits()
        {
            return Err(ConvertError::Decomposition(format!(
                "slot counts changed from {}q/{}c to {}q/{}c",
                circuit.num_qubits(),
                circuit.num_clbits(),
                canonical.num_qubits(),
                canonical.num_clbits()
            )));
        }
        if let Some(outside) = canonical.instructions().iter().find(|inst| {
            let name = if inst.is_measure() { MEASURE } else { inst.name() };
            !self.gate_set.contains(name)
        }) {
            return Err(ConvertError::unsupported(outside.name()));
        }

        debug!(
            "Canonicalized {} instructions into {}",
            circuit.len(),
            canonical.len()
        );
        Ok(canonical)
    }

    /// Read an exchange document back as a target circuit.
    pub fn parse_exchange(&self, document: &ExchangeDocument) -> ConvertResult<PatternCircuit> {
        let circuit = lower_document(document, &self.gate_set)?;
        debug!(
            "Parsed target circuit: width {}, {} instructions",
            circuit.width(),
            circuit.len()
        );
        Ok(circuit)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("gate_set", &self.gate_set.basis_names())
            .finish_non_exhaustive()
    }
}
