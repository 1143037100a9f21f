//! Register normalization.

use qbridge_ir::{Circuit, IrError};

use crate::error::ConvertResult;

/// Name of the single qubit register after normalization.
pub const QUBIT_REGISTER: &str = "q";
/// Name of the single classical register after normalization.
pub const CLBIT_REGISTER: &str = "c";

/// Rebuild `circuit` on one qubit register `q` and one bit register `c`.
///
/// Slot `i` of the input is slot `i` of the output, so `anc[0]` declared
/// after a two-qubit `data` becomes `q[2]`. Instructions are copied in
/// order. A circuit with no classical slots gets no `c` register.
pub fn normalize_registers(circuit: &Circuit) -> ConvertResult<Circuit> {
    let num_qubits = u32::try_from(circuit.num_qubits()).map_err(|_| IrError::TooManySlots)?;
    let num_clbits = u32::try_from(circuit.num_clbits()).map_err(|_| IrError::TooManySlots)?;

    let mut normalized = Circuit::with_size(circuit.name(), num_qubits, num_clbits);
    for inst in circuit.instructions() {
        normalized.push(inst.clone())?;
    }
    Ok(normalized)
}
