//! High-level circuit builder API.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId, Register};

/// A quantum circuit in the source framework.
///
/// Slots are allocated through named registers. Every instruction is
/// validated when it is appended, so a `Circuit` never references a slot
/// it has not declared and never carries a non-finite angle. Deserialized
/// circuits go through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircuitData")]
pub struct Circuit {
    name: String,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    instructions: Vec<Instruction>,
}

/// Unchecked wire form of a [`Circuit`].
#[derive(Deserialize)]
struct CircuitData {
    name: String,
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    instructions: Vec<Instruction>,
}

impl TryFrom<CircuitData> for Circuit {
    type Error = IrError;

    fn try_from(data: CircuitData) -> IrResult<Self> {
        let mut circuit = Circuit::new(data.name);
        for register in data.qregs {
            let declared = circuit.add_qreg(register.name(), register.size())?;
            check_offset(&register, &declared)?;
        }
        for register in data.cregs {
            let declared = circuit.add_creg(register.name(), register.size())?;
            check_offset(&register, &declared)?;
        }
        for instruction in data.instructions {
            circuit.push(instruction)?;
        }
        Ok(circuit)
    }
}

fn check_offset(given: &Register, declared: &Register) -> IrResult<()> {
    if given.offset() == declared.offset() {
        Ok(())
    } else {
        Err(IrError::MisplacedRegister {
            register: given.name().to_string(),
            offset: given.offset(),
            expected: declared.offset(),
        })
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: vec![],
            cregs: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with one qubit register `q` and one bit register `c`.
    ///
    /// Empty registers are not declared.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.qregs.push(Register::new("q", 0, num_qubits));
        }
        if num_clbits > 0 {
            circuit.cregs.push(Register::new("c", 0, num_clbits));
        }
        circuit
    }

    /// Declare a qubit register after all existing ones.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Register> {
        let offset = u32::try_from(self.num_qubits()).map_err(|_| IrError::TooManySlots)?;
        let register = Self::declare(&mut self.qregs, name.into(), offset, size)?;
        Ok(register)
    }

    /// Declare a classical register after all existing ones.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Register> {
        let offset = u32::try_from(self.num_clbits()).map_err(|_| IrError::TooManySlots)?;
        let register = Self::declare(&mut self.cregs, name.into(), offset, size)?;
        Ok(register)
    }

    fn declare(
        registers: &mut Vec<Register>,
        name: String,
        offset: u32,
        size: u32,
    ) -> IrResult<Register> {
        if registers.iter().any(|r| r.name() == name) {
            return Err(IrError::DuplicateRegister(name));
        }
        offset.checked_add(size).ok_or(IrError::TooManySlots)?;
        let register = Register::new(name, offset, size);
        registers.push(register.clone());
        Ok(register)
    }

    /// Global slot of `register[index]`.
    pub fn qubit(&self, register: &str, index: u32) -> IrResult<QubitId> {
        Self::lookup(&self.qregs, register, index).map(QubitId)
    }

    /// Global slot of the classical bit `register[index]`.
    pub fn clbit(&self, register: &str, index: u32) -> IrResult<ClbitId> {
        Self::lookup(&self.cregs, register, index).map(ClbitId)
    }

    fn lookup(registers: &[Register], name: &str, index: u32) -> IrResult<u32> {
        let register = registers
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| IrError::UnknownRegister(name.to_string()))?;
        register.slot(index).ok_or_else(|| IrError::IndexOutOfRange {
            register: name.to_string(),
            index,
            size: register.size(),
        })
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let name = instruction.name();
        let expected = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                for value in gate.parameters() {
                    if !value.is_finite() {
                        return Err(IrError::NonFiniteAngle {
                            gate_name: name.to_string(),
                            value,
                        });
                    }
                }
                Some(gate.num_qubits())
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != 1 || instruction.clbits.len() != 1 {
                    return Err(IrError::MeasureArity {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
                None
            }
            InstructionKind::Reset => Some(1),
            InstructionKind::Barrier => None,
        };

        let got = instruction.qubits.len();
        if let Some(expected) = expected {
            if got != expected as usize {
                return Err(IrError::QubitCountMismatch {
                    gate_name: name.to_string(),
                    expected,
                    got: u32::try_from(got).unwrap_or(u32::MAX),
                });
            }
        }

        let num_qubits = self.num_qubits();
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 as usize >= num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(name.to_string()),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(name.to_string()),
                });
            }
        }

        let num_clbits = self.num_clbits();
        if let Some(&clbit) = instruction
            .clbits
            .iter()
            .find(|c| c.0 as usize >= num_clbits)
        {
            return Err(IrError::ClbitNotFound {
                clbit,
                gate_name: Some(name.to_string()),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(gate, qubit))
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::I, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(lambda), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    fn double(&mut self, gate: StandardGate, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(gate, q0, q1))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CX, control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CY, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CZ, control, target)
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CH, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::Swap, q1, q2)
    }

    /// Apply controlled Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CRz(theta), control, target)
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CP(lambda), control, target)
    }

    /// Apply ZZ rotation gate.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::RZZ(theta), q1, q2)
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply Fredkin gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit i into classical bit i for every qubit.
    ///
    /// Declares a `meas` register when there are fewer bits than qubits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let num_qubits = u32::try_from(self.num_qubits()).map_err(|_| IrError::TooManySlots)?;
        let num_clbits = u32::try_from(self.num_clbits()).map_err(|_| IrError::TooManySlots)?;
        if num_clbits < num_qubits {
            self.add_creg("meas", num_qubits - num_clbits)?;
        }
        for i in 0..num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubit_ids().collect();
        self.push(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of qubit slots.
    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(|r| r.size() as usize).sum()
    }

    /// Total number of classical bit slots.
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|r| r.size() as usize).sum()
    }

    /// All qubit slots in order.
    pub fn qubit_ids(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qregs.iter().flat_map(Register::slots).map(QubitId)
    }

    /// Qubit registers in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Register-qualified label of a qubit slot, e.g. `anc[1]`.
    pub fn qubit_label(&self, qubit: QubitId) -> Option<String> {
        self.qregs
            .iter()
            .find_map(|r| r.index_of(qubit.0).map(|i| format!("{}[{i}]", r.name())))
    }

    /// Register-qualified label of a classical slot.
    pub fn clbit_label(&self, clbit: ClbitId) -> Option<String> {
        self.cregs
            .iter()
            .find_map(|r| r.index_of(clbit.0).map(|i| format!("{}[{i}]", r.name())))
    }

    // =========================================================================
    // Prebuilt circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit with measurements.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(circuit)
    }

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("qft", n, 0);
        for i in 0..n {
            circuit.h(QubitId(i))?;
            for j in (i + 1)..n {
                let angle = PI / f64::from(1u32 << (j - i).min(31));
                circuit.cp(angle, QubitId(j), QubitId(i))?;
            }
        }
        for i in 0..n / 2 {
            circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
        }
        Ok(circuit)
    }
}
