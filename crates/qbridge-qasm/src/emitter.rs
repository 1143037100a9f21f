//! OpenQASM 3 emitter producing exchange documents.

use std::fmt::Write as _;

use qbridge_ir::{Circuit, Instruction, InstructionKind, Register};

use crate::document::ExchangeDocument;

/// Serialize a circuit as an OpenQASM 3 exchange document.
///
/// Registers are declared in slot order under their own names and every
/// instruction is written in program order. Angles use the shortest
/// representation that parses back to the same `f64`.
pub fn emit(circuit: &Circuit) -> ExchangeDocument {
    let mut emitter = Emitter::new(circuit);
    emitter.emit_circuit(circuit);
    ExchangeDocument::new(emitter.output)
}

struct Emitter {
    output: String,
    qubit_labels: Vec<String>,
    clbit_labels: Vec<String>,
}

impl Emitter {
    fn new(circuit: &Circuit) -> Self {
        Self {
            output: String::new(),
            qubit_labels: labels(circuit.qregs()),
            clbit_labels: labels(circuit.cregs()),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");

        for reg in circuit.qregs() {
            self.writeln(&format!("qubit[{}] {};", reg.size(), reg.name()));
        }
        for reg in circuit.cregs() {
            self.writeln(&format!("bit[{}] {};", reg.size(), reg.name()));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        let qubits = instruction
            .qubits
            .iter()
            .map(|q| self.qubit_labels[q.0 as usize].as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let line = match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let params = gate.parameters();
                if params.is_empty() {
                    format!("{} {qubits};", gate.name())
                } else {
                    let params = params
                        .iter()
                        .map(|v| format_angle(*v))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{}({params}) {qubits};", gate.name())
                }
            }
            InstructionKind::Measure => {
                let clbit = &self.clbit_labels[instruction.clbits[0].0 as usize];
                format!("{clbit} = measure {qubits};")
            }
            InstructionKind::Reset => format!("reset {qubits};"),
            // An empty barrier would read back as a barrier on every qubit
            InstructionKind::Barrier if instruction.qubits.is_empty() => return,
            InstructionKind::Barrier => format!("barrier {qubits};"),
        };
        self.writeln(&line);
    }

    fn writeln(&mut self, line: &str) {
        // Writing to a String cannot fail
        let _ = writeln!(self.output, "{line}");
    }
}

/// `name[index]` label for every slot covered by `registers`.
fn labels(registers: &[Register]) -> Vec<String> {
    registers
        .iter()
        .flat_map(|r| (0..r.size()).map(move |i| format!("{}[{i}]", r.name())))
        .collect()
}

/// Shortest round-trip decimal form of an angle.
fn format_angle(value: f64) -> String {
    format!("{value:?}")
}
