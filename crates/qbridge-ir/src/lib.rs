//! qbridge source circuit model
//!
//! This crate holds the register-based circuit model that conversions start
//! from. It mirrors the object model of gate-library oriented frameworks:
//! named quantum and classical registers, a broad standard gate library with
//! radian angles, and opaque custom gates.
//!
//! # Core Components
//!
//! - **Slots and registers**: [`QubitId`], [`ClbitId`] address global slots,
//!   [`Register`] names a contiguous run of them
//! - **Gates**: [`StandardGate`] for library gates and [`CustomGate`] for
//!   opaque operations without a known decomposition
//! - **Instructions**: [`Instruction`] combining an [`InstructionKind`] with
//!   its operands
//! - **Circuit**: [`Circuit`] validating builder
//!
//! # Example
//!
//! ```rust
//! use qbridge_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("layout");
//! circuit.add_qreg("anc", 1).unwrap();
//! circuit.add_qreg("data", 2).unwrap();
//!
//! let d0 = circuit.qubit("data", 0).unwrap();
//! circuit.h(d0).unwrap();
//! circuit.cx(d0, QubitId(0)).unwrap();
//!
//! assert_eq!(d0, QubitId(1));
//! assert_eq!(circuit.num_qubits(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId, Register};
