//! Source-to-target circuit conversion for qbridge
//!
//! A [`Converter`] turns a register-based source
//! [`Circuit`](qbridge_ir::Circuit) into a flat, slot-indexed
//! [`PatternCircuit`](qbridge_pattern::PatternCircuit) in four steps:
//!
//! ```text
//!  Circuit ──canonicalize──▶ Circuit ──normalize──▶ Circuit ──emit──▶ ExchangeDocument
//!          (Decomposer +      (basis only)   (registers q, c)          (OpenQASM 3)
//!           vocabulary check)                                              │
//!                                                                  parse + alias table
//!                                                                          ▼
//!                                                                   PatternCircuit
//! ```
//!
//! The vocabulary both sides share is a [`CanonicalGateSet`], built from a
//! table of [`GateAlias`] rows. Each row names a source gate, the target
//! kind it becomes and the [`ArgTransform`] applied to its angle.
//!
//! # Example
//!
//! ```rust
//! use qbridge_convert::Converter;
//! use qbridge_ir::{Circuit, QubitId};
//! use qbridge_pattern::Instruction;
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//!
//! let target = Converter::standard().convert(&circuit)?;
//! assert_eq!(target.instructions()[1], Instruction::Cnot { control: 0, target: 1 });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod converter;
mod decompose;
mod error;
mod exchange;
mod gate_set;
mod normalize;

pub use converter::Converter;
pub use decompose::{BasisTranslator, Decomposer};
pub use error::{ConvertError, ConvertResult};
pub use exchange::{lower_document, lower_program};
pub use gate_set::{ArgTransform, CanonicalGateSet, GateAlias, MEASURE};
pub use normalize::{CLBIT_REGISTER, QUBIT_REGISTER, normalize_registers};
