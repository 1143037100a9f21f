//! Target circuit framework for qbridge
//!
//! The target side of a conversion: a closed instruction vocabulary over
//! integer qubit indices, fixed-width [`PatternCircuit`]s built from it, and
//! the [`Executor`] interface that runs them under a selectable
//! [`Backend`] mode.
//!
//! # Vocabulary
//!
//! | Kind | Qubits | Angle |
//! |------|--------|-------|
//! | `X`, `Y`, `Z`, `H`, `S`, `I` | 1 | - |
//! | `RX`, `RY`, `RZ` | 1 | radians |
//! | `CNOT`, `CZ`, `SWAP` | 2 | - |
//! | `RZZ` | 2 | half-turns |
//! | `CCX` | 3 | - |
//! | `M` | 1 | - |
//!
//! # Example
//!
//! ```rust
//! use qbridge_pattern::{Kind, PatternCircuit};
//!
//! let mut circuit = PatternCircuit::with_clbits(2, 2);
//! circuit.h(0)?.cnot(0, 1)?.measure(0, 0)?.measure(1, 1)?;
//!
//! assert_eq!(circuit.kind_counts()[&Kind::M], 2);
//! # Ok::<(), qbridge_pattern::PatternError>(())
//! ```

mod backend;
mod circuit;
mod error;
mod executor;
mod instruction;
mod kind;

pub use backend::Backend;
pub use circuit::PatternCircuit;
pub use error::{PatternError, PatternResult};
pub use executor::{Execution, Executor, ExecutorRegistry};
pub use instruction::Instruction;
pub use kind::Kind;
