//! Statevector executor for qbridge
//!
//! Implements [`Executor`](qbridge_pattern::Executor) for
//! [`Backend::Statevector`](qbridge_pattern::Backend::Statevector) with a
//! dense amplitude vector. Exact up to sampling of measurements, limited by
//! memory to a few dozen qubits.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```rust
//! use qbridge_adapter_sim::StatevectorExecutor;
//! use qbridge_pattern::{Executor, PatternCircuit};
//!
//! let mut circuit = PatternCircuit::with_clbits(2, 2);
//! circuit.h(0)?.cnot(0, 1)?.measure(0, 0)?.measure(1, 1)?;
//!
//! let result = StatevectorExecutor::new().with_seed(1).run(&circuit)?;
//! assert!(result.bitstring() == "00" || result.bitstring() == "11");
//! # Ok::<(), qbridge_pattern::PatternError>(())
//! ```

mod executor;
mod statevector;

pub use executor::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS, StatevectorExecutor};
pub use statevector::Statevector;
