//! OpenQASM exchange documents for qbridge
//!
//! This crate writes source circuits as OpenQASM 3 [`ExchangeDocument`]s and
//! reads OpenQASM 2/3 text back, either into a syntax tree ([`parse_program`])
//! or into a source [`Circuit`](qbridge_ir::Circuit) ([`parse`]).
//!
//! # Supported Subset
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version header | `OPENQASM 3.0;`, `OPENQASM 2.0;` |
//! | Includes | `include "stdgates.inc";` |
//! | Registers | `qubit[5] q;`, `bit[5] c;`, `qreg q[5];`, `creg c[5];` |
//! | Gate calls | `h q[0];`, `crz(pi/4) q[0], q[1];`, `h q;` (broadcast) |
//! | Measurement | `c[0] = measure q[0];`, `measure q -> c;` |
//! | Reset, barrier | `reset q[0];`, `barrier q;` |
//! | Comments | `// line`, `/* block */` |
//!
//! Gate definitions, classical control flow and timing are rejected.
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use qbridge_ir::Circuit;
//! use qbridge_qasm::{emit, parse};
//!
//! let circuit = Circuit::bell().unwrap();
//! let document = emit(&circuit);
//! assert!(document.as_str().contains("cx q[0], q[1];"));
//!
//! let reparsed = parse(document.as_str()).unwrap();
//! assert_eq!(reparsed.instructions(), circuit.instructions());
//! ```

pub mod ast;
mod document;
mod emitter;
mod error;
mod lexer;
mod parser;

pub use document::ExchangeDocument;
pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use lexer::{LexError, SpannedToken, Token, tokenize};
pub use parser::{parse, parse_program};
