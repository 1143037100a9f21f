//! Time and peak-memory benchmarks for qbridge.
//!
//! Benchmarks generate a source circuit, convert it into the target
//! vocabulary and execute it repeatedly under a [`Sampler`], which times
//! each trial while a background thread tracks peak resident memory.
//!
//! - [`sampler`]: timed trials with concurrent memory polling
//! - [`memory`]: the [`MemoryProbe`] seam and its `sysinfo` implementation
//! - [`suite`]: benchmark names, qubit domains and the built-in circuits
//! - [`runner`]: single runs and qubit-count sweeps
//! - [`config`]: YAML and environment configuration
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use qbridge_bench::{MemoryProbe, Sampler};
//!
//! struct Fixed;
//! impl MemoryProbe for Fixed {
//!     fn resident_bytes(&self) -> Option<u64> {
//!         Some(1024 * 1024)
//!     }
//! }
//!
//! let sampler = Sampler::with_probe(Arc::new(Fixed));
//! let m = sampler
//!     .measure(3, || Ok::<_, std::io::Error>((0..1000u64).sum::<u64>()))
//!     .unwrap();
//! assert_eq!(m.shots, 3);
//! assert_eq!(m.avg_peak_mb, 1.0);
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod runner;
pub mod sampler;
pub mod suite;

pub use config::{BenchConfig, BenchmarkEntry, ConfigError, DEFAULT_SHOTS};
pub use error::{BenchError, BenchResult, BoxError};
pub use memory::{MemoryProbe, ProcessMemory};
pub use runner::{
    BenchmarkRequest, Runner, SweepEntry, SweepEvent, SweepFailure, SweepPlan, SweepReport,
};
pub use sampler::{BYTES_PER_MB, DEFAULT_POLL_INTERVAL, Measurement, Sample, Sampler};
pub use suite::{BenchmarkName, CircuitSource, DEFAULT_SEED, DOMAINS, QubitDomain, StandardSuite};
