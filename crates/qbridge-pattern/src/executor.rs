//! Execution interface and executor registry.
//!
//! An [`Executor`] runs a [`PatternCircuit`] under one [`Backend`] mode.
//! The [`ExecutorRegistry`] maps modes to executors so callers can select a
//! mode by name at run time.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::backend::Backend;
use crate::circuit::PatternCircuit;
use crate::error::{PatternError, PatternResult};

/// Outcome of one circuit execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Value of each classical bit; `None` if never written.
    pub clbits: Vec<Option<bool>>,
    /// Number of instructions applied.
    pub instructions_applied: usize,
}

impl Execution {
    /// Classical bits as a bitstring, bit 0 leftmost. Unwritten bits are `0`.
    pub fn bitstring(&self) -> String {
        self.clbits
            .iter()
            .map(|b| if b.unwrap_or(false) { '1' } else { '0' })
            .collect()
    }
}

/// Runs target circuits under a simulation mode.
///
/// Executors must be shareable across threads; one instance may serve many
/// runs.
pub trait Executor: Send + Sync {
    /// Mode this executor implements.
    fn backend(&self) -> Backend;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Execute the circuit once.
    fn run(&self, circuit: &PatternCircuit) -> PatternResult<Execution>;
}

/// Executors keyed by simulation mode.
#[derive(Default, Clone)]
pub struct ExecutorRegistry {
    executors: FxHashMap<Backend, Arc<dyn Executor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor under its own mode, replacing any previous one.
    pub fn register(&mut self, executor: impl Executor + 'static) -> &mut Self {
        let backend = executor.backend();
        debug!("Registering executor '{}' for backend {}", executor.name(), backend);
        self.executors.insert(backend, Arc::new(executor));
        self
    }

    /// Look up the executor for a mode.
    pub fn get(&self, backend: Backend) -> PatternResult<Arc<dyn Executor>> {
        self.executors
            .get(&backend)
            .cloned()
            .ok_or(PatternError::BackendUnavailable(backend))
    }

    pub fn contains(&self, backend: Backend) -> bool {
        self.executors.contains_key(&backend)
    }

    /// Registered modes, sorted.
    pub fn backends(&self) -> Vec<Backend> {
        let mut backends: Vec<_> = self.executors.keys().copied().collect();
        backends.sort();
        backends
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("backends", &self.backends())
            .finish()
    }
}
