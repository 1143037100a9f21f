//! Statevector executor.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;
use tracing::{debug, instrument};

use qbridge_pattern::{
    Backend, Execution, Executor, PatternCircuit, PatternError, PatternResult,
};

use crate::statevector::Statevector;

/// Default qubit limit; 24 qubits is 256 MiB of amplitudes.
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Hard ceiling for [`StatevectorExecutor::with_max_qubits`]. Keeps `2^n`
/// amplitudes addressable and the byte count within `isize::MAX`.
pub const MAX_SUPPORTED_QUBITS: usize = 40;

/// Runs target circuits on a dense statevector.
///
/// Measurements draw from a [`SmallRng`]. With a seed set, every run of the
/// same circuit yields the same outcomes.
#[derive(Debug, Clone)]
pub struct StatevectorExecutor {
    max_qubits: usize,
    seed: Option<u64>,
}

impl StatevectorExecutor {
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }

    /// Limits above [`MAX_SUPPORTED_QUBITS`] are clamped to it.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_SUPPORTED_QUBITS);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

impl Default for StatevectorExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for StatevectorExecutor {
    fn backend(&self) -> Backend {
        Backend::Statevector
    }

    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip(self, circuit), fields(width = circuit.width(), len = circuit.len()))]
    fn run(&self, circuit: &PatternCircuit) -> PatternResult<Execution> {
        if circuit.width() > self.max_qubits {
            return Err(PatternError::TooManyQubits {
                requested: circuit.width(),
                max: self.max_qubits,
            });
        }

        let start = Instant::now();
        let mut rng = self.rng();
        let mut sv = Statevector::new(circuit.width());
        let mut clbits = vec![None; circuit.num_clbits()];

        for inst in circuit.instructions() {
            if let Some(bit) = sv.apply(inst, &mut rng) {
                if let Some(slot) = inst.clbit() {
                    clbits[slot] = Some(bit);
                }
            }
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(Execution {
            clbits,
            instructions_applied: circuit.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> PatternCircuit {
        let mut circuit = PatternCircuit::with_clbits(2, 2);
        circuit
            .h(0)
            .unwrap()
            .cnot(0, 1)
            .unwrap()
            .measure(0, 0)
            .unwrap()
            .measure(1, 1)
            .unwrap();
        circuit
    }

    #[test]
    fn test_bell_outcomes_agree() {
        let executor = StatevectorExecutor::new();
        for _ in 0..50 {
            let result = executor.run(&bell()).unwrap();
            assert!(matches!(result.bitstring().as_str(), "00" | "11"));
            assert_eq!(result.instructions_applied, 4);
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let executor = StatevectorExecutor::new().with_seed(42);
        let first = executor.run(&bell()).unwrap();
        for _ in 0..10 {
            assert_eq!(executor.run(&bell()).unwrap(), first);
        }
    }

    #[test]
    fn test_too_many_qubits() {
        let executor = StatevectorExecutor::new().with_max_qubits(5);
        let circuit = PatternCircuit::new(10);
        assert!(matches!(
            executor.run(&circuit),
            Err(PatternError::TooManyQubits {
                requested: 10,
                max: 5
            })
        ));
    }

    #[test]
    fn test_limit_is_clamped() {
        let executor = StatevectorExecutor::new().with_max_qubits(usize::MAX);
        assert_eq!(executor.max_qubits(), MAX_SUPPORTED_QUBITS);

        let circuit = PatternCircuit::new(64);
        assert!(matches!(
            executor.run(&circuit),
            Err(PatternError::TooManyQubits {
                requested: 64,
                max: MAX_SUPPORTED_QUBITS
            })
        ));
    }

    #[test]
    fn test_unwritten_clbits_stay_none() {
        let mut circuit = PatternCircuit::with_clbits(1, 2);
        circuit.x(0).unwrap().measure(0, 1).unwrap();
        let result = StatevectorExecutor::new().run(&circuit).unwrap();
        assert_eq!(result.clbits, vec![None, Some(true)]);
    }
}
