//! Benchmark circuits: names, qubit domains and the built-in suite.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use qbridge_ir::{Circuit, ClbitId, IrResult, QubitId};

use crate::error::{BenchError, BenchResult};

/// Validated benchmark identifier: non-empty, `[a-z0-9_]+`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BenchmarkName(String);

impl BenchmarkName {
    pub fn new(name: impl Into<String>) -> BenchResult<Self> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(Self(name))
        } else {
            Err(BenchError::invalid(format!(
                "benchmark name '{name}' must match [a-z0-9_]+"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BenchmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BenchmarkName {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BenchmarkName {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BenchmarkName> for String {
    fn from(name: BenchmarkName) -> Self {
        name.0
    }
}

/// Qubit counts a benchmark can be generated at: `min, min + step, ...`,
/// up to `max` when bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitDomain {
    pub min: usize,
    pub max: Option<usize>,
    pub step: usize,
}

impl QubitDomain {
    pub const fn new(min: usize, max: Option<usize>, step: usize) -> Self {
        Self { min, max, step }
    }

    /// Unbounded domain with step 1.
    pub const fn from_min(min: usize) -> Self {
        Self::new(min, None, 1)
    }

    pub fn contains(&self, num_qubits: usize) -> bool {
        num_qubits >= self.min
            && self.max.is_none_or(|max| num_qubits <= max)
            && (num_qubits - self.min) % self.step.max(1) == 0
    }

    /// Members of the domain within `from..=to`, ascending.
    pub fn sizes(&self, from: usize, to: usize) -> Vec<usize> {
        let step = self.step.max(1);
        let upper = self.max.map_or(to, |max| max.min(to));
        let lower = from.max(self.min);
        let first = self.min + (lower - self.min).div_ceil(step) * step;
        if first > upper {
            return Vec::new();
        }
        (first..=upper).step_by(step).collect()
    }
}

impl fmt::Display for QubitDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..={max}", self.min)?,
            None => write!(f, "{}..", self.min)?,
        }
        if self.step > 1 {
            write!(f, " step {}", self.step)?;
        }
        Ok(())
    }
}

/// Supplies benchmark circuits by name and qubit count.
pub trait CircuitSource: Send + Sync {
    /// Available benchmarks, in listing order.
    fn names(&self) -> Vec<BenchmarkName>;

    /// Valid qubit counts, or `None` for an unknown benchmark.
    fn domain(&self, name: &BenchmarkName) -> Option<QubitDomain>;

    /// Build the circuit. Sizes outside the domain are rejected.
    fn circuit(&self, name: &BenchmarkName, num_qubits: usize) -> BenchResult<Circuit>;
}

/// Qubit domains of the built-in benchmarks.
pub const DOMAINS: &[(&str, QubitDomain)] = &[
    ("dj", QubitDomain::from_min(2)),
    ("ghz", QubitDomain::from_min(2)),
    ("graphstate", QubitDomain::from_min(3)),
    ("qft", QubitDomain::from_min(2)),
    ("qftentangled", QubitDomain::from_min(2)),
    ("random", QubitDomain::from_min(2)),
    ("wstate", QubitDomain::from_min(2)),
];

/// Default seed of the randomized benchmarks.
pub const DEFAULT_SEED: u64 = 10;

/// The built-in benchmark circuits, measured on every qubit.
///
/// `dj` and `random` draw from a `SmallRng` seeded per circuit, so the same
/// seed and size always give the same circuit.
#[derive(Debug, Clone, Copy)]
pub struct StandardSuite {
    seed: u64,
}

impl StandardSuite {
    pub fn new() -> Self {
        Self { seed: DEFAULT_SEED }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng(&self, num_qubits: u32) -> SmallRng {
        SmallRng::seed_from_u64(self.seed ^ u64::from(num_qubits))
    }
}

impl Default for StandardSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitSource for StandardSuite {
    fn names(&self) -> Vec<BenchmarkName> {
        DOMAINS
            .iter()
            .map(|(name, _)| BenchmarkName(name.to_string()))
            .collect()
    }

    fn domain(&self, name: &BenchmarkName) -> Option<QubitDomain> {
        DOMAINS
            .iter()
            .find(|(n, _)| *n == name.as_str())
            .map(|(_, domain)| *domain)
    }

    fn circuit(&self, name: &BenchmarkName, num_qubits: usize) -> BenchResult<Circuit> {
        let domain = self
            .domain(name)
            .ok_or_else(|| BenchError::invalid(format!("unknown benchmark '{name}'")))?;
        if !domain.contains(num_qubits) {
            return Err(BenchError::invalid(format!(
                "{name} is not defined for {num_qubits} qubits (domain {domain})"
            )));
        }
        let n = u32::try_from(num_qubits)
            .map_err(|_| BenchError::invalid(format!("{num_qubits} qubits is too many")))?;
        let circuit = match name.as_str() {
            "dj" => dj(n, &mut self.rng(n))?,
            "ghz" => Circuit::ghz(n)?,
            "graphstate" => graph_state(n)?,
            "qft" => qft(n, false)?,
            "qftentangled" => qft(n, true)?,
            "random" => random(n, &mut self.rng(n))?,
            "wstate" => w_state(n)?,
            other => {
                return Err(BenchError::invalid(format!("no generator for '{other}'")));
            }
        };
        Ok(circuit)
    }
}

/// Deutsch-Jozsa with a balanced oracle on `n - 1` inputs and one ancilla.
fn dj(n: u32, rng: &mut SmallRng) -> IrResult<Circuit> {
    let inputs = n - 1;
    let ancilla = QubitId(inputs);
    let mut circuit = Circuit::with_size("dj", n, inputs);
    let flips: Vec<bool> = (0..inputs).map(|_| rng.r#gen()).collect();

    circuit.x(ancilla)?;
    for q in 0..n {
        circuit.h(QubitId(q))?;
    }
    circuit.barrier_all()?;
    for (q, &flip) in flips.iter().enumerate() {
        if flip {
            circuit.x(QubitId(q as u32))?;
        }
    }
    for q in 0..inputs {
        circuit.cx(QubitId(q), ancilla)?;
    }
    for (q, &flip) in flips.iter().enumerate() {
        if flip {
            circuit.x(QubitId(q as u32))?;
        }
    }
    circuit.barrier_all()?;
    for q in 0..inputs {
        circuit.h(QubitId(q))?;
        circuit.measure(QubitId(q), ClbitId(q))?;
    }
    Ok(circuit)
}

/// Graph state over a ring.
fn graph_state(n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("graphstate", n, n);
    for q in 0..n {
        circuit.h(QubitId(q))?;
    }
    for q in 0..n {
        circuit.cz(QubitId(q), QubitId((q + 1) % n))?;
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// QFT, optionally applied to a GHZ state.
fn qft(n: u32, entangled: bool) -> IrResult<Circuit> {
    let name = if entangled { "qftentangled" } else { "qft" };
    let mut circuit = Circuit::with_size(name, n, n);
    if entangled {
        circuit.h(QubitId(0))?;
        for q in 1..n {
            circuit.cx(QubitId(q - 1), QubitId(q))?;
        }
    }
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
    circuit.measure_all()?;
    Ok(circuit)
}

/// Layers of random one- and two-qubit gates, `2n` layers deep.
fn random(n: u32, rng: &mut SmallRng) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("random", n, n);
    for _layer in 0..2 * n {
        let q = QubitId(rng.gen_range(0..n));
        let mut other = QubitId(rng.gen_range(0..n - 1));
        if other.0 >= q.0 {
            other = QubitId(other.0 + 1);
        }
        let angle = rng.gen_range(0.0..2.0 * PI);

        match rng.gen_range(0..8) {
            0 => circuit.h(q)?,
            1 => circuit.t(q)?,
            2 => circuit.sx(q)?,
            3 => circuit.rz(angle, q)?,
            4 => circuit.ry(angle, q)?,
            5 => circuit.cx(q, other)?,
            6 => circuit.crz(angle, q, other)?,
            _ => circuit.rzz(angle, q, other)?,
        };
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// W state: one excitation spread evenly over all qubits.
fn w_state(n: u32) -> IrResult<Circuit> {
    let mut circuit = Circuit::with_size("wstate", n, n);
    circuit.x(QubitId(n - 1))?;
    for k in 1..n {
        let (i, j) = (QubitId(n - k), QubitId(n - k - 1));
        let theta = (1.0 / f64::from(n - k + 1)).sqrt().acos();
        circuit.ry(-theta, j)?.cz(i, j)?.ry(theta, j)?;
    }
    for k in 1..n {
        circuit.cx(QubitId(n - k - 1), QubitId(n - k))?;
    }
    circuit.measure_all()?;
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> BenchmarkName {
        BenchmarkName::new(s).unwrap()
    }

    #[test]
    fn test_benchmark_name_validation() {
        assert!(BenchmarkName::new("qft_entangled2").is_ok());
        for bad in ["", "QFT", "ghz-state", "ghz state", "wstate!"] {
            assert!(
                matches!(BenchmarkName::new(bad), Err(BenchError::InvalidConfiguration(_))),
                "{bad:?}"
            );
        }
        assert!(serde_json::from_str::<BenchmarkName>(r#""Bad""#).is_err());
        let parsed: BenchmarkName = serde_json::from_str(r#""ghz""#).unwrap();
        assert_eq!(parsed.as_str(), "ghz");
    }

    #[test]
    fn test_domain_contains() {
        let open = QubitDomain::from_min(3);
        assert!(!open.contains(2));
        assert!(open.contains(3));
        assert!(open.contains(1000));

        let stepped = QubitDomain::new(2, Some(10), 2);
        assert!(stepped.contains(2));
        assert!(!stepped.contains(3));
        assert!(stepped.contains(10));
        assert!(!stepped.contains(12));
    }

    #[test]
    fn test_domain_sizes() {
        let stepped = QubitDomain::new(2, Some(10), 2);
        assert_eq!(stepped.sizes(3, 20), vec![4, 6, 8, 10]);
        assert_eq!(stepped.sizes(0, 5), vec![2, 4]);
        assert!(stepped.sizes(11, 20).is_empty());
        assert_eq!(QubitDomain::from_min(3).sizes(1, 5), vec![3, 4, 5]);
        assert!(QubitDomain::from_min(3).sizes(5, 4).is_empty());
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(QubitDomain::from_min(2).to_string(), "2..");
        assert_eq!(QubitDomain::new(2, Some(10), 2).to_string(), "2..=10 step 2");
    }

    #[test]
    fn test_suite_lists_domains_in_order() {
        let suite = StandardSuite::new();
        let names: Vec<_> = suite.names().iter().map(|n| n.to_string()).collect();
        assert_eq!(
            names,
            ["dj", "ghz", "graphstate", "qft", "qftentangled", "random", "wstate"]
        );
        assert_eq!(suite.domain(&name("graphstate")), Some(QubitDomain::from_min(3)));
        assert_eq!(suite.domain(&name("vqe")), None);
    }

    #[test]
    fn test_every_benchmark_builds_at_its_minimum() {
        let suite = StandardSuite::new();
        for benchmark in suite.names() {
            let domain = suite.domain(&benchmark).unwrap();
            for n in domain.sizes(0, domain.min + 3) {
                let circuit = suite.circuit(&benchmark, n).unwrap();
                assert_eq!(circuit.num_qubits(), n, "{benchmark} at {n}");
                assert!(!circuit.is_empty(), "{benchmark} at {n}");
            }
        }
    }

    #[test]
    fn test_random_is_seeded() {
        let a = StandardSuite::new().circuit(&name("random"), 5).unwrap();
        let b = StandardSuite::new().circuit(&name("random"), 5).unwrap();
        assert_eq!(a.instructions(), b.instructions());

        let c = StandardSuite::new()
            .with_seed(99)
            .circuit(&name("random"), 5)
            .unwrap();
        assert_ne!(a.instructions(), c.instructions());
    }

    #[test]
    fn test_unknown_benchmark() {
        let result = StandardSuite::new().circuit(&name("vqe"), 4);
        assert!(matches!(result, Err(BenchError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_size_outside_domain() {
        let result = StandardSuite::new().circuit(&name("graphstate"), 2);
        assert!(matches!(result, Err(BenchError::InvalidConfiguration(_))));
        let result = StandardSuite::new().circuit(&name("random"), 1);
        assert!(matches!(result, Err(BenchError::InvalidConfiguration(_))));
    }
}
