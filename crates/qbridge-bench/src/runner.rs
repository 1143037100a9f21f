//! Benchmark runner and qubit-count sweeps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use qbridge_convert::Converter;
use qbridge_pattern::{Backend, Executor, ExecutorRegistry, PatternCircuit};

use crate::config::{BenchConfig, DEFAULT_SHOTS};
use crate::error::{BenchError, BenchResult, BoxError};
use crate::sampler::{Measurement, Sampler};
use crate::suite::{BenchmarkName, CircuitSource, QubitDomain};

/// One benchmark at one size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    pub name: BenchmarkName,
    pub num_qubits: usize,
    pub backend: Backend,
    pub shots: usize,
    /// Time conversion and execution together instead of execution alone.
    pub measure_conversion: bool,
}

impl BenchmarkRequest {
    pub fn new(name: BenchmarkName, num_qubits: usize) -> Self {
        Self {
            name,
            num_qubits,
            backend: Backend::default(),
            shots: DEFAULT_SHOTS,
            measure_conversion: false,
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    #[must_use]
    pub fn with_measure_conversion(mut self, measure_conversion: bool) -> Self {
        self.measure_conversion = measure_conversion;
        self
    }
}

/// A benchmark and the qubit range to sweep it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub name: BenchmarkName,
    pub min_qubits: usize,
    pub max_qubits: usize,
}

/// Benchmarks to sweep and the settings shared by every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub entries: Vec<SweepEntry>,
    pub backend: Backend,
    pub shots: usize,
    pub measure_conversion: bool,
}

impl SweepPlan {
    /// Build a plan from a configuration.
    ///
    /// An empty benchmark list expands to every benchmark of `source`.
    /// Missing lower bounds default to the domain minimum.
    pub fn from_config(config: &BenchConfig, source: &dyn CircuitSource) -> BenchResult<Self> {
        config.validate()?;
        let backend = config.backend()?;

        let entries = if config.benchmarks.is_empty() {
            source
                .names()
                .into_iter()
                .map(|name| {
                    let min = source.domain(&name).map_or(0, |d| d.min);
                    SweepEntry {
                        name,
                        min_qubits: min,
                        max_qubits: config.max_qubits,
                    }
                })
                .collect()
        } else {
            config
                .benchmarks
                .iter()
                .map(|entry| {
                    let name = BenchmarkName::new(entry.name.as_str())?;
                    let min = entry
                        .min_qubits
                        .or_else(|| source.domain(&name).map(|d| d.min))
                        .unwrap_or(0);
                    Ok(SweepEntry {
                        name,
                        min_qubits: min,
                        max_qubits: entry.max_qubits.unwrap_or(config.max_qubits),
                    })
                })
                .collect::<BenchResult<Vec<_>>>()?
        };

        Ok(Self {
            entries,
            backend,
            shots: config.shots,
            measure_conversion: config.measure_conversion,
        })
    }
}

/// Progress notifications emitted during a sweep.
#[derive(Debug)]
pub enum SweepEvent<'a> {
    Started {
        benchmark: &'a BenchmarkName,
        num_qubits: usize,
    },
    Completed {
        benchmark: &'a BenchmarkName,
        num_qubits: usize,
        measurement: &'a Measurement,
    },
    Failed {
        benchmark: &'a BenchmarkName,
        num_qubits: usize,
        error: &'a BenchError,
    },
}

/// A configuration that failed during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepFailure {
    pub benchmark: BenchmarkName,
    pub num_qubits: usize,
    pub error: String,
}

/// Results of a sweep.
///
/// `time`, `memory` and `qubits` are parallel: for each benchmark, entry
/// `i` of all three describes the same run, in increasing qubit order.
/// Times are in seconds, memory in megabytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub backend: Backend,
    pub shots: usize,
    pub time: BTreeMap<BenchmarkName, Vec<f64>>,
    pub memory: BTreeMap<BenchmarkName, Vec<f64>>,
    pub qubits: BTreeMap<BenchmarkName, Vec<usize>>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    fn new(plan: &SweepPlan) -> Self {
        Self {
            started_at: Utc::now(),
            backend: plan.backend,
            shots: plan.shots,
            time: BTreeMap::new(),
            memory: BTreeMap::new(),
            qubits: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, benchmark: &BenchmarkName, num_qubits: usize, measurement: &Measurement) {
        self.time
            .entry(benchmark.clone())
            .or_default()
            .push(measurement.seconds());
        self.memory
            .entry(benchmark.clone())
            .or_default()
            .push(measurement.avg_peak_mb);
        self.qubits
            .entry(benchmark.clone())
            .or_default()
            .push(num_qubits);
    }

    /// Number of successful runs.
    pub fn completed(&self) -> usize {
        self.qubits.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Runs benchmarks: generate, convert, execute under the sampler.
pub struct Runner {
    converter: Converter,
    source: Arc<dyn CircuitSource>,
    registry: ExecutorRegistry,
    sampler: Sampler,
}

impl Runner {
    pub fn new(
        converter: Converter,
        source: impl CircuitSource + 'static,
        registry: ExecutorRegistry,
        sampler: Sampler,
    ) -> Self {
        Self {
            converter,
            source: Arc::new(source),
            registry,
            sampler,
        }
    }

    pub fn source(&self) -> &dyn CircuitSource {
        &*self.source
    }

    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    /// Measure one benchmark at one size.
    ///
    /// Backend, benchmark name, qubit count and shot count are all checked
    /// before any circuit is built. The circuit is converted once; with
    /// `measure_conversion` every trial converts again inside the timed
    /// region.
    #[instrument(skip(self, request), fields(benchmark = %request.name, qubits = request.num_qubits, backend = %request.backend))]
    pub fn run_benchmark(&self, request: &BenchmarkRequest) -> BenchResult<Measurement> {
        let executor = self.executor(request.backend)?;
        self.check_request(request)?;

        let circuit = self.source.circuit(&request.name, request.num_qubits)?;
        let pattern = self.converter.convert(&circuit)?;
        debug!(
            "Converted {} source instructions into {}",
            circuit.len(),
            pattern.len()
        );

        if request.measure_conversion {
            self.sampler.measure(request.shots, || -> Result<_, BoxError> {
                let pattern = self.converter.convert(&circuit)?;
                Ok(executor.run(&pattern)?)
            })
        } else {
            self.sampler
                .measure(request.shots, || executor.run(&pattern))
        }
    }

    /// Measure an already converted circuit.
    #[instrument(skip(self, circuit), fields(width = circuit.width(), backend = %backend))]
    pub fn run_circuit(
        &self,
        circuit: &PatternCircuit,
        backend: Backend,
        shots: usize,
    ) -> BenchResult<Measurement> {
        let executor = self.executor(backend)?;
        self.sampler.measure(shots, || executor.run(circuit))
    }

    /// Sizes each entry of `plan` runs at, after validating the whole plan.
    pub fn schedule(&self, plan: &SweepPlan) -> BenchResult<Vec<(BenchmarkName, Vec<usize>)>> {
        self.executor(plan.backend)?;
        if plan.shots == 0 {
            return Err(BenchError::invalid("shots must be at least 1"));
        }
        plan.entries
            .iter()
            .map(|entry| {
                let domain = self.domain(&entry.name)?;
                Ok((
                    entry.name.clone(),
                    domain.sizes(entry.min_qubits, entry.max_qubits),
                ))
            })
            .collect()
    }

    /// Run every benchmark of `plan` at every size in its range.
    ///
    /// The plan is validated up front. After that a failing configuration
    /// is recorded in [`SweepReport::failures`] and the sweep moves on.
    #[instrument(skip_all, fields(backend = %plan.backend, shots = plan.shots))]
    pub fn sweep(
        &self,
        plan: &SweepPlan,
        mut observer: impl FnMut(SweepEvent<'_>),
    ) -> BenchResult<SweepReport> {
        let schedule = self.schedule(plan)?;
        let mut report = SweepReport::new(plan);

        for (name, sizes) in &schedule {
            for &num_qubits in sizes {
                observer(SweepEvent::Started {
                    benchmark: name,
                    num_qubits,
                });
                let request = BenchmarkRequest::new(name.clone(), num_qubits)
                    .with_backend(plan.backend)
                    .with_shots(plan.shots)
                    .with_measure_conversion(plan.measure_conversion);

                match self.run_benchmark(&request) {
                    Ok(measurement) => {
                        report.record(name, num_qubits, &measurement);
                        observer(SweepEvent::Completed {
                            benchmark: name,
                            num_qubits,
                            measurement: &measurement,
                        });
                    }
                    Err(error) => {
                        warn!("{name} at {num_qubits} qubits failed: {error}");
                        observer(SweepEvent::Failed {
                            benchmark: name,
                            num_qubits,
                            error: &error,
                        });
                        report.failures.push(SweepFailure {
                            benchmark: name.clone(),
                            num_qubits,
                            error: error.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "Sweep finished: {} runs, {} failures",
            report.completed(),
            report.failures.len()
        );
        Ok(report)
    }

    fn executor(&self, backend: Backend) -> BenchResult<Arc<dyn Executor>> {
        self.registry
            .get(backend)
            .map_err(|e| BenchError::invalid(e.to_string()))
    }

    fn domain(&self, name: &BenchmarkName) -> BenchResult<QubitDomain> {
        self.source
            .domain(name)
            .ok_or_else(|| BenchError::invalid(format!("unknown benchmark '{name}'")))
    }

    fn check_request(&self, request: &BenchmarkRequest) -> BenchResult<()> {
        let domain = self.domain(&request.name)?;
        if !domain.contains(request.num_qubits) {
            return Err(BenchError::invalid(format!(
                "{} is not defined for {} qubits (domain {domain})",
                request.name, request.num_qubits
            )));
        }
        if request.shots == 0 {
            return Err(BenchError::invalid("shots must be at least 1"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("converter", &self.converter)
            .field("registry", &self.registry)
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_ir::{Circuit, QubitId};
    use qbridge_pattern::{Execution, PatternResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::memory::MemoryProbe;

    struct ConstProbe;

    impl MemoryProbe for ConstProbe {
        fn resident_bytes(&self) -> Option<u64> {
            Some(2 * 1024 * 1024)
        }
    }

    /// Counts runs and fails on circuits wider than `fail_above`.
    struct CountingExecutor {
        runs: Arc<AtomicUsize>,
        fail_above: usize,
    }

    impl Executor for CountingExecutor {
        fn backend(&self) -> Backend {
            Backend::Statevector
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn run(&self, circuit: &PatternCircuit) -> PatternResult<Execution> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if circuit.width() > self.fail_above {
                return Err(qbridge_pattern::PatternError::TooManyQubits {
                    requested: circuit.width(),
                    max: self.fail_above,
                });
            }
            Ok(Execution {
                clbits: vec![None; circuit.num_clbits()],
                instructions_applied: circuit.len(),
            })
        }
    }

    /// Two benchmarks: `line` (2..) and `pair` (exactly 2).
    struct TinySource;

    impl CircuitSource for TinySource {
        fn names(&self) -> Vec<BenchmarkName> {
            vec![
                BenchmarkName::new("line").unwrap(),
                BenchmarkName::new("pair").unwrap(),
            ]
        }

        fn domain(&self, name: &BenchmarkName) -> Option<QubitDomain> {
            match name.as_str() {
                "line" => Some(QubitDomain::from_min(2)),
                "pair" => Some(QubitDomain::new(2, Some(2), 1)),
                _ => None,
            }
        }

        fn circuit(&self, _name: &BenchmarkName, num_qubits: usize) -> BenchResult<Circuit> {
            let n = num_qubits as u32;
            let mut circuit = Circuit::with_size("line", n, 0);
            for q in 1..n {
                circuit.cx(QubitId(q - 1), QubitId(q))?;
            }
            Ok(circuit)
        }
    }

    fn runner(fail_above: usize) -> (Runner, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut registry = ExecutorRegistry::new();
        registry.register(CountingExecutor {
            runs: runs.clone(),
            fail_above,
        });
        let runner = Runner::new(
            Converter::standard(),
            TinySource,
            registry,
            Sampler::with_probe(Arc::new(ConstProbe)),
        );
        (runner, runs)
    }

    fn name(s: &str) -> BenchmarkName {
        BenchmarkName::new(s).unwrap()
    }

    #[test]
    fn test_run_benchmark() {
        let (runner, runs) = runner(usize::MAX);
        let request = BenchmarkRequest::new(name("line"), 4).with_shots(3);
        let m = runner.run_benchmark(&request).unwrap();
        assert_eq!(m.shots, 3);
        assert!((m.avg_peak_mb - 2.0).abs() < 1e-12);
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_validation_precedes_work() {
        let (runner, runs) = runner(usize::MAX);
        let cases = [
            BenchmarkRequest::new(name("line"), 4).with_backend(Backend::Mps),
            BenchmarkRequest::new(name("nope"), 4),
            BenchmarkRequest::new(name("pair"), 3),
            BenchmarkRequest::new(name("line"), 1),
            BenchmarkRequest::new(name("line"), 4).with_shots(0),
        ];
        for request in &cases {
            let result = runner.run_benchmark(request);
            assert!(
                matches!(result, Err(BenchError::InvalidConfiguration(_))),
                "{request:?} gave {result:?}"
            );
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_measure_conversion() {
        let (runner, runs) = runner(usize::MAX);
        let request = BenchmarkRequest::new(name("line"), 3)
            .with_shots(2)
            .with_measure_conversion(true);
        assert!(runner.run_benchmark(&request).is_ok());
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_execution_failure_is_operation_failure() {
        let (runner, _) = runner(2);
        let result = runner.run_benchmark(&BenchmarkRequest::new(name("line"), 3));
        assert!(matches!(
            result,
            Err(BenchError::OperationFailure { trial: 0, .. })
        ));
    }

    #[test]
    fn test_run_circuit() {
        let (runner, runs) = runner(usize::MAX);
        let mut circuit = PatternCircuit::new(2);
        circuit.h(0).unwrap().cnot(0, 1).unwrap();
        let m = runner.run_circuit(&circuit, Backend::Statevector, 4).unwrap();
        assert_eq!(m.shots, 4);
        assert_eq!(runs.load(Ordering::SeqCst), 4);

        let missing = runner.run_circuit(&circuit, Backend::TensorNetwork, 1);
        assert!(matches!(missing, Err(BenchError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_sweep_records_failures_and_continues() {
        let (runner, _) = runner(3);
        let plan = SweepPlan {
            entries: vec![
                SweepEntry {
                    name: name("line"),
                    min_qubits: 1,
                    max_qubits: 5,
                },
                SweepEntry {
                    name: name("pair"),
                    min_qubits: 1,
                    max_qubits: 5,
                },
            ],
            backend: Backend::Statevector,
            shots: 1,
            measure_conversion: false,
        };

        let mut events = Vec::new();
        let report = runner
            .sweep(&plan, |event| {
                let tag = match event {
                    SweepEvent::Started { .. } => "start",
                    SweepEvent::Completed { .. } => "ok",
                    SweepEvent::Failed { .. } => "fail",
                };
                events.push(tag);
            })
            .unwrap();

        assert_eq!(report.qubits[&name("line")], vec![2, 3]);
        assert_eq!(report.time[&name("line")].len(), 2);
        assert_eq!(report.memory[&name("line")].len(), 2);
        assert_eq!(report.qubits[&name("pair")], vec![2]);
        let failed: Vec<_> = report.failures.iter().map(|f| f.num_qubits).collect();
        assert_eq!(failed, vec![4, 5]);
        assert_eq!(report.completed(), 3);
        assert_eq!(events.iter().filter(|e| **e == "start").count(), 5);
        assert_eq!(events.iter().filter(|e| **e == "fail").count(), 2);
    }

    #[test]
    fn test_sweep_rejects_bad_plan() {
        let (runner, _) = runner(usize::MAX);
        let plan = SweepPlan {
            entries: vec![SweepEntry {
                name: name("nope"),
                min_qubits: 2,
                max_qubits: 3,
            }],
            backend: Backend::Statevector,
            shots: 1,
            measure_conversion: false,
        };
        assert!(matches!(
            runner.sweep(&plan, |_| {}),
            Err(BenchError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_plan_from_config() {
        let config = BenchConfig::from_yaml(
            "shots: 2\nmax_qubits: 4\nbenchmarks:\n  - name: line\n  - name: pair\n    min_qubits: 2\n    max_qubits: 9\n",
        )
        .unwrap();
        let plan = SweepPlan::from_config(&config, &TinySource).unwrap();
        assert_eq!(plan.shots, 2);
        assert_eq!(
            plan.entries[0],
            SweepEntry {
                name: name("line"),
                min_qubits: 2,
                max_qubits: 4
            }
        );
        assert_eq!(plan.entries[1].max_qubits, 9);

        let all = SweepPlan::from_config(&BenchConfig::default(), &TinySource).unwrap();
        assert_eq!(all.entries.len(), 2);
    }

    #[test]
    fn test_report_json() {
        let (runner, _) = runner(usize::MAX);
        let plan = SweepPlan {
            entries: vec![SweepEntry {
                name: name("pair"),
                min_qubits: 2,
                max_qubits: 2,
            }],
            backend: Backend::Statevector,
            shots: 1,
            measure_conversion: false,
        };
        let report = runner.sweep(&plan, |_| {}).unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["backend"], "statevector");
        assert_eq!(value["qubits"]["pair"][0], 2);

        let back: SweepReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.qubits, report.qubits);
        assert_eq!(back.started_at, report.started_at);
    }
}
