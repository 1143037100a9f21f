//! Benchmark configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QBRIDGE_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! ```yaml
//! shots: 5
//! backend: statevector
//! poll_interval_ms: 1
//! measure_conversion: false
//! seed: 10
//! max_qubits: 8
//! benchmarks:
//!   - name: ghz
//!     min_qubits: 2
//!     max_qubits: 12
//!   - name: qft
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use qbridge_pattern::Backend;

use crate::suite::{BenchmarkName, DEFAULT_SEED};

/// Default number of trials per measurement.
pub const DEFAULT_SHOTS: usize = 10;

/// Complete benchmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Trials averaged per measurement
    #[serde(default = "default_shots")]
    pub shots: usize,

    /// Simulation mode name (statevector, tensornetwork, densitymatrix, mps)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Delay between two memory reads, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Include conversion in the timed region
    #[serde(default)]
    pub measure_conversion: bool,

    /// Seed for randomized circuits and measurement sampling
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Upper qubit count for entries that give none
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Benchmarks to sweep; empty means every available benchmark
    #[serde(default)]
    pub benchmarks: Vec<BenchmarkEntry>,
}

/// One benchmark of a sweep and its qubit range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub name: String,

    /// Defaults to the smallest size the benchmark supports
    #[serde(default)]
    pub min_qubits: Option<usize>,

    /// Defaults to [`BenchConfig::max_qubits`]
    #[serde(default)]
    pub max_qubits: Option<usize>,
}

impl BenchmarkEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_qubits: None,
            max_qubits: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, min_qubits: usize, max_qubits: usize) -> Self {
        self.min_qubits = Some(min_qubits);
        self.max_qubits = Some(max_qubits);
        self
    }
}

fn default_shots() -> usize {
    DEFAULT_SHOTS
}

fn default_backend() -> String {
    Backend::default().name().to_string()
}

fn default_poll_interval_ms() -> u64 {
    1
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_qubits() -> usize {
    8
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            backend: default_backend(),
            poll_interval_ms: default_poll_interval_ms(),
            measure_conversion: false,
            seed: default_seed(),
            max_qubits: default_max_qubits(),
            benchmarks: Vec::new(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: BenchConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set override; a set variable that does not
    /// parse is an error.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup.
    pub fn merge_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QBRIDGE_SHOTS") {
            self.shots = parse_var("QBRIDGE_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QBRIDGE_BACKEND") {
            self.backend = v;
        }
        if let Some(v) = lookup("QBRIDGE_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_var("QBRIDGE_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("QBRIDGE_MEASURE_CONVERSION") {
            self.measure_conversion = parse_var("QBRIDGE_MEASURE_CONVERSION", &v)?;
        }
        if let Some(v) = lookup("QBRIDGE_SEED") {
            self.seed = parse_var("QBRIDGE_SEED", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        self.backend()?;

        for entry in &self.benchmarks {
            BenchmarkName::new(entry.name.as_str())
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
            let min = entry.min_qubits.unwrap_or(0);
            let max = entry.max_qubits.unwrap_or(self.max_qubits);
            if min > max {
                return Err(ConfigError::ValidationError(format!(
                    "{}: min_qubits {min} exceeds max_qubits {max}",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Get the parsed simulation mode.
    pub fn backend(&self) -> Result<Backend, ConfigError> {
        Backend::from_str(&self.backend).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
