//! Timed execution with concurrent peak-memory polling.
//!
//! Each trial runs the operation on the calling thread while one scoped
//! thread polls resident memory and folds it into a shared peak:
//!
//! ```text
//!   caller                         poller
//!   ──────                         ──────
//!   spawn ───────────────────────▶ read, fetch_max(peak)
//!   start = now                    sleep(interval)
//!   op()                           read, fetch_max(peak)
//!   elapsed = start.elapsed()      ...
//!   stop.store(true, Release) ───▶ stop.load(Acquire) == true, exit
//!   join ◀────────────────────────
//!   peak.load()
//! ```
//!
//! The peak is read only after the join, and at most one poller is alive at
//! any time.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::error::{BenchError, BenchResult, BoxError};
use crate::memory::{MemoryProbe, ProcessMemory};

/// Default delay between two memory reads.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Bytes per reported megabyte.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One trial: wall-clock time and the highest resident memory seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub duration: Duration,
    pub peak_bytes: u64,
}

/// Averages over all trials of one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Mean wall-clock time per trial.
    pub avg_duration: Duration,
    /// Mean peak resident memory, in megabytes (1024²).
    pub avg_peak_mb: f64,
    /// Number of trials averaged.
    pub shots: usize,
}

impl Measurement {
    /// Average a non-empty set of samples.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let shots = samples.len();
        let total_secs: f64 = samples.iter().map(|s| s.duration.as_secs_f64()).sum();
        let total_bytes: u128 = samples.iter().map(|s| u128::from(s.peak_bytes)).sum();

        Some(Self {
            avg_duration: Duration::from_secs_f64(total_secs / shots as f64),
            avg_peak_mb: total_bytes as f64 / shots as f64 / BYTES_PER_MB,
            shots,
        })
    }

    /// Mean time in seconds.
    pub fn seconds(&self) -> f64 {
        self.avg_duration.as_secs_f64()
    }
}

/// Measures time and peak memory of an operation over repeated trials.
#[derive(Clone)]
pub struct Sampler {
    probe: Arc<dyn MemoryProbe>,
    interval: Duration,
}

impl Sampler {
    /// A sampler reading this process through [`ProcessMemory`].
    pub fn new() -> Self {
        Self::with_probe(Arc::new(ProcessMemory::new()))
    }

    pub fn with_probe(probe: Arc<dyn MemoryProbe>) -> Self {
        Self {
            probe,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `op` `shots` times in sequence and average the samples.
    ///
    /// Stops at the first failing trial and returns
    /// [`BenchError::OperationFailure`] carrying the trial index and the
    /// operation's error. The poller of that trial is joined first.
    pub fn measure<F, T, E>(&self, shots: usize, mut op: F) -> BenchResult<Measurement>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        if shots == 0 {
            return Err(BenchError::invalid("shots must be at least 1"));
        }

        let mut samples = Vec::with_capacity(shots);
        for trial in 0..shots {
            let sample = self
                .sample(&mut op)
                .map_err(|e| BenchError::OperationFailure {
                    trial,
                    source: e.into(),
                })?;
            trace!(
                "Trial {trial}: {:?}, peak {} bytes",
                sample.duration,
                sample.peak_bytes
            );
            samples.push(sample);
        }

        let measurement = Measurement::from_samples(&samples)
            .ok_or_else(|| BenchError::invalid("no samples collected"))?;
        debug!(
            "Measured {shots} trials: {:.6} s, {:.2} MB",
            measurement.seconds(),
            measurement.avg_peak_mb
        );
        Ok(measurement)
    }

    /// Run `op` once with a poller alive for its whole duration.
    ///
    /// The operation's error is returned unchanged. If `op` panics the
    /// poller is still stopped and joined before the panic propagates.
    pub fn sample<F, T, E>(&self, op: F) -> Result<Sample, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let peak = AtomicU64::new(0);
        let stop = AtomicBool::new(false);
        let probe = &*self.probe;
        let interval = self.interval;

        thread::scope(|scope| {
            let poller = scope.spawn(|| poll(probe, &peak, &stop, interval));
            let guard = StopOnDrop(&stop);

            let start = Instant::now();
            let result = op();
            let duration = start.elapsed();

            drop(guard);
            match poller.join() {
                Ok(polls) => trace!("Poller finished after {polls} reads"),
                Err(panic) => std::panic::resume_unwind(panic),
            }

            result.map(|_| Sample {
                duration,
                peak_bytes: peak.load(Ordering::Acquire),
            })
        })
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Raises the stop flag when dropped, including during unwinding.
struct StopOnDrop<'a>(&'a AtomicBool);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Poll until stopped. Reads once before the first stop check so even an
/// instant operation yields a sample. Returns the number of reads.
fn poll(probe: &dyn MemoryProbe, peak: &AtomicU64, stop: &AtomicBool, interval: Duration) -> usize {
    let mut reads = 0;
    loop {
        if let Some(bytes) = probe.resident_bytes() {
            peak.fetch_max(bytes, Ordering::AcqRel);
        }
        reads += 1;
        if stop.load(Ordering::Acquire) {
            return reads;
        }
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Returns a fixed value and counts reads.
    struct FixedProbe {
        bytes: u64,
        reads: AtomicUsize,
    }

    impl FixedProbe {
        fn new(bytes: u64) -> Arc<Self> {
            Arc::new(Self {
                bytes,
                reads: AtomicUsize::new(0),
            })
        }
    }

    impl MemoryProbe for FixedProbe {
        fn resident_bytes(&self) -> Option<u64> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Some(self.bytes)
        }
    }

    struct Unreadable;

    impl MemoryProbe for Unreadable {
        fn resident_bytes(&self) -> Option<u64> {
            None
        }
    }

    #[test]
    fn test_from_samples_averages() {
        let samples = [
            Sample {
                duration: Duration::from_millis(10),
                peak_bytes: 1024 * 1024,
            },
            Sample {
                duration: Duration::from_millis(30),
                peak_bytes: 3 * 1024 * 1024,
            },
        ];
        let m = Measurement::from_samples(&samples).unwrap();
        assert_eq!(m.shots, 2);
        assert!((m.seconds() - 0.020).abs() < 1e-9);
        assert!((m.avg_peak_mb - 2.0).abs() < 1e-12);
        assert!(Measurement::from_samples(&[]).is_none());
    }

    #[test]
    fn test_zero_shots_rejected() {
        let sampler = Sampler::with_probe(FixedProbe::new(1));
        let result = sampler.measure(0, || Ok::<_, BenchError>(()));
        assert!(matches!(result, Err(BenchError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_instant_op_still_polled() {
        let probe = FixedProbe::new(4096);
        let sampler = Sampler::with_probe(probe.clone());
        let sample = sampler.sample(|| Ok::<_, BenchError>(())).unwrap();
        assert_eq!(sample.peak_bytes, 4096);
        assert!(probe.reads.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_unreadable_probe_gives_zero() {
        let sampler = Sampler::with_probe(Arc::new(Unreadable));
        let m = sampler.measure(2, || Ok::<_, BenchError>(())).unwrap();
        assert_eq!(m.avg_peak_mb, 0.0);
        assert_eq!(m.shots, 2);
    }

    #[test]
    fn test_failure_reports_trial() {
        let sampler = Sampler::with_probe(FixedProbe::new(1));
        let mut calls = 0;
        let result = sampler.measure(5, || {
            calls += 1;
            if calls == 3 {
                Err(BenchError::invalid("third call"))
            } else {
                Ok(())
            }
        });
        match result {
            Err(BenchError::OperationFailure { trial, source }) => {
                assert_eq!(trial, 2);
                assert!(source.to_string().contains("third call"));
            }
            other => panic!("expected operation failure, got {other:?}"),
        }
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_panicking_op_stops_poller() {
        let probe = FixedProbe::new(1);
        let sampler = Sampler::with_probe(probe.clone());
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sampler.sample(|| -> Result<(), BenchError> { panic!("boom") })
        }));
        assert!(outcome.is_err());

        let reads = probe.reads.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(probe.reads.load(Ordering::SeqCst), reads);
    }
}
