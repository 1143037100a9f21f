//! Resident memory introspection.

use std::sync::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::warn;

/// Reports the resident memory of the running process.
///
/// Called from the sampler's polling thread while the measured operation
/// runs on another, hence `Send + Sync`.
pub trait MemoryProbe: Send + Sync {
    /// Resident set size in bytes, or `None` if it cannot be read.
    fn resident_bytes(&self) -> Option<u64>;
}

/// [`MemoryProbe`] for the current process, backed by `sysinfo`.
///
/// Each read refreshes only the memory counters of this one process.
pub struct ProcessMemory {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl ProcessMemory {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!("Cannot determine current pid, memory will read as zero: {e}");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for ProcessMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for ProcessMemory {
    fn resident_bytes(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        system.process(pid).map(|process| process.memory())
    }
}

impl std::fmt::Debug for ProcessMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessMemory")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}
