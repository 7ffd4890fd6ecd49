//! Execution statistics tracking

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution statistics for a search run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatistics {
    /// Total execution time
    pub total_time: Duration,

    /// Time spent preparing the uniform superposition
    pub initialization_time: Duration,

    /// Time spent applying (oracle, diffuser) rounds
    pub iteration_time: Duration,

    /// Time spent drawing measurement shots
    pub sampling_time: Duration,

    /// Number of rounds applied
    pub iterations: usize,

    /// Number of elementary gates applied
    pub gates_applied: usize,

    /// Largest normalization drift observed by the unitarity checks
    pub max_norm_drift: f64,

    /// Estimated state vector memory, in bytes
    pub state_memory_bytes: usize,
}

impl ExecutionStatistics {
    /// Create a new statistics object
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gate execution rate (gates per second)
    pub fn gates_per_second(&self) -> f64 {
        let secs = self.iteration_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.gates_applied as f64 / secs
        }
    }

    /// Get the sampling time as a percentage of total time
    pub fn sampling_overhead_percent(&self) -> f64 {
        let total_secs = self.total_time.as_secs_f64();
        if total_secs == 0.0 {
            0.0
        } else {
            100.0 * self.sampling_time.as_secs_f64() / total_secs
        }
    }

    /// Get state memory in MB
    pub fn state_memory_mb(&self) -> f64 {
        self.state_memory_bytes as f64 / 1_000_000.0
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time: {:?}", self.total_time)?;
        writeln!(f, "    Initialization: {:?}", self.initialization_time)?;
        writeln!(f, "    Iterations: {:?}", self.iteration_time)?;
        writeln!(
            f,
            "    Sampling: {:?} ({:.1}%)",
            self.sampling_time,
            self.sampling_overhead_percent()
        )?;

        writeln!(f, "\n  Gates:")?;
        writeln!(f, "    Rounds: {}", self.iterations)?;
        writeln!(f, "    Applied: {}", self.gates_applied)?;
        writeln!(f, "    Execution rate: {:.0} gates/sec", self.gates_per_second())?;

        writeln!(f, "\n  State:")?;
        writeln!(f, "    Memory: {:.2} MB", self.state_memory_mb())?;
        writeln!(f, "    Max norm drift: {:.3e}", self.max_norm_drift)?;

        Ok(())
    }
}
