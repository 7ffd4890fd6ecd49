//! Search result types

use crate::statistics::ExecutionStatistics;
use grover_state::MeasurementCounts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a Grover search run
///
/// This is everything downstream reporting needs: the outcome counts and the
/// marked bit-string to compare them against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverResult {
    /// Outcome counts, summing to `shots`
    pub counts: MeasurementCounts,

    /// Marked index
    pub target: usize,

    /// Marked index as a bit-string
    pub target_bitstring: String,

    /// Register size
    pub num_qubits: usize,

    /// Rounds applied
    pub iterations: usize,

    /// Shots drawn
    pub shots: usize,

    /// Exact probability of the target in the final state
    pub success_probability: f64,

    /// Execution statistics (if statistics collection was enabled)
    pub statistics: Option<ExecutionStatistics>,
}

impl GroverResult {
    /// Observed frequency of the target
    pub fn target_frequency(&self) -> f64 {
        self.counts.probability(&self.target_bitstring)
    }

    /// Most frequent outcome
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.counts.most_common()
    }

    /// Whether the most frequent outcome is the target
    pub fn found_target(&self) -> bool {
        self.most_common()
            .map(|(bitstring, _)| bitstring == self.target_bitstring)
            .unwrap_or(false)
    }
}

impl fmt::Display for GroverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Grover search: {} qubits, target {} ({}), {} iteration(s)",
            self.num_qubits, self.target_bitstring, self.target, self.iterations
        )?;
        writeln!(
            f,
            "Success probability: {:.4} exact, {:.4} observed",
            self.success_probability,
            self.target_frequency()
        )?;
        write!(f, "{}", self.counts)?;

        if let Some(stats) = &self.statistics {
            write!(f, "\n{}", stats)?;
        }
        Ok(())
    }
}
