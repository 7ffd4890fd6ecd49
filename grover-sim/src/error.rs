//! Error types for the Grover simulator

use grover_state::StateError;
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, GroverError>;

/// Errors that can occur while configuring or running a search
///
/// Every variant is a structural or configuration error detected
/// synchronously. Simulation is deterministic, so none of them is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroverError {
    /// Register size is zero, too large, or disagrees with the state
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A gate addressed a qubit outside the register
    #[error("Invalid qubit index {qubit}: register has {num_qubits} qubits")]
    InvalidQubit { qubit: usize, num_qubits: usize },

    /// Marked index outside [0, 2^n)
    #[error("Invalid target {target}: must be below {dimension}")]
    InvalidTarget { target: usize, dimension: usize },

    /// Total probability drifted beyond tolerance after an operator
    #[error(
        "Unitarity violation after {operator} in iteration {iteration}: \
         total probability {total_probability}"
    )]
    UnitarityViolation {
        iteration: usize,
        operator: &'static str,
        total_probability: f64,
    },

    /// Zero shots requested
    #[error("Invalid shot count {0}: must be positive")]
    InvalidShotCount(usize),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Driver operation called in the wrong lifecycle state
    #[error("Cannot {action} while driver is {state}")]
    InvalidTransition {
        action: &'static str,
        state: String,
    },

    /// Any other state-layer failure
    #[error("State error: {0}")]
    State(StateError),
}

impl From<StateError> for GroverError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidQubitIndex { index, num_qubits } => GroverError::InvalidQubit {
                qubit: index,
                num_qubits,
            },
            StateError::InvalidDimension { .. } | StateError::DimensionMismatch { .. } => {
                GroverError::InvalidDimension(err.to_string())
            }
            StateError::InvalidShotCount { shots } => GroverError::InvalidShotCount(shots),
            other => GroverError::State(other),
        }
    }
}
