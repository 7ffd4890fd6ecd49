//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Qubit listed more than once in a control set
    #[error("Qubit {index} appears more than once in control set")]
    DuplicateQubit { index: usize },

    /// Invalid register size
    #[error("Invalid register size {num_qubits}, expected 1..={max}")]
    InvalidDimension { num_qubits: usize, max: usize },

    /// Basis-state index outside the state dimension
    #[error("Index {index} out of bounds for dimension {dimension}")]
    IndexOutOfBounds { index: usize, dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// State has no probability mass to sample from
    #[error("State vector not normalized, total probability = {total}")]
    NotNormalized { total: f64 },

    /// Zero measurement shots requested
    #[error("Shot count must be positive, got {shots}")]
    InvalidShotCount { shots: usize },
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
