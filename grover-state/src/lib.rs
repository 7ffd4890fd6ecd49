//! Exact state-vector simulation for the Grover gate set
//!
//! This crate provides a dense quantum state vector, in-place kernels for the
//! Hadamard, Pauli-X and multi-controlled phase-flip gates, and a sampler
//! that draws measurement shots from a finalized state.
//!
//! # Bit ordering
//!
//! Qubit `q` is bit `q` of a basis-state index (qubit 0 is the least
//! significant bit). Outcome bit-strings are printed most significant bit
//! first, so qubit 0 is the rightmost character.
//!
//! # Example
//!
//! ```
//! use grover_state::{GateEngine, Sampler, StateVector};
//!
//! let engine = GateEngine::new();
//! let mut state = StateVector::basis(2, 0).unwrap();
//! engine.apply_hadamard(&mut state, 0).unwrap();
//! engine.apply_pauli_x(&mut state, 1).unwrap();
//!
//! let counts = Sampler::new().sample_seeded(&state, 1000, Some(42)).unwrap();
//! assert_eq!(counts.total_shots(), 1000);
//! assert_eq!(counts.get("00") + counts.get("01"), 0);
//! ```

pub mod error;
pub mod gates;
pub mod kernels;
pub mod measurement;
pub mod state_vector;

pub use error::{Result, StateError};
pub use gates::{Gate, GateEngine, DEFAULT_PARALLEL_THRESHOLD};
pub use measurement::{CumulativeTable, MeasurementCounts, Sampler};
pub use state_vector::{index_to_bitstring, StateVector, MAX_QUBITS};
