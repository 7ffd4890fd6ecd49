//! Grover's search on a dense state-vector simulator
//!
//! This crate drives amplitude amplification over a [`grover_state::StateVector`]:
//! a phase oracle marking one basis state, an inversion-about-the-mean
//! diffuser, a driver applying the two in rounds, and shot sampling of the
//! final state.
//!
//! # Features
//!
//! - **Gate-level operators**: Oracle and diffuser are built from H, X and a
//!   multi-controlled phase flip, replayed through a [`grover_state::GateEngine`]
//! - **Checked lifecycle**: The driver refuses out-of-order calls and can
//!   verify normalization after every operator
//! - **Reproducible sampling**: Seeded sequential or parallel shot sampling
//! - **Execution statistics**: Timing and gate counts per run
//!
//! # Example
//!
//! ```
//! use grover_sim::{GroverConfig, GroverSimulator};
//!
//! let config = GroverConfig::new(3, 5)
//!     .with_iterations(1)
//!     .with_seed(42);
//!
//! let result = GroverSimulator::new(config)?.run()?;
//!
//! assert_eq!(result.target_bitstring, "101");
//! assert!(result.found_target());
//! println!("{}", result.counts);
//! # Ok::<(), grover_sim::GroverError>(())
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod operators;
pub mod result;
pub mod simulator;
pub mod statistics;

pub use config::{
    optimal_iterations, theoretical_success_probability, GroverConfig, DEFAULT_SHOTS,
    DEFAULT_TOLERANCE,
};
pub use driver::{DriverState, FinalState, GroverDriver};
pub use error::{GroverError, Result};
pub use operators::{Diffuser, Operator, Oracle};
pub use result::GroverResult;
pub use simulator::{run, GroverSimulator};
pub use statistics::ExecutionStatistics;
