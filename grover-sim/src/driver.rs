//! Amplitude-amplification driver
//!
//! The driver walks a fixed lifecycle:
//!
//! ```text
//! Uninitialized ──initialize──▶ Superposed ──step──▶ Iterating(1) ──step──▶ ...
//!                                    │                     │
//!                                    └──────finalize───────┴──▶ FinalState
//! ```
//!
//! Any error raised while preparing the state or applying a round moves the
//! driver to [`DriverState::Failed`] and discards the partially evolved
//! state; every later call returns `InvalidTransition`.
//!
//! [`GroverDriver::finalize`] consumes the driver, so once the final state has
//! been handed out no further gate can be applied to it.

use crate::config::GroverConfig;
use crate::error::{GroverError, Result};
use crate::operators::{Diffuser, Operator, Oracle};
use grover_state::{GateEngine, StateVector};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Lifecycle state of a [`GroverDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No state vector allocated yet
    Uninitialized,
    /// Uniform superposition prepared, no iteration applied
    Superposed,
    /// `k` (oracle, diffuser) rounds applied
    Iterating(usize),
    /// Final state handed out
    Finalized,
    /// Preparation or a round failed; the state was discarded
    Failed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Uninitialized => write!(f, "uninitialized"),
            DriverState::Superposed => write!(f, "superposed"),
            DriverState::Iterating(k) => write!(f, "iterating({})", k),
            DriverState::Finalized => write!(f, "finalized"),
            DriverState::Failed => write!(f, "failed"),
        }
    }
}

/// Final state of a run plus the bookkeeping gathered while producing it
#[derive(Debug, Clone)]
pub struct FinalState {
    /// State after the last iteration
    pub state: StateVector,
    /// Number of (oracle, diffuser) rounds applied
    pub iterations: usize,
    /// Marked index
    pub target: usize,
    /// Elementary gates applied across all rounds
    pub gates_applied: usize,
    /// Largest |total probability - 1| seen by the unitarity checks
    pub max_norm_drift: f64,
    /// Time spent preparing the superposition
    pub initialization_time: Duration,
    /// Time spent applying rounds
    pub iteration_time: Duration,
}

impl FinalState {
    /// Probability of measuring the marked index
    pub fn target_probability(&self) -> f64 {
        self.state.probability(self.target).unwrap_or(0.0)
    }
}

/// Returns |total probability - 1|, or `UnitarityViolation` past `tolerance`
fn norm_drift(
    state: &StateVector,
    tolerance: f64,
    iteration: usize,
    operator: &'static str,
) -> Result<f64> {
    let total_probability = state.total_probability();
    let drift = (total_probability - 1.0).abs();

    if drift > tolerance {
        return Err(GroverError::UnitarityViolation {
            iteration,
            operator,
            total_probability,
        });
    }
    Ok(drift)
}

/// Drives the oracle/diffuser loop over an owned state vector
pub struct GroverDriver {
    engine: GateEngine,
    oracle: Oracle,
    diffuser: Diffuser,
    iterations: usize,
    tolerance: f64,
    verify_unitarity: bool,

    phase: DriverState,
    state: Option<StateVector>,
    gates_applied: usize,
    max_norm_drift: f64,
    initialization_time: Duration,
    iteration_time: Duration,
}

impl GroverDriver {
    /// Build the operators for `config`
    ///
    /// # Errors
    /// Returns the first validation error of the configuration
    pub fn new(config: &GroverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            engine: GateEngine::new().with_parallel_threshold(config.parallel_threshold),
            oracle: Oracle::new(config.num_qubits, config.target)?,
            diffuser: Diffuser::new(config.num_qubits)?,
            iterations: config.iterations,
            tolerance: config.tolerance,
            verify_unitarity: config.verify_unitarity,
            phase: DriverState::Uninitialized,
            state: None,
            gates_applied: 0,
            max_norm_drift: 0.0,
            initialization_time: Duration::ZERO,
            iteration_time: Duration::ZERO,
        })
    }

    /// Current lifecycle state
    pub fn phase(&self) -> DriverState {
        self.phase
    }

    /// Rounds applied so far
    pub fn completed_iterations(&self) -> usize {
        match self.phase {
            DriverState::Iterating(k) => k,
            _ => 0,
        }
    }

    /// Current state vector, if initialized
    pub fn state(&self) -> Option<&StateVector> {
        self.state.as_ref()
    }

    /// The oracle used by this driver
    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    fn transition_error(&self, action: &'static str) -> GroverError {
        GroverError::InvalidTransition {
            action,
            state: self.phase.to_string(),
        }
    }

    /// Prepare the uniform superposition
    ///
    /// # Errors
    /// Returns `InvalidTransition` unless the driver is uninitialized
    pub fn initialize(&mut self) -> Result<()> {
        if self.phase != DriverState::Uninitialized {
            return Err(self.transition_error("initialize"));
        }

        let start = Instant::now();
        let prepared = StateVector::uniform(self.oracle.num_qubits())
            .map_err(GroverError::from)
            .and_then(|state| {
                norm_drift(&state, self.tolerance, 0, "initialization").map(|drift| (state, drift))
            });
        let (state, drift) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                self.phase = DriverState::Failed;
                return Err(err);
            }
        };
        self.max_norm_drift = self.max_norm_drift.max(drift);
        self.initialization_time = start.elapsed();

        debug!(
            num_qubits = state.num_qubits(),
            dimension = state.dimension(),
            "prepared uniform superposition"
        );

        self.state = Some(state);
        self.phase = DriverState::Superposed;
        Ok(())
    }

    /// Apply one round: the oracle, then the diffuser
    ///
    /// Returns the number of rounds completed after this one.
    ///
    /// # Errors
    /// Returns `InvalidTransition` before [`GroverDriver::initialize`] or
    /// after a failure, gate errors from the engine, and `UnitarityViolation`
    /// when normalization checks are enabled and the state drifts beyond
    /// tolerance. A failed round leaves the driver [`DriverState::Failed`].
    pub fn step(&mut self) -> Result<usize> {
        let iteration = match self.phase {
            DriverState::Superposed => 0,
            DriverState::Iterating(k) => k,
            _ => return Err(self.transition_error("step")),
        };

        let mut state = self
            .state
            .take()
            .ok_or_else(|| self.transition_error("step"))?;

        let start = Instant::now();
        let outcome = self.apply_round(&mut state, iteration);
        self.iteration_time += start.elapsed();

        if let Err(err) = outcome {
            warn!(iteration, error = %err, "round failed, discarding state");
            self.phase = DriverState::Failed;
            return Err(err);
        }

        self.state = Some(state);
        self.phase = DriverState::Iterating(iteration + 1);
        Ok(iteration + 1)
    }

    fn apply_round(&mut self, state: &mut StateVector, iteration: usize) -> Result<()> {
        let operators: [&dyn Operator; 2] = [&self.oracle, &self.diffuser];

        for operator in operators {
            operator.apply(&self.engine, state)?;
            self.gates_applied += operator.gates().len();
            trace!(iteration, operator = operator.name(), "applied operator");

            if self.verify_unitarity {
                let drift = norm_drift(state, self.tolerance, iteration, operator.name())?;
                self.max_norm_drift = self.max_norm_drift.max(drift);
            }
        }

        debug!(
            iteration,
            target_probability = state.probability(self.oracle.target()).unwrap_or(0.0),
            "completed round"
        );
        Ok(())
    }

    /// Initialize if needed, then apply the configured number of rounds
    pub fn run(&mut self) -> Result<()> {
        match self.phase {
            DriverState::Uninitialized => self.initialize()?,
            DriverState::Superposed | DriverState::Iterating(_) => {}
            _ => return Err(self.transition_error("run")),
        }

        info!(
            iterations = self.iterations,
            target = self.oracle.target(),
            "running amplitude amplification"
        );

        while self.completed_iterations() < self.iterations {
            self.step()?;
        }
        Ok(())
    }

    /// Hand out the final state, ending the driver's lifecycle
    ///
    /// With zero rounds applied the final state is the uniform superposition.
    ///
    /// # Errors
    /// Returns `InvalidTransition` before [`GroverDriver::initialize`] and
    /// after a failed preparation or round
    pub fn finalize(mut self) -> Result<FinalState> {
        let iterations = match self.phase {
            DriverState::Superposed => 0,
            DriverState::Iterating(k) => k,
            _ => return Err(self.transition_error("finalize")),
        };

        let state = self
            .state
            .take()
            .ok_or_else(|| self.transition_error("finalize"))?;
        self.phase = DriverState::Finalized;

        Ok(FinalState {
            state,
            iterations,
            target: self.oracle.target(),
            gates_applied: self.gates_applied,
            max_norm_drift: self.max_norm_drift,
            initialization_time: self.initialization_time,
            iteration_time: self.iteration_time,
        })
    }
}
