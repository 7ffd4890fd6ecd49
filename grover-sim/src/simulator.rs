//! End-to-end search: amplitude amplification followed by sampling

use grover_state::{Sampler, StateVector};
use std::mem::size_of;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    config::GroverConfig,
    driver::{FinalState, GroverDriver},
    error::Result,
    result::GroverResult,
    statistics::ExecutionStatistics,
};

/// Grover search simulator
///
/// Owns a validated [`GroverConfig`]; every call to [`GroverSimulator::run`]
/// builds a fresh driver, so one simulator can be run repeatedly.
///
/// # Example
///
/// ```
/// use grover_sim::{GroverConfig, GroverSimulator};
///
/// let config = GroverConfig::new(3, 5)
///     .with_iterations(1)
///     .with_shots(1024)
///     .with_seed(42);
///
/// let simulator = GroverSimulator::new(config).unwrap();
/// let result = simulator.run().unwrap();
///
/// assert_eq!(result.counts.total_shots(), 1024);
/// assert!(result.found_target());
/// ```
#[derive(Debug, Clone)]
pub struct GroverSimulator {
    config: GroverConfig,
}

impl GroverSimulator {
    /// Create a simulator for `config`
    ///
    /// # Errors
    ///
    /// Returns the first validation error of the configuration.
    pub fn new(config: GroverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the simulator configuration
    pub fn config(&self) -> &GroverConfig {
        &self.config
    }

    /// Run the driver to completion without sampling
    pub fn evolve(&self) -> Result<FinalState> {
        let mut driver = GroverDriver::new(&self.config)?;
        driver.run()?;
        driver.finalize()
    }

    /// Run the search and sample the final state
    ///
    /// This:
    /// 1. Prepares the uniform superposition
    /// 2. Applies the configured number of (oracle, diffuser) rounds
    /// 3. Draws `shots` measurement outcomes
    /// 4. Collects statistics (if enabled)
    ///
    /// # Errors
    ///
    /// Returns driver errors (including `UnitarityViolation` when checks are
    /// enabled) and sampling errors.
    pub fn run(&self) -> Result<GroverResult> {
        let total_start = Instant::now();
        let config = &self.config;

        info!(
            num_qubits = config.num_qubits,
            target = config.target,
            iterations = config.iterations,
            shots = config.shots,
            "starting Grover search"
        );

        let final_state = self.evolve()?;

        let sampling_start = Instant::now();
        let counts = self.sample(&final_state.state)?;
        let sampling_time = sampling_start.elapsed();

        let success_probability = final_state.target_probability();
        debug!(
            success_probability,
            outcomes = counts.num_outcomes(),
            "sampled final state"
        );

        let statistics = config.collect_statistics.then(|| ExecutionStatistics {
            total_time: total_start.elapsed(),
            initialization_time: final_state.initialization_time,
            iteration_time: final_state.iteration_time,
            sampling_time,
            iterations: final_state.iterations,
            gates_applied: final_state.gates_applied,
            max_norm_drift: final_state.max_norm_drift,
            state_memory_bytes: final_state.state.dimension()
                * size_of::<num_complex::Complex64>(),
        });

        let result = GroverResult {
            counts,
            target: config.target,
            target_bitstring: config.target_bitstring(),
            num_qubits: config.num_qubits,
            iterations: final_state.iterations,
            shots: config.shots,
            success_probability,
            statistics,
        };

        info!(
            found = result.found_target(),
            target_frequency = result.target_frequency(),
            "Grover search finished"
        );

        Ok(result)
    }

    fn sample(&self, state: &StateVector) -> Result<grover_state::MeasurementCounts> {
        let sampler = Sampler::new();
        let counts = if self.config.parallel_sampling {
            let seed = self.config.seed.unwrap_or_else(rand::random);
            sampler.sample_parallel(state, self.config.shots, seed)?
        } else {
            sampler.sample_seeded(state, self.config.shots, self.config.seed)?
        };
        Ok(counts)
    }
}

/// Validate `config`, run the search and sample it
pub fn run(config: GroverConfig) -> Result<GroverResult> {
    GroverSimulator::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroverError;

    #[test]
    fn test_simulator_rejects_invalid_config() {
        assert_eq!(
            GroverSimulator::new(GroverConfig::new(3, 9)).unwrap_err(),
            GroverError::InvalidTarget {
                target: 9,
                dimension: 8
            }
        );
        assert_eq!(
            run(GroverConfig::new(3, 1).with_shots(0)).unwrap_err(),
            GroverError::InvalidShotCount(0)
        );
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let config = GroverConfig::new(4, 11).with_iterations(2).with_seed(3);
        let simulator = GroverSimulator::new(config).unwrap();

        let first = simulator.run().unwrap();
        let second = simulator.run().unwrap();
        assert_eq!(first.counts, second.counts);
    }

    #[test]
    fn test_parallel_sampling_conserves_shots() {
        let config = GroverConfig::new(5, 17)
            .with_shots(10_000)
            .with_seed(9)
            .with_parallel_sampling(true);
        let result = run(config).unwrap();

        assert_eq!(result.counts.total_shots(), 10_000);
        assert_eq!(result.counts.counts().values().sum::<usize>(), 10_000);
        assert!(result.found_target());
    }

    #[test]
    fn test_statistics_collection() {
        let config = GroverConfig::new(3, 5).with_iterations(2).with_seed(1);

        let without = run(config.clone()).unwrap();
        assert!(without.statistics.is_none());

        let with = run(config.with_statistics(true)).unwrap();
        let stats = with.statistics.unwrap();
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.gates_applied, 2 * 16);
        assert_eq!(stats.state_memory_bytes, 8 * 16);
    }

    #[test]
    fn test_evolve_matches_run() {
        let config = GroverConfig::new(3, 6).with_iterations(1).with_seed(5);
        let simulator = GroverSimulator::new(config).unwrap();

        let final_state = simulator.evolve().unwrap();
        let result = simulator.run().unwrap();
        assert_eq!(result.success_probability, final_state.target_probability());
    }
}
