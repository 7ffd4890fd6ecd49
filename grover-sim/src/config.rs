//! Search configuration

use crate::error::{GroverError, Result};
use grover_state::{DEFAULT_PARALLEL_THRESHOLD, MAX_QUBITS};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Default number of measurement shots
pub const DEFAULT_SHOTS: usize = 1024;

/// Default normalization tolerance
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Optimal number of Grover iterations for one marked item among 2^n
///
/// Returns `round(π/4 · sqrt(2^n))`.
///
/// # Example
///
/// ```
/// use grover_sim::optimal_iterations;
///
/// assert_eq!(optimal_iterations(2), 2);
/// assert_eq!(optimal_iterations(3), 2);
/// assert_eq!(optimal_iterations(4), 3);
/// ```
pub fn optimal_iterations(num_qubits: usize) -> usize {
    (FRAC_PI_4 * dimension_f64(num_qubits).sqrt()).round() as usize
}

/// Probability of measuring the marked item after `iterations` rounds
///
/// With `sin θ = 1/sqrt(2^n)` the amplitude of the marked state after `k`
/// rounds is `sin((2k + 1)θ)`.
pub fn theoretical_success_probability(num_qubits: usize, iterations: usize) -> f64 {
    let theta = (1.0 / dimension_f64(num_qubits).sqrt()).asin();
    ((2.0 * iterations as f64 + 1.0) * theta).sin().powi(2)
}

/// 2^n as a float; saturates to infinity instead of overflowing a shift
fn dimension_f64(num_qubits: usize) -> f64 {
    (num_qubits as f64).exp2()
}

/// Configuration for a Grover search run
///
/// Deserialization fills omitted fields from [`GroverConfig::default`],
/// except `iterations`, which falls back to `optimal_iterations(num_qubits)`
/// for the deserialized register size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroverConfigRepr")]
pub struct GroverConfig {
    /// Number of qubits in the search register
    ///
    /// Default: 3
    pub num_qubits: usize,

    /// Basis-state index the oracle marks
    ///
    /// Default: 0
    pub target: usize,

    /// Number of (oracle, diffuser) rounds
    ///
    /// Any value is accepted, including 0 and values past the optimum.
    ///
    /// Default: `optimal_iterations(num_qubits)`
    pub iterations: usize,

    /// Number of measurement shots
    ///
    /// Default: 1024
    pub shots: usize,

    /// Random number generator seed for reproducible sampling
    ///
    /// If None, the sampler seeds from entropy.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Allowed drift of the total probability from 1
    ///
    /// Default: 1e-9
    pub tolerance: f64,

    /// Re-check normalization after every operator application
    ///
    /// Default: enabled in debug builds
    pub verify_unitarity: bool,

    /// Minimum number of qubits to enable parallel gate kernels
    ///
    /// Default: 16
    pub parallel_threshold: usize,

    /// Draw shots in parallel chunks instead of one sequential stream
    ///
    /// Parallel counts are reproducible per seed but do not match the
    /// sequential stream.
    ///
    /// Default: false
    pub parallel_sampling: bool,

    /// Enable execution statistics collection
    ///
    /// Default: false
    pub collect_statistics: bool,
}

impl Default for GroverConfig {
    fn default() -> Self {
        Self {
            num_qubits: 3,
            target: 0,
            iterations: optimal_iterations(3),
            shots: DEFAULT_SHOTS,
            seed: None,
            tolerance: DEFAULT_TOLERANCE,
            verify_unitarity: cfg!(debug_assertions),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            parallel_sampling: false,
            collect_statistics: false,
        }
    }
}

/// Serialized form of [`GroverConfig`] with an optional iteration count
#[derive(Deserialize)]
#[serde(default)]
struct GroverConfigRepr {
    num_qubits: usize,
    target: usize,
    iterations: Option<usize>,
    shots: usize,
    seed: Option<u64>,
    tolerance: f64,
    verify_unitarity: bool,
    parallel_threshold: usize,
    parallel_sampling: bool,
    collect_statistics: bool,
}

impl Default for GroverConfigRepr {
    fn default() -> Self {
        let defaults = GroverConfig::default();
        Self {
            num_qubits: defaults.num_qubits,
            target: defaults.target,
            iterations: None,
            shots: defaults.shots,
            seed: defaults.seed,
            tolerance: defaults.tolerance,
            verify_unitarity: defaults.verify_unitarity,
            parallel_threshold: defaults.parallel_threshold,
            parallel_sampling: defaults.parallel_sampling,
            collect_statistics: defaults.collect_statistics,
        }
    }
}

impl From<GroverConfigRepr> for GroverConfig {
    fn from(repr: GroverConfigRepr) -> Self {
        Self {
            num_qubits: repr.num_qubits,
            target: repr.target,
            iterations: repr
                .iterations
                .unwrap_or_else(|| optimal_iterations(repr.num_qubits.min(MAX_QUBITS))),
            shots: repr.shots,
            seed: repr.seed,
            tolerance: repr.tolerance,
            verify_unitarity: repr.verify_unitarity,
            parallel_threshold: repr.parallel_threshold,
            parallel_sampling: repr.parallel_sampling,
            collect_statistics: repr.collect_statistics,
        }
    }
}

impl GroverConfig {
    /// Create a configuration searching `2^num_qubits` items for `target`
    ///
    /// Iterations default to [`optimal_iterations`] for the register size.
    pub fn new(num_qubits: usize, target: usize) -> Self {
        Self {
            num_qubits,
            target,
            iterations: optimal_iterations(num_qubits.min(MAX_QUBITS)),
            ..Default::default()
        }
    }

    /// Create a configuration for debugging
    ///
    /// - Deterministic seed
    /// - Unitarity checked after every operator
    /// - Statistics collection
    pub fn debug(num_qubits: usize, target: usize) -> Self {
        Self {
            seed: Some(42),
            verify_unitarity: true,
            collect_statistics: true,
            ..Self::new(num_qubits, target)
        }
    }

    /// Set the number of iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the number of measurement shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed for deterministic sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the normalization tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable the per-operator unitarity check
    pub fn with_unitarity_check(mut self, enabled: bool) -> Self {
        self.verify_unitarity = enabled;
        self
    }

    /// Set the parallel kernel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Enable or disable parallel sampling
    pub fn with_parallel_sampling(mut self, enabled: bool) -> Self {
        self.parallel_sampling = enabled;
        self
    }

    /// Enable statistics collection
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// State dimension 2^num_qubits, saturating at `usize::MAX`
    pub fn dimension(&self) -> usize {
        u32::try_from(self.num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .unwrap_or(usize::MAX)
    }

    /// Validate the configuration
    ///
    /// Checks are ordered so the register is validated before the target and
    /// the target before the shot count.
    pub fn validate(&self) -> Result<()> {
        if self.num_qubits == 0 || self.num_qubits > MAX_QUBITS {
            return Err(GroverError::InvalidDimension(format!(
                "num_qubits must be in 1..={}, got {}",
                MAX_QUBITS, self.num_qubits
            )));
        }

        if self.target >= self.dimension() {
            return Err(GroverError::InvalidTarget {
                target: self.target,
                dimension: self.dimension(),
            });
        }

        if self.shots == 0 {
            return Err(GroverError::InvalidShotCount(self.shots));
        }

        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(GroverError::InvalidConfig(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }

    /// Target rendered as a bit-string
    pub fn target_bitstring(&self) -> String {
        grover_state::index_to_bitstring(self.target, self.num_qubits)
    }
}
