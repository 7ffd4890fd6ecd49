//! Computational basis sampling of a finalized state
//!
//! This module provides:
//! - [`CumulativeTable`]: prefix-sum table over the Born-rule distribution
//! - [`Sampler`]: draws independent shots from a state without touching it
//! - [`MeasurementCounts`]: aggregated outcome counts keyed by bit-string
//!
//! The canonical behavior is sequential: shots are drawn one after another
//! from a single random stream, so a fixed seed reproduces the same counts.

use crate::error::{Result, StateError};
use crate::state_vector::{index_to_bitstring, StateVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Shots drawn per task by [`Sampler::sample_parallel`]
pub const SHOTS_PER_CHUNK: usize = 4096;

/// Measurement outcome counts
///
/// Maps bit-strings (measurement outcomes) to the number of times they were
/// observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementCounts {
    /// Map from bit-string to count
    counts: HashMap<String, usize>,
    /// Total number of shots
    total_shots: usize,
}

impl MeasurementCounts {
    /// Create an empty counts object
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total_shots: 0,
        }
    }

    /// Create from a counts map
    pub fn from_counts(counts: HashMap<String, usize>) -> Self {
        let total_shots = counts.values().sum();
        Self {
            counts,
            total_shots,
        }
    }

    /// Add `count` occurrences of a bit-string
    pub fn add(&mut self, bitstring: String, count: usize) {
        *self.counts.entry(bitstring).or_insert(0) += count;
        self.total_shots += count;
    }

    /// Merge another set of counts into this one by summing per outcome
    pub fn merge(&mut self, other: MeasurementCounts) {
        for (bitstring, count) in other.counts {
            self.add(bitstring, count);
        }
    }

    /// Get the count for a specific bit-string
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Observed frequency of a specific bit-string
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.total_shots as f64
        }
    }

    /// Get all counts
    pub fn counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    /// Get total number of shots
    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// Get number of distinct outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Get the most common outcome, ties broken by the smaller bit-string
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.sorted().into_iter().next()
    }

    /// Get outcomes sorted by count (descending), then bit-string
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self
            .counts
            .iter()
            .map(|(bs, &count)| (bs.as_str(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }

    /// Convert to an empirical probability distribution
    pub fn to_probabilities(&self) -> HashMap<String, f64> {
        self.counts
            .iter()
            .map(|(bs, &count)| (bs.clone(), count as f64 / self.total_shots as f64))
            .collect()
    }
}

impl Default for MeasurementCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Counts ({} shots):", self.total_shots)?;

        let sorted = self.sorted();
        for (bitstring, count) in sorted.iter().take(16) {
            writeln!(
                f,
                "  {}: {} ({:.2}%)",
                bitstring,
                count,
                self.probability(bitstring) * 100.0
            )?;
        }

        if sorted.len() > 16 {
            writeln!(f, "  ... and {} more outcomes", sorted.len() - 16)?;
        }

        Ok(())
    }
}

/// Prefix-sum table for inverse-CDF sampling
///
/// Probabilities are renormalized by their total so the final prefix is 1 up
/// to rounding.
#[derive(Debug, Clone)]
pub struct CumulativeTable {
    /// prefix[i] = P(0) + ... + P(i)
    prefix: Vec<f64>,

    /// Highest index with nonzero probability
    last_nonzero: usize,
}

impl CumulativeTable {
    /// Build the table from a probability vector
    ///
    /// # Errors
    /// Returns `NotNormalized` if the probabilities have no positive mass
    pub fn new(probabilities: &[f64]) -> Result<Self> {
        let total: f64 = probabilities.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(StateError::NotNormalized { total });
        }

        let mut prefix = Vec::with_capacity(probabilities.len());
        let mut cumulative = 0.0;
        let mut last_nonzero = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            cumulative += p / total;
            prefix.push(cumulative);
            if p > 0.0 {
                last_nonzero = i;
            }
        }

        Ok(Self {
            prefix,
            last_nonzero,
        })
    }

    /// Build the table from a state's Born-rule distribution
    pub fn from_state(state: &StateVector) -> Result<Self> {
        Self::new(&state.probabilities())
    }

    /// Number of outcomes
    pub fn len(&self) -> usize {
        self.prefix.len()
    }

    /// Always false, a table holds at least one outcome
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Map a uniform draw in [0, 1) to an outcome index
    ///
    /// Selects the first index whose prefix sum exceeds `u`. Draws at or
    /// beyond the final prefix (rounding left it short of 1) fall back to the
    /// last outcome with nonzero probability, not the last index: trailing
    /// zero-probability outcomes are never returned.
    pub fn select(&self, u: f64) -> usize {
        self.prefix
            .partition_point(|&p| p <= u)
            .min(self.last_nonzero)
    }

    /// Draw one outcome index
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.select(rng.gen::<f64>())
    }
}

/// Draws measurement shots from a finalized state
///
/// The state is only borrowed, sampling never collapses or mutates it.
///
/// # Example
///
/// ```
/// use grover_state::{Sampler, StateVector};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let state = StateVector::basis(2, 2).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let counts = Sampler::new().sample(&state, 100, &mut rng).unwrap();
/// assert_eq!(counts.get("10"), 100);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler;

impl Sampler {
    /// Create a sampler
    pub fn new() -> Self {
        Self
    }

    fn check_shots(shots: usize) -> Result<()> {
        if shots == 0 {
            return Err(StateError::InvalidShotCount { shots });
        }
        Ok(())
    }

    /// Draw `shots` outcomes sequentially from one random stream
    ///
    /// # Errors
    /// Returns `InvalidShotCount` if `shots == 0` and `NotNormalized` if the
    /// state carries no probability mass
    pub fn sample<R: Rng + ?Sized>(
        &self,
        state: &StateVector,
        shots: usize,
        rng: &mut R,
    ) -> Result<MeasurementCounts> {
        Self::check_shots(shots)?;
        let table = CumulativeTable::from_state(state)?;

        let mut tally = vec![0usize; table.len()];
        for _ in 0..shots {
            tally[table.sample(rng)] += 1;
        }

        Ok(Self::tally_to_counts(&tally, state.num_qubits()))
    }

    /// Sequential sampling with a seeded (or entropy-seeded) `StdRng`
    pub fn sample_seeded(
        &self,
        state: &StateVector,
        shots: usize,
        seed: Option<u64>,
    ) -> Result<MeasurementCounts> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.sample(state, shots, &mut rng)
    }

    /// Draw shots in parallel chunks of [`SHOTS_PER_CHUNK`]
    ///
    /// Chunk `k` draws from `StdRng::seed_from_u64(seed + k)` and the per-chunk
    /// counts are summed. Results are reproducible for a given seed but differ
    /// from the sequential stream of [`Sampler::sample_seeded`].
    pub fn sample_parallel(
        &self,
        state: &StateVector,
        shots: usize,
        seed: u64,
    ) -> Result<MeasurementCounts> {
        Self::check_shots(shots)?;
        let table = CumulativeTable::from_state(state)?;
        let num_chunks = shots.div_ceil(SHOTS_PER_CHUNK);

        let tally = (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk as u64));
                let chunk_shots = SHOTS_PER_CHUNK.min(shots - chunk * SHOTS_PER_CHUNK);
                let mut local = vec![0usize; table.len()];
                for _ in 0..chunk_shots {
                    local[table.sample(&mut rng)] += 1;
                }
                local
            })
            .reduce(
                || vec![0usize; table.len()],
                |mut acc, local| {
                    acc.iter_mut().zip(local).for_each(|(a, l)| *a += l);
                    acc
                },
            );

        Ok(Self::tally_to_counts(&tally, state.num_qubits()))
    }

    fn tally_to_counts(tally: &[usize], num_qubits: usize) -> MeasurementCounts {
        let counts = tally
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(index, &count)| (index_to_bitstring(index, num_qubits), count))
            .collect();
        MeasurementCounts::from_counts(counts)
    }
}
