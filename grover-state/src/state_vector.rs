//! Dense state vector holding all 2^n complex amplitudes
//!
//! Qubit `q` is bit `q` of a basis-state index, so qubit 0 is the least
//! significant bit. Bit-strings are rendered most significant bit first,
//! which puts qubit 0 in the rightmost position.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::fmt;

/// Largest register the simulator will allocate (2^30 amplitudes, 16 GiB)
pub const MAX_QUBITS: usize = 30;

/// Render a basis-state index as an `num_qubits`-wide bit-string
///
/// # Example
///
/// ```
/// use grover_state::index_to_bitstring;
///
/// assert_eq!(index_to_bitstring(5, 3), "101");
/// assert_eq!(index_to_bitstring(1, 4), "0001");
/// ```
pub fn index_to_bitstring(index: usize, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

/// Quantum state vector over an n-qubit register
///
/// # Example
///
/// ```
/// use grover_state::StateVector;
///
/// // 2 qubits, 4 amplitudes, all zero
/// let state = StateVector::new(2).unwrap();
/// assert_eq!(state.num_qubits(), 2);
/// assert_eq!(state.dimension(), 4);
/// assert_eq!(state.total_probability(), 0.0);
/// ```
#[derive(Clone, PartialEq)]
pub struct StateVector {
    /// Number of qubits
    num_qubits: usize,

    /// Amplitudes indexed by basis state
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Create a zero vector of dimension 2^num_qubits
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `num_qubits` is 0 or above [`MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(StateError::InvalidDimension {
                num_qubits,
                max: MAX_QUBITS,
            });
        }

        Ok(Self {
            num_qubits,
            amplitudes: vec![Complex64::new(0.0, 0.0); 1 << num_qubits],
        })
    }

    /// Create the uniform superposition, every amplitude 1/sqrt(2^n)
    ///
    /// # Example
    /// ```
    /// use grover_state::StateVector;
    ///
    /// let state = StateVector::uniform(3).unwrap();
    /// assert!(state.is_normalized(1e-12));
    /// assert!((state.probability(5).unwrap() - 0.125).abs() < 1e-12);
    /// ```
    pub fn uniform(num_qubits: usize) -> Result<Self> {
        let mut state = Self::new(num_qubits)?;
        let amplitude = Complex64::new(1.0 / (state.dimension() as f64).sqrt(), 0.0);
        state.amplitudes.fill(amplitude);
        Ok(state)
    }

    /// Create the computational basis state |index⟩
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self> {
        let mut state = Self::new(num_qubits)?;
        state.set_amplitude(index, Complex64::new(1.0, 0.0))?;
        Ok(state)
    }

    /// Create a state vector from raw amplitude data
    ///
    /// The amplitudes are copied as given, no normalization is applied.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let mut state = Self::new(num_qubits)?;

        if amplitudes.len() != state.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: state.dimension(),
                actual: amplitudes.len(),
            });
        }

        state.amplitudes.copy_from_slice(amplitudes);
        Ok(state)
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the state amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Get a mutable reference to the state amplitudes
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.dimension() {
            return Err(StateError::IndexOutOfBounds {
                index,
                dimension: self.dimension(),
            });
        }
        Ok(())
    }

    /// Amplitude of basis state `index`
    pub fn amplitude(&self, index: usize) -> Result<Complex64> {
        self.check_index(index)?;
        Ok(self.amplitudes[index])
    }

    /// Overwrite the amplitude of basis state `index`
    pub fn set_amplitude(&mut self, index: usize, amplitude: Complex64) -> Result<()> {
        self.check_index(index)?;
        self.amplitudes[index] = amplitude;
        Ok(())
    }

    /// Probability |amplitude|^2 of measuring basis state `index`
    pub fn probability(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.amplitudes[index].norm_sqr())
    }

    /// Probabilities for all computational basis states
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes over all amplitudes
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// L2 norm of the state vector
    pub fn norm(&self) -> f64 {
        self.total_probability().sqrt()
    }

    /// Check if the total probability is within `epsilon` of 1
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.total_probability() - 1.0).abs() <= epsilon
    }

    /// Scale all amplitudes so that the norm equals 1
    ///
    /// A vector with (near) zero norm is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 1e-10 {
            let inv_norm = 1.0 / norm;
            for amplitude in &mut self.amplitudes {
                *amplitude *= inv_norm;
            }
        }
    }

    /// Bit-string label of basis state `index`
    pub fn bitstring(&self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(index_to_bitstring(index, self.num_qubits))
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &StateVector) -> Result<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }

        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Fidelity |⟨self|other⟩|^2 between two pure states
    pub fn fidelity(&self, other: &StateVector) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }
}

impl fmt::Debug for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateVector")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("total_probability", &self.total_probability())
            .finish()
    }
}
