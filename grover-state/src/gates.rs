//! Gate engine for the Grover gate set
//!
//! [`GateEngine`] validates qubit indices against the target state and then
//! dispatches to the kernels in [`crate::kernels`], choosing the parallel
//! variant once the register reaches the configured threshold.

use crate::error::{Result, StateError};
use crate::kernels;
use crate::state_vector::StateVector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registers at or above this size use the parallel kernels by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16;

/// A gate from the supported set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    /// Hadamard on one qubit
    Hadamard(usize),
    /// Pauli-X (NOT) on one qubit
    PauliX(usize),
    /// Sign flip of the index with every listed qubit set to 1
    ControlledPhaseFlip(Vec<usize>),
}

impl Gate {
    /// Short gate name as used in circuit listings
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Hadamard(_) => "H",
            Gate::PauliX(_) => "X",
            Gate::ControlledPhaseFlip(_) => "MCZ",
        }
    }

    /// Qubits the gate acts on
    pub fn qubits(&self) -> &[usize] {
        match self {
            Gate::Hadamard(q) | Gate::PauliX(q) => std::slice::from_ref(q),
            Gate::ControlledPhaseFlip(qubits) => qubits,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        let qubits = self.qubits();
        if !qubits.is_empty() {
            let list: Vec<String> = qubits.iter().map(|q| format!("q{}", q)).collect();
            write!(f, " {}", list.join(","))?;
        }
        Ok(())
    }
}

/// Applies gates to a [`StateVector`] in place
///
/// # Example
///
/// ```
/// use grover_state::{GateEngine, StateVector};
///
/// let engine = GateEngine::new();
/// let mut state = StateVector::basis(2, 0).unwrap();
///
/// engine.apply_hadamard(&mut state, 0).unwrap();
/// engine.apply_hadamard(&mut state, 1).unwrap();
/// assert!(state.is_normalized(1e-12));
/// assert!((state.probability(3).unwrap() - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateEngine {
    parallel_threshold: usize,
}

impl Default for GateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GateEngine {
    /// Create an engine with the default parallel threshold
    pub fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Use parallel kernels for registers of at least `threshold` qubits
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Get the parallel threshold
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    #[inline]
    fn is_parallel(&self, state: &StateVector) -> bool {
        state.num_qubits() >= self.parallel_threshold
    }

    fn check_qubit(state: &StateVector, qubit: usize) -> Result<()> {
        if qubit >= state.num_qubits() {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: state.num_qubits(),
            });
        }
        Ok(())
    }

    /// Apply a Hadamard gate to `qubit`
    ///
    /// # Errors
    /// Returns `InvalidQubitIndex` if `qubit >= num_qubits`
    pub fn apply_hadamard(&self, state: &mut StateVector, qubit: usize) -> Result<()> {
        Self::check_qubit(state, qubit)?;

        if self.is_parallel(state) {
            kernels::apply_hadamard_parallel(state.amplitudes_mut(), qubit);
        } else {
            kernels::apply_hadamard_scalar(state.amplitudes_mut(), qubit);
        }
        Ok(())
    }

    /// Apply a Pauli-X gate to `qubit`
    ///
    /// # Errors
    /// Returns `InvalidQubitIndex` if `qubit >= num_qubits`
    pub fn apply_pauli_x(&self, state: &mut StateVector, qubit: usize) -> Result<()> {
        Self::check_qubit(state, qubit)?;

        if self.is_parallel(state) {
            kernels::apply_pauli_x_parallel(state.amplitudes_mut(), qubit);
        } else {
            kernels::apply_pauli_x_scalar(state.amplitudes_mut(), qubit);
        }
        Ok(())
    }

    /// Negate the amplitude of every index with all `controls` bits set
    ///
    /// Passing every qubit of the register flips exactly one amplitude, the
    /// all-ones index. A single control acts as Pauli-Z on that qubit.
    ///
    /// # Errors
    /// Returns `InvalidQubitIndex` for an out-of-range control and
    /// `DuplicateQubit` if a control is listed twice
    pub fn apply_controlled_phase_flip(
        &self,
        state: &mut StateVector,
        controls: &[usize],
    ) -> Result<()> {
        for (position, &qubit) in controls.iter().enumerate() {
            Self::check_qubit(state, qubit)?;
            if controls[..position].contains(&qubit) {
                return Err(StateError::DuplicateQubit { index: qubit });
            }
        }

        let mask = kernels::control_mask(controls);
        if self.is_parallel(state) {
            kernels::apply_controlled_phase_flip_parallel(state.amplitudes_mut(), mask);
        } else {
            kernels::apply_controlled_phase_flip_scalar(state.amplitudes_mut(), mask);
        }
        Ok(())
    }

    /// Apply a single [`Gate`]
    pub fn apply(&self, state: &mut StateVector, gate: &Gate) -> Result<()> {
        match gate {
            Gate::Hadamard(qubit) => self.apply_hadamard(state, *qubit),
            Gate::PauliX(qubit) => self.apply_pauli_x(state, *qubit),
            Gate::ControlledPhaseFlip(controls) => {
                self.apply_controlled_phase_flip(state, controls)
            }
        }
    }

    /// Apply a gate sequence in order, stopping at the first error
    pub fn apply_all(&self, state: &mut StateVector, gates: &[Gate]) -> Result<()> {
        gates.iter().try_for_each(|gate| self.apply(state, gate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    const FRAC: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn ramp_state(num_qubits: usize) -> StateVector {
        let amplitudes: Vec<Complex64> = (0..1usize << num_qubits)
            .map(|i| Complex64::new(1.0 + i as f64, 0.5 * i as f64))
            .collect();
        let mut state = StateVector::from_amplitudes(num_qubits, &amplitudes).unwrap();
        state.normalize();
        state
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let engine = GateEngine::new();
        let mut state = StateVector::basis(3, 0).unwrap();
        for q in 0..3 {
            engine.apply_hadamard(&mut state, q).unwrap();
        }

        let uniform = StateVector::uniform(3).unwrap();
        assert_relative_eq!(state.fidelity(&uniform).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_x_flips_qubit() {
        let engine = GateEngine::new();
        let mut state = StateVector::basis(3, 0).unwrap();
        engine.apply_pauli_x(&mut state, 2).unwrap();
        assert_relative_eq!(state.probability(4).unwrap(), 1.0);
        engine.apply_pauli_x(&mut state, 0).unwrap();
        assert_relative_eq!(state.probability(5).unwrap(), 1.0);
        assert_eq!(state.bitstring(5).unwrap(), "101");
    }

    #[test]
    fn test_controlled_phase_flip_all_qubits() {
        let engine = GateEngine::new();
        let mut state = ramp_state(3);
        let original = state.clone();

        engine
            .apply_controlled_phase_flip(&mut state, &[0, 1, 2])
            .unwrap();

        for i in 0..7 {
            assert_eq!(state.amplitude(i).unwrap(), original.amplitude(i).unwrap());
        }
        assert_eq!(state.amplitude(7).unwrap(), -original.amplitude(7).unwrap());
    }

    #[test]
    fn test_controlled_phase_flip_single_qubit_is_z() {
        let engine = GateEngine::new();
        let mut state = StateVector::uniform(1).unwrap();
        engine.apply_controlled_phase_flip(&mut state, &[0]).unwrap();

        assert_relative_eq!(state.amplitude(0).unwrap().re, FRAC, epsilon = 1e-12);
        assert_relative_eq!(state.amplitude(1).unwrap().re, -FRAC, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_qubit() {
        let engine = GateEngine::new();
        let mut state = StateVector::uniform(2).unwrap();
        let expected = StateError::InvalidQubitIndex { index: 2, num_qubits: 2 };

        assert_eq!(engine.apply_hadamard(&mut state, 2).unwrap_err(), expected);
        assert_eq!(engine.apply_pauli_x(&mut state, 2).unwrap_err(), expected);
        assert_eq!(
            engine
                .apply_controlled_phase_flip(&mut state, &[0, 2])
                .unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_invalid_qubit_leaves_state_untouched() {
        let engine = GateEngine::new();
        let mut state = ramp_state(2);
        let original = state.clone();
        assert!(engine.apply_controlled_phase_flip(&mut state, &[1, 5]).is_err());
        assert_eq!(state, original);
    }

    #[test]
    fn test_duplicate_control() {
        let engine = GateEngine::new();
        let mut state = StateVector::uniform(3).unwrap();
        assert_eq!(
            engine
                .apply_controlled_phase_flip(&mut state, &[0, 1, 0])
                .unwrap_err(),
            StateError::DuplicateQubit { index: 0 }
        );
    }

    #[test]
    fn test_gates_preserve_norm() {
        let engine = GateEngine::new();
        let mut state = ramp_state(4);
        let gates = vec![
            Gate::Hadamard(0),
            Gate::PauliX(3),
            Gate::ControlledPhaseFlip(vec![0, 1, 2, 3]),
            Gate::Hadamard(2),
            Gate::PauliX(1),
            Gate::ControlledPhaseFlip(vec![1, 2]),
        ];

        for gate in &gates {
            engine.apply(&mut state, gate).unwrap();
            assert!(state.is_normalized(1e-12), "norm drift after {}", gate);
        }
    }

    #[test]
    fn test_parallel_engine_matches_scalar() {
        let scalar = GateEngine::new().with_parallel_threshold(usize::MAX);
        let parallel = GateEngine::new().with_parallel_threshold(1);
        let gates = vec![
            Gate::Hadamard(0),
            Gate::Hadamard(4),
            Gate::PauliX(2),
            Gate::ControlledPhaseFlip(vec![0, 1, 2, 3, 4]),
            Gate::Hadamard(3),
        ];

        let mut a = ramp_state(5);
        let mut b = a.clone();
        scalar.apply_all(&mut a, &gates).unwrap();
        parallel.apply_all(&mut b, &gates).unwrap();

        assert_relative_eq!(a.fidelity(&b).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_all_stops_at_first_error() {
        let engine = GateEngine::new();
        let mut state = StateVector::basis(2, 0).unwrap();
        let gates = vec![Gate::PauliX(0), Gate::PauliX(7), Gate::PauliX(1)];

        assert!(engine.apply_all(&mut state, &gates).is_err());
        // First gate ran, third did not
        assert_relative_eq!(state.probability(1).unwrap(), 1.0);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(Gate::Hadamard(1).to_string(), "H q1");
        assert_eq!(Gate::PauliX(0).to_string(), "X q0");
        assert_eq!(
            Gate::ControlledPhaseFlip(vec![0, 1, 2]).to_string(),
            "MCZ q0,q1,q2"
        );
    }
}
