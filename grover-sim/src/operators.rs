//! Oracle and diffuser operators composed from the elementary gate set
//!
//! Both operators precompute their gate sequence once and replay it through a
//! [`GateEngine`] on every iteration.

use crate::error::{GroverError, Result};
use grover_state::{index_to_bitstring, Gate, GateEngine, StateVector, MAX_QUBITS};

/// A reusable unitary built from a fixed gate sequence
pub trait Operator {
    /// Operator name used in logs and errors
    fn name(&self) -> &'static str;

    /// Register size the operator was built for
    fn num_qubits(&self) -> usize;

    /// Gate sequence in application order
    fn gates(&self) -> &[Gate];

    /// Apply the operator to `state` in place
    ///
    /// # Errors
    /// Returns `InvalidDimension` if the state register size differs from the
    /// operator's, or any error raised by the gate engine
    fn apply(&self, engine: &GateEngine, state: &mut StateVector) -> Result<()> {
        if state.num_qubits() != self.num_qubits() {
            return Err(GroverError::InvalidDimension(format!(
                "{} built for {} qubits, state has {}",
                self.name(),
                self.num_qubits(),
                state.num_qubits()
            )));
        }

        engine.apply_all(state, self.gates())?;
        Ok(())
    }
}

fn check_register(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(GroverError::InvalidDimension(format!(
            "num_qubits must be in 1..={}, got {}",
            MAX_QUBITS, num_qubits
        )));
    }
    Ok(())
}

/// Phase oracle marking a single basis state
///
/// Conjugating a phase flip on the all-ones index with Pauli-X on every qubit
/// whose target bit is 0 moves the mark onto `target`:
///
/// ```text
/// X(zero bits) · MCZ(all qubits) · X(zero bits)
/// ```
///
/// For a 1-qubit register the phase flip has a single control and acts as
/// Pauli-Z, so no special case is needed.
///
/// # Example
///
/// ```
/// use grover_sim::{Operator, Oracle};
/// use grover_state::{GateEngine, StateVector};
///
/// let oracle = Oracle::new(3, 5).unwrap();
/// let mut state = StateVector::uniform(3).unwrap();
/// let before = state.clone();
///
/// oracle.apply(&GateEngine::new(), &mut state).unwrap();
/// assert_eq!(state.amplitude(5).unwrap(), -before.amplitude(5).unwrap());
/// assert_eq!(state.amplitude(4).unwrap(), before.amplitude(4).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oracle {
    num_qubits: usize,
    target: usize,
    gates: Vec<Gate>,
}

impl Oracle {
    /// Build the oracle for `target` on an `num_qubits` register
    ///
    /// # Errors
    /// Returns `InvalidDimension` for an empty or oversized register and
    /// `InvalidTarget` if `target >= 2^num_qubits`
    pub fn new(num_qubits: usize, target: usize) -> Result<Self> {
        check_register(num_qubits)?;

        let dimension = 1usize << num_qubits;
        if target >= dimension {
            return Err(GroverError::InvalidTarget { target, dimension });
        }

        let flips: Vec<Gate> = (0..num_qubits)
            .filter(|q| (target >> q) & 1 == 0)
            .map(Gate::PauliX)
            .collect();

        let mut gates = Vec::with_capacity(2 * flips.len() + 1);
        gates.extend(flips.iter().cloned());
        gates.push(Gate::ControlledPhaseFlip((0..num_qubits).collect()));
        gates.extend(flips);

        Ok(Self {
            num_qubits,
            target,
            gates,
        })
    }

    /// Marked basis-state index
    pub fn target(&self) -> usize {
        self.target
    }

    /// Marked basis state as a bit-string
    pub fn target_bitstring(&self) -> String {
        index_to_bitstring(self.target, self.num_qubits)
    }
}

impl Operator for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

/// Inversion-about-the-mean operator
///
/// ```text
/// H(all) · X(all) · MCZ(all) · X(all) · H(all)
/// ```
///
/// The sequence equals `I - 2|s⟩⟨s|` with `|s⟩` the uniform superposition, so
/// each amplitude maps to `a - 2·mean`. This is the textbook reflection
/// `2|s⟩⟨s| - I` up to a global phase of -1, which no measurement can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diffuser {
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl Diffuser {
    /// Build the diffuser for an `num_qubits` register
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_register(num_qubits)?;

        let hadamards = (0..num_qubits).map(Gate::Hadamard);
        let flips = (0..num_qubits).map(Gate::PauliX);

        let gates = hadamards
            .clone()
            .chain(flips.clone())
            .chain(std::iter::once(Gate::ControlledPhaseFlip(
                (0..num_qubits).collect(),
            )))
            .chain(flips)
            .chain(hadamards)
            .collect();

        Ok(Self { num_qubits, gates })
    }
}

impl Operator for Diffuser {
    fn name(&self) -> &'static str {
        "diffuser"
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn ramp_state(num_qubits: usize) -> StateVector {
        let amplitudes: Vec<Complex64> = (0..1usize << num_qubits)
            .map(|i| Complex64::new(0.3 + i as f64, 0.2 * i as f64 - 0.7))
            .collect();
        let mut state = StateVector::from_amplitudes(num_qubits, &amplitudes).unwrap();
        state.normalize();
        state
    }

    #[test]
    fn test_oracle_gate_sequence() {
        // 5 = 101, only qubit 1 is zero
        let oracle = Oracle::new(3, 5).unwrap();
        assert_eq!(
            oracle.gates(),
            &[
                Gate::PauliX(1),
                Gate::ControlledPhaseFlip(vec![0, 1, 2]),
                Gate::PauliX(1),
            ]
        );
        assert_eq!(oracle.target_bitstring(), "101");
    }

    #[test]
    fn test_oracle_flips_only_target() {
        let engine = GateEngine::new();
        for num_qubits in 1..=5 {
            for target in 0..1usize << num_qubits {
                let oracle = Oracle::new(num_qubits, target).unwrap();
                let original = ramp_state(num_qubits);
                let mut state = original.clone();

                oracle.apply(&engine, &mut state).unwrap();

                for i in 0..state.dimension() {
                    let expected = if i == target {
                        -original.amplitude(i).unwrap()
                    } else {
                        original.amplitude(i).unwrap()
                    };
                    assert_eq!(
                        state.amplitude(i).unwrap(),
                        expected,
                        "n={} target={} index={}",
                        num_qubits,
                        target,
                        i
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_qubit_oracle() {
        let engine = GateEngine::new();
        for target in 0..2 {
            let oracle = Oracle::new(1, target).unwrap();
            let mut state = StateVector::uniform(1).unwrap();
            oracle.apply(&engine, &mut state).unwrap();

            assert!(state.amplitude(target).unwrap().re < 0.0);
            assert!(state.amplitude(1 - target).unwrap().re > 0.0);
        }
    }

    #[test]
    fn test_oracle_invalid_target() {
        assert_eq!(
            Oracle::new(3, 8).unwrap_err(),
            GroverError::InvalidTarget {
                target: 8,
                dimension: 8
            }
        );
    }

    #[test]
    fn test_invalid_register() {
        assert!(matches!(
            Oracle::new(0, 0),
            Err(GroverError::InvalidDimension(_))
        ));
        assert!(matches!(
            Diffuser::new(0),
            Err(GroverError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_operator_rejects_mismatched_state() {
        let diffuser = Diffuser::new(3).unwrap();
        let mut state = StateVector::uniform(2).unwrap();
        assert!(matches!(
            diffuser.apply(&GateEngine::new(), &mut state),
            Err(GroverError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_diffuser_inverts_about_mean() {
        let engine = GateEngine::new();
        let diffuser = Diffuser::new(3).unwrap();
        let original = ramp_state(3);
        let mean: Complex64 =
            original.amplitudes().iter().sum::<Complex64>() / original.dimension() as f64;

        let mut state = original.clone();
        diffuser.apply(&engine, &mut state).unwrap();

        for (after, before) in state.amplitudes().iter().zip(original.amplitudes()) {
            let expected = before - mean * 2.0;
            assert_relative_eq!(after.re, expected.re, epsilon = 1e-12);
            assert_relative_eq!(after.im, expected.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_diffuser_twice_is_identity() {
        let engine = GateEngine::new();
        for num_qubits in 1..=6 {
            let diffuser = Diffuser::new(num_qubits).unwrap();
            let original = ramp_state(num_qubits);
            let mut state = original.clone();

            diffuser.apply(&engine, &mut state).unwrap();
            diffuser.apply(&engine, &mut state).unwrap();

            for (after, before) in state.amplitudes().iter().zip(original.amplitudes()) {
                assert_relative_eq!(after.re, before.re, epsilon = 1e-10);
                assert_relative_eq!(after.im, before.im, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_diffuser_fixes_uniform_state_up_to_phase() {
        let engine = GateEngine::new();
        let diffuser = Diffuser::new(4).unwrap();
        let mut state = StateVector::uniform(4).unwrap();
        diffuser.apply(&engine, &mut state).unwrap();

        let uniform = StateVector::uniform(4).unwrap();
        assert_relative_eq!(state.fidelity(&uniform).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diffuser_gate_count() {
        let diffuser = Diffuser::new(4).unwrap();
        assert_eq!(diffuser.gates().len(), 4 * 4 + 1);
        assert_eq!(diffuser.gates()[8], Gate::ControlledPhaseFlip(vec![0, 1, 2, 3]));
    }
}
