//! In-place amplitude kernels for the Grover gate set
//!
//! Every kernel works on a raw amplitude slice of length 2^n and assumes the
//! qubit indices were validated by the caller. The `_parallel` variants split
//! the slice into independent blocks with rayon and produce results identical
//! to the scalar reference.

use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::FRAC_1_SQRT_2;

/// Apply a Hadamard gate using scalar operations
///
/// # Algorithm
/// For a gate on qubit `q`:
/// - Visit only indices `i` whose bit `q` is 0, pair each with `j = i | 2^q`
/// - Replace `(a0, a1)` with `((a0 + a1)/√2, (a0 - a1)/√2)`
/// - Each pair is touched exactly once, O(2^n) total
pub fn apply_hadamard_scalar(state: &mut [Complex64], qubit: usize) {
    let qubit_mask = 1usize << qubit;

    for i in 0..state.len() {
        // Skip the "high" half of each pair
        if i & qubit_mask != 0 {
            continue;
        }

        let j = i | qubit_mask;
        let amp0 = state[i];
        let amp1 = state[j];

        state[i] = (amp0 + amp1) * FRAC_1_SQRT_2;
        state[j] = (amp0 - amp1) * FRAC_1_SQRT_2;
    }
}

/// Apply a Hadamard gate over independent blocks in parallel
///
/// Blocks of length `2^(q+1)` hold the bit-0 half followed by the bit-1
/// half, so pairs never cross a block boundary.
pub fn apply_hadamard_parallel(state: &mut [Complex64], qubit: usize) {
    let stride = 1usize << qubit;

    state.par_chunks_mut(stride << 1).for_each(|block| {
        let (low, high) = block.split_at_mut(stride);
        low.par_iter_mut()
            .zip(high.par_iter_mut())
            .for_each(|(a0, a1)| {
                let (amp0, amp1) = (*a0, *a1);
                *a0 = (amp0 + amp1) * FRAC_1_SQRT_2;
                *a1 = (amp0 - amp1) * FRAC_1_SQRT_2;
            });
    });
}

/// Apply a Pauli-X gate by swapping amplitude pairs
pub fn apply_pauli_x_scalar(state: &mut [Complex64], qubit: usize) {
    let qubit_mask = 1usize << qubit;

    for i in 0..state.len() {
        if i & qubit_mask == 0 {
            state.swap(i, i | qubit_mask);
        }
    }
}

/// Apply a Pauli-X gate over independent blocks in parallel
pub fn apply_pauli_x_parallel(state: &mut [Complex64], qubit: usize) {
    let stride = 1usize << qubit;

    state.par_chunks_mut(stride << 1).for_each(|block| {
        let (low, high) = block.split_at_mut(stride);
        low.par_iter_mut()
            .zip(high.par_iter_mut())
            .for_each(|(a0, a1)| std::mem::swap(a0, a1));
    });
}

/// Bit mask with one bit set per control qubit
#[inline]
pub fn control_mask(controls: &[usize]) -> usize {
    controls.iter().fold(0usize, |mask, &q| mask | (1usize << q))
}

/// Negate every amplitude whose index has all bits of `mask` set
///
/// With the mask covering every qubit of the register exactly one amplitude
/// (the all-ones index) changes sign. This is the net effect of a
/// multi-controlled X sandwiched between Hadamards on the target qubit.
pub fn apply_controlled_phase_flip_scalar(state: &mut [Complex64], mask: usize) {
    for (i, amp) in state.iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

/// Parallel variant of [`apply_controlled_phase_flip_scalar`]
pub fn apply_controlled_phase_flip_parallel(state: &mut [Complex64], mask: usize) {
    state
        .par_iter_mut()
        .enumerate()
        .filter(|(i, _)| i & mask == mask)
        .for_each(|(_, amp)| *amp = -*amp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(dimension: usize) -> Vec<Complex64> {
        (0..dimension)
            .map(|i| Complex64::new(i as f64 * 0.1, 1.0 - i as f64 * 0.05))
            .collect()
    }

    fn assert_slices_eq(a: &[Complex64], b: &[Complex64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-12);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hadamard_on_zero() {
        let mut state = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        apply_hadamard_scalar(&mut state, 0);
        assert_relative_eq!(state[0].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state[1].re, FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_hadamard_pairs_visited_once() {
        // H·H = I only holds if each pair is updated exactly once per sweep
        let original = ramp(8);
        for qubit in 0..3 {
            let mut state = original.clone();
            apply_hadamard_scalar(&mut state, qubit);
            apply_hadamard_scalar(&mut state, qubit);
            assert_slices_eq(&state, &original);
        }
    }

    #[test]
    fn test_pauli_x_swaps_pairs() {
        let mut state = ramp(4);
        let original = state.clone();
        apply_pauli_x_scalar(&mut state, 1);
        assert_eq!(state[0], original[2]);
        assert_eq!(state[1], original[3]);
        assert_eq!(state[2], original[0]);
        assert_eq!(state[3], original[1]);
    }

    #[test]
    fn test_controlled_phase_flip_single_index() {
        let mut state = ramp(8);
        let original = state.clone();
        apply_controlled_phase_flip_scalar(&mut state, control_mask(&[0, 1, 2]));

        for i in 0..7 {
            assert_eq!(state[i], original[i]);
        }
        assert_eq!(state[7], -original[7]);
    }

    #[test]
    fn test_controlled_phase_flip_partial_mask() {
        let mut state = ramp(8);
        let original = state.clone();
        apply_controlled_phase_flip_scalar(&mut state, control_mask(&[0, 2]));

        for i in 0..8 {
            if i == 5 || i == 7 {
                assert_eq!(state[i], -original[i]);
            } else {
                assert_eq!(state[i], original[i]);
            }
        }
    }

    #[test]
    fn test_parallel_matches_scalar() {
        let original = ramp(64);
        for qubit in 0..6 {
            let mut scalar = original.clone();
            let mut parallel = original.clone();
            apply_hadamard_scalar(&mut scalar, qubit);
            apply_hadamard_parallel(&mut parallel, qubit);
            assert_slices_eq(&scalar, &parallel);

            apply_pauli_x_scalar(&mut scalar, qubit);
            apply_pauli_x_parallel(&mut parallel, qubit);
            assert_slices_eq(&scalar, &parallel);
        }

        let mut scalar = original.clone();
        let mut parallel = original;
        let mask = control_mask(&[1, 3, 4]);
        apply_controlled_phase_flip_scalar(&mut scalar, mask);
        apply_controlled_phase_flip_parallel(&mut parallel, mask);
        assert_slices_eq(&scalar, &parallel);
    }
}
