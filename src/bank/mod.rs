//! Resonator banks over a shared sample stream (Hz, sec).
//!
//! [`ResonatorBank`] holds one [`Resonator`](crate::resonator::Resonator)
//! per tracked frequency and offers sequential and parallel frame updates.
//! [`ResonatorBankVec`] carries the same recurrence as split-complex flat
//! arrays for the batched [`vecops`](crate::vecops) paths. Given identical
//! construction and input the two report the same powers and amplitudes up
//! to floating-point op-order effects.

mod array;
mod vec;

pub use array::{ResonatorBank, TASK_STRIDE};
pub use vec::ResonatorBankVec;

use crate::ResonatorError;

// Shared construction validation: nothing may be built from bad inputs.
fn validate_build(
    frequencies: &[f32],
    alphas: &[f32],
    betas: &[f32],
) -> Result<usize, ResonatorError> {
    if frequencies.len() != alphas.len() || frequencies.len() != betas.len() {
        return Err(ResonatorError::MismatchedLengths {
            frequencies: frequencies.len(),
            alphas: alphas.len(),
            betas: betas.len(),
        });
    }
    for &alpha in alphas {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ResonatorError::AlphaOutOfRange);
        }
    }
    for &beta in betas {
        if !(0.0..=1.0).contains(&beta) {
            return Err(ResonatorError::BetaOutOfRange);
        }
    }
    Ok(frequencies.len())
}
