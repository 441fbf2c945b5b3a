//! Streaming multi-frequency resonance tracking (Hz, sec).
//!
//! Each tracked frequency projects the input onto a rotating unit phasor
//! (advanced by complex multiplication, never by per-sample trig) and
//! smooths the projection with two cascaded one-pole stages. Banks come in
//! an object-per-frequency form with sequential and parallel frame updates
//! ([`bank::ResonatorBank`]) and a split-complex struct-of-arrays form
//! driven by the batched [`vecops`] primitives ([`bank::ResonatorBankVec`]).

pub mod bank;
pub mod dynamics;
pub mod frequencies;
pub mod phase;
pub mod phasor;
pub mod resonator;
pub mod vecops;

/// Errors returned by resonator and bank construction, tuning, and accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResonatorError {
    /// Fast smoothing factor is outside [0, 1].
    AlphaOutOfRange,
    /// Slow smoothing factor is outside [0, 1].
    BetaOutOfRange,
    /// Indexed accessor past the end of the bank.
    IndexOutOfBounds { index: usize, len: usize },
    /// Bulk destination slice shorter than the bank.
    BufferTooSmall { required: usize, provided: usize },
    /// Construction slices disagree in length.
    MismatchedLengths {
        frequencies: usize,
        alphas: usize,
        betas: usize,
    },
}
