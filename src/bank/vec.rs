//! Split-complex struct-of-arrays bank driven by the batched vecops paths.
//!
//! Every complex quantity is one Vec<f32> of length 2N: [0, N) holds the
//! real/cos half, [N, 2N) the imaginary/sin half. Per-resonator factors are
//! duplicated into both halves so a single batched op covers the pair.

use std::f32::consts::TAU;

use tracing::debug;

use crate::ResonatorError;
use crate::vecops;

/// Same update semantics as [`ResonatorBank`](super::ResonatorBank), held
/// as flat arrays.
#[derive(Debug, Clone)]
pub struct ResonatorBankVec {
    sample_rate: f32,
    n: usize,
    frequencies: Vec<f32>,
    // All remaining vectors are length 2n.
    alphas: Vec<f32>,
    om_alphas: Vec<f32>,
    betas: Vec<f32>,
    om_betas: Vec<f32>,
    /// Fast accumulator (c | s).
    r: Vec<f32>,
    /// Smoothed accumulator (cc | ss).
    rr: Vec<f32>,
    /// Phase table (cos | sin), kept near unit magnitude by `stabilize`.
    z: Vec<f32>,
    /// Rotation table (cos w | sin w).
    w: Vec<f32>,
    // Scratch: alphas * sample, and per-resonator magnitude corrections.
    alphas_sample: Vec<f32>,
    mags: Vec<f32>,
}

impl ResonatorBankVec {
    /// Build the split arrays; same validation as the scalar bank.
    pub fn new(
        frequencies: &[f32],
        alphas: &[f32],
        betas: &[f32],
        sample_rate: f32,
    ) -> Result<Self, ResonatorError> {
        let n = super::validate_build(frequencies, alphas, betas)?;
        let two_n = 2 * n;

        let mut alphas_2n = vec![0.0; two_n];
        alphas_2n[..n].copy_from_slice(alphas);
        alphas_2n[n..].copy_from_slice(alphas);
        let om_alphas: Vec<f32> = alphas_2n.iter().map(|&a| 1.0 - a).collect();

        let mut betas_2n = vec![0.0; two_n];
        betas_2n[..n].copy_from_slice(betas);
        betas_2n[n..].copy_from_slice(betas);
        let om_betas: Vec<f32> = betas_2n.iter().map(|&b| 1.0 - b).collect();

        // Rotation table from the batched setup ops; the scalar phasor
        // computes the same f*(TAU/fs) expression.
        let mut angles = vec![0.0; n];
        vecops::scale(frequencies, TAU / sample_rate, &mut angles);
        let mut w = vec![0.0; two_n];
        {
            let (w_re, w_im) = w.split_at_mut(n);
            vecops::cos(&angles, w_re);
            vecops::sin(&angles, w_im);
        }

        let mut z = vec![0.0; two_n];
        vecops::fill(&mut z[..n], 1.0);

        debug!("split-complex bank ready: {n} resonators at {sample_rate} Hz");
        Ok(Self {
            sample_rate,
            n,
            frequencies: frequencies.to_vec(),
            alphas: alphas_2n,
            om_alphas,
            betas: betas_2n,
            om_betas,
            r: vec![0.0; two_n],
            rr: vec![0.0; two_n],
            z,
            w,
            alphas_sample: vec![0.0; two_n],
            mags: vec![0.0; n],
        })
    }

    /// Number of resonators.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn check_index(&self, index: usize) -> Result<(), ResonatorError> {
        if index >= self.n {
            return Err(ResonatorError::IndexOutOfBounds {
                index,
                len: self.n,
            });
        }
        Ok(())
    }

    fn check_dest(&self, provided: usize) -> Result<(), ResonatorError> {
        if provided < self.n {
            return Err(ResonatorError::BufferTooSmall {
                required: self.n,
                provided,
            });
        }
        Ok(())
    }

    /// Tuned frequency of resonator `index`, Hz.
    pub fn frequency_value(&self, index: usize) -> Result<f32, ResonatorError> {
        self.check_index(index)?;
        Ok(self.frequencies[index])
    }

    /// Fast smoothing factor of resonator `index`.
    pub fn alpha_value(&self, index: usize) -> Result<f32, ResonatorError> {
        self.check_index(index)?;
        Ok(self.alphas[index])
    }

    /// Slow smoothing factor of resonator `index`.
    pub fn beta_value(&self, index: usize) -> Result<f32, ResonatorError> {
        self.check_index(index)?;
        Ok(self.betas[index])
    }

    /// Fast-stage time constant of resonator `index` in seconds, zero when
    /// its alpha is zero.
    pub fn time_constant_value(&self, index: usize) -> Result<f32, ResonatorError> {
        self.check_index(index)?;
        let alpha = self.alphas[index];
        if alpha > 0.0 {
            Ok(1.0 / (self.sample_rate * alpha))
        } else {
            Ok(0.0)
        }
    }

    /// Smoothed power of resonator `index`.
    pub fn power_value(&self, index: usize) -> Result<f32, ResonatorError> {
        self.check_index(index)?;
        let re = self.rr[index];
        let im = self.rr[self.n + index];
        Ok(re * re + im * im)
    }

    /// Smoothed amplitude of resonator `index`.
    pub fn amplitude_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.power_value(index)?.sqrt())
    }

    /// Batched power read into dest[0..len()]; surplus elements are left
    /// untouched.
    pub fn get_powers(&self, dest: &mut [f32]) -> Result<(), ResonatorError> {
        self.check_dest(dest.len())?;
        let (rr_re, rr_im) = self.rr.split_at(self.n);
        vecops::magnitude_squared(rr_re, rr_im, &mut dest[..self.n]);
        Ok(())
    }

    /// Batched amplitude read: powers, then an in-place square root.
    pub fn get_amplitudes(&self, dest: &mut [f32]) -> Result<(), ResonatorError> {
        self.get_powers(dest)?;
        vecops::sqrt_in_place(&mut dest[..self.n]);
        Ok(())
    }

    /// Give every resonator the same fast smoothing factor; both halves of
    /// the factor tables are refilled. Validated before anything mutates.
    pub fn set_all_alphas(&mut self, alpha: f32) -> Result<(), ResonatorError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ResonatorError::AlphaOutOfRange);
        }
        vecops::fill(&mut self.alphas, alpha);
        vecops::fill(&mut self.om_alphas, 1.0 - alpha);
        Ok(())
    }

    /// Zero the accumulators and rewind every phase to (1, 0).
    pub fn reset_state(&mut self) {
        vecops::fill(&mut self.r, 0.0);
        vecops::fill(&mut self.rr, 0.0);
        vecops::fill(&mut self.z[..self.n], 1.0);
        vecops::fill(&mut self.z[self.n..], 0.0);
    }

    /// Advance every resonator by one sample with four batched stages.
    pub fn process_sample(&mut self, sample: f32) {
        vecops::scale(&self.alphas, sample, &mut self.alphas_sample);
        vecops::mul_mul_add(&mut self.r, &self.om_alphas, &self.alphas_sample, &self.z);
        vecops::mul_mul_add(&mut self.rr, &self.om_betas, &self.betas, &self.r);
        let (z_re, z_im) = self.z.split_at_mut(self.n);
        let (w_re, w_im) = self.w.split_at(self.n);
        vecops::complex_multiply_in_place(z_re, z_im, w_re, w_im);
    }

    /// Feed a whole block, stabilizing the phase table once at the end.
    pub fn process_block(&mut self, samples: &[f32]) {
        for &x in samples {
            self.process_sample(x);
        }
        self.stabilize();
    }

    /// Feed every `stride`-th sample of an interleaved frame.
    pub fn process_frame(&mut self, frame: &[f32], stride: usize) {
        assert!(stride > 0);
        for &x in frame.iter().step_by(stride) {
            self.process_sample(x);
        }
        self.stabilize();
    }

    /// Frame update plus both bulk reads in one call; the destinations are
    /// checked before any sample is processed.
    pub fn process_frame_into(
        &mut self,
        frame: &[f32],
        stride: usize,
        powers: &mut [f32],
        amplitudes: &mut [f32],
    ) -> Result<(), ResonatorError> {
        self.check_dest(powers.len())?;
        self.check_dest(amplitudes.len())?;
        self.process_frame(frame, stride);
        self.get_powers(powers)?;
        self.get_amplitudes(amplitudes)?;
        Ok(())
    }

    /// Pull every phase back to unit magnitude: batched magnitude-squared,
    /// reciprocal square root, and complex-by-real multiply. The correction
    /// only holds near |Z| = 1, so frame updates run it every call.
    pub fn stabilize(&mut self) {
        let (z_re, z_im) = self.z.split_at_mut(self.n);
        vecops::magnitude_squared(z_re, z_im, &mut self.mags);
        vecops::rsqrt_in_place(&mut self.mags);
        vecops::complex_scale_in_place(z_re, z_im, &self.mags);
    }
}
