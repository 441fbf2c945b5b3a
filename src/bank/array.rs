//! Object-per-frequency bank with sequential and parallel frame updates.

use rayon::prelude::*;
use tracing::debug;

use crate::ResonatorError;
use crate::resonator::Resonator;

/// Number of congruence classes the parallel frame update splits a bank
/// into: task k visits resonators k, k+TASK_STRIDE, k+2*TASK_STRIDE, ...
pub const TASK_STRIDE: usize = 8;

/// Bank of independent resonators fed the same input stream.
#[derive(Debug, Clone)]
pub struct ResonatorBank {
    sample_rate: f32,
    resonators: Vec<Resonator>,
}

impl ResonatorBank {
    /// One resonator per frequency. Slice lengths must match and every
    /// smoothing factor must sit in [0, 1]; nothing is built otherwise.
    pub fn new(
        frequencies: &[f32],
        alphas: &[f32],
        betas: &[f32],
        sample_rate: f32,
    ) -> Result<Self, ResonatorError> {
        let n = super::validate_build(frequencies, alphas, betas)?;
        let mut resonators = Vec::with_capacity(n);
        for i in 0..n {
            resonators.push(Resonator::with_beta(
                frequencies[i],
                alphas[i],
                betas[i],
                sample_rate,
            )?);
        }
        debug!("resonator bank ready: {n} resonators at {sample_rate} Hz");
        Ok(Self {
            sample_rate,
            resonators,
        })
    }

    /// Number of resonators.
    pub fn len(&self) -> usize {
        self.resonators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resonators.is_empty()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn get(&self, index: usize) -> Result<&Resonator, ResonatorError> {
        self.resonators
            .get(index)
            .ok_or(ResonatorError::IndexOutOfBounds {
                index,
                len: self.resonators.len(),
            })
    }

    /// Tuned frequency of resonator `index`, Hz.
    pub fn frequency_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.frequency())
    }

    /// Fast smoothing factor of resonator `index`.
    pub fn alpha_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.alpha())
    }

    /// Slow smoothing factor of resonator `index`.
    pub fn beta_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.beta())
    }

    /// Fast-stage time constant of resonator `index`, seconds.
    pub fn time_constant_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.time_constant())
    }

    /// Smoothed power of resonator `index`.
    pub fn power_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.power())
    }

    /// Smoothed amplitude of resonator `index`.
    pub fn amplitude_value(&self, index: usize) -> Result<f32, ResonatorError> {
        Ok(self.get(index)?.amplitude())
    }

    fn check_dest(&self, provided: usize) -> Result<(), ResonatorError> {
        if provided < self.resonators.len() {
            return Err(ResonatorError::BufferTooSmall {
                required: self.resonators.len(),
                provided,
            });
        }
        Ok(())
    }

    /// Copy every power into dest[0..len()]; surplus elements are left
    /// untouched.
    pub fn get_powers(&self, dest: &mut [f32]) -> Result<(), ResonatorError> {
        self.check_dest(dest.len())?;
        for (d, r) in dest.iter_mut().zip(&self.resonators) {
            *d = r.power();
        }
        Ok(())
    }

    /// Copy every amplitude into dest[0..len()]; surplus elements are left
    /// untouched.
    pub fn get_amplitudes(&self, dest: &mut [f32]) -> Result<(), ResonatorError> {
        self.check_dest(dest.len())?;
        for (d, r) in dest.iter_mut().zip(&self.resonators) {
            *d = r.amplitude();
        }
        Ok(())
    }

    /// Give every resonator the same fast smoothing factor; validated before
    /// anything mutates.
    pub fn set_all_alphas(&mut self, alpha: f32) -> Result<(), ResonatorError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ResonatorError::AlphaOutOfRange);
        }
        for r in &mut self.resonators {
            r.set_alpha(alpha)?;
        }
        Ok(())
    }

    /// Zero every resonator's accumulators and phase; tuning stays put.
    pub fn reset_state(&mut self) {
        for r in &mut self.resonators {
            r.reset_state();
        }
    }

    /// Advance every resonator by one sample, in index order.
    pub fn process_sample(&mut self, sample: f32) {
        for r in &mut self.resonators {
            r.process_sample(sample);
        }
    }

    /// Feed a whole block through every resonator, in index order.
    pub fn process_block(&mut self, samples: &[f32]) {
        for r in &mut self.resonators {
            r.process_block(samples);
        }
    }

    /// Feed every `stride`-th sample of an interleaved frame through every
    /// resonator, in index order.
    pub fn process_frame(&mut self, frame: &[f32], stride: usize) {
        for r in &mut self.resonators {
            r.process_frame(frame, stride);
        }
    }

    /// `process_frame` split across up to [`TASK_STRIDE`] congruence
    /// classes; returns once every class has finished. Resonator states are
    /// disjoint, so the result matches the sequential path within
    /// floating-point op-order tolerance. A panic in any class propagates to
    /// the caller.
    pub fn process_frame_concurrent(&mut self, frame: &[f32], stride: usize) {
        let mut classes: Vec<Vec<&mut Resonator>> = Vec::with_capacity(TASK_STRIDE);
        for _ in 0..TASK_STRIDE {
            classes.push(Vec::new());
        }
        for (i, r) in self.resonators.iter_mut().enumerate() {
            classes[i % TASK_STRIDE].push(r);
        }
        classes.into_par_iter().for_each(|class| {
            for r in class {
                r.process_frame(frame, stride);
            }
        });
    }
}
