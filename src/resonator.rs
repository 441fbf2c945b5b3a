//! Single-frequency resonant projection (Hz, sec).
//! c <- (1-a)*c + a*u*Zc, s <- (1-a)*s + a*u*Zs, then the slow stage
//! cc <- (1-b)*cc + b*c, ss <- (1-b)*ss + b*s. Power is cc^2 + ss^2.

use std::f32::consts::TAU;

use crate::ResonatorError;
use crate::phase::wrap_angle_diff;
use crate::phasor::Phasor;
use crate::vecops::mul_add_fast;

/// Controls the drift-based frequency estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingParams {
    /// Amplitudes at or below this floor reset the estimate to the tuned
    /// frequency instead of trusting the measured drift.
    pub amplitude_floor: f32,
    /// Per-sample blend rate toward the instantaneous estimate; the frame
    /// gain is clamp(response * visited, 0, 1). 1.0 assigns the estimate
    /// directly, alpha-sized values smooth it the way the fast stage does.
    pub response: f32,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            amplitude_floor: 1.0e-3,
            response: 1.0,
        }
    }
}

/// One tracked frequency: a phasor projection with two one-pole stages.
#[derive(Debug, Clone, Copy)]
pub struct Resonator {
    phasor: Phasor,
    alpha: f32,
    om_alpha: f32,
    beta: f32,
    om_beta: f32,
    c: f32,
    s: f32,
    cc: f32,
    ss: f32,
    power: f32,
    amplitude: f32,
    phase: f32,
    tracked_frequency: f32,
    tracking: TrackingParams,
}

impl Resonator {
    /// Resonator with the slow stage matching the fast one (beta = alpha).
    pub fn new(frequency: f32, alpha: f32, sample_rate: f32) -> Result<Self, ResonatorError> {
        Self::with_beta(frequency, alpha, alpha, sample_rate)
    }

    /// Resonator with separate fast (alpha) and slow (beta) smoothing
    /// factors, both in [0, 1].
    pub fn with_beta(
        frequency: f32,
        alpha: f32,
        beta: f32,
        sample_rate: f32,
    ) -> Result<Self, ResonatorError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ResonatorError::AlphaOutOfRange);
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(ResonatorError::BetaOutOfRange);
        }
        Ok(Self {
            phasor: Phasor::new(frequency, sample_rate),
            alpha,
            om_alpha: 1.0 - alpha,
            beta,
            om_beta: 1.0 - beta,
            c: 0.0,
            s: 0.0,
            cc: 0.0,
            ss: 0.0,
            power: 0.0,
            amplitude: 0.0,
            phase: 0.0,
            tracked_frequency: frequency,
            tracking: TrackingParams::default(),
        })
    }

    /// Tuned frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phasor.frequency()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.phasor.sample_rate()
    }

    /// Fast smoothing factor.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Slow smoothing factor.
    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Smoothed power, cc^2 + ss^2.
    pub fn power(&self) -> f32 {
        self.power
    }

    /// Smoothed amplitude, sqrt(power).
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Last measured angle of the smoothed accumulators, radians.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Latest drift-corrected frequency estimate in Hz.
    pub fn tracked_frequency(&self) -> f32 {
        self.tracked_frequency
    }

    /// Fast-stage time constant in seconds, zero when alpha is zero.
    pub fn time_constant(&self) -> f32 {
        if self.alpha > 0.0 {
            1.0 / (self.sample_rate() * self.alpha)
        } else {
            0.0
        }
    }

    /// Tracking parameters.
    pub fn tracking(&self) -> TrackingParams {
        self.tracking
    }

    pub fn set_tracking(&mut self, params: TrackingParams) {
        self.tracking = params;
    }

    /// Set the fast smoothing factor; rejects values outside [0, 1] and
    /// leaves the previous factor live on rejection.
    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), ResonatorError> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ResonatorError::AlphaOutOfRange);
        }
        self.alpha = alpha;
        self.om_alpha = 1.0 - alpha;
        Ok(())
    }

    /// Set the slow smoothing factor; same contract as `set_alpha`.
    pub fn set_beta(&mut self, beta: f32) -> Result<(), ResonatorError> {
        if !(0.0..=1.0).contains(&beta) {
            return Err(ResonatorError::BetaOutOfRange);
        }
        self.beta = beta;
        self.om_beta = 1.0 - beta;
        Ok(())
    }

    /// Zero the accumulators and rewind the phasor; tuning stays put.
    pub fn reset_state(&mut self) {
        self.phasor.reset_phase();
        self.c = 0.0;
        self.s = 0.0;
        self.cc = 0.0;
        self.ss = 0.0;
        self.power = 0.0;
        self.amplitude = 0.0;
        self.phase = 0.0;
        self.tracked_frequency = self.frequency();
    }

    // One projection step; the phase increments after the accumulators so
    // the sample meets the phasor position it was sampled at.
    #[inline]
    fn accumulate(&mut self, sample: f32) {
        let (zc, zs) = self.phasor.z();
        let alpha_sample = self.alpha * sample;
        self.c = mul_add_fast(self.c, self.om_alpha, alpha_sample * zc);
        self.s = mul_add_fast(self.s, self.om_alpha, alpha_sample * zs);
        self.cc = mul_add_fast(self.cc, self.om_beta, self.beta * self.c);
        self.ss = mul_add_fast(self.ss, self.om_beta, self.beta * self.s);
        self.phasor.increment_phase();
    }

    #[inline]
    fn refresh_level(&mut self) {
        self.power = self.cc * self.cc + self.ss * self.ss;
        self.amplitude = self.power.sqrt();
    }

    /// Process one sample and refresh power/amplitude. Does not stabilize
    /// the phasor; sample-at-a-time callers pick their own cadence via
    /// [`Resonator::stabilize`].
    pub fn process_sample(&mut self, sample: f32) {
        self.accumulate(sample);
        self.refresh_level();
    }

    /// Process a whole block, stabilizing the phasor once at the end.
    pub fn process_block(&mut self, samples: &[f32]) {
        for &x in samples {
            self.accumulate(x);
        }
        self.phasor.stabilize();
        self.refresh_level();
    }

    /// Process every `stride`-th sample of an interleaved frame.
    pub fn process_frame(&mut self, frame: &[f32], stride: usize) {
        assert!(stride > 0);
        for &x in frame.iter().step_by(stride) {
            self.accumulate(x);
        }
        self.phasor.stabilize();
        self.refresh_level();
    }

    /// `process_frame` plus a tracked-frequency update from the phase drift
    /// across the visited samples.
    pub fn process_frame_tracking(&mut self, frame: &[f32], stride: usize) {
        assert!(stride > 0);
        let visited = frame.len().div_ceil(stride);
        for &x in frame.iter().step_by(stride) {
            self.accumulate(x);
        }
        self.phasor.stabilize();
        self.refresh_level();
        self.track(visited);
    }

    /// Phasor magnitude correction for sample-at-a-time callers.
    pub fn stabilize(&mut self) {
        self.phasor.stabilize();
    }

    fn track(&mut self, visited: usize) {
        if visited == 0 {
            return;
        }
        if self.amplitude > self.tracking.amplitude_floor {
            let new_phase = self.ss.atan2(self.cc);
            let drift = wrap_angle_diff(new_phase - self.phase);
            self.phase = new_phase;
            let instantaneous =
                self.frequency() - drift * self.sample_rate() / (TAU * visited as f32);
            let gain = (self.tracking.response * visited as f32).clamp(0.0, 1.0);
            self.tracked_frequency += gain * (instantaneous - self.tracked_frequency);
        } else {
            self.tracked_frequency = self.frequency();
        }
    }
}
