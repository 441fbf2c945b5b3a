//! Rotating unit phasor advanced by complex multiplication (Hz, sec).
//! Z <- Z*W with W = (cos w, sin w), w = 2*pi*f/fs. No trig per sample.

use std::f32::consts::TAU;

/// Unit-magnitude complex oscillator stepped once per sample.
#[derive(Debug, Clone, Copy)]
pub struct Phasor {
    frequency: f32,
    sample_rate: f32,
    wc: f32,
    ws: f32,
    zc: f32,
    zs: f32,
}

impl Phasor {
    /// Phasor at `frequency` Hz for a stream at `sample_rate` Hz, starting
    /// at phase zero.
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        let (wc, ws) = rotation(frequency, sample_rate);
        Self {
            frequency,
            sample_rate,
            wc,
            ws,
            zc: 1.0,
            zs: 0.0,
        }
    }

    /// Tuned frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Per-sample rotation multiplier (cos w, sin w).
    pub fn w(&self) -> (f32, f32) {
        (self.wc, self.ws)
    }

    /// Current phase as (cos, sin); magnitude stays near 1 as long as
    /// `stabilize` runs now and then.
    pub fn z(&self) -> (f32, f32) {
        (self.zc, self.zs)
    }

    /// Retune without touching the accumulated phase, so the trajectory is
    /// continuous across the change.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        let (wc, ws) = rotation(frequency, self.sample_rate);
        self.wc = wc;
        self.ws = ws;
    }

    /// Rewind the phase to (1, 0).
    pub fn reset_phase(&mut self) {
        self.zc = 1.0;
        self.zs = 0.0;
    }

    /// Advance one sample: Z <- Z*W.
    #[inline]
    pub fn increment_phase(&mut self) {
        let zc = self.zc * self.wc - self.zs * self.ws;
        let zs = self.zc * self.ws + self.zs * self.wc;
        self.zc = zc;
        self.zs = zs;
    }

    /// The same rotation with three multiplications instead of four.
    #[allow(dead_code)]
    fn increment_phase_3mul(&mut self) {
        let ac = self.wc * self.zc;
        let bd = self.ws * self.zs;
        let abcd = (self.wc + self.ws) * (self.zc + self.zs);
        self.zc = ac - bd;
        self.zs = abcd - ac - bd;
    }

    /// One Newton step of 1/sqrt at |Z|^2, pulling the magnitude back to 1.
    ///
    /// Rounding drifts |Z| a little on every increment; the correction is
    /// only valid near 1, so run this at least once every few hundred
    /// thousand increments. Frame boundaries are plenty.
    #[inline]
    pub fn stabilize(&mut self) {
        let k = (3.0 - (self.zc * self.zc + self.zs * self.zs)) * 0.5;
        self.zc *= k;
        self.zs *= k;
    }
}

// Written as f*(TAU/fs) so the batched bank setup produces bit-identical
// rotation tables.
#[inline]
fn rotation(frequency: f32, sample_rate: f32) -> (f32, f32) {
    let w = frequency * (TAU / sample_rate);
    (w.cos(), w.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitude(p: &Phasor) -> f32 {
        let (zc, zs) = p.z();
        (zc * zc + zs * zs).sqrt()
    }

    #[test]
    fn zero_frequency_is_identity() {
        let mut p = Phasor::new(0.0, 48_000.0);
        assert_eq!(p.w(), (1.0, 0.0));
        for _ in 0..1000 {
            p.increment_phase();
        }
        assert_eq!(p.z(), (1.0, 0.0));
    }

    #[test]
    fn lands_on_expected_angle() {
        // 750 Hz at 48 kHz is exactly 64 samples per period.
        let mut p = Phasor::new(750.0, 48_000.0);
        for _ in 0..16 {
            p.increment_phase();
        }
        let (zc, zs) = p.z();
        assert!(zc.abs() < 1e-4, "zc={zc}");
        assert!((zs - 1.0).abs() < 1e-4, "zs={zs}");

        for _ in 16..64 {
            p.increment_phase();
        }
        let (zc, zs) = p.z();
        assert!((zc - 1.0).abs() < 1e-3, "zc={zc}");
        assert!(zs.abs() < 1e-3, "zs={zs}");
    }

    #[test]
    fn magnitude_stays_bounded_with_periodic_stabilize() {
        let mut p = Phasor::new(441.0, 44_100.0);
        let mut worst: f32 = 0.0;
        for i in 1..=200_000 {
            p.increment_phase();
            if i % 1024 == 0 {
                p.stabilize();
            }
            worst = worst.max((magnitude(&p) - 1.0).abs());
        }
        assert!(worst < 1e-4, "worst={worst}");
    }

    #[test]
    fn stabilize_fixes_scaled_phase() {
        let mut p = Phasor::new(100.0, 48_000.0);
        for _ in 0..10 {
            p.increment_phase();
        }
        // Inject a small magnitude error and let one step pull it back.
        p.zc *= 1.001;
        p.zs *= 1.001;
        p.stabilize();
        assert!((magnitude(&p) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn stabilize_leaves_unit_phase_alone() {
        let mut p = Phasor::new(440.0, 48_000.0);
        p.stabilize();
        assert_eq!(p.z(), (1.0, 0.0));
    }

    #[test]
    fn retune_keeps_phase() {
        let mut p = Phasor::new(440.0, 48_000.0);
        for _ in 0..100 {
            p.increment_phase();
        }
        let before = p.z();
        let w_before = p.w();
        p.set_frequency(523.25);
        assert_eq!(p.z(), before);
        assert_ne!(p.w(), w_before);
        assert_eq!(p.frequency(), 523.25);
    }

    #[test]
    fn three_mul_rotation_matches_standard() {
        let mut a = Phasor::new(997.0, 48_000.0);
        let mut b = Phasor::new(997.0, 48_000.0);
        for i in 1..=10_000 {
            a.increment_phase();
            b.increment_phase_3mul();
            if i % 1024 == 0 {
                a.stabilize();
                b.stabilize();
            }
        }
        let (ac, as_) = a.z();
        let (bc, bs) = b.z();
        assert!((ac - bc).abs() < 1e-4, "{ac} vs {bc}");
        assert!((as_ - bs).abs() < 1e-4, "{as_} vs {bs}");
    }

    #[test]
    fn reset_phase_restarts_at_unity() {
        let mut p = Phasor::new(440.0, 48_000.0);
        for _ in 0..37 {
            p.increment_phase();
        }
        p.reset_phase();
        assert_eq!(p.z(), (1.0, 0.0));
    }
}
