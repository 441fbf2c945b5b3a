//! Conversions between one-pole smoothing factors and time constants.
//!
//! A resonator stage `y += alpha * (x - y)` running at `sample_rate` decays
//! toward its input with time constant `tau` seconds. These helpers move
//! between the two parameterizations exactly; `Resonator::time_constant`
//! uses the cheaper `1 / (sample_rate * alpha)` form, which agrees for the
//! small factors used in practice.

/// Smoothing factor that yields the requested time constant in seconds.
///
/// Valid for `time_constant > 0`.
#[inline]
pub fn alpha_for_time_constant(time_constant: f32, sample_rate: f32) -> f32 {
    1.0 - (-1.0 / (sample_rate * time_constant)).exp()
}

/// Time constant in seconds produced by a smoothing factor.
///
/// Valid for `0 < alpha < 1`.
#[inline]
pub fn time_constant_for_alpha(alpha: f32, sample_rate: f32) -> f32 {
    -1.0 / (sample_rate * (1.0 - alpha).ln())
}

/// Default smoothing factor for tracking a tone: a ten-cycle time constant,
/// so low frequencies smooth over proportionally longer windows.
#[inline]
pub fn alpha_heuristic(frequency: f32, sample_rate: f32) -> f32 {
    alpha_for_time_constant(10.0 / frequency, sample_rate)
}
