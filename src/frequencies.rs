//! Frequency helpers: snapping analysis frequencies onto the sample grid
//! and reading tracked drift as radial velocity.

/// Speed of sound in air at room temperature, m/s.
pub const SPEED_OF_SOUND: f32 = 346.0;

/// Nearest frequency whose period is a whole number of samples.
///
/// A resonator tuned to such a frequency sees the same phase table values
/// every period. Valid for `0 < target`.
#[inline]
pub fn closest_frequency(target: f32, sample_rate: f32) -> f32 {
    sample_rate / (sample_rate / target).round()
}

/// Radial velocity in m/s that shifts `reference` to `observed`.
///
/// Positive when the source approaches. Returns 0.0 when `reference` is not
/// a usable frequency.
#[inline]
pub fn doppler_velocity(observed: f32, reference: f32) -> f32 {
    if reference > 0.0 {
        SPEED_OF_SOUND * (observed - reference) / reference
    } else {
        0.0
    }
}
