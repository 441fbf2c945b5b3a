use std::f32::consts::{PI, TAU};

/// Wrap a difference of two angles into (-PI, PI].
///
/// Valid for inputs in (-2*PI, 2*PI), which covers any difference of two
/// `atan2` results; one add or subtract of 2*PI is enough there.
#[inline]
pub fn wrap_angle_diff(x: f32) -> f32 {
    if x > PI {
        x - TAU
    } else if x <= -PI {
        x + TAU
    } else {
        x
    }
}
