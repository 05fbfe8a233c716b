use std::f32::consts::TAU;

/// Wraps an angle into `[0, 2π)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `TAU`, which is folded back to zero.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
