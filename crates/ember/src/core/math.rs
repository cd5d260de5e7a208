// core/math.rs
//
// Scalar helpers shared by the particle update.

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Remap `value` from `[in_min, in_max]` to `[out_min, out_max]` without clamping.
/// A degenerate input range maps everything to `out_min`.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / span
}

/// Triangle wave over one lifetime: 0 → 1 at the midpoint → 0.
///
/// The descending half is `2(1 - t)`, not `1.5 - t`: the latter ends at 0.5
/// and never returns to the start color.
#[inline]
pub fn ping_pong(t: f32) -> f32 {
    if t <= 0.5 {
        t * 2.0
    } else {
        (1.0 - t) * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp(100.0, 200.0, 1.0), 200.0);
        assert!((lerp(100.0, 200.0, 0.5) - 150.0).abs() < 0.001);
    }

    #[test]
    fn ping_pong_round_trip() {
        assert_eq!(ping_pong(0.0), 0.0);
        assert_eq!(ping_pong(0.25), 0.5);
        assert_eq!(ping_pong(0.5), 1.0);
        assert_eq!(ping_pong(0.75), 0.5);
        assert_eq!(ping_pong(1.0), 0.0);
    }

    #[test]
    fn map_range_reversed_output() {
        assert_eq!(map_range(10.0, 0.0, 10.0, 2.0, 1.0), 1.0);
        assert_eq!(map_range(0.0, 0.0, 10.0, 2.0, 1.0), 2.0);
        assert_eq!(map_range(3.0, 3.0, 3.0, 2.0, 1.0), 2.0);
    }
}
