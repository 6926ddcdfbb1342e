//! Pure 2D helpers shared by the creature states.

use glam::Vec2;

/// Euclidean distance between two points.
pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    vector_length(x2 - x1, y2 - y1)
}

/// Magnitude of a displacement.
pub fn vector_length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Angle of the vector from point 1 to point 2, in degrees, range (-180, 180].
pub fn angle_degrees(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let deg = (y2 - y1).atan2(x2 - x1).to_degrees();
    // atan2 yields -180 for (-x, -0.0); fold it onto the closed end.
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`, clamped.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_max;
    }
    let t = ((value - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + (out_max - out_min) * t
}

/// Critically damped spring toward `target`. Returns the new position and velocity.
pub fn smooth_damp(current: Vec2, target: Vec2, velocity: Vec2, smooth_time: f32, dt: f32) -> (Vec2, Vec2) {
    let omega = 2.0 / smooth_time.max(1e-4);
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let velocity = (velocity - omega * temp) * decay;
    let pos = target + (change + temp) * decay;
    (pos, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert!((distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-6);
        assert_eq!(distance(2.0, 2.0, 2.0, 2.0), 0.0);
        assert!((vector_length(-6.0, 8.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn angle_follows_screen_axes() {
        assert!((angle_degrees(0.0, 0.0, 1.0, 0.0)).abs() < 1e-4);
        assert!((angle_degrees(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-4);
        assert!((angle_degrees(0.0, 0.0, 0.0, -1.0) + 90.0).abs() < 1e-4);
        assert!((angle_degrees(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 1e-4);
        assert!((angle_degrees(0.0, 0.0, -1.0, -0.0) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn map_range_clamps() {
        assert_eq!(map_range(0.5, 0.0, 1.0, 4.0, 20.0), 12.0);
        assert_eq!(map_range(-3.0, 0.0, 1.0, 4.0, 20.0), 4.0);
        assert_eq!(map_range(9.0, 0.0, 1.0, 4.0, 20.0), 20.0);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let target = Vec2::new(100.0, -50.0);
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        for _ in 0..120 {
            (pos, vel) = smooth_damp(pos, target, vel, 0.1, 1.0 / 60.0);
            assert!(pos.x <= target.x + 1e-3);
        }
        assert!((pos - target).length() < 0.01);
    }
}
