//! Particle presets: sleep glyphs and ground debris.
//!
//! Both are fire-and-forget. The particle store advances and removes them;
//! nothing here keeps a handle once the `ParticleSpec` is handed over.

use glam::Vec2;
use stage_engine::{ParticleId, ParticleSpec, ParticleSystem, Rng};

/// Style classes the host uses to pick a visual treatment.
pub mod styles {
    pub const SNORE: u32 = 1;
    pub const DEBRIS: u32 = 2;
}

const SNORE_DURATION: f32 = 2.4;
const SNORE_SPEED: f32 = 28.0;
const SNORE_FONT: f32 = 18.0;
const SNORE_COLOR: u32 = 0x8a94a6;

const DEBRIS_SIZE: f32 = 5.0;
const DEBRIS_COLOR: u32 = 0x6b5b4b;
const DEBRIS_SPEED: f32 = 90.0;   // Base launch speed before the multiplier
const DEBRIS_GRAVITY: f32 = 600.0;
const DEBRIS_DURATION: f32 = 0.6;

/// An upward drifting "Z" from `origin`, leaning slightly to a random side.
pub fn snore_glyph(particles: &mut ParticleSystem, rng: &mut Rng, origin: Vec2, scale: f32) -> Option<ParticleId> {
    let angle = -90.0 + rng.range(-20.0, 20.0);
    let spec = ParticleSpec::new(styles::SNORE, origin)
        .with_glyph('Z')
        .with_size(SNORE_FONT)
        .with_scale(scale * rng.range(0.8, 1.2))
        .with_color(SNORE_COLOR)
        .with_physics(SNORE_SPEED, angle, -4.0)
        .with_duration(SNORE_DURATION);
    particles.spawn(spec)
}

/// `count` debris bits from `center`, launched within `base_angle ± spread` degrees.
/// Returns how many were actually spawned.
pub fn debris_burst(
    particles: &mut ParticleSystem,
    rng: &mut Rng,
    center: Vec2,
    count: usize,
    base_angle: f32,
    spread: f32,
    speed_mult: f32,
) -> usize {
    let mut spawned = 0;
    for _ in 0..count {
        let angle = base_angle + rng.range(-spread, spread);
        let speed = DEBRIS_SPEED * speed_mult * rng.range(0.6, 1.4);
        let spec = ParticleSpec::new(styles::DEBRIS, center)
            .with_size(DEBRIS_SIZE)
            .with_scale(rng.range(0.5, 1.2))
            .with_color(DEBRIS_COLOR)
            .with_physics(speed, angle, DEBRIS_GRAVITY)
            .with_duration(DEBRIS_DURATION * rng.range(0.7, 1.3))
            .with_delay(rng.range(0.0, 0.05));
        if particles.spawn(spec).is_some() {
            spawned += 1;
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snore_rises() {
        let mut particles = ParticleSystem::new();
        let mut rng = Rng::new(7);
        let id = snore_glyph(&mut particles, &mut rng, Vec2::new(50.0, 100.0), 1.0).unwrap();
        particles.tick(1.0);
        let p = particles.get(id).unwrap();
        assert_eq!(p.spec.glyph, Some('Z'));
        assert_eq!(p.spec.style, styles::SNORE);
        assert!(p.position().y < 100.0);
    }

    #[test]
    fn debris_stays_inside_spread() {
        let mut particles = ParticleSystem::new();
        let mut rng = Rng::new(3);
        let n = debris_burst(&mut particles, &mut rng, Vec2::ZERO, 20, -90.0, 40.0, 2.0);
        assert_eq!(n, 20);
        assert_eq!(particles.len(), 20);
        for p in particles.iter() {
            assert!(p.spec.angle >= -130.0 && p.spec.angle <= -50.0);
            assert_eq!(p.spec.style, styles::DEBRIS);
        }
    }

    #[test]
    fn burst_is_capped_by_store_capacity() {
        let mut particles = ParticleSystem::with_capacity(5);
        let mut rng = Rng::new(3);
        assert_eq!(debris_burst(&mut particles, &mut rng, Vec2::ZERO, 8, 0.0, 10.0, 1.0), 5);
    }

    #[test]
    fn burst_particles_are_removed_after_flight() {
        let mut particles = ParticleSystem::new();
        let mut rng = Rng::new(11);
        debris_burst(&mut particles, &mut rng, Vec2::ZERO, 12, 0.0, 40.0, 1.0);
        for _ in 0..120 {
            particles.tick(1.0 / 60.0);
        }
        assert!(particles.is_empty());
        assert_eq!(particles.removed(), 12);
    }
}
