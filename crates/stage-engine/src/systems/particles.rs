//! Fire-and-forget ballistic particles.
//!
//! Each particle follows `p(t) = origin + v·(cos a, sin a)·t + ½·(0, g)·t²`
//! (y grows downward, angle in degrees) and fades linearly to transparent.
//! A particle becomes visible once its delay has passed and is removed
//! exactly once, on the first tick at or after `delay + duration`.

use glam::Vec2;
use crate::components::layer::RenderLayer;
use crate::components::visual::Visual;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleId(pub u32);

/// Everything needed to launch one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    /// Style class chosen by the game (selects the host's visual treatment).
    pub style: u32,
    pub glyph: Option<char>,
    pub origin: Vec2,
    /// Multiplier on `size`.
    pub scale: f32,
    /// Base size in world units (diameter, or font size for glyphs).
    pub size: f32,
    pub color: u32,
    /// Launch speed in units per second.
    pub velocity: f32,
    /// Launch angle in degrees, atan2 convention.
    pub angle: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    pub duration: f32,
    pub delay: f32,
}

impl ParticleSpec {
    pub fn new(style: u32, origin: Vec2) -> Self {
        Self {
            style,
            glyph: None,
            origin,
            scale: 1.0,
            size: 6.0,
            color: 0xffffff,
            velocity: 0.0,
            angle: 0.0,
            gravity: 0.0,
            duration: 1.0,
            delay: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = Some(glyph);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_physics(mut self, velocity: f32, angle: f32, gravity: f32) -> Self {
        self.velocity = velocity;
        self.angle = angle;
        self.gravity = gravity;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }
}

/// A live particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    pub spec: ParticleSpec,
    /// Seconds since spawn, including the delay.
    pub elapsed: f32,
}

impl Particle {
    /// Seconds of flight so far (zero while delayed).
    pub fn age(&self) -> f32 {
        (self.elapsed - self.spec.delay).clamp(0.0, self.spec.duration)
    }

    pub fn is_visible(&self) -> bool {
        self.elapsed >= self.spec.delay && !self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.spec.delay + self.spec.duration
    }

    pub fn position(&self) -> Vec2 {
        let t = self.age();
        let s = &self.spec;
        let dir = Vec2::from_angle(s.angle.to_radians());
        s.origin + dir * s.velocity * t + Vec2::new(0.0, 0.5 * s.gravity * t * t)
    }

    /// Linear fade from 1 at launch to 0 at the end of the flight.
    pub fn alpha(&self) -> f32 {
        if self.spec.duration <= 0.0 {
            return 0.0;
        }
        1.0 - self.age() / self.spec.duration
    }

    pub fn visual(&self) -> Visual {
        let size = self.spec.size * self.spec.scale;
        match self.spec.glyph {
            Some(c) => Visual::glyph(c, size, self.spec.color),
            None => Visual::circle(size, self.spec.color).on_layer(RenderLayer::Particles),
        }
    }
}

/// Owner of all live particles on the stage.
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    capacity: usize,
    next_id: u32,
    spawned: u64,
    removed: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity.min(4096)),
            capacity,
            next_id: 0,
            spawned: 0,
            removed: 0,
        }
    }

    /// Launch a particle. Returns None when the stage is at capacity.
    pub fn spawn(&mut self, spec: ParticleSpec) -> Option<ParticleId> {
        if self.particles.len() >= self.capacity {
            log::debug!("particles: at capacity ({}), dropping spawn", self.capacity);
            return None;
        }
        let id = ParticleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.spawned += 1;
        self.particles.push(Particle { id, spec, elapsed: 0.0 });
        Some(id)
    }

    /// Advance all particles and remove the expired ones. Returns how many were removed.
    pub fn tick(&mut self, dt: f32) -> usize {
        let before = self.particles.len();
        self.particles.retain_mut(|p| {
            p.elapsed += dt.max(0.0);
            !p.is_expired()
        });
        let removed = before - self.particles.len();
        self.removed += removed as u64;
        removed
    }

    /// Particles past their delay, in spawn order.
    pub fn visible(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_visible())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    /// Total particles ever spawned.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Total particles ever removed.
    pub fn removed(&self) -> u64 {
        self.removed
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
