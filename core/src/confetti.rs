use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Point;

/// CSS colors a particle may take.
pub const PALETTE: [&str; 6] = [
    "#7c3aed", "#06b6d4", "#ffb86b", "#7ee7ff", "#f97316", "#ff6bcb",
];

/// Downward acceleration, in pixels per frame squared.
pub const GRAVITY: f32 = 0.18;

/// How far below the bottom edge a particle may fall before it is dropped.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

/// Share of the canvas height used for unanchored bursts.
const SCATTER_HEIGHT: f32 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per frame.
    pub spin: f32,
    pub color: &'static str,
    /// Frames lived so far.
    pub age: f32,
    /// Frames to live.
    pub ttl: f32,
}

impl Particle {
    fn random(rng: &mut SmallRng, (x, y): Point) -> Self {
        let mut r = || rng.random::<f32>();
        Self {
            x,
            y,
            vx: (r() - 0.5) * 6.0,
            vy: r() * -6.0 - 2.0,
            size: r() * 6.0 + 4.0,
            color: PALETTE[((r() * PALETTE.len() as f32) as usize).min(PALETTE.len() - 1)],
            rotation: r() * 360.0,
            spin: (r() - 0.5) * 10.0,
            age: 0.0,
            ttl: 70.0 + r() * 40.0,
        }
    }

    /// Advances by `dt` frames.
    fn step(&mut self, dt: f32) {
        self.vy += GRAVITY * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.rotation += self.spin * dt;
        self.age += dt;
    }

    fn is_expired(&self, height: f32) -> bool {
        self.age > self.ttl || self.y > height + OFFSCREEN_MARGIN
    }
}

/// Live confetti over a canvas of a given size.
#[derive(Clone, Debug)]
pub struct ConfettiField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    rng: SmallRng,
}

impl ConfettiField {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            particles: Vec::new(),
            width,
            height,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawns `count` particles at `center`, or scattered over the top of the
    /// canvas when there is none.
    pub fn spawn_burst(&mut self, center: Option<Point>, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let origin = center.unwrap_or_else(|| {
                let x = self.rng.random::<f32>() * self.width;
                let y = self.rng.random::<f32>() * self.height * SCATTER_HEIGHT;
                (x, y)
            });
            let particle = Particle::random(&mut self.rng, origin);
            self.particles.push(particle);
        }
        log::trace!(
            "burst of {} at {:?}, {} live",
            count,
            center,
            self.particles.len()
        );
    }

    /// Advances every particle by `dt` frames and drops the expired ones.
    /// Returns whether anything is left to draw.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.particles.is_empty() {
            return false;
        }
        let height = self.height;
        self.particles.retain_mut(|particle| {
            particle.step(dt);
            !particle.is_expired(height)
        });
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
