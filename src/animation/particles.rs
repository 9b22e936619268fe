use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

/// Seconds between spawns.
const SPAWN_EVERY: Duration = Duration::from_millis(500);
/// Particles created when the field starts.
const INITIAL_PARTICLES: usize = 5;
/// Lifetime of a single particle.
pub const PARTICLE_LIFETIME: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    age: Duration,
}

impl Particle {
    /// Fraction of the lifetime used, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.age.as_secs_f64() / PARTICLE_LIFETIME.as_secs_f64()).min(1.0)
    }
}

/// Particles rising from the bottom edge of a `width` x `height` field.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    cap: usize,
    particles: Vec<Particle>,
    since_spawn: Duration,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: f64, height: f64, cap: usize, rng: StdRng) -> Self {
        let mut field = Self {
            width,
            height,
            cap,
            particles: Vec::with_capacity(cap),
            since_spawn: Duration::ZERO,
            rng,
        };
        for _ in 0..INITIAL_PARTICLES {
            field.spawn();
        }
        field
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

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn spawn(&mut self) {
        if self.particles.len() >= self.cap {
            return;
        }
        // Rise speed lets a particle cross the field in 8 to 12 seconds.
        let crossing = self.rng.gen_range(8.0..12.0);
        let particle = Particle {
            x: self.rng.gen_range(0.0..self.width.max(f64::EPSILON)),
            y: 0.0,
            vx: self.rng.gen_range(-0.05..0.05) * self.width,
            vy: self.height / crossing,
            age: Duration::ZERO,
        };
        self.particles.push(particle);
    }

    /// Step the simulation by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        let width = self.width;
        for p in &mut self.particles {
            p.age += dt;
            p.x += p.vx * secs;
            p.y += p.vy * secs;
            if p.x < 0.0 {
                p.x = -p.x;
                p.vx = p.vx.abs();
            } else if p.x > width {
                p.x = 2.0 * width - p.x;
                p.vx = -p.vx.abs();
            }
        }
        let height = self.height;
        self.particles
            .retain(|p| p.age < PARTICLE_LIFETIME && p.y <= height);

        self.since_spawn += dt;
        while self.since_spawn >= SPAWN_EVERY {
            self.since_spawn -= SPAWN_EVERY;
            self.spawn();
        }
    }
}
