//! Celebration confetti
//!
//! A one-shot emitter: for five seconds after acceptance, two side bursts
//! fire every 250ms with a particle count that fades linearly to zero, plus
//! one large centre burst 100ms in. Bursts become particles in a bounded
//! pool that the canvas layer draws.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Confetti palette
pub const CONFETTI_COLORS: [&str; 5] = ["#ff3366", "#ff6b9d", "#ff8fab", "#d5c7ff", "#ffbfd3"];

/// Initial particle speed (px/s)
const START_SPEED: f32 = 900.0;
/// Downward acceleration (px/s²)
const GRAVITY: f32 = 1200.0;
/// Fraction of velocity kept per second
const DRAG: f32 = 0.05;
/// Seconds a particle lives
const LIFETIME: f32 = 1.5;

/// A single confetti emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Origin as a fraction of the viewport (x right, y down)
    pub origin: Vec2,
    pub particle_count: u32,
    /// Cone width in degrees, centred on straight up
    pub spread_deg: f32,
    /// Speed multiplier relative to the default start speed
    pub velocity: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Celebration {
    started_at: Option<f64>,
    next_tick_at: f64,
    opening_pending: bool,
    finished: bool,
}

impl Celebration {
    /// Start the emitter. Later calls are ignored.
    pub fn activate(&mut self, now: f64) {
        if self.started_at.is_some() {
            return;
        }
        log::info!("Celebration started");
        self.started_at = Some(now);
        self.next_tick_at = now + CELEBRATION_INTERVAL_MS;
        self.opening_pending = true;
        self.finished = false;
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some() && !self.finished
    }

    /// Drop all pending emissions
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("Celebration cancelled");
        }
        self.opening_pending = false;
        self.finished = true;
    }

    /// Emit every burst that has come due by `now`
    pub fn update<R: Rng>(&mut self, now: f64, rng: &mut R) -> Vec<Burst> {
        let mut bursts = Vec::new();
        let Some(start) = self.started_at else {
            return bursts;
        };
        if self.finished {
            return bursts;
        }

        if self.opening_pending && now >= start + OPENING_BURST_DELAY_MS {
            self.opening_pending = false;
            bursts.push(Burst {
                origin: Vec2::new(0.5, 0.6),
                particle_count: OPENING_BURST_PARTICLES,
                spread_deg: 70.0,
                velocity: 1.5,
            });
        }

        let end = start + CELEBRATION_DURATION_MS;
        let mut interval_done = false;
        while self.next_tick_at <= now {
            let time_left = end - self.next_tick_at;
            if time_left <= 0.0 {
                interval_done = true;
                break;
            }
            let particle_count = (CELEBRATION_BASE_PARTICLES as f64 * time_left
                / CELEBRATION_DURATION_MS)
                .round() as u32;
            for band in [(0.1, 0.3), (0.7, 0.9)] {
                bursts.push(Burst {
                    origin: Vec2::new(rng.random_range(band.0..band.1), rng.random::<f32>() - 0.2),
                    particle_count,
                    spread_deg: 360.0,
                    velocity: 1.0,
                });
            }
            self.next_tick_at += CELEBRATION_INTERVAL_MS;
        }

        if interval_done && !self.opening_pending {
            self.finished = true;
            log::debug!("Celebration finished");
        }
        bursts
    }
}

/// A confetti particle in viewport pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Index into CONFETTI_COLORS
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
    pub spin: f32,
}

/// Turn a burst into particles, never exceeding `cap`
pub fn spawn_burst<R: Rng>(
    burst: &Burst,
    viewport: Vec2,
    particles: &mut Vec<Particle>,
    cap: usize,
    rng: &mut R,
) {
    let room = cap.saturating_sub(particles.len());
    let count = (burst.particle_count as usize).min(room);
    let origin = burst.origin * viewport;
    let half_spread = burst.spread_deg.to_radians() * 0.5;
    let up = -std::f32::consts::FRAC_PI_2;

    for _ in 0..count {
        let angle = up + rng.random_range(-half_spread..=half_spread);
        let speed = START_SPEED * burst.velocity * rng.random_range(0.5..1.0);
        particles.push(Particle {
            pos: origin,
            vel: Vec2::from_angle(angle) * speed,
            color: rng.random_range(0..CONFETTI_COLORS.len() as u32),
            life: 1.0,
            size: rng.random_range(4.0..9.0),
            spin: rng.random_range(-6.0..6.0),
        });
    }
}

/// Advance particles by `dt` seconds and drop dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    let keep = DRAG.powf(dt);
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += GRAVITY * dt;
        particle.vel *= keep;
        particle.life -= dt / LIFETIME;
    }
    particles.retain(|p| p.life > 0.0);
}
