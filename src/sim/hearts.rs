//! Floating hearts
//!
//! A rolling set of decorative hearts. A timer appends one new heart at the
//! bottom of the screen and trims the oldest so the set never exceeds its
//! cap. Hearts are retired only by that trim, never by their own timer.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::keyframes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heart {
    pub id: u64,
    /// Horizontal position (viewport percent)
    pub x: f32,
    /// Starting vertical position (viewport percent)
    pub y: f32,
    /// Edge length in px
    pub size: f32,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub born_at: f64,
}

impl Heart {
    /// Rise progress 0-1; stays at 1 once the heart has left the screen
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.born_at - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn opacity(&self, now: f64) -> f32 {
        keyframes(&[0.6, 0.8, 0.4, 0.0], self.progress(now))
    }

    /// Vertical travel in px for a viewport height
    pub fn rise(&self, now: f64, viewport_height: f32) -> f32 {
        -(viewport_height + 100.0) * self.progress(now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartField {
    hearts: VecDeque<Heart>,
    cap: usize,
    since_spawn_ms: f64,
    next_id: u64,
}

impl HeartField {
    /// Fill to `cap` with hearts scattered over the screen
    pub fn new<R: Rng>(cap: usize, now: f64, rng: &mut R) -> Self {
        let mut field = Self {
            hearts: VecDeque::with_capacity(cap + 1),
            cap,
            since_spawn_ms: 0.0,
            next_id: 0,
        };
        for _ in 0..cap {
            let y = rng.random_range(0.0..100.0);
            let delay = rng.random_range(0.0..5000.0);
            field.push(rng, now, y, delay);
        }
        field
    }

    fn push<R: Rng>(&mut self, rng: &mut R, now: f64, y: f32, delay_ms: f64) {
        let heart = Heart {
            id: self.next_id,
            x: rng.random_range(0.0..100.0),
            y,
            size: rng.random_range(15.0..35.0),
            duration_ms: rng.random_range(15_000.0..25_000.0),
            delay_ms,
            born_at: now,
        };
        self.next_id += 1;
        self.hearts.push_back(heart);
    }

    fn trim(&mut self) {
        while self.hearts.len() > self.cap {
            self.hearts.pop_front();
        }
    }

    pub fn hearts(&self) -> impl Iterator<Item = &Heart> {
        self.hearts.iter()
    }

    pub fn len(&self) -> usize {
        self.hearts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Change the cap (e.g. on resize), dropping the oldest if needed
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.trim();
    }

    /// Spawn timer
    pub fn tick<R: Rng>(&mut self, dt_ms: f64, now: f64, rng: &mut R) {
        self.since_spawn_ms += dt_ms;
        while self.since_spawn_ms >= HEART_SPAWN_INTERVAL_MS {
            self.since_spawn_ms -= HEART_SPAWN_INTERVAL_MS;
            self.push(rng, now, 100.0, 0.0);
            self.trim();
        }
    }
}
