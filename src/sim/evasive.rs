//! Evasive "No" button
//!
//! The button keeps an offset from its resting centre inside a container.
//! Pointer samples inside the repulsion radius push it away along the
//! pointer→centre angle, harder as rejections pile up, and every rejection
//! throws it to a random spot near the centre.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

/// Button scale for a number of rejections, never below 30%
#[inline]
pub fn scale_for(attempts: u32) -> f32 {
    (1.0 - attempts as f32 * SCALE_STEP).max(MIN_SCALE)
}

/// Repulsion speed multiplier, capped at 3x
#[inline]
pub fn speed_multiplier(attempts: u32) -> f32 {
    (1.0 + attempts as f32 * SPEED_STEP).min(MAX_SPEED_MULTIPLIER)
}

/// Button text; clamps to the last phrase once the list runs out
pub fn phrase_for(attempts: u32) -> &'static str {
    match attempts {
        0 => DEFAULT_NO_TEXT,
        n => PHRASES[(n as usize - 1).min(PHRASES.len() - 1)],
    }
}

/// Rotation (degrees) of the idle wobble at a point in time
pub fn wobble_degrees(attempts: u32, time_ms: f64) -> f32 {
    let phase = (time_ms / WOBBLE_PERIOD_MS * std::f64::consts::TAU).sin() as f32;
    let sign = if attempts % 2 == 0 { -1.0 } else { 1.0 };
    sign * phase * WOBBLE_DEGREES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvasiveControl {
    /// Offset of the button centre from the container centre
    pub offset: Vec2,
    /// Container the button must stay inside (viewport px)
    pub container: Rect,
    /// Unscaled button size
    pub control_size: Vec2,
}

impl Default for EvasiveControl {
    fn default() -> Self {
        // w-64 h-64 container with a pill-shaped button
        Self {
            offset: Vec2::ZERO,
            container: Rect::new(0.0, 0.0, 256.0, 256.0),
            control_size: Vec2::new(120.0, 60.0),
        }
    }
}

impl EvasiveControl {
    /// Button centre in viewport coordinates
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.container.center() + self.offset
    }

    /// Largest offset per axis that keeps the scaled button inside the container
    pub fn max_offset(&self, attempts: u32) -> Vec2 {
        let half_control = self.control_size * scale_for(attempts) * 0.5;
        (self.container.half_extent() - half_control).max(Vec2::ZERO)
    }

    fn clamp(&mut self, attempts: u32) {
        let max = self.max_offset(attempts);
        self.offset = self.offset.clamp(-max, max);
    }

    /// Update geometry after a layout change, keeping the button in bounds
    pub fn set_container(&mut self, container: Rect, control_size: Vec2, attempts: u32) {
        self.container = container;
        self.control_size = control_size;
        self.clamp(attempts);
    }

    /// React to one pointer sample. Returns true if the button moved.
    pub fn repel(&mut self, pointer: Vec2, attempts: u32) -> bool {
        let away = self.center() - pointer;
        let distance = away.length();
        if distance >= REPULSION_RADIUS {
            return false;
        }

        // Pointer dead on the centre has no direction; push along +x
        let angle = if distance > f32::EPSILON {
            away.y.atan2(away.x)
        } else {
            0.0
        };
        let push = (REPULSION_RADIUS - distance) * speed_multiplier(attempts);
        let before = self.offset;
        self.offset += Vec2::from_angle(angle) * push;
        self.clamp(attempts);
        self.offset != before
    }

    /// Random jump within ±100px of the resting centre
    pub fn jump<R: Rng>(&mut self, rng: &mut R, attempts: u32) {
        self.offset = Vec2::new(
            rng.random_range(-REJECTION_JUMP..=REJECTION_JUMP),
            rng.random_range(-REJECTION_JUMP..=REJECTION_JUMP),
        );
        self.clamp(attempts);
    }
}
