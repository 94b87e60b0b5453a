//! Trailing custom cursor
//!
//! A dot that follows the pointer on a damped spring. Only shown on
//! viewports with a fine pointer that are not small.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CURSOR_DAMPING, CURSOR_STIFFNESS};

/// Largest integration step (seconds) for spring stability
const MAX_STEP: f32 = 1.0 / 120.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorTrail {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    /// Pointer is over the document
    pub visible: bool,
    /// Capability gate: fine pointer and a non-small viewport
    pub enabled: bool,
    seen: bool,
}

impl CursorTrail {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Capability check
    pub fn supported(coarse_pointer: bool, viewport_width: f32) -> bool {
        !coarse_pointer && viewport_width >= 768.0
    }

    pub fn pointer_moved(&mut self, pointer: Vec2) {
        self.target = pointer;
        self.visible = true;
        if !self.seen {
            self.seen = true;
            self.pos = pointer;
            self.vel = Vec2::ZERO;
        }
    }

    pub fn pointer_left(&mut self) {
        self.visible = false;
    }

    pub fn is_shown(&self) -> bool {
        self.enabled && self.visible
    }

    /// Integrate the spring for `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if !self.enabled || !self.seen {
            return;
        }
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let accel = (self.target - self.pos) * CURSOR_STIFFNESS - self.vel * CURSOR_DAMPING;
            self.vel += accel * h;
            self.pos += self.vel * h;
            remaining -= h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_snaps() {
        let mut c = CursorTrail::new(true);
        c.pointer_moved(Vec2::new(300.0, 200.0));
        assert_eq!(c.pos, Vec2::new(300.0, 200.0));
        assert!(c.is_shown());
    }

    #[test]
    fn test_lags_then_settles() {
        let mut c = CursorTrail::new(true);
        c.pointer_moved(Vec2::ZERO);
        c.pointer_moved(Vec2::new(100.0, 0.0));
        c.step(1.0 / 60.0);
        assert!(c.pos.x > 0.0 && c.pos.x < 100.0);
        for _ in 0..120 {
            c.step(1.0 / 60.0);
        }
        assert!((c.pos.x - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_disabled_is_hidden() {
        let mut c = CursorTrail::new(false);
        c.pointer_moved(Vec2::new(10.0, 10.0));
        assert!(!c.is_shown());
        assert!(!CursorTrail::supported(true, 1920.0));
        assert!(!CursorTrail::supported(false, 500.0));
        assert!(CursorTrail::supported(false, 1024.0));
    }

    #[test]
    fn test_leave_hides() {
        let mut c = CursorTrail::new(true);
        c.pointer_moved(Vec2::ONE);
        c.pointer_left();
        assert!(!c.is_shown());
    }
}
