//! Be Mine - an interactive yes/no greeting page
//!
//! Core modules:
//! - `sim`: Deterministic page simulation (evasive button, reveal, effects)
//! - `view`: Pure state -> scene description
//! - `platform`: Browser bindings (listeners, DOM, audio, canvas)
//! - `settings`: Page configuration
//! - `error`: Setup/config errors

pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::{PageError, Result};
pub use settings::{QualityPreset, RevealMode, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Page configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Question copy
    pub const QUESTION: &str = "Will you be my Valentine?";
    pub const SUBTITLE: &str = "(Pretty please?)";
    pub const CELEBRATION_MESSAGE: &str = "Yay! You made me the happiest!";
    pub const SCROLL_HINT: &str = "Scroll to see our beautiful memories float by...";

    /// Evasive button: pointer proximity that triggers repulsion (px)
    pub const REPULSION_RADIUS: f32 = 150.0;
    /// Random jump range on each rejection (± px per axis)
    pub const REJECTION_JUMP: f32 = 100.0;
    pub const MIN_SCALE: f32 = 0.3;
    pub const SCALE_STEP: f32 = 0.1;
    pub const MAX_SPEED_MULTIPLIER: f32 = 3.0;
    pub const SPEED_STEP: f32 = 0.2;
    /// Wobble amplitude (degrees) and period (ms)
    pub const WOBBLE_DEGREES: f32 = 5.0;
    pub const WOBBLE_PERIOD_MS: f64 = 300.0;
    /// Text shown before any rejection
    pub const DEFAULT_NO_TEXT: &str = "No";
    /// Escalating rejection phrases, indexed by attempts (1-based)
    pub const PHRASES: [&str; 10] = [
        "Are you sure?",
        "Really?",
        "Think again!",
        "Come on...",
        "Please?",
        "I'll be sad",
        "Pretty please?",
        "Last chance!",
        "You're breaking my heart",
        "Fine, I give up...",
    ];

    /// Celebration timings
    pub const CELEBRATION_DURATION_MS: f64 = 5000.0;
    pub const CELEBRATION_INTERVAL_MS: f64 = 250.0;
    pub const CELEBRATION_BASE_PARTICLES: f32 = 50.0;
    pub const OPENING_BURST_DELAY_MS: f64 = 100.0;
    pub const OPENING_BURST_PARTICLES: u32 = 200;

    /// Memory collection
    pub const IMAGE_COUNT: usize = 122;
    pub const IMAGE_DIR: &str = "/Images";
    /// Load attempts per image before it is left broken
    pub const MAX_LOAD_ATTEMPTS: usize = 3;
    pub const PREVIEW_LIMIT: usize = 20;
    pub const REVEAL_BATCH: usize = 10;
    pub const REVEAL_BATCH_INTERVAL_MS: f64 = 1500.0;
    /// Per-index reveal stagger and its cap (ms)
    pub const STAGGER_PER_INDEX_MS: f64 = 1.8;
    pub const STAGGER_CAP_MS: f64 = 200.0;
    pub const TILE_APPEAR_MS: f64 = 250.0;

    /// Carousel
    pub const CAROUSEL_INTERVAL_MS: f64 = 5000.0;
    pub const INDICATOR_COUNT: usize = 20;

    /// Floating hearts
    pub const HEART_CAP: usize = 15;
    pub const HEART_CAP_SMALL: usize = 8;
    pub const HEART_SPAWN_INTERVAL_MS: f64 = 3000.0;

    /// Cursor spring
    pub const CURSOR_STIFFNESS: f32 = 500.0;
    pub const CURSOR_DAMPING: f32 = 28.0;

    /// Background music
    pub const MUSIC_SRC: &str = "/music/romantic-music.mp3";
    pub const MUSIC_VOLUME: f32 = 0.7;
    pub const AUTOPLAY_DELAY_MS: i32 = 150;

    /// Day counter reference (2025-11-09T00:00:00Z)
    pub const REFERENCE_DATE_MS: f64 = 1_762_646_400_000.0;
    pub const MS_PER_DAY: f64 = 86_400_000.0;
}

/// Axis-aligned rectangle in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Sample piecewise-linear keyframes spread evenly over t in [0, 1]
pub fn keyframes(frames: &[f32], t: f32) -> f32 {
    match frames.len() {
        0 => 0.0,
        1 => frames[0],
        n => {
            let t = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (t.floor() as usize).min(n - 2);
            lerp(frames[i], frames[i + 1], t - i as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframes_endpoints() {
        let frames = [0.0, 1.15, 1.0];
        assert_eq!(keyframes(&frames, 0.0), 0.0);
        assert!((keyframes(&frames, 0.5) - 1.15).abs() < 1e-6);
        assert_eq!(keyframes(&frames, 1.0), 1.0);
        assert_eq!(keyframes(&frames, 7.0), 1.0);
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.center(), Vec2::new(60.0, 45.0));
        assert_eq!(r.half_extent(), Vec2::new(50.0, 25.0));
    }
}
