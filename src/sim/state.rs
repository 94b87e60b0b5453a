//! Page state and lifecycle
//!
//! Everything the page knows lives here. It is created on mount, mutated
//! only by [`super::tick`], and torn down on navigation away.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::carousel::Carousel;
use super::celebration::{Celebration, Particle};
use super::cursor::CursorTrail;
use super::days::day_count;
use super::gallery::Gallery;
use super::hearts::HeartField;
use super::layout::{LayoutCache, ViewportBucket};
use super::music::MusicState;
use super::prompt::Prompt;
use super::reveal::GridReveal;
use crate::settings::{RevealMode, Settings};

/// Browser viewport snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Primary pointer is coarse (touch)
    pub coarse_pointer: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            coarse_pointer: false,
        }
    }
}

impl Viewport {
    pub fn bucket(&self) -> ViewportBucket {
        ViewportBucket::from_width(self.width)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// The chosen memory reveal design
#[derive(Debug, Clone)]
pub enum MemoryReveal {
    Grid(GridReveal),
    /// Hidden until acceptance
    Carousel { carousel: Carousel, shown: bool },
}

/// Complete page state
#[derive(Debug, Clone)]
pub struct PageState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (ms since mount)
    pub time_ms: f64,
    pub settings: Settings,
    pub viewport: Viewport,
    pub prompt: Prompt,
    pub celebration: Celebration,
    /// Confetti (capped by settings)
    pub particles: Vec<Particle>,
    pub gallery: Gallery,
    pub layout: LayoutCache,
    pub reveal: MemoryReveal,
    pub hearts: HeartField,
    pub cursor: CursorTrail,
    pub music: MusicState,
    /// Days since the reference date, fixed at mount
    pub days: u64,
    image_retries: Vec<(usize, String)>,
    torn_down: bool,
}

impl PageState {
    /// Mount the page. `wall_clock_ms` is only used for the day counter.
    pub fn new(seed: u64, settings: Settings, viewport: Viewport, wall_clock_ms: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bucket = viewport.bucket();
        let gallery = Gallery::new(settings.image_count, &settings.image_dir);
        let total = gallery.len();

        let reveal = match settings.reveal_mode {
            RevealMode::Grid => MemoryReveal::Grid(GridReveal::new(total, settings.preview_limit, 0.0)),
            RevealMode::Carousel => MemoryReveal::Carousel {
                carousel: Carousel::new(total),
                shown: false,
            },
        };
        let hearts = HeartField::new(settings.heart_cap(bucket), 0.0, &mut rng);
        let cursor = CursorTrail::new(CursorTrail::supported(viewport.coarse_pointer, viewport.width));
        let music = MusicState::new(settings.music_volume);
        let days = day_count(wall_clock_ms, settings.reference_date_ms);

        let mut layout = LayoutCache::default();
        layout.positions(bucket, total);

        log::info!(
            "Page mounted: {} memories, {:?} reveal, {} quality, {:?} viewport, {} days",
            total,
            settings.reveal_mode,
            settings.quality.as_str(),
            bucket,
            days
        );

        Self {
            seed,
            rng,
            time_ms: 0.0,
            settings,
            viewport,
            prompt: Prompt::default(),
            celebration: Celebration::default(),
            particles: Vec::new(),
            gallery,
            layout,
            reveal,
            hearts,
            cursor,
            music,
            days,
            image_retries: Vec::new(),
            torn_down: false,
        }
    }

    /// Apply a new viewport size
    pub fn resize(&mut self, viewport: Viewport) {
        let bucket = viewport.bucket();
        if bucket != self.viewport.bucket() {
            log::debug!("Viewport bucket {:?} -> {:?}", self.viewport.bucket(), bucket);
        }
        self.viewport = viewport;
        self.hearts.set_cap(self.settings.heart_cap(bucket));
        self.cursor.enabled = CursorTrail::supported(viewport.coarse_pointer, viewport.width);
        self.layout.positions(bucket, self.gallery.len());
    }

    /// Acceptance side effects: confetti and the full reveal
    pub(super) fn on_accept(&mut self) {
        let now = self.time_ms;
        log::info!("Accepted after {} rejection(s)", self.prompt.attempts);
        self.celebration.activate(now);
        match &mut self.reveal {
            MemoryReveal::Grid(grid) => grid.accept(now),
            MemoryReveal::Carousel { shown, .. } => *shown = true,
        }
    }

    /// Number of photos currently revealed
    pub fn visible_count(&self) -> usize {
        match &self.reveal {
            MemoryReveal::Grid(grid) => grid.visible(),
            MemoryReveal::Carousel { carousel, shown } => {
                if *shown {
                    carousel.total()
                } else {
                    0
                }
            }
        }
    }

    pub(super) fn queue_image_retry(&mut self, index: usize, src: String) {
        self.image_retries.push((index, src));
    }

    /// Retry URLs for failed photos since the last call
    pub fn take_image_retries(&mut self) -> Vec<(usize, String)> {
        std::mem::take(&mut self.image_retries)
    }

    /// Cancel all scheduled work. Ticks after this are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.celebration.cancel();
        self.particles.clear();
        self.torn_down = true;
        log::info!("Page torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
