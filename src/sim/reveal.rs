//! Progressive collage reveal
//!
//! Before acceptance a small preview prefix of the collection is shown and
//! grown in batches on a timer. Acceptance reveals everything at once with a
//! tiny per-index stagger so the collage pops in near-simultaneously.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::keyframes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridReveal {
    total: usize,
    preview_limit: usize,
    visible: usize,
    since_batch_ms: f64,
    /// When each visible index entered the visible set
    revealed_at: Vec<f64>,
    accepted: bool,
}

impl GridReveal {
    pub fn new(total: usize, preview_limit: usize, now: f64) -> Self {
        let mut reveal = Self {
            total,
            preview_limit: preview_limit.min(total),
            visible: 0,
            since_batch_ms: 0.0,
            revealed_at: Vec::with_capacity(total),
            accepted: false,
        };
        reveal.grow_to(REVEAL_BATCH.min(reveal.preview_limit), now);
        reveal
    }

    /// Length of the visible prefix
    pub fn visible(&self) -> usize {
        self.visible
    }

    fn grow_to(&mut self, target: usize, now: f64) {
        let target = target.min(self.total);
        while self.visible < target {
            self.revealed_at.push(now);
            self.visible += 1;
        }
    }

    /// Advance the batch timer
    pub fn tick(&mut self, dt_ms: f64, now: f64) {
        if self.accepted || self.visible >= self.preview_limit {
            return;
        }
        self.since_batch_ms += dt_ms;
        while self.since_batch_ms >= REVEAL_BATCH_INTERVAL_MS && self.visible < self.preview_limit {
            self.since_batch_ms -= REVEAL_BATCH_INTERVAL_MS;
            self.grow_to((self.visible + REVEAL_BATCH).min(self.preview_limit), now);
        }
    }

    /// Reveal the full collection
    pub fn accept(&mut self, now: f64) {
        if self.accepted {
            return;
        }
        self.accepted = true;
        log::info!("Revealing all {} memories", self.total);
        self.grow_to(self.total, now);
    }

    /// Appear progress (0-1) of a tile, including its stagger
    pub fn progress(&self, index: usize, now: f64) -> f32 {
        let Some(&at) = self.revealed_at.get(index) else {
            return 0.0;
        };
        let delay = if self.accepted { stagger_delay_ms(index) } else { 0.0 };
        ((now - at - delay) / TILE_APPEAR_MS).clamp(0.0, 1.0) as f32
    }
}

/// Reveal stagger for an index, capped so the whole collage lands in ~0.2s
#[inline]
pub fn stagger_delay_ms(index: usize) -> f64 {
    (index as f64 * STAGGER_PER_INDEX_MS).min(STAGGER_CAP_MS)
}

/// Opacity and scale of a tile at an appear progress
pub fn tile_appearance(progress: f32) -> (f32, f32) {
    (
        keyframes(&[0.0, 1.0, 0.95], progress),
        keyframes(&[0.0, 1.15, 1.0], progress),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_grows_in_batches_up_to_limit() {
        let mut r = GridReveal::new(122, 20, 0.0);
        assert_eq!(r.visible(), 10);
        r.tick(REVEAL_BATCH_INTERVAL_MS - 1.0, 1000.0);
        assert_eq!(r.visible(), 10);
        r.tick(1.0, 1500.0);
        assert_eq!(r.visible(), 20);
        r.tick(REVEAL_BATCH_INTERVAL_MS * 10.0, 20_000.0);
        assert_eq!(r.visible(), 20);
    }

    #[test]
    fn test_accept_reveals_all_and_never_shrinks() {
        let mut r = GridReveal::new(122, 20, 0.0);
        let before = r.visible();
        r.accept(500.0);
        assert!(r.visible() >= before);
        assert_eq!(r.visible(), 122);
        r.tick(10_000.0, 10_500.0);
        r.accept(11_000.0);
        assert_eq!(r.visible(), 122);
    }

    #[test]
    fn test_small_collection() {
        let mut r = GridReveal::new(4, 20, 0.0);
        assert_eq!(r.visible(), 4);
        r.tick(5000.0, 5000.0);
        assert_eq!(r.visible(), 4);
    }

    #[test]
    fn test_empty_collection() {
        let mut r = GridReveal::new(0, 20, 0.0);
        r.accept(0.0);
        assert_eq!(r.visible(), 0);
        assert_eq!(r.progress(0, 100.0), 0.0);
    }

    #[test]
    fn test_stagger_capped() {
        assert_eq!(stagger_delay_ms(0), 0.0);
        assert!((stagger_delay_ms(10) - 18.0).abs() < 1e-9);
        assert_eq!(stagger_delay_ms(121), STAGGER_CAP_MS);
    }

    #[test]
    fn test_progress_after_accept() {
        let mut r = GridReveal::new(122, 20, 0.0);
        r.accept(1000.0);
        assert_eq!(r.progress(100, 1000.0), 0.0);
        let landed = 1000.0 + STAGGER_CAP_MS + TILE_APPEAR_MS;
        assert_eq!(r.progress(121, landed), 1.0);
        assert_eq!(r.progress(500, landed), 0.0);
    }

    #[test]
    fn test_tile_appearance_keyframes() {
        assert_eq!(tile_appearance(0.0), (0.0, 0.0));
        let (opacity, scale) = tile_appearance(1.0);
        assert!((opacity - 0.95).abs() < 1e-6);
        assert!((scale - 1.0).abs() < 1e-6);
    }
}
