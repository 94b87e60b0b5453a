//! Memory carousel
//!
//! One photo at a time, auto-advancing unless paused, with wraparound
//! navigation and a fixed row of indicators mapped proportionally onto the
//! full sequence.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Sequence index addressed by indicator `k` of `indicators`
pub fn indicator_target(k: usize, indicators: usize, total: usize) -> usize {
    if total <= 1 || indicators <= 1 {
        return 0;
    }
    let k = k.min(indicators - 1);
    ((k as f64 / (indicators - 1) as f64) * (total - 1) as f64).round() as usize
}

/// Indicator highlighted for sequence index `i`
pub fn active_indicator(i: usize, indicators: usize, total: usize) -> usize {
    if total <= 1 || indicators <= 1 {
        return 0;
    }
    let i = i.min(total - 1);
    ((i as f64 / (total - 1) as f64) * (indicators - 1) as f64).round() as usize
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carousel {
    total: usize,
    current: usize,
    paused: bool,
    since_advance_ms: f64,
}

impl Carousel {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: 0,
            paused: false,
            since_advance_ms: 0.0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn go_next(&mut self) {
        if self.total > 0 {
            self.current = (self.current + 1) % self.total;
        }
    }

    pub fn go_prev(&mut self) {
        if self.total > 0 {
            self.current = (self.current + self.total - 1) % self.total;
        }
    }

    /// Pause or resume; resuming restarts the auto-advance interval
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.since_advance_ms = 0.0;
    }

    /// Indicators shown; short sequences get one per photo
    pub fn indicator_count(&self) -> usize {
        INDICATOR_COUNT.min(self.total)
    }

    pub fn jump_to_indicator(&mut self, k: usize) {
        if self.total > 0 {
            self.current = indicator_target(k, self.indicator_count(), self.total);
        }
    }

    pub fn active_indicator(&self) -> usize {
        active_indicator(self.current, self.indicator_count(), self.total)
    }

    /// Auto-advance timer
    pub fn tick(&mut self, dt_ms: f64) {
        if self.paused || self.total == 0 {
            return;
        }
        self.since_advance_ms += dt_ms;
        while self.since_advance_ms >= CAROUSEL_INTERVAL_MS {
            self.since_advance_ms -= CAROUSEL_INTERVAL_MS;
            self.go_next();
        }
    }

    /// "Memory i of N"
    pub fn label(&self) -> String {
        format!("Memory {} of {}", self.current + 1, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wraparound() {
        let mut c = Carousel::new(122);
        c.go_prev();
        assert_eq!(c.current(), 121);
        c.go_next();
        assert_eq!(c.current(), 0);
    }

    #[test]
    fn test_auto_advance_and_pause() {
        let mut c = Carousel::new(5);
        c.tick(CAROUSEL_INTERVAL_MS - 1.0);
        assert_eq!(c.current(), 0);
        c.tick(1.0);
        assert_eq!(c.current(), 1);

        c.toggle_pause();
        c.tick(CAROUSEL_INTERVAL_MS * 3.0);
        assert_eq!(c.current(), 1);

        c.toggle_pause();
        c.tick(CAROUSEL_INTERVAL_MS - 1.0);
        assert_eq!(c.current(), 1);
        c.tick(1.0);
        assert_eq!(c.current(), 2);
    }

    #[test]
    fn test_indicator_jump() {
        let mut c = Carousel::new(122);
        c.jump_to_indicator(INDICATOR_COUNT - 1);
        assert_eq!(c.current(), 121);
        assert_eq!(c.active_indicator(), INDICATOR_COUNT - 1);
        c.jump_to_indicator(0);
        assert_eq!(c.current(), 0);
        assert_eq!(c.label(), "Memory 1 of 122");
    }

    #[test]
    fn test_empty_is_noop() {
        let mut c = Carousel::new(0);
        c.go_next();
        c.go_prev();
        c.jump_to_indicator(5);
        c.tick(CAROUSEL_INTERVAL_MS * 2.0);
        assert_eq!(c.current(), 0);
    }

    #[test]
    fn test_short_sequence_has_one_indicator_per_photo() {
        let mut c = Carousel::new(5);
        assert_eq!(c.indicator_count(), 5);
        c.jump_to_indicator(3);
        assert_eq!(c.current(), 3);
        assert_eq!(c.active_indicator(), 3);
    }

    #[test]
    fn test_single_item() {
        let mut c = Carousel::new(1);
        c.go_next();
        assert_eq!(c.current(), 0);
        assert_eq!(indicator_target(19, 20, 1), 0);
    }

    proptest! {
        #[test]
        fn indicator_endpoints_cover_range(k in 2usize..40, n in 2usize..1000) {
            prop_assert_eq!(indicator_target(0, k, n), 0);
            prop_assert_eq!(indicator_target(k - 1, k, n), n - 1);
        }

        #[test]
        fn indicator_targets_in_bounds(k in 2usize..40, n in 1usize..1000, i in 0usize..40) {
            prop_assert!(indicator_target(i, k, n) < n);
        }

        #[test]
        fn next_then_prev_is_identity(n in 1usize..500, steps in 0usize..1000) {
            let mut c = Carousel::new(n);
            for _ in 0..steps { c.go_next(); }
            let at = c.current();
            c.go_next();
            c.go_prev();
            prop_assert_eq!(c.current(), at);
        }
    }
}
