//! Fixed timestep page tick
//!
//! Applies one frame's worth of input, then advances every timer-driven
//! behaviour by `dt_ms`.

use glam::Vec2;

use super::celebration::{spawn_burst, update_particles};
use super::music::MediaEvent;
use super::state::{MemoryReveal, PageState, Viewport};
use crate::Rect;

/// Carousel controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Prev,
    TogglePause,
    /// Indicator index
    Jump(usize),
}

/// Photo load outcome reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    Loaded(usize),
    Failed(usize),
}

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct PageInput {
    /// Pointer positions in viewport px, oldest first
    pub pointer_samples: Vec<Vec2>,
    /// Pointer left the document
    pub pointer_left: bool,
    /// Evasive button clicked
    pub reject: bool,
    /// Accept button clicked
    pub accept: bool,
    pub carousel: Vec<CarouselCommand>,
    /// Autoplay timer fired
    pub autoplay: bool,
    /// Mute button clicked
    pub toggle_music: bool,
    /// Click/touch/key anywhere while the unmute listener is armed
    pub interaction: bool,
    pub media: Vec<MediaEvent>,
    pub viewport: Option<Viewport>,
    /// Evasive button container and unscaled button size
    pub prompt_layout: Option<(Rect, Vec2)>,
    pub images: Vec<ImageEvent>,
}

impl PageInput {
    pub fn is_empty(&self) -> bool {
        self.pointer_samples.is_empty()
            && !self.pointer_left
            && !self.reject
            && !self.accept
            && self.carousel.is_empty()
            && !self.autoplay
            && !self.toggle_music
            && !self.interaction
            && self.media.is_empty()
            && self.viewport.is_none()
            && self.prompt_layout.is_none()
            && self.images.is_empty()
    }
}

/// Advance the page by one timestep
pub fn tick(state: &mut PageState, input: &PageInput, dt_ms: f64) {
    if state.is_torn_down() {
        return;
    }

    if let Some(viewport) = input.viewport {
        state.resize(viewport);
    }
    if let Some((container, control_size)) = input.prompt_layout {
        let attempts = state.prompt.attempts;
        state
            .prompt
            .evasive
            .set_container(container, control_size, attempts);
    }

    // Pointer: cursor trail and repulsion, one sample at a time
    for &pointer in &input.pointer_samples {
        state.cursor.pointer_moved(pointer);
        if !state.prompt.is_accepted() {
            let attempts = state.prompt.attempts;
            state.prompt.evasive.repel(pointer, attempts);
        }
    }
    if input.pointer_left {
        state.cursor.pointer_left();
    }

    if input.reject && state.prompt.reject(&mut state.rng) {
        log::info!(
            "Rejected {} time(s): \"{}\"",
            state.prompt.attempts,
            state.prompt.no_text()
        );
    }
    if input.accept && state.prompt.accept() {
        state.on_accept();
    }

    if let MemoryReveal::Carousel {
        carousel,
        shown: true,
    } = &mut state.reveal
    {
        for command in &input.carousel {
            match *command {
                CarouselCommand::Next => carousel.go_next(),
                CarouselCommand::Prev => carousel.go_prev(),
                CarouselCommand::TogglePause => carousel.toggle_pause(),
                CarouselCommand::Jump(k) => carousel.jump_to_indicator(k),
            }
        }
    }

    for &event in &input.media {
        state.music.apply(event);
    }
    if input.autoplay && state.settings.autoplay {
        state.music.begin_autoplay();
    }
    // Toggle first so a click on the mute button while the unmute listener
    // is armed is not undone by the same click's interaction
    if input.toggle_music {
        state.music.toggle();
    }
    if input.interaction {
        state.music.interaction();
    }

    for event in &input.images {
        match *event {
            ImageEvent::Loaded(index) => state.gallery.on_load(index),
            ImageEvent::Failed(index) => {
                if let Some(src) = state.gallery.on_error(index) {
                    log::debug!("Retrying memory {} as {}", index + 1, src);
                    state.queue_image_retry(index, src);
                }
            }
        }
    }

    state.time_ms += dt_ms;
    let now = state.time_ms;
    let dt_secs = (dt_ms / 1000.0) as f32;

    // Confetti
    let bursts = state.celebration.update(now, &mut state.rng);
    let cap = state.settings.max_particles();
    let viewport = state.viewport.size();
    for burst in &bursts {
        spawn_burst(burst, viewport, &mut state.particles, cap, &mut state.rng);
    }
    update_particles(&mut state.particles, dt_secs);

    match &mut state.reveal {
        MemoryReveal::Grid(grid) => grid.tick(dt_ms, now),
        MemoryReveal::Carousel { carousel, shown } => {
            if *shown {
                carousel.tick(dt_ms);
            }
        }
    }

    state.hearts.tick(dt_ms, now, &mut state.rng);
    state.cursor.step(dt_secs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{RevealMode, Settings};
    use crate::sim::prompt::Outcome;

    fn page(mode: RevealMode) -> PageState {
        let settings = Settings {
            reveal_mode: mode,
            ..Settings::default()
        };
        PageState::new(12345, settings, Viewport::default(), REFERENCE_DATE_MS)
    }

    #[test]
    fn test_tick_three_rejections() {
        let mut state = page(RevealMode::Grid);
        let input = PageInput {
            reject: true,
            ..Default::default()
        };
        for _ in 0..3 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert_eq!(state.prompt.attempts, 3);
        assert_eq!(state.prompt.no_text(), "Think again!");
        assert!((state.prompt.no_scale() - 0.7).abs() < 1e-6);
        assert_eq!(state.prompt.outcome, Outcome::Rejected { attempts: 3 });
    }

    #[test]
    fn test_tick_accept_celebrates_and_reveals() {
        let mut state = page(RevealMode::Grid);
        assert_eq!(state.visible_count(), 10);
        assert!(!state.celebration.is_active());

        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        assert_eq!(state.prompt.outcome, Outcome::Accepted);
        assert!(state.celebration.is_active());
        assert_eq!(state.visible_count(), IMAGE_COUNT);

        // Opening burst lands 100ms in
        for _ in 0..15 {
            tick(&mut state, &PageInput::default(), SIM_DT_MS);
        }
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_tick_pointer_repels_within_bounds() {
        let mut state = page(RevealMode::Grid);
        let container = Rect::new(500.0, 300.0, 320.0, 320.0);
        let layout = PageInput {
            prompt_layout: Some((container, Vec2::new(140.0, 64.0))),
            ..Default::default()
        };
        tick(&mut state, &layout, SIM_DT_MS);

        let center = state.prompt.evasive.center();
        let pointer = center + Vec2::new(-60.0, -20.0);
        let input = PageInput {
            pointer_samples: vec![pointer],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);

        let moved = state.prompt.evasive.center() - center;
        let away = center - pointer;
        assert!(moved.length() > 0.0);
        assert!(moved.dot(away) > 0.0);
        let max = state.prompt.evasive.max_offset(0);
        assert!(state.prompt.evasive.offset.abs().cmple(max + 1e-3).all());
    }

    #[test]
    fn test_tick_no_repulsion_after_accept() {
        let mut state = page(RevealMode::Grid);
        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        let before = state.prompt.evasive.offset;
        let input = PageInput {
            pointer_samples: vec![state.prompt.evasive.center()],
            reject: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.prompt.evasive.offset, before);
        assert_eq!(state.prompt.attempts, 0);
    }

    #[test]
    fn test_tick_carousel_hidden_until_accept() {
        let mut state = page(RevealMode::Carousel);
        assert_eq!(state.visible_count(), 0);
        let next = PageInput {
            carousel: vec![CarouselCommand::Next],
            ..Default::default()
        };
        tick(&mut state, &next, SIM_DT_MS);
        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        assert_eq!(state.visible_count(), IMAGE_COUNT);
        tick(&mut state, &next, SIM_DT_MS);
        let MemoryReveal::Carousel { carousel, .. } = &state.reveal else {
            panic!("expected carousel");
        };
        assert_eq!(carousel.current(), 1);

        let prev = PageInput {
            carousel: vec![CarouselCommand::Prev, CarouselCommand::Prev],
            ..Default::default()
        };
        tick(&mut state, &prev, SIM_DT_MS);
        let MemoryReveal::Carousel { carousel, .. } = &state.reveal else {
            panic!("expected carousel");
        };
        assert_eq!(carousel.current(), IMAGE_COUNT - 1);
    }

    #[test]
    fn test_tick_image_retry_queued() {
        let mut state = page(RevealMode::Grid);
        let input = PageInput {
            images: vec![ImageEvent::Failed(1), ImageEvent::Loaded(0)],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(
            state.take_image_retries(),
            vec![(1, "/Images/image 2.png".to_string())]
        );
        assert!(state.take_image_retries().is_empty());
        assert_eq!(state.gallery.loaded_count(), 1);
    }

    #[test]
    fn test_tick_music_toggle_while_armed_unmutes() {
        use crate::sim::music::PlayAttempt;

        let mut state = page(RevealMode::Grid);
        let autoplay = PageInput {
            autoplay: true,
            ..Default::default()
        };
        tick(&mut state, &autoplay, SIM_DT_MS);
        let fallback = PageInput {
            media: vec![
                MediaEvent::PlayRejected(PlayAttempt::Audible),
                MediaEvent::PlayResolved(PlayAttempt::Muted),
            ],
            ..Default::default()
        };
        tick(&mut state, &fallback, SIM_DT_MS);
        assert!(state.music.is_muted());

        let input = PageInput {
            toggle_music: true,
            interaction: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert!(!state.music.is_muted());
    }

    #[test]
    fn test_tick_autoplay_respects_settings() {
        let settings = Settings {
            autoplay: false,
            ..Settings::default()
        };
        let mut state = PageState::new(1, settings, Viewport::default(), REFERENCE_DATE_MS);
        let input = PageInput {
            autoplay: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert!(state.music.drain().is_empty());

        let mut state = page(RevealMode::Grid);
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.music.drain().len(), 2);
    }

    #[test]
    fn test_tick_resize_updates_caps() {
        let mut state = page(RevealMode::Grid);
        assert_eq!(state.hearts.cap(), HEART_CAP);
        assert!(state.cursor.enabled);
        let input = PageInput {
            viewport: Some(Viewport {
                width: 390.0,
                height: 844.0,
                coarse_pointer: true,
            }),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.hearts.cap(), HEART_CAP_SMALL);
        assert!(state.hearts.len() <= HEART_CAP_SMALL);
        assert!(!state.cursor.enabled);
    }

    #[test]
    fn test_tick_after_teardown_is_noop() {
        let mut state = page(RevealMode::Grid);
        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        state.teardown();
        assert!(!state.celebration.is_active());

        let time = state.time_ms;
        tick(&mut state, &PageInput::default(), 1000.0);
        assert_eq!(state.time_ms, time);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_tick_responds_after_frozen_gap() {
        // A page restored from the back/forward cache resumes after a long
        // freeze without any teardown in between
        let mut state = page(RevealMode::Grid);
        tick(&mut state, &PageInput::default(), SIM_DT_MS);
        let hearts = state.hearts.len();

        tick(&mut state, &PageInput::default(), 100.0);
        let reject = PageInput {
            reject: true,
            ..Default::default()
        };
        tick(&mut state, &reject, SIM_DT_MS);
        assert_eq!(state.prompt.attempts, 1);
        assert_eq!(state.hearts.len(), hearts);

        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        assert!(state.celebration.is_active());
        assert_eq!(state.visible_count(), IMAGE_COUNT);
    }

    #[test]
    fn test_input_is_empty() {
        assert!(PageInput::default().is_empty());
        let input = PageInput {
            reject: true,
            ..Default::default()
        };
        assert!(!input.is_empty());
    }
}
