//! Render description
//!
//! [`scene`] turns the page state into a flat, serializable snapshot. The
//! platform layer diffs nothing: it simply applies the latest snapshot each
//! frame, so the view is always a pure function of the state.

use serde::Serialize;

use crate::consts::*;
use crate::sim::carousel::Carousel;
use crate::sim::celebration::CONFETTI_COLORS;
use crate::sim::days::format_days;
use crate::sim::evasive::{scale_for, wobble_degrees};
use crate::sim::gallery::{LoadState, caption_for};
use crate::sim::reveal::{GridReveal, tile_appearance};
use crate::sim::{MemoryReveal, PageState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub headline: &'static str,
    pub subtitle: &'static str,
    pub accepted: bool,
    /// Celebration message, shown once accepted
    pub message: Option<&'static str>,
    pub hint: Option<&'static str>,
    pub no_text: &'static str,
    /// Offset of the evasive button from its resting centre (px)
    pub no_offset: [f32; 2],
    pub no_scale: f32,
    /// Degrees
    pub no_rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub index: usize,
    pub src: String,
    pub caption: &'static str,
    /// Viewport percent
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation: f32,
    pub opacity: f32,
    pub scale: f32,
    pub broken: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView {
    pub index: usize,
    pub src: String,
    pub caption: &'static str,
    pub label: String,
    pub paused: bool,
    pub pause_label: &'static str,
    pub active_indicator: usize,
    pub indicator_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartView {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Vertical travel in px
    pub rise: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorView {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicView {
    pub started: bool,
    pub muted: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfettiView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub color: &'static str,
    pub alpha: f32,
}

/// Everything the DOM needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub question: QuestionView,
    pub tiles: Vec<TileView>,
    pub carousel: Option<CarouselView>,
    pub hearts: Vec<HeartView>,
    pub cursor: Option<CursorView>,
    pub music: MusicView,
    pub confetti: Vec<ConfettiView>,
    pub days: String,
    pub loaded: usize,
    pub total: usize,
}

pub fn scene(state: &PageState) -> Scene {
    let now = state.time_ms;
    let (tiles, carousel) = match &state.reveal {
        MemoryReveal::Grid(grid) => (tiles(state, grid), None),
        MemoryReveal::Carousel { carousel, shown } => {
            (Vec::new(), shown.then(|| carousel_view(state, carousel)).flatten())
        }
    };

    Scene {
        question: question(state),
        tiles,
        carousel,
        hearts: state
            .hearts
            .hearts()
            .map(|h| HeartView {
                id: h.id,
                x: h.x,
                y: h.y,
                size: h.size,
                rise: h.rise(now, state.viewport.height),
                opacity: h.opacity(now),
            })
            .collect(),
        cursor: state.cursor.is_shown().then(|| CursorView {
            x: state.cursor.pos.x,
            y: state.cursor.pos.y,
        }),
        music: music(state),
        confetti: state
            .particles
            .iter()
            .map(|p| ConfettiView {
                x: p.pos.x,
                y: p.pos.y,
                size: p.size,
                angle: p.spin * (1.0 - p.life),
                color: CONFETTI_COLORS[p.color as usize % CONFETTI_COLORS.len()],
                alpha: p.life.clamp(0.0, 1.0),
            })
            .collect(),
        days: format_days(state.days),
        loaded: state.gallery.loaded_count(),
        total: state.gallery.len(),
    }
}

fn question(state: &PageState) -> QuestionView {
    let prompt = &state.prompt;
    let accepted = prompt.is_accepted();
    let rotation = if state.settings.wobble() && !accepted {
        wobble_degrees(prompt.attempts, state.time_ms)
    } else {
        0.0
    };
    QuestionView {
        headline: QUESTION,
        subtitle: SUBTITLE,
        accepted,
        message: accepted.then_some(CELEBRATION_MESSAGE),
        hint: accepted.then_some(SCROLL_HINT),
        no_text: prompt.no_text(),
        no_offset: prompt.evasive.offset.to_array(),
        no_scale: scale_for(prompt.attempts),
        no_rotation: rotation,
    }
}

fn tiles(state: &PageState, grid: &GridReveal) -> Vec<TileView> {
    let bucket = state.viewport.bucket();
    let Some(positions) = state.layout.get(bucket) else {
        return Vec::new();
    };
    let size = bucket.tile_size();

    state
        .gallery
        .images
        .iter()
        .zip(positions)
        .take(grid.visible())
        .enumerate()
        .map(|(index, (image, pos))| {
            let (opacity, scale) = tile_appearance(grid.progress(index, state.time_ms));
            TileView {
                index,
                src: image.src(),
                caption: caption_for(index),
                x: pos.x,
                y: pos.y,
                size,
                rotation: pos.rotation,
                opacity,
                scale,
                broken: image.state == LoadState::Broken,
            }
        })
        .collect()
}

fn carousel_view(state: &PageState, carousel: &Carousel) -> Option<CarouselView> {
    let index = carousel.current();
    let image = state.gallery.images.get(index)?;
    Some(CarouselView {
        index,
        src: image.src(),
        caption: caption_for(index),
        label: carousel.label(),
        paused: carousel.is_paused(),
        pause_label: if carousel.is_paused() {
            "Resume auto-play"
        } else {
            "Pause auto-play"
        },
        active_indicator: carousel.active_indicator(),
        indicator_count: carousel.indicator_count(),
        total: carousel.total(),
    })
}

fn music(state: &PageState) -> MusicView {
    let music = &state.music;
    let label = if !music.has_started() {
        "Start music"
    } else if music.is_muted() {
        "Unmute music (tap anywhere to hear)"
    } else {
        "Mute music"
    };
    MusicView {
        started: music.has_started(),
        muted: music.is_muted(),
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RevealMode, Settings};
    use crate::sim::{PageInput, Viewport, tick};

    fn page(mode: RevealMode) -> PageState {
        let settings = Settings {
            reveal_mode: mode,
            ..Settings::default()
        };
        PageState::new(7, settings, Viewport::default(), REFERENCE_DATE_MS + MS_PER_DAY * 1500.0)
    }

    fn accept(state: &mut PageState) {
        let input = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(state, &input, SIM_DT_MS);
    }

    #[test]
    fn test_initial_scene() {
        let state = page(RevealMode::Grid);
        let s = scene(&state);
        assert_eq!(s.question.headline, QUESTION);
        assert_eq!(s.question.no_text, "No");
        assert!(!s.question.accepted);
        assert!(s.question.message.is_none());
        assert_eq!(s.tiles.len(), 10);
        assert_eq!(s.tiles[0].src, "/Images/image 1.png");
        assert_eq!(s.tiles[1].src, "/Images/image 2.jpg");
        assert!(s.carousel.is_none());
        assert_eq!(s.days, "1,500");
        assert_eq!(s.total, IMAGE_COUNT);
        assert_eq!(s.music.label, "Start music");
        assert!(s.cursor.is_none());
    }

    #[test]
    fn test_accepted_scene() {
        let mut state = page(RevealMode::Grid);
        accept(&mut state);
        let s = scene(&state);
        assert!(s.question.accepted);
        assert_eq!(s.question.message, Some(CELEBRATION_MESSAGE));
        assert_eq!(s.question.hint, Some(SCROLL_HINT));
        assert_eq!(s.question.no_rotation, 0.0);
        assert_eq!(s.tiles.len(), IMAGE_COUNT);
    }

    #[test]
    fn test_tiles_settle_after_stagger() {
        let mut state = page(RevealMode::Grid);
        accept(&mut state);
        for _ in 0..120 {
            tick(&mut state, &PageInput::default(), SIM_DT_MS);
        }
        let s = scene(&state);
        let last = &s.tiles[IMAGE_COUNT - 1];
        assert!((last.opacity - 0.95).abs() < 1e-4);
        assert!((last.scale - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_carousel_scene_after_accept() {
        let mut state = page(RevealMode::Carousel);
        assert!(scene(&state).carousel.is_none());
        accept(&mut state);
        let s = scene(&state);
        assert!(s.tiles.is_empty());
        let carousel = s.carousel.expect("carousel shown");
        assert_eq!(carousel.label, format!("Memory 1 of {IMAGE_COUNT}"));
        assert_eq!(carousel.indicator_count, INDICATOR_COUNT);
        assert_eq!(carousel.pause_label, "Pause auto-play");
    }

    #[test]
    fn test_empty_carousel_renders_nothing() {
        let settings = Settings {
            reveal_mode: RevealMode::Carousel,
            image_count: 0,
            ..Settings::default()
        };
        let mut state = PageState::new(1, settings, Viewport::default(), REFERENCE_DATE_MS);
        accept(&mut state);
        assert!(scene(&state).carousel.is_none());
    }

    #[test]
    fn test_scene_serializes() {
        let state = page(RevealMode::Grid);
        let json = serde_json::to_string(&scene(&state)).unwrap();
        assert!(json.contains("\"headline\""));
    }
}
