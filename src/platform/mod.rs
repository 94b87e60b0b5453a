//! Browser platform layer
//!
//! Everything that touches `web_sys` lives here:
//! - Scoped listener, timer and frame handles
//! - Scene application to the DOM
//! - Background music playback
//! - Confetti canvas

pub mod audio;
pub mod confetti;
pub mod dom;
pub mod handles;

pub use audio::{BackgroundMusic, MediaSink};
pub use confetti::ConfettiCanvas;
pub use dom::{Dom, InputCell};
pub use handles::{FrameLoop, Listener, Timeout};

use crate::sim::Viewport;

/// Snapshot the window size and primary pointer
pub fn read_viewport(window: &web_sys::Window) -> Viewport {
    let dimension = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).map(|v| v as f32)
    };
    let defaults = Viewport::default();
    let coarse_pointer = window
        .match_media("(pointer: coarse)")
        .ok()
        .flatten()
        .is_some_and(|mq| mq.matches());
    Viewport {
        width: dimension(window.inner_width()).unwrap_or(defaults.width),
        height: dimension(window.inner_height()).unwrap_or(defaults.height),
        coarse_pointer,
    }
}
