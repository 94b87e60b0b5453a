//! Deterministic page model
//!
//! Every behaviour of the page lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time comes from the tick, never from the clock
//! - No DOM or platform dependencies

pub mod carousel;
pub mod celebration;
pub mod cursor;
pub mod days;
pub mod evasive;
pub mod gallery;
pub mod hearts;
pub mod layout;
pub mod music;
pub mod prompt;
pub mod reveal;
pub mod state;
pub mod tick;

pub use carousel::Carousel;
pub use celebration::{Burst, Celebration, Particle};
pub use cursor::CursorTrail;
pub use gallery::{Gallery, LoadState};
pub use hearts::{Heart, HeartField};
pub use layout::{LayoutPosition, ViewportBucket};
pub use music::{MediaEvent, MusicCommand, MusicState, PlayAttempt};
pub use prompt::{Outcome, Prompt};
pub use reveal::GridReveal;
pub use state::{MemoryReveal, PageState, Viewport};
pub use tick::{CarouselCommand, ImageEvent, PageInput, tick};
