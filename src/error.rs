//! Page setup errors
//!
//! Media failures are not errors: images retry alternate extensions and
//! autoplay falls back to muted playback. Only page wiring and settings
//! parsing can fail, and neither is fatal to the session.

use std::fmt;

#[derive(Debug)]
pub enum PageError {
    /// A required DOM element is missing
    MissingElement(&'static str),
    /// A browser API call was rejected
    Js(String),
    /// Embedded settings JSON did not parse
    Config(serde_json::Error),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::MissingElement(id) => write!(f, "missing element: #{id}"),
            PageError::Js(msg) => write!(f, "browser error: {msg}"),
            PageError::Config(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for PageError {}

impl From<serde_json::Error> for PageError {
    fn from(e: serde_json::Error) -> Self {
        PageError::Config(e)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PageError {
    fn from(e: wasm_bindgen::JsValue) -> Self {
        PageError::Js(format!("{e:?}"))
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
