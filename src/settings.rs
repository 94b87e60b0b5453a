//! Page settings
//!
//! Defaults are the compile-time constants in [`crate::consts`]. A page can
//! override them with an embedded JSON block; nothing is ever persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::sim::layout::ViewportBucket;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum confetti particles alive at once
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => 1200,
            QualityPreset::High => 3000,
        }
    }
}

/// Which memory reveal design the page uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Collage of every photo over a deterministic grid
    #[default]
    Grid,
    /// One photo at a time with caption and indicators
    Carousel,
}

/// Page settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    pub reveal_mode: RevealMode,

    // === Memories ===
    pub image_count: usize,
    pub image_dir: String,
    pub preview_limit: usize,

    // === Audio ===
    /// Volume used whenever music is audible (0.0 - 1.0)
    pub music_volume: f32,
    pub autoplay: bool,

    // === Accessibility ===
    /// Reduced motion (no confetti particles, no wobble)
    pub reduced_motion: bool,

    // === Day counter ===
    pub reference_date_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            reveal_mode: RevealMode::Grid,

            image_count: IMAGE_COUNT,
            image_dir: IMAGE_DIR.to_string(),
            preview_limit: PREVIEW_LIMIT,

            music_volume: MUSIC_VOLUME,
            autoplay: true,

            reduced_motion: false,

            reference_date_ms: REFERENCE_DATE_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Effective particle cap (respects reduced_motion)
    pub fn max_particles(&self) -> usize {
        if self.reduced_motion {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Floating heart cap for a viewport bucket
    pub fn heart_cap(&self, bucket: ViewportBucket) -> usize {
        let cap = match bucket {
            ViewportBucket::Mobile => HEART_CAP_SMALL,
            ViewportBucket::Tablet | ViewportBucket::Desktop => HEART_CAP,
        };
        if self.quality == QualityPreset::Low {
            cap / 2
        } else {
            cap
        }
    }

    /// Effective wobble (respects reduced_motion)
    pub fn wobble(&self) -> bool {
        !self.reduced_motion
    }

    /// DOM id of the embedded JSON override
    const ELEMENT_ID: &'static str = "page-settings";

    /// Load settings embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        let mut settings = document
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content())
            .map(|json| match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded embedded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("{e}; using default settings");
                    Self::default()
                }
            })
            .unwrap_or_default();

        let prefers_reduced = web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|mq| mq.matches())
            .unwrap_or(false);
        if prefers_reduced {
            settings.reduced_motion = true;
        }
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} on native, using defaults", Self::ELEMENT_ID);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"reveal_mode":"carousel","quality":"high"}"#).unwrap();
        assert_eq!(s.reveal_mode, RevealMode::Carousel);
        assert_eq!(s.quality, QualityPreset::High);
        assert_eq!(s.image_count, IMAGE_COUNT);
        assert_eq!(s.preview_limit, PREVIEW_LIMIT);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::PageError::Config(_)));
    }

    #[test]
    fn test_volume_clamped() {
        let s = Settings::from_json(r#"{"music_volume":4.0}"#).unwrap();
        assert_eq!(s.music_volume, 1.0);
    }

    #[test]
    fn test_reduced_motion_disables_particles() {
        let mut s = Settings::default();
        assert!(s.max_particles() > 0);
        s.reduced_motion = true;
        assert_eq!(s.max_particles(), 0);
        assert!(!s.wobble());
    }

    #[test]
    fn test_heart_cap_by_bucket() {
        let mut s = Settings::default();
        assert_eq!(s.heart_cap(ViewportBucket::Desktop), HEART_CAP);
        assert_eq!(s.heart_cap(ViewportBucket::Mobile), HEART_CAP_SMALL);
        s.quality = QualityPreset::Low;
        assert_eq!(s.heart_cap(ViewportBucket::Desktop), HEART_CAP / 2);
    }
}
