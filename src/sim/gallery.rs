//! Memory photos: file references, captions and load recovery
//!
//! Photos are addressed as `<dir>/image <n>.<ext>`. A photo that fails to
//! load retries with the next extension it has not tried yet; after
//! [`MAX_LOAD_ATTEMPTS`] it is left broken and the page carries on.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LOAD_ATTEMPTS;

/// Image file extensions, in retry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageExt {
    Jpg,
    Png,
    Jpeg,
    Webp,
}

impl ImageExt {
    pub const RETRY_ORDER: [ImageExt; 4] = [ImageExt::Jpg, ImageExt::Png, ImageExt::Jpeg, ImageExt::Webp];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExt::Jpg => "jpg",
            ImageExt::Png => "png",
            ImageExt::Jpeg => "jpeg",
            ImageExt::Webp => "webp",
        }
    }
}

/// Load status of one photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Broken,
}

/// One photo and its load history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    /// Path without extension
    pub stem: String,
    pub current: ImageExt,
    tried: Vec<ImageExt>,
    pub state: LoadState,
}

impl ImageSource {
    pub fn new(stem: String, ext: ImageExt) -> Self {
        Self {
            stem,
            current: ext,
            tried: vec![ext],
            state: LoadState::Pending,
        }
    }

    /// URL for the current attempt
    pub fn src(&self) -> String {
        format!("{}.{}", self.stem, self.current.as_str())
    }

    pub fn loaded(&mut self) {
        self.state = LoadState::Loaded;
    }

    /// Record a failed load; returns the next URL to try, if any
    pub fn fail(&mut self) -> Option<String> {
        if self.state != LoadState::Pending {
            return None;
        }
        let next = (self.tried.len() < MAX_LOAD_ATTEMPTS)
            .then(|| {
                ImageExt::RETRY_ORDER
                    .into_iter()
                    .find(|ext| !self.tried.contains(ext))
            })
            .flatten();

        match next {
            Some(ext) => {
                self.tried.push(ext);
                self.current = ext;
                Some(self.src())
            }
            None => {
                log::warn!("Giving up on {} after {} attempts", self.stem, self.tried.len());
                self.state = LoadState::Broken;
                None
            }
        }
    }
}

/// Ordered photo collection; immutable apart from load bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gallery {
    pub images: Vec<ImageSource>,
    loaded: usize,
}

impl Gallery {
    /// `image 1` is a PNG, the rest are JPGs
    pub fn new(count: usize, dir: &str) -> Self {
        let images = (1..=count)
            .map(|n| {
                let ext = if n == 1 { ImageExt::Png } else { ImageExt::Jpg };
                ImageSource::new(format!("{dir}/image {n}"), ext)
            })
            .collect();
        Self { images, loaded: 0 }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Photos loaded so far
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    pub fn on_load(&mut self, index: usize) {
        if let Some(image) = self.images.get_mut(index) {
            if image.state == LoadState::Pending {
                image.loaded();
                self.loaded += 1;
            }
        }
    }

    /// Returns the retry URL, or None when the photo stays broken
    pub fn on_error(&mut self, index: usize) -> Option<String> {
        self.images.get_mut(index).and_then(ImageSource::fail)
    }
}

/// Caption for a photo, cycling through the message list
pub fn caption_for(index: usize) -> &'static str {
    MESSAGES[index % MESSAGES.len()]
}

const MESSAGES: [&str; 40] = [
    "Every moment with you is my favourite.",
    "You make my heart skip a beat.",
    "Forever isn't long enough with you.",
    "My favourite place is next to you.",
    "You're the best thing that ever happened to me.",
    "I fall for you more every day.",
    "Thank you for being you.",
    "You're my sunshine.",
    "I love our story.",
    "Together is my favourite place to be.",
    "You're the one I was waiting for.",
    "My heart belongs to you.",
    "Lucky to have you.",
    "You make ordinary moments magical.",
    "I'll choose you every time.",
    "You're my favourite hello.",
    "Here's to many more memories.",
    "You're simply the best.",
    "I love us.",
    "You're my happy place.",
    "Every photo is a little \"I love you\".",
    "You make life beautiful.",
    "My favourite adventure is you.",
    "I'll never get enough of you.",
    "You're my dream come true.",
    "Thank you for every smile.",
    "You're the love of my life.",
    "I'm so grateful for you.",
    "You're my person.",
    "I love you more than words.",
    "You're my favourite view.",
    "Here's to us.",
    "You light up my world.",
    "My heart is full because of you.",
    "You're my always.",
    "I love doing life with you.",
    "You're the best part of my day.",
    "Forever and always, you.",
    "You're my favourite memory.",
    "I love you to the moon and back.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_pattern() {
        let g = Gallery::new(3, "/Images");
        assert_eq!(g.images[0].src(), "/Images/image 1.png");
        assert_eq!(g.images[1].src(), "/Images/image 2.jpg");
        assert_eq!(g.images[2].src(), "/Images/image 3.jpg");
    }

    #[test]
    fn test_retry_then_give_up() {
        let mut img = ImageSource::new("/Images/image 2".into(), ImageExt::Jpg);
        assert_eq!(img.fail().as_deref(), Some("/Images/image 2.png"));
        assert_eq!(img.fail().as_deref(), Some("/Images/image 2.jpeg"));
        assert_eq!(img.fail(), None);
        assert_eq!(img.state, LoadState::Broken);
        assert_eq!(img.fail(), None);
    }

    #[test]
    fn test_png_retries_jpg_first() {
        let mut img = ImageSource::new("/Images/image 1".into(), ImageExt::Png);
        assert_eq!(img.fail().as_deref(), Some("/Images/image 1.jpg"));
    }

    #[test]
    fn test_loaded_count_bubbles_once() {
        let mut g = Gallery::new(5, "/Images");
        g.on_load(1);
        g.on_load(1);
        g.on_load(4);
        g.on_load(99);
        assert_eq!(g.loaded_count(), 2);
        assert_eq!(g.on_error(1), None);
    }

    #[test]
    fn test_caption_wraps() {
        assert_eq!(caption_for(0), caption_for(40));
        assert_ne!(caption_for(0), caption_for(1));
    }

    #[test]
    fn test_empty_gallery() {
        let g = Gallery::new(0, "/Images");
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
    }
}
