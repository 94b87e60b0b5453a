//! Applies a [`Scene`] to the page's elements
//!
//! Static structure comes from the host page; tiles, hearts and carousel
//! indicators are created on demand. Element writes are skipped when the
//! value has not changed since the previous frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement};

use super::confetti::ConfettiCanvas;
use super::handles::Listener;
use crate::sim::carousel::indicator_target;
use crate::sim::{CarouselCommand, ImageEvent, PageInput, Viewport};
use crate::view::{CarouselView, HeartView, QuestionView, Scene, TileView};
use crate::{PageError, Rect, Result};

/// Input shared between listeners and the frame loop
pub type InputCell = Rc<RefCell<PageInput>>;

fn by_id<T: JsCast>(document: &Document, id: &'static str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or(PageError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| PageError::MissingElement(id))
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| PageError::Js(format!("<{tag}> has an unexpected type")))
}

fn set_text(el: &Element, text: &str) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

/// Writes inline style only when it changed
fn set_style(el: &HtmlElement, last: &mut String, css: String) {
    if *last != css {
        el.style().set_css_text(&css);
        *last = css;
    }
}

/// Photo index carried on an image element
fn image_index(event: &Event) -> Option<usize> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .get_attribute("data-index")?
        .parse()
        .ok()
}

fn image_listeners(img: &HtmlImageElement, input: &InputCell) -> Result<[Listener; 2]> {
    let on_load = {
        let input = input.clone();
        Listener::new(img, "load", move |event| {
            if let Some(index) = image_index(&event) {
                input.borrow_mut().images.push(ImageEvent::Loaded(index));
            }
        })?
    };
    let on_error = {
        let input = input.clone();
        Listener::new(img, "error", move |event| {
            if let Some(index) = image_index(&event) {
                input.borrow_mut().images.push(ImageEvent::Failed(index));
            }
        })?
    };
    Ok([on_load, on_error])
}

struct Tile {
    img: HtmlImageElement,
    style: String,
    broken: bool,
    _listeners: [Listener; 2],
}

struct Heart {
    el: HtmlElement,
    style: String,
}

struct Indicator {
    el: Element,
    _listener: Listener,
}

pub struct Dom {
    document: Document,
    input: InputCell,

    headline: Element,
    subtitle: Element,
    message: Element,
    hint: Element,
    yes_btn: Element,
    no_zone: Element,
    no_btn: HtmlElement,
    no_style: String,

    collage: Element,
    tiles: Vec<Tile>,

    carousel: Element,
    carousel_img: HtmlImageElement,
    carousel_caption: Element,
    carousel_label: Element,
    carousel_pause: Element,
    carousel_dots: Element,
    indicators: Vec<Indicator>,
    _carousel_listeners: [Listener; 2],

    hearts_root: Element,
    hearts: HashMap<u64, Heart>,

    cursor: HtmlElement,
    cursor_style: String,
    music_btn: Element,
    days: Element,
    loaded: Element,

    confetti: ConfettiCanvas,
    canvas_size: (f32, f32),
}

impl Dom {
    pub fn new(document: &Document, input: InputCell) -> Result<Self> {
        let carousel_img: HtmlImageElement = by_id(document, "carousel-img")?;
        let carousel_listeners = image_listeners(&carousel_img, &input)?;
        Ok(Self {
            document: document.clone(),
            headline: by_id(document, "question")?,
            subtitle: by_id(document, "subtitle")?,
            message: by_id(document, "message")?,
            hint: by_id(document, "hint")?,
            yes_btn: by_id(document, "yes-btn")?,
            no_zone: by_id(document, "no-zone")?,
            no_btn: by_id(document, "no-btn")?,
            no_style: String::new(),
            collage: by_id(document, "collage")?,
            tiles: Vec::new(),
            carousel: by_id(document, "carousel")?,
            carousel_img,
            carousel_caption: by_id(document, "carousel-caption")?,
            carousel_label: by_id(document, "carousel-label")?,
            carousel_pause: by_id(document, "carousel-pause")?,
            carousel_dots: by_id(document, "carousel-dots")?,
            indicators: Vec::new(),
            _carousel_listeners: carousel_listeners,
            hearts_root: by_id(document, "hearts")?,
            hearts: HashMap::new(),
            cursor: by_id(document, "cursor")?,
            cursor_style: String::new(),
            music_btn: by_id(document, "music-btn")?,
            days: by_id(document, "days")?,
            loaded: by_id(document, "loaded")?,
            confetti: ConfettiCanvas::new(by_id(document, "confetti")?)?,
            canvas_size: (0.0, 0.0),
            input,
        })
    }

    /// Current evasive container and unscaled button size
    pub fn prompt_layout(&self) -> (Rect, Vec2) {
        let r = self.no_zone.get_bounding_client_rect();
        let container = Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32);
        let size = Vec2::new(self.no_btn.offset_width() as f32, self.no_btn.offset_height() as f32);
        (container, size)
    }

    /// Resize the confetti canvas when the viewport changed
    pub fn sync_canvas(&mut self, viewport: &Viewport, dpr: f64) {
        let size = (viewport.width, viewport.height);
        if size != self.canvas_size {
            self.canvas_size = size;
            self.confetti.resize(viewport.width, viewport.height, dpr);
        }
    }

    /// Point a failed photo at its next candidate URL
    pub fn retry_image(&self, index: usize, src: &str) {
        if let Some(tile) = self.tiles.get(index) {
            tile.img.set_src(src);
        }
        let showing = self.carousel_img.get_attribute("data-index");
        if showing.as_deref() == Some(index.to_string().as_str()) {
            self.carousel_img.set_src(src);
        }
    }

    pub fn apply(&mut self, scene: &Scene) -> Result<()> {
        self.apply_question(&scene.question);
        self.apply_tiles(&scene.tiles)?;
        self.apply_carousel(scene.carousel.as_ref())?;
        self.apply_hearts(&scene.hearts)?;

        match &scene.cursor {
            Some(c) => {
                set_hidden(&self.cursor, false);
                let css = format!("transform: translate({:.1}px, {:.1}px)", c.x - 12.0, c.y - 12.0);
                set_style(&self.cursor, &mut self.cursor_style, css);
            }
            None => set_hidden(&self.cursor, true),
        }

        let _ = self.music_btn.set_attribute("aria-label", scene.music.label);
        set_text(&self.music_btn, if scene.music.started && !scene.music.muted { "🎵" } else { "🔇" });
        let _ = self.music_btn.class_list().toggle_with_force("muted", scene.music.muted);

        set_text(&self.days, &scene.days);
        set_text(&self.loaded, &format!("{} / {}", scene.loaded, scene.total));

        self.confetti.draw(&scene.confetti);
        Ok(())
    }

    fn apply_question(&mut self, q: &QuestionView) {
        set_text(&self.headline, q.headline);
        set_text(&self.subtitle, q.subtitle);
        set_text(&self.no_btn, q.no_text);
        set_hidden(&self.yes_btn, q.accepted);
        set_hidden(&self.no_zone, q.accepted);
        set_hidden(&self.message, q.message.is_none());
        set_hidden(&self.hint, q.hint.is_none());
        if let Some(message) = q.message {
            set_text(&self.message, message);
        }
        if let Some(hint) = q.hint {
            set_text(&self.hint, hint);
        }

        let css = format!(
            "transform: translate({:.1}px, {:.1}px) scale({:.3}) rotate({:.2}deg)",
            q.no_offset[0], q.no_offset[1], q.no_scale, q.no_rotation
        );
        set_style(&self.no_btn, &mut self.no_style, css);
    }

    fn create_tile(&self, tile: &TileView) -> Result<Tile> {
        let img: HtmlImageElement = create(&self.document, "img")?;
        img.set_class_name("memory-tile");
        img.set_alt(tile.caption);
        img.set_title(tile.caption);
        img.set_attribute("data-index", &tile.index.to_string())?;
        let listeners = image_listeners(&img, &self.input)?;
        img.set_src(&tile.src);
        self.collage.append_child(&img)?;
        Ok(Tile {
            img,
            style: String::new(),
            broken: false,
            _listeners: listeners,
        })
    }

    fn apply_tiles(&mut self, tiles: &[TileView]) -> Result<()> {
        set_hidden(&self.collage, tiles.is_empty());
        while self.tiles.len() < tiles.len() {
            let tile = self.create_tile(&tiles[self.tiles.len()])?;
            self.tiles.push(tile);
        }

        for (view, tile) in tiles.iter().zip(self.tiles.iter_mut()) {
            let css = format!(
                "left: {:.2}%; top: {:.2}%; width: {size}px; height: {size}px; opacity: {:.3}; \
                 transform: translate(-50%, -50%) rotate({:.1}deg) scale({:.3})",
                view.x,
                view.y,
                view.opacity,
                view.rotation,
                view.scale,
                size = view.size,
            );
            set_style(&tile.img, &mut tile.style, css);
            if view.broken != tile.broken {
                tile.broken = view.broken;
                let _ = tile.img.class_list().toggle_with_force("broken", view.broken);
            }
        }
        Ok(())
    }

    fn apply_carousel(&mut self, carousel: Option<&CarouselView>) -> Result<()> {
        let Some(view) = carousel else {
            set_hidden(&self.carousel, true);
            return Ok(());
        };
        set_hidden(&self.carousel, false);

        let index = view.index.to_string();
        if self.carousel_img.get_attribute("data-index").as_deref() != Some(index.as_str()) {
            self.carousel_img.set_attribute("data-index", &index)?;
            self.carousel_img.set_alt(view.caption);
            self.carousel_img.set_src(&view.src);
        }
        set_text(&self.carousel_caption, view.caption);
        set_text(&self.carousel_label, &view.label);
        let _ = self.carousel_pause.set_attribute("aria-label", view.pause_label);
        set_text(&self.carousel_pause, if view.paused { "▶" } else { "⏸" });

        while self.indicators.len() < view.indicator_count {
            let k = self.indicators.len();
            let el = self.document.create_element("button")?;
            el.set_class_name("carousel-dot");
            let target = indicator_target(k, view.indicator_count, view.total);
            el.set_attribute("aria-label", &format!("Go to memory {}", target + 1))?;
            let input = self.input.clone();
            let listener = Listener::new(&el, "click", move |_| {
                input.borrow_mut().carousel.push(CarouselCommand::Jump(k));
            })?;
            self.carousel_dots.append_child(&el)?;
            self.indicators.push(Indicator {
                el,
                _listener: listener,
            });
        }
        for (k, dot) in self.indicators.iter().enumerate() {
            let _ = dot
                .el
                .class_list()
                .toggle_with_force("active", k == view.active_indicator);
        }
        Ok(())
    }

    fn apply_hearts(&mut self, hearts: &[HeartView]) -> Result<()> {
        self.hearts.retain(|id, heart| {
            let keep = hearts.iter().any(|h| h.id == *id);
            if !keep {
                heart.el.remove();
            }
            keep
        });

        for view in hearts {
            if !self.hearts.contains_key(&view.id) {
                let el: HtmlElement = create(&self.document, "span")?;
                el.set_class_name("heart");
                el.set_text_content(Some("❤"));
                self.hearts_root.append_child(&el)?;
                self.hearts.insert(
                    view.id,
                    Heart {
                        el,
                        style: String::new(),
                    },
                );
            }
            if let Some(heart) = self.hearts.get_mut(&view.id) {
                let css = format!(
                    "left: {:.1}%; top: {:.1}%; font-size: {:.0}px; opacity: {:.3}; transform: translateY({:.1}px)",
                    view.x, view.y, view.size, view.opacity, view.rise
                );
                set_style(&heart.el, &mut heart.style, css);
            }
        }
        Ok(())
    }
}
