//! Be Mine entry point
//!
//! Handles platform-specific initialization and runs the page loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, PageTransitionEvent, TouchEvent, Window};

    use be_mine::consts::*;
    use be_mine::platform::{
        BackgroundMusic, Dom, FrameLoop, InputCell, Listener, MediaSink, Timeout, read_viewport,
    };
    use be_mine::sim::{CarouselCommand, MusicCommand, PageInput, PageState, tick};
    use be_mine::view::scene;
    use be_mine::{PageError, Result, Settings};

    /// Page instance holding all state
    struct App {
        state: PageState,
        dom: Dom,
        music: BackgroundMusic,
        window: Window,
        document: Document,
        input: InputCell,
        /// First-interaction listeners while a muted start waits to unmute
        unmute: Option<Vec<Listener>>,
        accumulator: f64,
        last_time: f64,
    }

    impl App {
        /// Run simulation ticks, then present
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).min(100.0)
            } else {
                SIM_DT_MS
            };
            self.last_time = time;
            self.accumulator += dt;

            // The zone scrolls with the page, so it is measured every frame
            self.input.borrow_mut().prompt_layout = Some(self.dom.prompt_layout());

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                // One-shot input is consumed by the first substep only
                let input = if substeps == 0 {
                    std::mem::take(&mut *self.input.borrow_mut())
                } else {
                    PageInput::default()
                };
                tick(&mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT_MS);
            }

            self.run_music_commands();
            for (index, src) in self.state.take_image_retries() {
                self.dom.retry_image(index, &src);
            }

            self.dom
                .sync_canvas(&self.state.viewport, self.window.device_pixel_ratio());
            if let Err(e) = self.dom.apply(&scene(&self.state)) {
                log::warn!("Render error: {e}");
            }
        }

        fn run_music_commands(&mut self) {
            for command in self.state.music.drain() {
                match command {
                    MusicCommand::ArmUnmute => match self.arm_unmute() {
                        Ok(listeners) => self.unmute = Some(listeners),
                        Err(e) => log::warn!("Could not arm unmute: {e}"),
                    },
                    MusicCommand::DisarmUnmute => self.unmute = None,
                    other => self.music.execute(other),
                }
            }
        }

        fn arm_unmute(&self) -> Result<Vec<Listener>> {
            ["click", "touchstart", "keydown"]
                .into_iter()
                .map(|event| {
                    let input = self.input.clone();
                    Listener::new(&self.document, event, move |_| {
                        input.borrow_mut().interaction = true;
                    })
                })
                .collect()
        }

        fn teardown(&mut self) {
            self.unmute = None;
            self.music.stop();
            self.state.teardown();
        }
    }

    /// Everything that keeps the page alive
    struct Page {
        app: Rc<RefCell<App>>,
        _listeners: Vec<Listener>,
        _autoplay: Timeout,
        _frame: FrameLoop,
    }

    thread_local! {
        static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    }

    /// Cancel every listener, timer and frame and stop the music
    #[wasm_bindgen]
    pub fn teardown() {
        let page = PAGE.with(|p| p.borrow_mut().take());
        if let Some(page) = page {
            page.app.borrow_mut().teardown();
            drop(page);
        }
    }

    fn window() -> Result<Window> {
        web_sys::window().ok_or(PageError::MissingElement("window"))
    }

    pub fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Be Mine starting...");

        let window = window()?;
        let document = window
            .document()
            .ok_or(PageError::MissingElement("document"))?;

        let settings = Settings::load();
        let viewport = read_viewport(&window);
        let now = js_sys::Date::now();
        let seed = now as u64;
        let state = PageState::new(seed, settings, viewport, now);
        log::info!("Page initialized with seed: {}", seed);

        let input: InputCell = Rc::new(RefCell::new(PageInput::default()));
        let sink: MediaSink = {
            let input = input.clone();
            Rc::new(move |event| input.borrow_mut().media.push(event))
        };
        let music = BackgroundMusic::new(MUSIC_SRC, state.music.current_volume(), sink)?;
        let dom = Dom::new(&document, input.clone())?;

        let app = Rc::new(RefCell::new(App {
            state,
            dom,
            music,
            window: window.clone(),
            document: document.clone(),
            input: input.clone(),
            unmute: None,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        let listeners = setup_input_handlers(&window, &document, &input)?;

        let autoplay = {
            let input = input.clone();
            Timeout::new(AUTOPLAY_DELAY_MS, move || input.borrow_mut().autoplay = true)?
        };

        let frame = {
            let app = app.clone();
            FrameLoop::start(move |time| app.borrow_mut().frame(time))?
        };

        PAGE.with(|p| {
            *p.borrow_mut() = Some(Page {
                app,
                _listeners: listeners,
                _autoplay: autoplay,
                _frame: frame,
            })
        });

        // Lives for the whole document; teardown is idempotent.
        // A page kept in the back/forward cache must still work when restored.
        let on_pagehide = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if !persisted {
                teardown();
            }
        });
        window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;
        on_pagehide.forget();

        log::info!("Be Mine running!");
        Ok(())
    }

    fn on_click<F>(document: &Document, id: &'static str, mut apply: F, input: &InputCell) -> Result<Listener>
    where
        F: FnMut(&mut PageInput) + 'static,
    {
        let el = document
            .get_element_by_id(id)
            .ok_or(PageError::MissingElement(id))?;
        let input = input.clone();
        Listener::new(&el, "click", move |_| apply(&mut input.borrow_mut()))
    }

    fn setup_input_handlers(window: &Window, document: &Document, input: &InputCell) -> Result<Vec<Listener>> {
        let mut listeners = vec![
            on_click(document, "yes-btn", |i| i.accept = true, input)?,
            on_click(document, "no-btn", |i| i.reject = true, input)?,
            on_click(document, "music-btn", |i| i.toggle_music = true, input)?,
            on_click(document, "carousel-prev", |i| i.carousel.push(CarouselCommand::Prev), input)?,
            on_click(document, "carousel-next", |i| i.carousel.push(CarouselCommand::Next), input)?,
            on_click(
                document,
                "carousel-pause",
                |i| i.carousel.push(CarouselCommand::TogglePause),
                input,
            )?,
        ];

        {
            let input = input.clone();
            listeners.push(Listener::new(window, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    let pointer = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    input.borrow_mut().pointer_samples.push(pointer);
                }
            })?);
        }

        {
            let input = input.clone();
            listeners.push(Listener::new(window, "touchmove", move |event| {
                if let Some(touch) = event.dyn_ref::<TouchEvent>().and_then(|e| e.touches().get(0)) {
                    let pointer = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    input.borrow_mut().pointer_samples.push(pointer);
                }
            })?);
        }

        {
            let input = input.clone();
            listeners.push(Listener::new(document, "mouseleave", move |_| {
                input.borrow_mut().pointer_left = true;
            })?);
        }

        {
            let input = input.clone();
            let window_clone = window.clone();
            listeners.push(Listener::new(window, "resize", move |_| {
                input.borrow_mut().viewport = Some(read_viewport(&window_clone));
            })?);
        }

        {
            let input = input.clone();
            listeners.push(Listener::new(window, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let command = match event.key().as_str() {
                    "ArrowLeft" => CarouselCommand::Prev,
                    "ArrowRight" => CarouselCommand::Next,
                    _ => return,
                };
                input.borrow_mut().carousel.push(command);
            })?);
        }

        Ok(listeners)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_page::run() {
        log::error!("Failed to start page: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> be_mine::Result<()> {
    env_logger::init();
    log::info!("Be Mine (native) starting...");
    log::info!("The page itself runs in the browser - build for wasm32 and serve index.html");

    let scene = headless::run();
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Scripted session against the simulation, for a quick look without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use be_mine::consts::*;
    use be_mine::sim::{PageInput, PageState, Viewport, tick};
    use be_mine::view::{Scene, scene};
    use be_mine::{Rect, Settings};

    fn run_for(state: &mut PageState, ms: f64) {
        let steps = (ms / SIM_DT_MS).ceil() as usize;
        for _ in 0..steps {
            tick(state, &PageInput::default(), SIM_DT_MS);
        }
    }

    pub fn run() -> Scene {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(REFERENCE_DATE_MS);
        let mut state = PageState::new(42, Settings::load(), Viewport::default(), now);

        let layout = PageInput {
            prompt_layout: Some((Rect::new(512.0, 420.0, 256.0, 256.0), Vec2::new(120.0, 60.0))),
            autoplay: true,
            ..Default::default()
        };
        tick(&mut state, &layout, SIM_DT_MS);

        // Chase the button a little, then refuse three times
        let centre = state.prompt.evasive.center();
        let chase = PageInput {
            pointer_samples: (0..5).map(|i| centre + Vec2::new(-80.0 + i as f32 * 10.0, 0.0)).collect(),
            ..Default::default()
        };
        tick(&mut state, &chase, SIM_DT_MS);
        for _ in 0..3 {
            let reject = PageInput {
                reject: true,
                ..Default::default()
            };
            tick(&mut state, &reject, SIM_DT_MS);
            run_for(&mut state, 400.0);
        }
        log::info!(
            "After {} rejections the button reads \"{}\"",
            state.prompt.attempts,
            state.prompt.no_text()
        );

        let accept = PageInput {
            accept: true,
            ..Default::default()
        };
        tick(&mut state, &accept, SIM_DT_MS);
        run_for(&mut state, 1000.0);
        log::info!(
            "{} of {} memories visible, {} confetti particles",
            state.visible_count(),
            state.gallery.len(),
            state.particles.len()
        );

        scene(&state)
    }
}
