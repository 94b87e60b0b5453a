//! Background music over an `<audio>` element
//!
//! Executes [`MusicCommand`]s and reports promise results and media events
//! back through a sink. Browsers reject unmuted autoplay without a user
//! gesture; that rejection is reported, never raised.

use std::rc::Rc;

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

use super::handles::Listener;
use crate::Result;
use crate::sim::{MediaEvent, MusicCommand, PlayAttempt};

/// Where audio reports go
pub type MediaSink = Rc<dyn Fn(MediaEvent)>;

pub struct BackgroundMusic {
    element: HtmlAudioElement,
    sink: MediaSink,
    _listeners: Vec<Listener>,
}

impl BackgroundMusic {
    pub fn new(src: &str, volume: f32, sink: MediaSink) -> Result<Self> {
        let element = HtmlAudioElement::new_with_src(src)?;
        element.set_loop(true);
        element.set_preload("auto");
        element.set_volume(volume as f64);

        let events = [
            ("play", MediaEvent::Play),
            ("pause", MediaEvent::Pause),
            ("ended", MediaEvent::Ended),
            ("error", MediaEvent::Error),
        ];
        let listeners = events
            .into_iter()
            .map(|(name, event)| {
                let sink = sink.clone();
                Listener::new(&element, name, move |_| sink(event))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            element,
            sink,
            _listeners: listeners,
        })
    }

    pub fn execute(&self, command: MusicCommand) {
        match command {
            MusicCommand::SetVolume(volume) => self.element.set_volume(volume as f64),
            MusicCommand::Play(attempt) => self.play(attempt),
            // Interaction listeners are page-wide and owned by the page
            MusicCommand::ArmUnmute | MusicCommand::DisarmUnmute => {}
        }
    }

    fn play(&self, attempt: PlayAttempt) {
        let sink = self.sink.clone();
        let promise = match self.element.play() {
            Ok(promise) => promise,
            Err(e) => {
                log::debug!("play() threw: {e:?}");
                sink(MediaEvent::PlayRejected(attempt));
                return;
            }
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => sink(MediaEvent::PlayResolved(attempt)),
                Err(e) => {
                    log::debug!("play() rejected: {e:?}");
                    sink(MediaEvent::PlayRejected(attempt));
                }
            }
        });
    }

    pub fn stop(&self) {
        let _ = self.element.pause();
    }
}

impl Drop for BackgroundMusic {
    fn drop(&mut self) {
        self.stop();
    }
}
