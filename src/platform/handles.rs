//! Scoped browser resources
//!
//! Each handle owns one registration with the browser and releases it on
//! drop, so tearing the page down is just dropping its handles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use crate::{PageError, Result};

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or(PageError::MissingElement("window"))
}

/// An event listener, removed on drop
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, callback: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(callback);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A pending `setTimeout`, cleared on drop
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new<F>(delay_ms: i32, callback: F) -> Result<Self>
    where
        F: FnOnce() + 'static,
    {
        let closure = Closure::once(callback);
        let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A self-rescheduling `requestAnimationFrame` loop, cancelled on drop
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start<F>(mut frame: F) -> Result<Self>
    where
        F: FnMut(f64) + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next = callback.clone();
        let next_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            frame(time);
            if let Some(cb) = next.borrow().as_ref() {
                next_handle.set(request_frame(cb).ok());
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            handle.set(Some(request_frame(cb)?));
        }
        Ok(Self { handle, callback })
    }
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32> {
    Ok(window()?.request_animation_frame(cb.as_ref().unchecked_ref())?)
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        // Breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}
