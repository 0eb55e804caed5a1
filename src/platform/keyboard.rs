//! Held-key tracking
//!
//! Keys are identified by `KeyboardEvent.code` so the racket controls stay
//! on the same physical keys regardless of layout.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Move racket left
pub const KEY_LEFT: &str = "KeyA";
/// Move racket right
pub const KEY_RIGHT: &str = "KeyD";

/// Set of currently held key codes
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    held: HashSet<String>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        if self.held.insert(code.to_owned()) {
            log::trace!("key down: {}", code);
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if self.held.remove(code) {
            log::trace!("key up: {}", code);
        }
    }

    /// Forget everything held (focus lost: key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn pressed(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Racket input for this frame
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.pressed(KEY_LEFT),
            right: self.pressed(KEY_RIGHT),
            block_y: None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::attach;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::Keyboard;

    /// Track keydown/keyup/blur on `window` into `keyboard`
    pub fn attach(window: &web_sys::Window, keyboard: Rc<RefCell<Keyboard>>) -> Result<(), JsValue> {
        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                keyboard.borrow_mut().key_down(&event.code());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let keyboard = keyboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                keyboard.borrow_mut().key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside): no keyup will follow
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                keyboard.borrow_mut().release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}
