// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared access to a canvas's input queue.

use std::sync::Arc;

use kurbo::Point;
use parking_lot::Mutex;
use trellis_input::{Input, InputEvent, Key, Modifiers, MouseButton};

/// Cloneable handle to the input queue of one canvas.
///
/// The windowing layer pushes through it from its own thread; the canvas drains it once
/// per update. The lock is never held while widget code runs.
#[derive(Clone, Debug)]
pub struct InputHandle {
    inner: Arc<Mutex<Input>>,
}

impl Default for InputHandle {
    fn default() -> Self {
        Self::new(trellis_input::DEFAULT_CAPACITY)
    }
}

impl InputHandle {
    /// Create a handle around a fresh queue.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Input::with_capacity(capacity))),
        }
    }

    /// Push a raw event. Returns `false` if the queue was full and something was dropped.
    pub fn push(&self, event: InputEvent) -> bool {
        let accepted = self.inner.lock().push_event(event);
        if !accepted {
            tracing::warn!(?event, "input queue full, event dropped");
        }
        accepted
    }

    /// Modifier keys currently down.
    pub fn modifiers(&self) -> Modifiers {
        self.inner.lock().modifiers()
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Point {
        self.inner.lock().pointer_position()
    }

    /// Whether `button` is currently down.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.inner.lock().is_button_down(button)
    }

    /// Whether `key` is currently down.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.inner.lock().is_key_down(key)
    }

    /// Run `f` with the queue locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Input) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Run the queue's per-frame update and take everything queued.
    pub(crate) fn frame(&self) -> Vec<InputEvent> {
        let mut input = self.inner.lock();
        if !input.update() {
            tracing::warn!(dropped = input.dropped(), "input queue full during update");
        }
        input.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_queue() {
        let a = InputHandle::new(8);
        let b = a.clone();
        a.push(InputEvent::KeyboardPress { key: Key::Shift });
        assert!(b.is_key_down(Key::Shift));
        assert!(b.modifiers().contains(Modifiers::SHIFT));
        let events = b.frame();
        assert_eq!(
            events,
            [
                InputEvent::KeyboardJustPressed { key: Key::Shift },
                InputEvent::KeyboardPress { key: Key::Shift },
            ]
        );
        assert!(a.with(|input| input.is_empty()));
    }

    #[test]
    fn push_reports_overflow() {
        let h = InputHandle::new(1);
        assert!(h.push(InputEvent::Texting { ch: 'a' }));
        assert!(!h.push(InputEvent::Texting { ch: 'b' }));
    }
}
