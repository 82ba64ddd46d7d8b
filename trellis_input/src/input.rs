// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-canvas input queue and pressed-state tracker.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use kurbo::Point;

use crate::event::{InputEvent, Key, Modifiers, MouseButton};

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Tracking state for a button or key that is currently down.
#[derive(Copy, Clone, Debug, Default)]
struct Held {
    /// A raw press arrived since the last [`Input::update`].
    fresh: bool,
    /// A release arrived and is waiting for the next [`Input::update`].
    release_staged: bool,
}

/// Bounded FIFO of input events plus debounced key and button state.
///
/// Raw events go in through [`Input::push_event`]. The queue derives:
///
/// - a `*JustPressed` event, queued before the raw press, the first time a button or key
///   goes down;
/// - a deferred release: raw releases are staged and only queued by the next
///   [`Input::update`], which is also when the button or key leaves the pressed set;
/// - a `*Holding` event from [`Input::update`] for every button or key that is still down
///   and received no fresh press since the previous update.
///
/// The queue never blocks. Once it holds `capacity` events every further event, raw or
/// synthesized, is dropped until the consumer drains it. Pushes report this through their
/// return value.
#[derive(Clone, Debug)]
pub struct Input {
    queue: VecDeque<InputEvent>,
    capacity: usize,
    buttons: BTreeMap<MouseButton, Held>,
    keys: BTreeMap<Key, Held>,
    /// Staged releases, in arrival order.
    staged: Vec<InputEvent>,
    pointer: Point,
    dropped: u64,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// Create an input queue with [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an input queue holding at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            buttons: BTreeMap::new(),
            keys: BTreeMap::new(),
            staged: Vec::new(),
            pointer: Point::ZERO,
            dropped: 0,
        }
    }

    /// Maximum number of queued events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Total number of events dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// Whether `button` is in the pressed set.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains_key(&button)
    }

    /// Whether `key` is in the pressed set.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains_key(&key)
    }

    /// Modifier keys currently in the pressed set.
    pub fn modifiers(&self) -> Modifiers {
        let mut m = Modifiers::empty();
        m.set(Modifiers::SHIFT, self.is_key_down(Key::Shift));
        m.set(Modifiers::CONTROL, self.is_key_down(Key::Control));
        m.set(Modifiers::ALT, self.is_key_down(Key::Alt));
        m
    }

    /// Push a raw event from the windowing layer.
    ///
    /// Returns `false` if the queue was full and at least one resulting event was dropped.
    /// Releases of buttons or keys that are not down are ignored.
    pub fn push_event(&mut self, event: InputEvent) -> bool {
        if let Some(position) = event.position() {
            self.pointer = position;
        }
        match event {
            InputEvent::MousePress { button, position } => {
                let mut ok = self.flush_staged_button(button);
                match self.buttons.get_mut(&button) {
                    Some(held) => held.fresh = true,
                    None => {
                        self.buttons.insert(
                            button,
                            Held {
                                fresh: true,
                                release_staged: false,
                            },
                        );
                        ok &= self.enqueue(InputEvent::MouseJustPressed { button, position });
                    }
                }
                ok & self.enqueue(event)
            }
            InputEvent::MouseRelease { button, .. } => {
                if let Some(held) = self.buttons.get_mut(&button)
                    && !held.release_staged
                {
                    held.release_staged = true;
                    self.staged.push(event);
                }
                true
            }
            InputEvent::KeyboardPress { key } => {
                let mut ok = self.flush_staged_key(key);
                match self.keys.get_mut(&key) {
                    Some(held) => held.fresh = true,
                    None => {
                        self.keys.insert(
                            key,
                            Held {
                                fresh: true,
                                release_staged: false,
                            },
                        );
                        ok &= self.enqueue(InputEvent::KeyboardJustPressed { key });
                    }
                }
                ok & self.enqueue(event)
            }
            InputEvent::KeyboardRelease { key } => {
                if let Some(held) = self.keys.get_mut(&key)
                    && !held.release_staged
                {
                    held.release_staged = true;
                    self.staged.push(event);
                }
                true
            }
            _ => self.enqueue(event),
        }
    }

    /// Frame boundary: flush staged releases, then synthesize holding events.
    ///
    /// Returns `false` if any synthesized or flushed event was dropped.
    pub fn update(&mut self) -> bool {
        let mut ok = true;
        for event in core::mem::take(&mut self.staged) {
            match event {
                InputEvent::MouseRelease { button, .. } => {
                    self.buttons.remove(&button);
                }
                InputEvent::KeyboardRelease { key } => {
                    self.keys.remove(&key);
                }
                _ => unreachable!("only releases are staged"),
            }
            ok &= self.enqueue(event);
        }

        let position = self.pointer;
        let held_buttons: Vec<MouseButton> = self
            .buttons
            .iter_mut()
            .filter_map(|(button, held)| (!core::mem::take(&mut held.fresh)).then_some(*button))
            .collect();
        for button in held_buttons {
            ok &= self.enqueue(InputEvent::MouseHolding { button, position });
        }
        let held_keys: Vec<Key> = self
            .keys
            .iter_mut()
            .filter_map(|(key, held)| (!core::mem::take(&mut held.fresh)).then_some(*key))
            .collect();
        for key in held_keys {
            ok &= self.enqueue(InputEvent::KeyboardHolding { key });
        }
        ok
    }

    /// Pop the oldest queued event.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.queue.drain(..)
    }

    /// Drop all queued and staged events and forget pressed state.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.staged.clear();
        self.buttons.clear();
        self.keys.clear();
    }

    // --- internals ---

    fn enqueue(&mut self, event: InputEvent) -> bool {
        if self.queue.len() >= self.capacity {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        self.queue.push_back(event);
        true
    }

    /// A press arriving while a release of the same button is staged closes that
    /// press-release cycle first, so the new press is seen as a fresh one.
    fn flush_staged_button(&mut self, button: MouseButton) -> bool {
        let Some(pos) = self
            .staged
            .iter()
            .position(|e| matches!(e, InputEvent::MouseRelease { button: b, .. } if *b == button))
        else {
            return true;
        };
        let event = self.staged.remove(pos);
        self.buttons.remove(&button);
        self.enqueue(event)
    }

    fn flush_staged_key(&mut self, key: Key) -> bool {
        let Some(pos) = self
            .staged
            .iter()
            .position(|e| matches!(e, InputEvent::KeyboardRelease { key: k } if *k == key))
        else {
            return true;
        };
        let event = self.staged.remove(pos);
        self.keys.remove(&key);
        self.enqueue(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn drain(input: &mut Input) -> Vec<InputEvent> {
        input.drain().collect()
    }

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MousePress {
            button,
            position: Point::new(10.0, 10.0),
        }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseRelease {
            button,
            position: Point::new(10.0, 10.0),
        }
    }

    #[test]
    fn press_then_hold() {
        let mut input = Input::new();
        assert!(input.push_event(press(0)));
        input.update();
        assert_eq!(
            drain(&mut input),
            vec![
                InputEvent::MouseJustPressed {
                    button: 0,
                    position: Point::new(10.0, 10.0)
                },
                press(0),
            ],
            "fresh press yields just-pressed then the raw press, and no holding"
        );

        input.update();
        assert_eq!(
            drain(&mut input),
            vec![InputEvent::MouseHolding {
                button: 0,
                position: Point::new(10.0, 10.0)
            }],
            "a quiet frame while down yields holding and no new just-pressed"
        );
        assert!(input.is_button_down(0));
    }

    #[test]
    fn repeated_presses_dedupe_just_pressed() {
        let mut input = Input::new();
        for _ in 0..5 {
            input.push_event(press(1));
        }
        let events = drain(&mut input);
        let just = events
            .iter()
            .filter(|e| matches!(e, InputEvent::MouseJustPressed { .. }))
            .count();
        assert_eq!(just, 1);
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], InputEvent::MouseJustPressed { button: 1, .. }));
    }

    #[test]
    fn release_is_deferred_to_update() {
        let mut input = Input::new();
        input.push_event(press(0));
        let _ = drain(&mut input);
        input.push_event(release(0));
        assert!(input.is_empty(), "release is staged, not queued");
        assert!(input.is_button_down(0));

        input.update();
        assert_eq!(drain(&mut input), vec![release(0)]);
        assert!(!input.is_button_down(0));

        input.update();
        assert!(input.is_empty(), "released buttons do not hold");
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = Input::new();
        input.push_event(release(2));
        input.update();
        assert!(input.is_empty());
    }

    #[test]
    fn press_release_press_within_one_frame() {
        let mut input = Input::new();
        input.push_event(press(0));
        input.push_event(release(0));
        input.push_event(press(0));
        input.update();
        let kinds: Vec<_> = drain(&mut input)
            .into_iter()
            .map(|e| match e {
                InputEvent::MouseJustPressed { .. } => "just",
                InputEvent::MousePress { .. } => "press",
                InputEvent::MouseRelease { .. } => "release",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["just", "press", "release", "just", "press"]);
        assert!(input.is_button_down(0));
    }

    #[test]
    fn keyboard_follows_the_same_contract() {
        let mut input = Input::new();
        input.push_event(InputEvent::KeyboardPress { key: Key::Shift });
        input.push_event(InputEvent::KeyboardPress { key: Key::Char('a') });
        input.push_event(InputEvent::Texting { ch: 'A' });
        assert_eq!(input.modifiers(), Modifiers::SHIFT);
        input.update();
        assert_eq!(drain(&mut input).len(), 5);

        input.push_event(InputEvent::KeyboardPress { key: Key::Char('a') });
        input.update();
        assert_eq!(
            drain(&mut input),
            vec![
                InputEvent::KeyboardPress { key: Key::Char('a') },
                InputEvent::KeyboardHolding { key: Key::Shift },
            ],
            "auto-repeat press counts as fresh; shift holds"
        );

        input.push_event(InputEvent::KeyboardRelease { key: Key::Shift });
        input.update();
        assert_eq!(
            drain(&mut input),
            vec![
                InputEvent::KeyboardRelease { key: Key::Shift },
                InputEvent::KeyboardHolding { key: Key::Char('a') },
            ]
        );
        assert_eq!(input.modifiers(), Modifiers::empty());
    }

    #[test]
    fn overflow_drops_silently() {
        let mut input = Input::with_capacity(3);
        assert!(input.push_event(press(0)), "just-pressed + press fit");
        assert!(input.push_event(InputEvent::MouseMove {
            position: Point::new(1.0, 1.0)
        }));
        assert!(!input.push_event(InputEvent::Texting { ch: 'x' }));
        assert!(!input.push_event(press(1)), "synthesized events drop too");
        assert_eq!(input.len(), 3);
        assert_eq!(input.dropped(), 3);
        assert!(input.is_button_down(1), "pressed state is still tracked");

        assert!(input.pop().is_some());
        assert!(input.push_event(InputEvent::Texting { ch: 'y' }));
        assert_eq!(input.pointer_position(), Point::new(10.0, 10.0));
    }
}
