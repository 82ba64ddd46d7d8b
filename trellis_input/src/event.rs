// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event taxonomy: keys, buttons, modifiers and the events carried by the queue.

use kurbo::{Point, Vec2};

/// Mouse button identifier. Button `0` is the primary button.
pub type MouseButton = u8;

/// Platform-independent key identifier.
///
/// Translating platform scan codes into keys is the windowing layer's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Either shift key.
    Shift,
    /// Either control key.
    Control,
    /// Either alt key.
    Alt,
    /// A printable key, identified by its unshifted character.
    Char(char),
    /// Any other key, by platform code.
    Other(u32),
}

bitflags::bitflags! {
    /// Modifier keys currently held down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// A shift key is down.
        const SHIFT   = 0b0000_0001;
        /// A control key is down.
        const CONTROL = 0b0000_0010;
        /// An alt key is down.
        const ALT     = 0b0000_0100;
    }
}

/// Which consumer an event is routed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Routed through a hit test at the pointer position.
    Mouse,
    /// Routed to the control holding keyboard focus.
    Keyboard,
}

/// An event in the input queue.
///
/// Raw events are pushed by the windowing layer; `*JustPressed` and `*Holding` events are
/// synthesized by [`Input`](crate::Input).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The pointer moved.
    MouseMove {
        /// New pointer position.
        position: Point,
    },
    /// First press of a button that was up (synthesized).
    MouseJustPressed {
        /// Pressed button.
        button: MouseButton,
        /// Pointer position at press time.
        position: Point,
    },
    /// Raw button press.
    MousePress {
        /// Pressed button.
        button: MouseButton,
        /// Pointer position at press time.
        position: Point,
    },
    /// A button stayed down through a frame with no fresh press (synthesized).
    MouseHolding {
        /// Held button.
        button: MouseButton,
        /// Last known pointer position.
        position: Point,
    },
    /// A button was released.
    MouseRelease {
        /// Released button.
        button: MouseButton,
        /// Pointer position at release time.
        position: Point,
    },
    /// Platform double click.
    MouseDoubleClick {
        /// Clicked button.
        button: MouseButton,
        /// Pointer position.
        position: Point,
    },
    /// Wheel or touchpad scroll.
    MouseScroll {
        /// Scroll amount in canvas units.
        delta: Vec2,
        /// Pointer position.
        position: Point,
    },
    /// First press of a key that was up (synthesized).
    KeyboardJustPressed {
        /// Pressed key.
        key: Key,
    },
    /// Raw key press, including platform auto-repeat.
    KeyboardPress {
        /// Pressed key.
        key: Key,
    },
    /// A key stayed down through a frame with no fresh press (synthesized).
    KeyboardHolding {
        /// Held key.
        key: Key,
    },
    /// A key was released.
    KeyboardRelease {
        /// Released key.
        key: Key,
    },
    /// A character was typed.
    Texting {
        /// Typed character.
        ch: char,
    },
}

impl InputEvent {
    /// Routing class of this event.
    pub fn class(&self) -> EventClass {
        match self {
            Self::KeyboardJustPressed { .. }
            | Self::KeyboardPress { .. }
            | Self::KeyboardHolding { .. }
            | Self::KeyboardRelease { .. }
            | Self::Texting { .. } => EventClass::Keyboard,
            _ => EventClass::Mouse,
        }
    }

    /// Pointer position carried by a mouse-class event.
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::MouseMove { position }
            | Self::MouseJustPressed { position, .. }
            | Self::MousePress { position, .. }
            | Self::MouseHolding { position, .. }
            | Self::MouseRelease { position, .. }
            | Self::MouseDoubleClick { position, .. }
            | Self::MouseScroll { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Mouse button carried by the event, if any.
    pub fn button(&self) -> Option<MouseButton> {
        match *self {
            Self::MouseJustPressed { button, .. }
            | Self::MousePress { button, .. }
            | Self::MouseHolding { button, .. }
            | Self::MouseRelease { button, .. }
            | Self::MouseDoubleClick { button, .. } => Some(button),
            _ => None,
        }
    }

    /// Key carried by the event, if any.
    pub fn key(&self) -> Option<Key> {
        match *self {
            Self::KeyboardJustPressed { key }
            | Self::KeyboardPress { key }
            | Self::KeyboardHolding { key }
            | Self::KeyboardRelease { key } => Some(key),
            _ => None,
        }
    }
}
