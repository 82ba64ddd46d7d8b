// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Input: the per-canvas input queue.
//!
//! The windowing layer pushes raw platform events; the canvas pops them once per frame.
//! In between, [`Input`] turns the raw stream into something a widget tree can consume
//! without tracking button state itself:
//!
//! - the first press of a button or key is announced by a `*JustPressed` event queued
//!   before the raw press, at most once per press-release cycle;
//! - releases are staged and delivered by the next [`Input::update`] (one frame late at most);
//! - buttons and keys that stay down through a frame without a fresh press yield a
//!   `*Holding` event from [`Input::update`].
//!
//! The queue is bounded. When it is full, further events are dropped rather than
//! blocking the producer; [`Input::push_event`] and [`Input::update`] return `false`
//! when that happens so hosts can log it.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use trellis_input::{Input, InputEvent};
//!
//! let mut input = Input::new();
//! input.push_event(InputEvent::MousePress { button: 0, position: Point::new(4.0, 4.0) });
//! input.update();
//! assert!(matches!(input.pop(), Some(InputEvent::MouseJustPressed { button: 0, .. })));
//! assert!(matches!(input.pop(), Some(InputEvent::MousePress { button: 0, .. })));
//!
//! // Next frame, still down.
//! input.update();
//! assert!(matches!(input.pop(), Some(InputEvent::MouseHolding { button: 0, .. })));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod input;

pub use event::{EventClass, InputEvent, Key, Modifiers, MouseButton};
pub use input::{DEFAULT_CAPACITY, Input};
