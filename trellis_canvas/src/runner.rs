// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One thread per window: the update/render loop and its frame budget.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::handle::InputHandle;
use crate::render::Renderer;

/// Caps the frame rate: frames that finish early sleep out the rest of the budget.
///
/// Slow frames are not compensated for; the next frame simply starts right away.
#[derive(Clone, Debug)]
pub struct FrameLimiter {
    budget: Duration,
    started: Instant,
}

impl FrameLimiter {
    /// A limiter with the given per-frame budget.
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            started: Instant::now(),
        }
    }

    /// The per-frame budget.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Mark the start of a frame.
    pub fn begin(&mut self) {
        self.started = Instant::now();
    }

    /// Time left in the budget after `elapsed`, if any.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    /// End the frame, sleeping out whatever is left of the budget. Returns the time slept.
    pub fn finish(&mut self) -> Duration {
        match self.remaining(self.started.elapsed()) {
            Some(rest) => {
                thread::sleep(rest);
                rest
            }
            None => Duration::ZERO,
        }
    }
}

/// A running window thread.
///
/// Dropping the handle stops the loop and joins the thread; [`WindowHandle::close`] does
/// the same and hands back the renderer.
pub struct WindowHandle<R> {
    name: String,
    input: InputHandle,
    running: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    thread: Option<JoinHandle<R>>,
}

impl<R> core::fmt::Debug for WindowHandle<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowHandle")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("frames", &self.frames.load(Ordering::Relaxed))
            .field("thread", &self.thread.is_some())
            .finish()
    }
}

impl<R> WindowHandle<R> {
    /// Thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input queue of the window's canvas.
    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop after the current frame and wait for the thread.
    pub fn close(mut self) -> Result<R> {
        self.stop()
            .ok_or_else(|| Error::Window(format!("{} already closed", self.name)))?
    }

    fn stop(&mut self) -> Option<Result<R>> {
        self.running.store(false, Ordering::Release);
        let thread = self.thread.take()?;
        Some(
            thread
                .join()
                .map_err(|_| Error::Window(format!("{} panicked", self.name))),
        )
    }
}

impl<R> Drop for WindowHandle<R> {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.stop() {
            tracing::warn!(%err, "window thread ended abnormally");
        }
    }
}

/// Start a window thread named `name`.
///
/// The thread builds its canvas with `build`, then loops `update` and `render` into
/// `renderer`, never faster than the canvas's configured frame budget, until the returned
/// handle is closed or dropped. An error from `build` is returned from this call.
pub fn spawn_window<B, R>(name: impl Into<String>, build: B, renderer: R) -> Result<WindowHandle<R>>
where
    B: FnOnce() -> Result<Canvas> + Send + 'static,
    R: Renderer + Send + 'static,
{
    let name = name.into();
    let running = Arc::new(AtomicBool::new(true));
    let frames = Arc::new(AtomicU64::new(0));
    let (tx, rx) = mpsc::channel();

    let thread = {
        let running = running.clone();
        let frames = frames.clone();
        let span_name = name.clone();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _span = tracing::debug_span!("window", name = %span_name).entered();
                let mut renderer = renderer;
                let mut canvas = match build() {
                    Ok(canvas) => canvas,
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        return renderer;
                    }
                };
                // The receiver only goes away if spawning returned early.
                let _ = tx.send(Ok(canvas.input().clone()));
                let mut limiter = FrameLimiter::new(canvas.config().max_frame_duration);
                tracing::debug!(budget = ?limiter.budget(), "window loop started");
                while running.load(Ordering::Acquire) {
                    limiter.begin();
                    canvas.update();
                    canvas.render(&mut renderer);
                    frames.fetch_add(1, Ordering::Relaxed);
                    limiter.finish();
                }
                tracing::debug!(frames = frames.load(Ordering::Relaxed), "window loop stopped");
                renderer
            })
            .map_err(Error::Spawn)?
    };

    let input = match rx.recv() {
        Ok(Ok(input)) => input,
        Ok(Err(err)) => {
            let _ = thread.join();
            tracing::warn!(%name, %err, "window failed to build its canvas");
            return Err(err);
        }
        Err(_) => {
            let _ = thread.join();
            return Err(Error::Window(format!("{name} failed to build its canvas")));
        }
    };
    Ok(WindowHandle {
        name,
        input,
        running,
        frames,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};
    use trellis_input::InputEvent;

    use super::*;
    use crate::config::CanvasConfig;
    use crate::render::RecordingRenderer;
    use crate::text::FontLibrary;
    use crate::widget::{ControlCx, Widget};

    #[test]
    fn limiter_budget() {
        let limiter = FrameLimiter::new(Duration::from_millis(10));
        assert_eq!(
            limiter.remaining(Duration::from_millis(4)),
            Some(Duration::from_millis(6))
        );
        assert_eq!(limiter.remaining(Duration::from_millis(10)), None);
        assert_eq!(limiter.remaining(Duration::from_millis(25)), None);
    }

    struct Clicks(Arc<AtomicU64>);

    impl Widget for Clicks {
        fn kind(&self) -> &'static str {
            "clicks"
        }

        fn handle_input(&mut self, _cx: &mut ControlCx<'_>, event: &InputEvent) {
            if let InputEvent::MousePress { .. } = event {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn window_thread_runs_and_returns_renderer() {
        let clicks = Arc::new(AtomicU64::new(0));
        let seen = clicks.clone();
        let window = spawn_window(
            "test-window",
            move || {
                let config =
                    CanvasConfig::default().with_max_frame_duration(Duration::from_millis(1));
                let mut canvas = Canvas::with_config(
                    Size::new(50.0, 50.0),
                    None,
                    config,
                    Arc::new(FontLibrary::new()),
                )?;
                let c = canvas.create(Clicks(seen));
                canvas.add(c);
                Ok(canvas)
            },
            RecordingRenderer::new(),
        )
        .unwrap();
        assert_eq!(window.name(), "test-window");

        window.input().push(InputEvent::MousePress {
            button: 0,
            position: Point::new(10.0, 10.0),
        });
        let deadline = Instant::now() + Duration::from_secs(5);
        while clicks.load(Ordering::Relaxed) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(clicks.load(Ordering::Relaxed), 1);
        assert!(window.frames() > 0);
        assert!(window.is_running());

        let renderer = window.close().unwrap();
        assert!(!renderer.commands.is_empty());
    }

    #[test]
    fn panicking_builder_is_reported() {
        let err = spawn_window(
            "broken",
            || -> Result<Canvas> { panic!("no canvas") },
            RecordingRenderer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Window(_)));
    }

    #[test]
    fn builder_error_is_returned() {
        let err = spawn_window(
            "misconfigured",
            || {
                Canvas::with_config(
                    Size::new(10.0, 10.0),
                    None,
                    CanvasConfig::default().with_grid_cell_size(0.0),
                    Arc::new(FontLibrary::new()),
                )
            },
            RecordingRenderer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
