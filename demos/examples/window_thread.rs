// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs a canvas on its own window thread and feeds it input from the main thread.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example window_thread`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;
use trellis_canvas::{
    Canvas, CanvasConfig, FontLibrary, InputEvent, RecordingRenderer, spawn_window,
};
use trellis_widgets::{Button, Label};

const CONFIG: &str = r#"{ "max_frame_ms": 8, "base_dpi": 96.0 }"#;

fn main() -> trellis_canvas::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = CanvasConfig::from_json(CONFIG)?;
    let window = spawn_window(
        "demo-window",
        move || {
            let mut canvas = Canvas::with_config(
                Size::new(200.0, 100.0),
                None,
                config,
                Arc::new(FontLibrary::new()),
            )?;
            let button = canvas.create(Button::new("").on_click(|cx| {
                tracing::info!(button = ?cx.id(), "clicked on the window thread");
            }));
            let caption = canvas.create(Label::new("Press me"));
            canvas.add(button);
            canvas.add_child(button, caption);
            Ok(canvas)
        },
        RecordingRenderer::new(),
    )?;

    let at = Point::new(20.0, 20.0);
    window.input().push(InputEvent::MouseMove { position: at });
    window.input().push(InputEvent::MousePress {
        button: 0,
        position: at,
    });
    window.input().push(InputEvent::MouseRelease {
        button: 0,
        position: at,
    });
    thread::sleep(Duration::from_millis(100));

    println!("{} ran {} frames", window.name(), window.frames());
    let renderer = window.close()?;
    println!("recorded {} draw commands", renderer.commands.len());
    Ok(())
}
