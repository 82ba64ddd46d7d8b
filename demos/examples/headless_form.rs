// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small form driven by scripted input and drawn into a recording renderer.
//!
//! Builds a tab window with a login page and an about page, types into the text box,
//! ticks the checkbox, presses the button, then prints the draw commands of the final
//! frame.
//!
//! Run:
//! - `RUST_LOG=trellis_canvas=debug cargo run -p trellis_demos --example headless_form`

use kurbo::{Point, Size, Vec2};
use tracing_subscriber::EnvFilter;
use trellis_canvas::{
    Canvas, ControlId, DrawCommand, InputEvent, Key, RecordingRenderer, StyleSheet,
};
use trellis_widgets::{Button, Checkbox, GridLayout, Label, Plane, TabWindow, TextBox};

const STYLES: &str = r##"{
    "plane": { "background": "#fafafa" },
    "label": { "padding": { "left": 2, "top": 2, "right": 2, "bottom": 2 } }
}"##;

fn click(canvas: &mut Canvas, at: Point) {
    canvas.input().push(InputEvent::MousePress {
        button: 0,
        position: at,
    });
    canvas.input().push(InputEvent::MouseRelease {
        button: 0,
        position: at,
    });
    canvas.update();
}

fn center(canvas: &Canvas, id: ControlId) -> Point {
    canvas.bounds(id).map_or(Point::ZERO, |b| b.center())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();

    let styles = match StyleSheet::from_json(STYLES) {
        Ok(styles) => styles,
        Err(err) => {
            eprintln!("bad style sheet: {err}");
            return;
        }
    };
    let mut canvas = Canvas::new(Size::new(480.0, 320.0), Some(styles));

    let tabs = canvas.create(TabWindow::new().on_select(|_, _, index| {
        println!("tab {index} selected");
    }));
    canvas.add(tabs);

    let login = canvas.create(GridLayout::new(3, 2).with_spacing(8.0));
    let about = canvas.create(Plane::new());
    TabWindow::add_page(&mut canvas, tabs, "Login", login);
    TabWindow::add_page(&mut canvas, tabs, "About", about);

    let name_label = canvas.create(Label::new("Name"));
    let name = canvas.create(TextBox::new().on_change(|_, text| println!("name: {text:?}")));
    let remember_label = canvas.create(Label::new("Remember"));
    let remember = canvas.create(
        Checkbox::new("keep me signed in").on_change(|_, on| println!("remember: {on}")),
    );
    let spacer = canvas.create(Plane::new());
    let submit = canvas.create(Button::new("").on_click(|cx| {
        let id = cx.id();
        println!("submitted");
        cx.canvas_mut().disable(id);
    }));
    let submit_label = canvas.create(Label::new("Sign in"));
    canvas.add_child(submit, submit_label);
    for child in [name_label, name, remember_label, remember, spacer, submit] {
        canvas.add_child(login, child);
    }
    let blurb = canvas.create(Label::new("Trellis demo form"));
    canvas.add_child(about, blurb);

    canvas.update();

    let name_at = center(&canvas, name);
    click(&mut canvas, name_at);
    for ch in "ferris".chars() {
        canvas.input().push(InputEvent::Texting { ch });
    }
    canvas.input().push(InputEvent::KeyboardPress {
        key: Key::Backspace,
    });
    canvas.update();

    let remember_at = canvas
        .bounds(remember)
        .map_or(Point::ZERO, |b| b.origin() + Vec2::new(4.0, 4.0));
    click(&mut canvas, remember_at);
    let submit_at = center(&canvas, submit);
    click(&mut canvas, submit_at);
    println!("submit enabled after click: {}", canvas.is_enabled(submit));

    if let Some(tab_strip) = canvas.bounds(tabs) {
        click(&mut canvas, Point::new(tab_strip.x1 - 10.0, tab_strip.y0 + 10.0));
    }

    let mut renderer = RecordingRenderer::new();
    canvas.render(&mut renderer);
    for command in &renderer.commands {
        match command {
            DrawCommand::Text { text, position, .. } => {
                println!("text {text:?} at ({}, {})", position.x, position.y);
            }
            other => println!("{other:?}"),
        }
    }
}
