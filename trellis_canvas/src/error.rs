// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the fallible canvas surfaces.
//!
//! Structural tree operations do not use this type: they report failure through their
//! boolean or `Option` return values.

use thiserror::Error;

/// Result type for canvas operations that can fail.
pub type Result<T> = std::result::Result<T, Error>;

/// Canvas error.
#[derive(Error, Debug)]
pub enum Error {
    /// A style sheet could not be interpreted.
    #[error("style: {0}")]
    Style(String),
    /// A configuration value was rejected.
    #[error("config: {0}")]
    Config(String),
    /// A font family could not be loaded.
    #[error("font: {0}")]
    Font(String),
    /// JSON decoding failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// The window thread could not be started.
    #[error("spawn: {0}")]
    Spawn(#[source] std::io::Error),
    /// The window thread failed after it started.
    #[error("window: {0}")]
    Window(String),
}
