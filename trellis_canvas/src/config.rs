// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Tunables for a [`Canvas`](crate::Canvas) and the thread that drives it.
///
/// Every field has a default; JSON documents only need to name the fields they change.
///
/// ```rust
/// use trellis_canvas::CanvasConfig;
///
/// let config = CanvasConfig::from_json(r#"{ "input_capacity": 64, "max_frame_ms": 8 }"#).unwrap();
/// assert_eq!(config.input_capacity, 64);
/// assert_eq!(config.max_frame_duration.as_millis(), 8);
/// assert_eq!(config.grid_cell_size, 64.0);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Hard capacity of the input queue; events beyond it are dropped.
    pub input_capacity: usize,
    /// Cell size of the hit-test grid, in canvas pixels.
    pub grid_cell_size: f64,
    /// DPI at which the scale factor is `1.0`.
    pub base_dpi: f64,
    /// Upper bound on frame rate: frames that finish early sleep out the remainder.
    #[serde(rename = "max_frame_ms", deserialize_with = "millis")]
    pub max_frame_duration: Duration,
    /// Mouse button whose just-pressed event moves keyboard focus.
    pub primary_button: u8,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            input_capacity: trellis_input::DEFAULT_CAPACITY,
            grid_cell_size: 64.0,
            base_dpi: 96.0,
            max_frame_duration: Duration::from_micros(16_667),
            primary_button: 0,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the input queue capacity.
    pub fn with_input_capacity(mut self, capacity: usize) -> Self {
        self.input_capacity = capacity;
        self
    }

    /// Set the grid cell size.
    pub fn with_grid_cell_size(mut self, size: f64) -> Self {
        self.grid_cell_size = size;
        self
    }

    /// Set the DPI at which scale is `1.0`.
    pub fn with_base_dpi(mut self, dpi: f64) -> Self {
        self.base_dpi = dpi;
        self
    }

    /// Set the frame budget.
    pub fn with_max_frame_duration(mut self, duration: Duration) -> Self {
        self.max_frame_duration = duration;
        self
    }

    /// Set the focus-moving mouse button.
    pub fn with_primary_button(mut self, button: u8) -> Self {
        self.primary_button = button;
        self
    }

    /// Reject values the canvas cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.grid_cell_size.is_nan() || self.grid_cell_size <= 0.0 {
            return Err(Error::Config(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            )));
        }
        if self.base_dpi.is_nan() || self.base_dpi <= 0.0 {
            return Err(Error::Config(format!(
                "base_dpi must be positive, got {}",
                self.base_dpi
            )));
        }
        if self.input_capacity == 0 {
            return Err(Error::Config("input_capacity must be non-zero".into()));
        }
        Ok(())
    }
}

fn millis<'de, D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = CanvasConfig::from_json("{}").unwrap();
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CanvasConfig::from_json(r#"{ "grid_cell_size": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = CanvasConfig::from_json(r#"{ "input_capacity": "lots" }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn builders() {
        let config = CanvasConfig::default()
            .with_grid_cell_size(32.0)
            .with_primary_button(1);
        assert_eq!(config.grid_cell_size, 32.0);
        assert_eq!(config.primary_button, 1);
        assert!(config.validate().is_ok());
    }
}
