// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font faces, the shared font library and single-line text layout.

use std::fmt::Debug;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::Result;

/// Glyph metrics for one font family.
pub trait FontFace: Debug + Send + Sync {
    /// Family name this face was loaded for.
    fn family(&self) -> &str;

    /// Horizontal advance of `ch` at `size`.
    fn advance(&self, ch: char, size: f64) -> f64;

    /// Distance between consecutive baselines at `size`.
    fn line_height(&self, size: f64) -> f64;

    /// Distance from the top of the line box to the baseline at `size`.
    fn baseline(&self, size: f64) -> f64;
}

/// A face where every glyph has the same advance.
///
/// Used as the library fallback, and convenient in tests because layouts are exact.
#[derive(Clone, Debug)]
pub struct MonospaceFace {
    family: String,
    advance: f64,
    line_height: f64,
    baseline: f64,
}

impl MonospaceFace {
    /// Ratios are relative to the font size.
    pub fn new(family: impl Into<String>, advance: f64, line_height: f64, baseline: f64) -> Self {
        Self {
            family: family.into(),
            advance,
            line_height,
            baseline,
        }
    }
}

impl Default for MonospaceFace {
    fn default() -> Self {
        Self::new("monospace", 0.6, 1.2, 0.8)
    }
}

impl FontFace for MonospaceFace {
    fn family(&self) -> &str {
        &self.family
    }

    fn advance(&self, _ch: char, size: f64) -> f64 {
        self.advance * size
    }

    fn line_height(&self, size: f64) -> f64 {
        self.line_height * size
    }

    fn baseline(&self, size: f64) -> f64 {
        self.baseline * size
    }
}

/// Loads font families on demand for a [`FontLibrary`].
pub trait FontLoader: Send + Sync {
    /// Load `family`, or fail with [`Error::Font`](crate::Error::Font).
    fn load(&self, family: &str) -> Result<Arc<dyn FontFace>>;
}

/// Process-wide font cache.
///
/// Lookups take a read lock; the first lookup of a family loads it outside the lock and
/// then inserts it, keeping whichever face won if two threads raced.
pub struct FontLibrary {
    faces: RwLock<HashMap<String, Arc<dyn FontFace>>>,
    loader: Option<Box<dyn FontLoader>>,
    fallback: Arc<dyn FontFace>,
}

impl Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.faces.read().len())
            .field("has_loader", &self.loader.is_some())
            .field("fallback", &self.fallback.family())
            .finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// A library with no loader; only inserted faces and the fallback are available.
    pub fn new() -> Self {
        Self {
            faces: RwLock::new(HashMap::new()),
            loader: None,
            fallback: Arc::new(MonospaceFace::default()),
        }
    }

    /// A library that loads unknown families through `loader`.
    pub fn with_loader(loader: impl FontLoader + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            ..Self::new()
        }
    }

    /// Register a face under its family name, replacing any previous one.
    pub fn insert(&self, face: Arc<dyn FontFace>) {
        self.faces.write().insert(face.family().to_owned(), face);
    }

    /// Number of cached families.
    pub fn len(&self) -> usize {
        self.faces.read().len()
    }

    /// Whether no family is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The face used when a family is unavailable.
    pub fn fallback(&self) -> Arc<dyn FontFace> {
        Arc::clone(&self.fallback)
    }

    /// Cached face for `family`, loading it on first use.
    ///
    /// Returns `None` when the family is neither cached nor loadable.
    pub fn get(&self, family: &str) -> Option<Arc<dyn FontFace>> {
        if let Some(face) = self.faces.read().get(family) {
            return Some(Arc::clone(face));
        }
        let loader = self.loader.as_ref()?;
        match loader.load(family) {
            Ok(face) => {
                tracing::debug!(family, "loaded font");
                let mut faces = self.faces.write();
                Some(Arc::clone(faces.entry(family.to_owned()).or_insert(face)))
            }
            Err(err) => {
                tracing::warn!(family, %err, "font load failed");
                None
            }
        }
    }

    /// Face for `family`, or the fallback.
    pub fn face_or_fallback(&self, family: Option<&str>) -> Arc<dyn FontFace> {
        family
            .and_then(|f| self.get(f))
            .unwrap_or_else(|| self.fallback())
    }
}

/// Position of one laid-out character.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphSpan {
    /// Left edge relative to the line start.
    pub x: f64,
    /// Advance.
    pub width: f64,
}

/// A single laid-out line of text.
///
/// Indices are character indices, not byte offsets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSequence {
    spans: Vec<GlyphSpan>,
    width: f64,
    line_height: f64,
    baseline: f64,
}

impl TextSequence {
    /// Lay out `text` left to right with `face` at `size`.
    pub fn layout(face: &dyn FontFace, text: &str, size: f64) -> Self {
        let mut x = 0.0;
        let spans = text
            .chars()
            .map(|ch| {
                let width = face.advance(ch, size);
                let span = GlyphSpan { x, width };
                x += width;
                span
            })
            .collect();
        Self {
            spans,
            width: x,
            line_height: face.line_height(size),
            baseline: face.baseline(size),
        }
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total advance.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Line box height.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Baseline offset from the top of the line box.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Laid-out characters.
    pub fn spans(&self) -> &[GlyphSpan] {
        &self.spans
    }

    /// X offset of the caret placed before character `index`; past the end means after
    /// the last character.
    pub fn caret_x(&self, index: usize) -> f64 {
        self.spans.get(index).map_or(self.width, |s| s.x)
    }

    /// Caret index nearest to `x`.
    ///
    /// A point over the left half of a character places the caret before it, over the
    /// right half after it.
    pub fn index_at(&self, x: f64) -> usize {
        self.spans.partition_point(|s| s.x + s.width * 0.5 <= x)
    }
}
