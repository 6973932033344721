// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for pie chart layout.
//!
//! The layout engine has to know how large the title and legend labels will be
//! before it can decide whether they fit. Glyph rendering and font loading stay
//! with the renderer, so layout code depends only on the small [`TextMeasurer`]
//! interface defined here.
//!
//! This crate is intentionally:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for owned font family names), and
//! - renderer-agnostic (shaping engines and plain heuristics implement the
//!   same trait).

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::cell::{Cell, RefCell};

use hashbrown::{Equivalent, HashMap};

/// A minimal text measurement interface used by the title and legend layout.
///
/// The title font-size search calls this once per candidate size, so
/// implementations that hit font files should be wrapped in a
/// [`CachingTextMeasurer`].
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// A font reference plus the size it is measured at.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in chart coordinates (points, treated as pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a sans-serif, normal-weight `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Returns this style with a different font size.
    ///
    /// Used by the title search, which keeps the font fixed and walks the size down.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// A font without a size: what a chart stores for its title and legend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontRef {
    /// Font family.
    pub family: FontFamily,
    /// Font weight.
    pub weight: FontWeight,
    /// Font style.
    pub style: FontStyle,
}

impl FontRef {
    /// A normal-style font of the given family and weight.
    #[must_use]
    pub fn new(family: FontFamily, weight: FontWeight) -> Self {
        Self {
            family,
            weight,
            style: FontStyle::Normal,
        }
    }

    /// Returns the measurement style for this font at `font_size`.
    #[must_use]
    pub fn at_size(&self, font_size: f64) -> TextStyle {
        TextStyle {
            font_size,
            font_family: self.family.clone(),
            font_weight: self.weight,
            font_style: self.style,
        }
    }
}

impl Default for FontRef {
    fn default() -> Self {
        Self::new(FontFamily::SansSerif, FontWeight::NORMAL)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Open Sans"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Creates a named family.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Semibold weight (`600`).
    pub const SEMIBOLD: Self = Self(600);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured bounding box of a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Horizontal extent of the text.
    pub width: f64,
    /// Vertical extent of the text, from the top of the tallest glyph to the
    /// bottom of the deepest descender.
    pub height: f64,
    /// Signed offset of the descender line from the baseline.
    ///
    /// This is zero or negative (below the baseline), matching the convention of
    /// `FreeType` and `ImageMagick` font metrics.
    pub descender: f64,
}

impl TextMetrics {
    /// Metrics of an empty string.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        descender: 0.0,
    };

    /// Distance from the baseline to the top of the text box.
    #[must_use]
    pub fn ascent(&self) -> f64 {
        self.height + self.descender
    }
}

/// A tiny heuristic text measurer suitable for tests, demos and early layout.
///
/// It assumes an average glyph width of ~0.6em, a line box of 1em and a
/// descender at 0.2em below the baseline.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        if text.is_empty() {
            return TextMetrics::ZERO;
        }
        TextMetrics {
            width: 0.6 * style.font_size * text.chars().count() as f64,
            height: style.font_size,
            descender: -0.2 * style.font_size,
        }
    }
}

/// Owned cache key. Field order matches [`CacheKeyRef`] so both hash alike.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    family: FontFamily,
    weight: FontWeight,
    style: FontStyle,
    size_bits: u64,
}

/// Borrowed form of [`CacheKey`], so cache hits do not allocate.
#[derive(Hash)]
struct CacheKeyRef<'a> {
    text: &'a str,
    family: &'a FontFamily,
    weight: FontWeight,
    style: FontStyle,
    size_bits: u64,
}

impl<'a> CacheKeyRef<'a> {
    fn new(text: &'a str, style: &'a TextStyle) -> Self {
        Self {
            text,
            family: &style.font_family,
            weight: style.font_weight,
            style: style.font_style,
            // `-0.0` and `0.0` measure the same.
            size_bits: (style.font_size + 0.0).to_bits(),
        }
    }

    fn to_owned_key(&self) -> CacheKey {
        CacheKey {
            text: String::from(self.text),
            family: self.family.clone(),
            weight: self.weight,
            style: self.style,
            size_bits: self.size_bits,
        }
    }
}

impl Equivalent<CacheKey> for CacheKeyRef<'_> {
    fn equivalent(&self, key: &CacheKey) -> bool {
        self.size_bits == key.size_bits
            && self.weight == key.weight
            && self.style == key.style
            && self.text == key.text
            && *self.family == key.family
    }
}

/// Memoises another measurer per `(text, font, size)`.
///
/// Measurement through a real font backend can block on font-file I/O. The
/// layout engine asks for the same title at many sizes and for every legend
/// label on every pass, so a long-lived chart should hold its measurer behind
/// this cache.
///
/// The cache holds at most [`CachingTextMeasurer::capacity`] entries. When an
/// insert would exceed it, every entry is dropped and the cache refills from
/// the current working set.
///
/// The cache uses interior mutability and is therefore not `Sync`; use one per
/// thread.
pub struct CachingTextMeasurer<M> {
    inner: M,
    capacity: usize,
    entries: RefCell<HashMap<CacheKey, TextMetrics>>,
    misses: Cell<usize>,
}

impl<M> core::fmt::Debug for CachingTextMeasurer<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachingTextMeasurer")
            .field("capacity", &self.capacity)
            .field("entries", &self.entries.borrow().len())
            .field("misses", &self.misses.get())
            .finish_non_exhaustive()
    }
}

impl<M: TextMeasurer> CachingTextMeasurer<M> {
    /// Entry limit used by [`CachingTextMeasurer::new`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Wraps `inner` with an empty cache of [`Self::DEFAULT_CAPACITY`] entries.
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// Wraps `inner` with an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero forwards every measurement.
    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            entries: RefCell::new(HashMap::new()),
            misses: Cell::new(0),
        }
    }

    /// Maximum number of cached entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of measurements that were forwarded to the wrapped measurer.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing has been measured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops all cached entries, e.g. after swapping font files.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Returns the wrapped measurer.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: TextMeasurer> TextMeasurer for CachingTextMeasurer<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let key = CacheKeyRef::new(text, style);
        if let Some(metrics) = self.entries.borrow().get(&key) {
            return *metrics;
        }
        let metrics = self.inner.measure(text, style);
        self.misses.set(self.misses.get() + 1);
        if self.capacity == 0 {
            return metrics;
        }
        let mut entries = self.entries.borrow_mut();
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key.to_owned_key(), metrics);
        metrics
    }
}
