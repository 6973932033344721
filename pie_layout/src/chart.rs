// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart aggregate: canvas size, title, fonts, colors and slices.
//!
//! A [`PieChart`] is plain data. Layout ([`PieChart::layout`]) and drawing
//! ([`PieChart::draw`]) read it without mutating it, so a chart can be laid out
//! repeatedly, and distinct charts can be laid out on different threads.

extern crate alloc;

use alloc::string::String;

use pie_text::{FontFamily, FontRef, FontWeight};

use crate::{ColorValue, LayoutConfig, LayoutError, Slice, SliceSet};

/// Default text color (`#222222`).
pub const DEFAULT_TEXT_COLOR: ColorValue = ColorValue::from_packed(0x0022_2222);
/// Default background color (`#ffffff`).
pub const DEFAULT_BACKGROUND_COLOR: ColorValue = ColorValue::from_packed(0x00FF_FFFF);

/// A pie chart description.
#[derive(Clone, Debug)]
pub struct PieChart {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Title text; empty for no title.
    pub title: String,
    /// Title font.
    pub title_font: FontRef,
    /// Legend label font.
    pub legend_font: FontRef,
    /// Color of the title and legend labels.
    pub text_color: ColorValue,
    /// Canvas background.
    pub background_color: ColorValue,
    /// Whether a legend is wanted. It may still be dropped if it does not fit.
    pub has_legend: bool,
    /// The slices, in display order.
    pub slices: SliceSet,
    /// Sizing constants.
    pub config: LayoutConfig,
}

impl PieChart {
    /// Creates an untitled chart with a legend and default colors and fonts.
    pub fn new(width: u32, height: u32) -> Self {
        let open_sans = FontFamily::named("Open Sans");
        Self {
            width,
            height,
            title: String::new(),
            title_font: FontRef::new(open_sans.clone(), FontWeight::SEMIBOLD),
            legend_font: FontRef::new(open_sans, FontWeight::NORMAL),
            text_color: DEFAULT_TEXT_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
            has_legend: true,
            slices: SliceSet::new(),
            config: LayoutConfig::default(),
        }
    }

    /// Sets the title text.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the text color.
    pub fn with_text_color(mut self, color: ColorValue) -> Self {
        self.text_color = color;
        self
    }

    /// Sets the background color.
    pub fn with_background_color(mut self, color: ColorValue) -> Self {
        self.background_color = color;
        self
    }

    /// Sets the sizing constants.
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the title. Pass `""` to remove it. The font is only replaced when given.
    pub fn set_title(&mut self, title: impl Into<String>, font: Option<FontRef>) {
        self.title = title.into();
        if let Some(font) = font {
            self.title_font = font;
        }
    }

    /// Enables or disables the legend. The font is only replaced when given.
    pub fn set_legend(&mut self, enabled: bool, font: Option<FontRef>) {
        self.has_legend = enabled;
        if let Some(font) = font {
            self.legend_font = font;
        }
    }

    /// Adds a slice, or updates the value and color of an existing one in place.
    pub fn add_slice(
        &mut self,
        name: impl Into<String>,
        value: f64,
        color: ColorValue,
    ) -> Result<(), LayoutError> {
        self.slices.add_or_update(name, value, color)
    }

    /// Removes a slice by name. Unknown names are ignored.
    pub fn remove_slice(&mut self, name: &str) -> Option<Slice> {
        self.slices.remove(name)
    }

    pub(crate) fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub(crate) fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}
