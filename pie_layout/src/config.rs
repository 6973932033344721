// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sizing constants for the layout pass.
//!
//! The two legacy rendering backends sized titles and legends differently. Both
//! sets are kept as presets: [`LayoutConfig::default`] follows the `ImageMagick`
//! backend and [`LayoutConfig::gd`] follows the GD backend. Every ratio is
//! relative to the chart width or height, as noted per field.

/// How much outer legend padding is counted as consumed chart width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendPadding {
    /// Legend width plus the padding on its right (`ImageMagick` backend).
    #[default]
    Single,
    /// Legend width plus padding on both sides (GD backend).
    Double,
}

impl LegendPadding {
    fn multiplier(self) -> f64 {
        match self {
            Self::Single => 1.0,
            Self::Double => 2.0,
        }
    }
}

/// Tunable layout constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Starting title font size, times chart height.
    pub title_size_ratio: f64,
    /// Font-size decrement per title search step.
    pub title_size_step: f64,
    /// Smallest title font size considered legible.
    pub min_title_size: f64,
    /// Share of the chart width the title may occupy.
    pub title_width_ratio: f64,
    /// Padding above the title, times chart height.
    pub title_top_padding_ratio: f64,
    /// Legend font size, times chart width.
    pub legend_font_ratio: f64,
    /// The legend is dropped when its rounded-up font size is below this.
    pub min_legend_font_size: f64,
    /// Legend key square side, times chart height.
    pub legend_square_ratio: f64,
    /// Vertical gap between key squares, times chart height.
    pub legend_square_padding_ratio: f64,
    /// Gap between a key square and its label, times chart height.
    pub legend_label_padding_ratio: f64,
    /// Outer legend padding, times chart width.
    pub legend_padding_ratio: f64,
    /// How outer padding counts toward consumed width.
    pub legend_padding: LegendPadding,
    /// Share of the smaller free dimension the pie diameter fills.
    pub pie_fill_ratio: f64,
    /// Angle of the first slice edge, in degrees (0° at 3 o'clock, clockwise).
    pub start_angle: f64,
}

impl LayoutConfig {
    /// Constants of the `ImageMagick` backend.
    pub const IMAGICK: Self = Self {
        title_size_ratio: 0.08,
        title_size_step: 0.5,
        min_title_size: 10.0,
        title_width_ratio: 0.9,
        title_top_padding_ratio: 0.075,
        legend_font_ratio: 0.0325,
        min_legend_font_size: 8.0,
        legend_square_ratio: 0.060,
        legend_square_padding_ratio: 0.025,
        legend_label_padding_ratio: 0.025,
        legend_padding_ratio: 0.075,
        legend_padding: LegendPadding::Single,
        pie_fill_ratio: 0.85,
        start_angle: -90.0,
    };

    /// Constants of the GD backend.
    pub const GD: Self = Self {
        title_size_ratio: 0.0675,
        legend_font_ratio: 0.022,
        legend_padding_ratio: 0.05,
        legend_padding: LegendPadding::Double,
        ..Self::IMAGICK
    };

    /// Returns the GD preset.
    pub fn gd() -> Self {
        Self::GD
    }

    /// Sets the starting title size ratio. Non-finite ratios are ignored.
    pub fn with_title_size_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() {
            self.title_size_ratio = ratio;
        }
        self
    }

    /// Sets the minimum title font size. Non-finite sizes are ignored.
    pub fn with_min_title_size(mut self, size: f64) -> Self {
        if size.is_finite() {
            self.min_title_size = size;
        }
        self
    }

    /// Sets the title search step. Non-positive or non-finite steps fall back
    /// to `0.5`.
    pub fn with_title_size_step(mut self, step: f64) -> Self {
        self.title_size_step = sanitize_step(step);
        self
    }

    /// Sets the legend font ratio.
    pub fn with_legend_font_ratio(mut self, ratio: f64) -> Self {
        self.legend_font_ratio = ratio;
        self
    }

    /// Sets the outer legend padding ratio and how it is counted.
    pub fn with_legend_padding(mut self, ratio: f64, padding: LegendPadding) -> Self {
        self.legend_padding_ratio = ratio;
        self.legend_padding = padding;
        self
    }

    /// Sets the pie fill ratio.
    pub fn with_pie_fill_ratio(mut self, ratio: f64) -> Self {
        self.pie_fill_ratio = ratio;
        self
    }

    pub(crate) fn legend_padding_multiplier(&self) -> f64 {
        self.legend_padding.multiplier()
    }
}

/// The title search step actually used for `step`.
pub(crate) fn sanitize_step(step: f64) -> f64 {
    if step.is_finite() && step > 0.0 {
        step
    } else {
        0.5
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::IMAGICK
    }
}
