// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart title fitting.
//!
//! The title starts at a font size proportional to the chart height and shrinks
//! in fixed steps until it fits the width budget. Titles that only fit below
//! the legibility floor are dropped rather than wrapped or clipped.

use kurbo::{Point, Rect, Size};
use pie_text::TextMeasurer;

use crate::PieChart;
use crate::config::sanitize_step;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Most candidate sizes a single search measures; smaller steps are widened.
const MAX_CANDIDATES: usize = 256;

/// The band reserved at the top of the chart for the title.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleBand {
    /// Vertical space consumed: top padding plus text height.
    pub height: f64,
    /// Chosen font size.
    pub font_size: f64,
    /// Top-left corner of the title's text box, horizontally centered.
    pub origin: Point,
    /// Measured size of the title text at `font_size`.
    pub text_size: Size,
    /// Descender offset reported by the measurer (zero or negative).
    pub descender: f64,
}

impl TitleBand {
    /// Fits `chart.title`, or returns `None` when there is no title or it cannot
    /// be drawn at a legible size.
    pub fn fit(chart: &PieChart, measurer: &dyn TextMeasurer) -> Option<Self> {
        if chart.title.is_empty() {
            return None;
        }

        let config = &chart.config;
        let width = chart.width_f64();
        let height = chart.height_f64();
        let budget = width * config.title_width_ratio;
        let start = config.title_size_ratio * height;
        let floor = config.min_title_size;

        // Small charts start below the floor; NaN or infinite settings land here too.
        if !(start.is_finite() && start >= floor) {
            tracing::debug!(
                title = %chart.title,
                font_size = start,
                min_size = floor,
                "title suppressed: chart too short for a legible title"
            );
            return None;
        }

        let (step, count) = search_steps(start, floor, config.title_size_step);
        let fitted = (0..count)
            .map(|i| start - i as f64 * step)
            .find_map(|font_size| {
                let metrics = measurer.measure(&chart.title, &chart.title_font.at_size(font_size));
                tracing::trace!(font_size, width = metrics.width, budget, "title candidate");
                (metrics.width <= budget).then_some((font_size, metrics))
            });
        let Some((font_size, metrics)) = fitted else {
            tracing::debug!(
                title = %chart.title,
                min_size = floor,
                budget,
                "title suppressed: too wide at the smallest legible size"
            );
            return None;
        };

        let top_padding = config.title_top_padding_ratio * height;
        Some(Self {
            height: metrics.height + top_padding,
            font_size,
            origin: Point::new(0.5 * width - 0.5 * metrics.width, top_padding),
            text_size: Size::new(metrics.width, metrics.height),
            descender: metrics.descender,
        })
    }

    /// The title's text box.
    pub fn text_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.text_size)
    }

    /// Baseline position for renderers that anchor text at the baseline.
    pub fn baseline(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.text_size.height + self.descender)
    }
}

/// Effective step and number of candidates from `start` down to `floor`.
///
/// `start` is finite and not below `floor`.
fn search_steps(start: f64, floor: f64, step: f64) -> (f64, usize) {
    let span = start - floor;
    let step = sanitize_step(step).max(span / (MAX_CANDIDATES - 1) as f64);
    // The tolerance keeps `floor` itself a candidate despite rounding in `span`.
    let steps = (span / step + 1e-9).floor();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "bounded by MAX_CANDIDATES; NaN saturates to zero"
    )]
    let steps = steps as usize;
    (step, (steps + 1).min(MAX_CANDIDATES))
}
