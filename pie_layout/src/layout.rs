// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout pass.
//!
//! Bands are resolved top-down and right-to-left:
//! 1. **Title** takes a strip at the top, if it fits.
//! 2. **Legend** takes a column on the right, below the title, if it fits.
//! 3. **Pie** is centered in what is left.

use kurbo::Rect;
use pie_text::TextMeasurer;

use crate::{LayoutError, LegendBand, PieChart, PieLayout, TitleBand};

/// Everything a renderer needs to draw a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    /// Canvas size as a rectangle at the origin.
    pub canvas: Rect,
    /// The title band, or `None` when there is no title or it was dropped.
    pub title: Option<TitleBand>,
    /// The legend, or `None` when disabled or dropped.
    pub legend: Option<LegendBand>,
    /// Pie geometry.
    pub pie: PieLayout,
}

impl LayoutResult {
    /// Height taken by the title, zero without one.
    pub fn title_height(&self) -> f64 {
        self.title.as_ref().map_or(0.0, |t| t.height)
    }

    /// Width taken by the legend, zero without one.
    pub fn legend_width(&self) -> f64 {
        self.legend.as_ref().map_or(0.0, |l| l.consumed_width)
    }
}

impl PieChart {
    /// Computes the title, legend and pie placement for this chart.
    ///
    /// The chart is not modified. Fails with [`LayoutError::EmptyCanvas`] when
    /// either dimension is zero and [`LayoutError::DegenerateChart`] when the
    /// slice values sum to zero.
    pub fn layout(&self, measurer: &dyn TextMeasurer) -> Result<LayoutResult, LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.slices.total_value() <= 0.0 {
            return Err(LayoutError::DegenerateChart);
        }

        let title = TitleBand::fit(self, measurer);
        let title_height = title.as_ref().map_or(0.0, |t| t.height);
        let legend = LegendBand::fit(self, title_height, measurer);
        let legend_width = legend.as_ref().map_or(0.0, |l| l.consumed_width);
        let pie = PieLayout::fit(self, title_height, legend_width)?;

        Ok(LayoutResult {
            canvas: Rect::new(0.0, 0.0, self.width_f64(), self.height_f64()),
            title,
            legend,
            pie,
        })
    }
}
