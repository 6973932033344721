// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend band: one color key and label per slice, stacked on the right.
//!
//! The legend is all-or-nothing. If its font would be illegible, or the band
//! would take more than half the chart width or overflow the space below the
//! title, it is dropped and the pie gets the whole width.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use pie_text::TextMeasurer;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::{ColorValue, PieChart};

/// One legend row: a filled key square and the slice name beside it.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendKey {
    /// Index of the slice in display order.
    pub slice: usize,
    /// The key square.
    pub square: Rect,
    /// Key fill, the slice color.
    pub color: ColorValue,
    /// Label text, the slice name.
    pub label: String,
    /// Top-left of the label's text box, vertically centered on the square.
    pub label_origin: Point,
    /// Measured label width.
    pub label_width: f64,
    /// Measured label height.
    pub label_height: f64,
}

impl LegendKey {
    /// The label's text box.
    pub fn label_rect(&self) -> Rect {
        Rect::new(
            self.label_origin.x,
            self.label_origin.y,
            self.label_origin.x + self.label_width,
            self.label_origin.y + self.label_height,
        )
    }
}

/// The laid-out legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendBand {
    /// Bounding box of the keys and labels, excluding outer padding.
    pub rect: Rect,
    /// Horizontal space taken from the pie area, including outer padding.
    pub consumed_width: f64,
    /// Label font size.
    pub font_size: f64,
    /// Rows in slice order.
    pub keys: Vec<LegendKey>,
}

impl LegendBand {
    /// Lays out the legend below a title of `title_height`, or returns `None`
    /// when the chart has no legend or it does not fit.
    ///
    /// Zero-valued slices still get a key.
    pub fn fit(chart: &PieChart, title_height: f64, measurer: &dyn TextMeasurer) -> Option<Self> {
        if !chart.has_legend {
            return None;
        }

        let config = &chart.config;
        let width = chart.width_f64();
        let height = chart.height_f64();

        let font_size = config.legend_font_ratio * width;
        if font_size.ceil() < config.min_legend_font_size {
            tracing::debug!(
                font_size,
                min_size = config.min_legend_font_size,
                "legend suppressed: font too small"
            );
            return None;
        }
        let style = chart.legend_font.at_size(font_size);

        let square = config.legend_square_ratio * height;
        let square_padding = config.legend_square_padding_ratio * height;
        let label_padding = config.legend_label_padding_ratio * height;
        let outer_padding = config.legend_padding_ratio * width;

        let labels: Vec<_> = chart
            .slices
            .iter()
            .map(|slice| measurer.measure(slice.name(), &style))
            .collect();
        let max_label_width = labels.iter().map(|m| m.width).fold(0.0, f64::max);

        let legend_width = square + label_padding + max_label_width;
        let legend_height = labels.len() as f64 * (square + square_padding) - square_padding;

        if legend_width + 2.0 * outer_padding > 0.5 * width {
            tracing::debug!(
                legend_width,
                outer_padding,
                chart_width = width,
                "legend suppressed: wider than half the chart"
            );
            return None;
        }
        if legend_height > height - title_height - 2.0 * outer_padding {
            tracing::debug!(
                legend_height,
                title_height,
                chart_height = height,
                "legend suppressed: taller than the space below the title"
            );
            return None;
        }

        let x = width - legend_width - outer_padding;
        let y = 0.5 * (height - title_height) + title_height - 0.5 * legend_height;

        let keys = chart
            .slices
            .iter()
            .zip(&labels)
            .enumerate()
            .map(|(i, (slice, metrics))| {
                let key_y = y + i as f64 * (square + square_padding);
                LegendKey {
                    slice: i,
                    square: Rect::new(x, key_y, x + square, key_y + square),
                    color: slice.color(),
                    label: String::from(slice.name()),
                    label_origin: Point::new(
                        x + square + label_padding,
                        key_y + 0.5 * square - 0.5 * metrics.height,
                    ),
                    label_width: metrics.width,
                    label_height: metrics.height,
                }
            })
            .collect();

        Some(Self {
            rect: Rect::new(x, y, x + legend_width, y + legend_height),
            consumed_width: legend_width + outer_padding * config.legend_padding_multiplier(),
            font_size,
            keys,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use pie_text::HeuristicTextMeasurer;

    use super::*;
    use crate::{LayoutConfig, LegendPadding};

    fn browser_chart() -> PieChart {
        let mut chart = PieChart::new(600, 375);
        for (name, value, color) in [
            ("Chrome", 27.0, 0x4285F4),
            ("Firefox", 23.0, 0xFF9500),
            ("Safari", 11.0, 0x00BFFF),
            ("Opera", 3.0, 0xFF0000),
            ("Other", 5.0, 0x808080),
        ] {
            chart
                .add_slice(name, value, ColorValue::from_packed(color))
                .unwrap();
        }
        chart
    }

    #[test]
    fn keys_stack_in_slice_order() {
        let chart = browser_chart();
        let band = LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).unwrap();

        // 0.0325 * 600
        assert!((band.font_size - 19.5).abs() < 1e-9);
        assert_eq!(band.keys.len(), 5);
        assert_eq!(band.keys[0].label, "Chrome");
        assert_eq!(band.keys[4].label, "Other");

        let square = 0.06 * 375.0;
        let pitch = square + 0.025 * 375.0;
        for pair in band.keys.windows(2) {
            let dy = pair[1].square.y0 - pair[0].square.y0;
            assert!((dy - pitch).abs() < 1e-9);
        }
        for key in &band.keys {
            assert!((key.square.width() - square).abs() < 1e-9);
            assert!((key.square.x0 - band.rect.x0).abs() < 1e-9);
            assert!((key.label_rect().center().y - key.square.center().y).abs() < 1e-9);
            assert!((key.label_origin.x - (key.square.x1 + 0.025 * 375.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn band_is_right_aligned_and_vertically_centered() {
        let chart = browser_chart();
        let title_height = 50.0;
        let band = LegendBand::fit(&chart, title_height, &HeuristicTextMeasurer).unwrap();

        let outer = 0.075 * 600.0;
        assert!((band.rect.x1 - (600.0 - outer)).abs() < 1e-9);
        let free_mid = title_height + 0.5 * (375.0 - title_height);
        assert!((band.rect.center().y - free_mid).abs() < 1e-9);
        assert!((band.consumed_width - (band.rect.width() + outer)).abs() < 1e-9);
    }

    #[test]
    fn double_padding_counts_both_sides() {
        let chart = browser_chart()
            .with_config(LayoutConfig::IMAGICK.with_legend_padding(0.05, LegendPadding::Double));
        let band = LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).unwrap();
        assert!((band.consumed_width - (band.rect.width() + 60.0)).abs() < 1e-9);
    }

    #[test]
    fn disabled_legend_is_absent() {
        let mut chart = browser_chart();
        chart.set_legend(false, None);
        assert!(LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).is_none());
    }

    #[test]
    fn narrow_chart_drops_illegible_legend() {
        // 0.0325 * 200 = 6.5, rounds up to 7 < 8.
        let mut chart = browser_chart();
        chart.width = 200;
        assert!(LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).is_none());
    }

    #[test]
    fn long_labels_drop_the_legend() {
        let mut chart = browser_chart();
        chart
            .add_slice("An extremely long browser name", 1.0, ColorValue::BLACK)
            .unwrap();
        assert!(LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).is_none());
    }

    #[test]
    fn too_many_rows_drop_the_legend() {
        let mut chart = PieChart::new(600, 200);
        for i in 0..20_u32 {
            chart
                .add_slice(alloc::format!("S{i}"), 1.0, ColorValue::BLACK)
                .unwrap();
        }
        assert!(LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).is_none());
    }

    #[test]
    fn zero_valued_slices_keep_their_key() {
        let mut chart = browser_chart();
        chart.add_slice("Edge", 0.0, ColorValue::BLACK).unwrap();
        let band = LegendBand::fit(&chart, 0.0, &HeuristicTextMeasurer).unwrap();
        assert_eq!(band.keys.len(), 6);
        assert_eq!(band.keys[5].label, "Edge");
        assert_eq!(band.keys[5].slice, 5);
    }
}
