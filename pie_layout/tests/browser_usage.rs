// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end layout of a typical five-slice chart.

use pie_layout::{
    CachingTextMeasurer, ColorValue, HeuristicTextMeasurer, LayoutConfig, LayoutError, PieChart,
    SortOrder,
};

const BROWSERS: [(&str, f64, &str); 5] = [
    ("Chrome", 27.0, "#4285F4"),
    ("Firefox", 23.0, "#FF9500"),
    ("Safari", 11.0, "rgb(0, 191, 255)"),
    ("Opera", 3.0, "#f00"),
    ("Other", 5.0, "#808080"),
];

fn browser_usage(width: u32, height: u32) -> PieChart {
    let mut chart = PieChart::new(width, height).with_title("Browser Usage");
    for (name, value, color) in BROWSERS {
        chart
            .add_slice(name, value, ColorValue::parse(color).unwrap())
            .unwrap();
    }
    chart
}

#[test]
fn full_chart_has_every_band() {
    let chart = browser_usage(600, 375);
    let result = chart.layout(&HeuristicTextMeasurer).unwrap();

    let title = result.title.as_ref().expect("title fits");
    assert!((title.font_size - 30.0).abs() < 1e-9);

    let legend = result.legend.as_ref().expect("legend fits");
    let labels: Vec<&str> = legend.keys.iter().map(|k| k.label.as_str()).collect();
    assert_eq!(labels, ["Chrome", "Firefox", "Safari", "Opera", "Other"]);
    assert_eq!(legend.keys[3].color, ColorValue::rgb(255, 0, 0));
    assert!(legend.rect.y0 > title.height);

    let wedges = &result.pie.wedges;
    assert_eq!(wedges.len(), 5);
    assert!((wedges[0].start_angle + 90.0).abs() < 1e-9);
    assert_eq!(wedges[4].end_angle, 270.0);
    for (wedge, (_, value, _)) in wedges.iter().zip(BROWSERS) {
        assert!((wedge.sweep() - 360.0 * value / 69.0).abs() < 1e-9);
        assert_eq!(wedge.radius, result.pie.radius);
    }
}

#[test]
fn zero_valued_slice_is_listed_but_not_drawn() {
    let mut chart = browser_usage(600, 375);
    chart.add_slice("Netscape", 0.0, ColorValue::BLACK).unwrap();
    let result = chart.layout(&HeuristicTextMeasurer).unwrap();

    assert_eq!(result.legend.unwrap().keys.len(), 6);
    assert_eq!(result.pie.wedges.len(), 5);
    assert!(result.pie.wedges.iter().all(|w| w.slice != 5));
}

#[test]
fn tiny_canvas_drops_title_and_legend() {
    let mut chart = browser_usage(10, 10);
    chart.set_title("A very long chart title that cannot fit", None);
    let result = chart.layout(&HeuristicTextMeasurer).unwrap();

    assert!(result.title.is_none());
    assert!(result.legend.is_none());
    assert_eq!(result.pie.center.x, 5.0);
    assert_eq!(result.pie.center.y, 5.0);
    // round(10 * 0.85) = 9
    assert_eq!(result.pie.diameter, 9.0);
}

#[test]
fn disabling_the_legend_widens_the_pie_area() {
    let mut chart = browser_usage(600, 375);
    let with_legend = chart.layout(&HeuristicTextMeasurer).unwrap();
    chart.set_legend(false, None);
    let without = chart.layout(&HeuristicTextMeasurer).unwrap();

    assert!(without.legend.is_none());
    assert_eq!(without.pie.center.x, 300.0);
    assert!(with_legend.pie.center.x < without.pie.center.x);
    assert!(with_legend.pie.diameter <= without.pie.diameter);
}

#[test]
fn gd_preset_uses_smaller_fonts_and_double_padding() {
    let imagick = browser_usage(600, 400).layout(&HeuristicTextMeasurer).unwrap();
    let gd = browser_usage(600, 400)
        .with_config(LayoutConfig::gd())
        .layout(&HeuristicTextMeasurer)
        .unwrap();

    let gd_title = gd.title.unwrap();
    let gd_legend = gd.legend.unwrap();
    assert!(gd_title.font_size < imagick.title.unwrap().font_size);
    assert!(gd_legend.font_size < imagick.legend.unwrap().font_size);
    // 0.05 * 600 on each side.
    assert!((gd_legend.consumed_width - (gd_legend.rect.width() + 60.0)).abs() < 1e-9);
}

#[test]
fn sorting_reorders_wedges_and_keys() {
    let mut chart = browser_usage(600, 375);
    chart.slices.sort_by_value(SortOrder::Asc);
    let result = chart.layout(&HeuristicTextMeasurer).unwrap();

    let first = &result.legend.unwrap().keys[0];
    assert_eq!(first.label, "Opera");
    assert!((result.pie.wedges[0].sweep() - 360.0 * 3.0 / 69.0).abs() < 1e-9);
}

#[test]
fn layout_leaves_the_chart_untouched() {
    let chart = browser_usage(600, 375);
    let measurer = CachingTextMeasurer::new(HeuristicTextMeasurer);
    let a = chart.layout(&measurer).unwrap();
    let b = chart.layout(&measurer).unwrap();
    assert_eq!(a, b);
    assert_eq!(chart.slices.len(), 5);
    assert_eq!(chart.title, "Browser Usage");
}

#[test]
fn all_zero_values_are_degenerate() {
    let mut chart = PieChart::new(600, 375);
    chart.add_slice("A", 0.0, ColorValue::BLACK).unwrap();
    chart.add_slice("B", 0.0, ColorValue::BLACK).unwrap();
    assert_eq!(
        chart.layout(&HeuristicTextMeasurer),
        Err(LayoutError::DegenerateChart)
    );
}

#[test]
fn removing_a_slice_rebalances_the_pie() {
    let mut chart = browser_usage(600, 375);
    assert!(chart.remove_slice("Chrome").is_some());
    assert!(chart.remove_slice("Chrome").is_none());
    let result = chart.layout(&HeuristicTextMeasurer).unwrap();
    assert_eq!(result.pie.wedges.len(), 4);
    assert!((result.pie.wedges[0].sweep() - 360.0 * 23.0 / 42.0).abs() < 1e-9);
}
