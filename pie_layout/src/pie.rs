// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie geometry: center, radius and one wedge per non-zero slice.
//!
//! Angles are in degrees, measured clockwise from 3 o'clock in the y-down
//! canvas space. The first wedge starts at [`crate::LayoutConfig::start_angle`]
//! (12 o'clock by default) and the last one closes the circle exactly.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Circle, CircleSegment, Point, Shape, Vec2};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::{ColorValue, LayoutError, PieChart};

/// A filled sector of the pie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wedge {
    /// Index of the slice in display order.
    pub slice: usize,
    /// Pie center.
    pub center: Point,
    /// Pie radius.
    pub radius: f64,
    /// Start angle in degrees.
    pub start_angle: f64,
    /// End angle in degrees; always greater than `start_angle`.
    pub end_angle: f64,
    /// Fill color.
    pub color: ColorValue,
}

impl Wedge {
    /// Angular extent in degrees.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Point on the rim at `start_angle`.
    pub fn start_point(&self) -> Point {
        self.rim_point(self.start_angle)
    }

    /// Point on the rim at `end_angle`.
    pub fn end_point(&self) -> Point {
        self.rim_point(self.end_angle)
    }

    fn rim_point(&self, degrees: f64) -> Point {
        self.center + self.radius * Vec2::from_angle(degrees.to_radians())
    }

    /// The wedge as a kurbo circle segment with no inner radius.
    pub fn to_segment(&self) -> CircleSegment {
        Circle::new(self.center, self.radius).segment(
            0.0,
            self.start_angle.to_radians(),
            self.sweep().to_radians(),
        )
    }

    /// The wedge outline as a closed path.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        self.to_segment().to_path(tolerance)
    }

    /// The triangle spanned by the center and the two rim endpoints.
    ///
    /// Backends that fill the arc and the chord separately draw this on top of
    /// the arc to cover the gap at the center.
    pub fn triangle(&self) -> [Point; 3] {
        [self.center, self.start_point(), self.end_point()]
    }

    /// Whether `point` lies inside the wedge (rim inclusive).
    pub fn contains(&self, point: Point) -> bool {
        let offset = point - self.center;
        if offset.hypot() > self.radius {
            return false;
        }
        if self.sweep() >= 360.0 {
            return true;
        }
        let relative = offset.atan2().to_degrees() - self.start_angle;
        let relative = relative - 360.0 * (relative / 360.0).floor();
        relative <= self.sweep()
    }
}

/// The pie circle and its wedges.
#[derive(Clone, Debug, PartialEq)]
pub struct PieLayout {
    /// Pie center.
    pub center: Point,
    /// Whole-pixel diameter.
    pub diameter: f64,
    /// Half the diameter.
    pub radius: f64,
    /// One wedge per non-zero slice, in slice order.
    pub wedges: Vec<Wedge>,
}

impl PieLayout {
    /// Places the pie in the area left over by the title and legend.
    ///
    /// Fails with [`LayoutError::DegenerateChart`] when the slices sum to zero.
    pub fn fit(
        chart: &PieChart,
        title_height: f64,
        legend_width: f64,
    ) -> Result<Self, LayoutError> {
        let spans = chart.slices.proportional_spans()?;

        let config = &chart.config;
        let free_width = (chart.width_f64() - legend_width).max(0.0);
        let free_height = (chart.height_f64() - title_height).max(0.0);
        let center = Point::new(0.5 * free_width, title_height + 0.5 * free_height);
        let diameter = (free_width.min(free_height) * config.pie_fill_ratio).round();
        let radius = 0.5 * diameter;

        let start = config.start_angle;
        let mut wedges = Vec::with_capacity(chart.slices.len());
        let mut angle = start;
        for (i, (slice, span)) in spans.enumerate() {
            if span <= 0.0 {
                continue;
            }
            wedges.push(Wedge {
                slice: i,
                center,
                radius,
                start_angle: angle,
                end_angle: angle + span,
                color: slice.color(),
            });
            angle += span;
        }
        if let Some(last) = wedges.last_mut() {
            last.end_angle = start + 360.0;
        }

        tracing::debug!(
            cx = center.x,
            cy = center.y,
            diameter,
            wedges = wedges.len(),
            "pie placed"
        );

        Ok(Self {
            center,
            diameter,
            radius,
            wedges,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn chart_with(values: &[f64]) -> PieChart {
        let mut chart = PieChart::new(400, 300);
        for (i, &v) in values.iter().enumerate() {
            chart
                .add_slice(alloc::format!("s{i}"), v, ColorValue::BLACK)
                .unwrap();
        }
        chart
    }

    fn near(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn equal_halves() {
        let pie = PieLayout::fit(&chart_with(&[1.0, 1.0]), 0.0, 0.0).unwrap();

        assert_eq!(pie.center, Point::new(200.0, 150.0));
        // round(300 * 0.85) = 255
        assert_eq!(pie.diameter, 255.0);
        assert_eq!(pie.radius, 127.5);

        let [a, b] = pie.wedges.as_slice() else {
            panic!("expected two wedges");
        };
        assert!(near(a.start_angle, -90.0) && near(a.end_angle, 90.0));
        assert!(near(b.start_angle, 90.0) && near(b.end_angle, 270.0));
    }

    #[test]
    fn quarter_quarter_half() {
        let pie = PieLayout::fit(&chart_with(&[1.0, 1.0, 2.0]), 0.0, 0.0).unwrap();
        let starts: Vec<f64> = pie.wedges.iter().map(|w| w.start_angle).collect();
        let sweeps: Vec<f64> = pie.wedges.iter().map(Wedge::sweep).collect();
        assert_eq!(starts, [-90.0, 0.0, 90.0]);
        assert_eq!(sweeps, [90.0, 90.0, 180.0]);
        assert_eq!(pie.wedges[2].end_angle, 270.0);
    }

    #[test]
    fn free_area_excludes_title_and_legend() {
        let pie = PieLayout::fit(&chart_with(&[1.0]), 60.0, 100.0).unwrap();
        assert_eq!(pie.center, Point::new(150.0, 180.0));
        // round(min(300, 240) * 0.85) = 204
        assert_eq!(pie.diameter, 204.0);
    }

    #[test]
    fn zero_slices_get_no_wedge() {
        let pie = PieLayout::fit(&chart_with(&[1.0, 0.0, 3.0]), 0.0, 0.0).unwrap();
        assert_eq!(pie.wedges.len(), 2);
        assert_eq!(pie.wedges[0].slice, 0);
        assert_eq!(pie.wedges[1].slice, 2);
        assert!(near(pie.wedges[0].end_angle, pie.wedges[1].start_angle));
        assert!(near(pie.wedges[1].sweep(), 270.0));
    }

    #[test]
    fn last_wedge_closes_the_circle() {
        let pie = PieLayout::fit(&chart_with(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]), 0.0, 0.0)
            .unwrap();
        let last = pie.wedges.last().unwrap();
        assert_eq!(last.end_angle, 270.0);
        for pair in pie.wedges.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn zero_total_is_degenerate() {
        assert_eq!(
            PieLayout::fit(&chart_with(&[]), 0.0, 0.0),
            Err(LayoutError::DegenerateChart)
        );
        assert_eq!(
            PieLayout::fit(&chart_with(&[0.0, 0.0]), 0.0, 0.0),
            Err(LayoutError::DegenerateChart)
        );
    }

    #[test]
    fn wedge_points_and_hit_testing() {
        let wedge = Wedge {
            slice: 0,
            center: Point::new(100.0, 100.0),
            radius: 50.0,
            start_angle: -90.0,
            end_angle: 0.0,
            color: ColorValue::BLACK,
        };
        // 12 o'clock to 3 o'clock.
        let start = wedge.start_point();
        let end = wedge.end_point();
        assert!(near(start.x, 100.0) && near(start.y, 50.0));
        assert!(near(end.x, 150.0) && near(end.y, 100.0));

        assert!(wedge.contains(Point::new(120.0, 80.0)));
        assert!(!wedge.contains(Point::new(80.0, 80.0)));
        assert!(!wedge.contains(Point::new(120.0, 120.0)));
        assert!(!wedge.contains(Point::new(140.0, 60.0)), "outside the rim");

        let [c, a, b] = wedge.triangle();
        assert_eq!(c, wedge.center);
        assert_eq!(a, start);
        assert_eq!(b, end);
    }

    #[test]
    fn wedge_wrapping_past_three_oclock() {
        let wedge = Wedge {
            slice: 0,
            center: Point::ZERO,
            radius: 10.0,
            start_angle: 180.0,
            end_angle: 270.0,
            color: ColorValue::BLACK,
        };
        // Upper-left quadrant in y-down space.
        assert!(wedge.contains(Point::new(-5.0, -5.0)));
        assert!(!wedge.contains(Point::new(5.0, -5.0)));
    }

    #[test]
    fn full_circle_wedge_contains_everything_inside() {
        let pie = PieLayout::fit(&chart_with(&[5.0]), 0.0, 0.0).unwrap();
        let wedge = pie.wedges[0];
        assert!(near(wedge.sweep(), 360.0));
        assert!(wedge.contains(pie.center));
        assert!(wedge.contains(Point::new(pie.center.x - 100.0, pie.center.y)));
    }

    #[test]
    fn segment_bounds_match_the_quarter() {
        let wedge = Wedge {
            slice: 0,
            center: Point::new(0.0, 0.0),
            radius: 10.0,
            start_angle: 0.0,
            end_angle: 90.0,
            color: ColorValue::BLACK,
        };
        let bounds = wedge.to_path(0.01).bounding_box();
        assert!(bounds.x0 > -0.01 && bounds.y0 > -0.01);
        assert!((bounds.x1 - 10.0).abs() < 0.05);
        assert!((bounds.y1 - 10.0).abs() < 0.05);
    }
}
