// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG backend for `pie_chart_demo`.
//!
//! Unlike the raster backend this one draws text, so it is the quickest way to
//! eyeball title and legend placement.

use std::fmt::Write as _;

use kurbo::Rect;
use pie_layout::{ColorValue, ImageFormat, Quality, Renderer, TextRun, Wedge};

/// Flattening tolerance for wedge arcs, in chart units.
const TOLERANCE: f64 = 0.1;

#[derive(Debug, thiserror::Error)]
pub(crate) enum SvgError {
    #[error("the SVG backend cannot encode {0:?}; call `finish` instead")]
    UnsupportedFormat(ImageFormat),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

#[derive(Debug, Default)]
pub(crate) struct SvgRenderer {
    body: String,
    view_box: Option<Rect>,
}

impl SvgRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Closes the document and returns it.
    pub(crate) fn finish(self) -> String {
        let view_box = self
            .view_box
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::with_capacity(self.body.len() + 160);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl Renderer for SvgRenderer {
    type Error = SvgError;

    fn draw_background(&mut self, canvas: Rect, color: ColorValue) -> Result<(), Self::Error> {
        self.view_box = Some(canvas);
        self.draw_rect(canvas, color)
    }

    fn draw_wedge(&mut self, wedge: &Wedge) -> Result<(), Self::Error> {
        let d = wedge.to_path(TOLERANCE).to_svg();
        writeln!(self.body, r#"<path d="{d}" fill="{}"/>"#, wedge.color)?;
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: ColorValue) -> Result<(), Self::Error> {
        writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{color}"/>"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
        )?;
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), Self::Error> {
        write!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}" font-family="{}" font-weight="{}""#,
            run.origin.x,
            run.origin.y,
            run.style.font_size,
            escape_xml(run.style.font_family.as_css_family()),
            run.style.font_weight.0,
        )?;
        writeln!(
            self.body,
            r#" dominant-baseline="text-before-edge" fill="{}">{}</text>"#,
            run.color,
            escape_xml(run.text),
        )?;
        Ok(())
    }

    fn encode(&mut self, format: ImageFormat, _quality: Quality) -> Result<Vec<u8>, Self::Error> {
        Err(SvgError::UnsupportedFormat(format))
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
