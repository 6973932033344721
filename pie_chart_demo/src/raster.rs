// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU raster backend on top of `image`.
//!
//! Geometry and glyphs are filled at `antialias` times the output size and
//! box-filtered down on encode. Text needs a TrueType or OpenType font; without
//! one, [`Renderer::draw_text`] fails with [`RasterError::NoFont`].

use std::io::Cursor;
use std::path::PathBuf;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use kurbo::{Point, Rect};
use pie_layout::{ColorValue, ImageFormat, Quality, Renderer, TextRun, Wedge};

/// Supersampling factor used unless overridden.
pub(crate) const DEFAULT_ANTIALIAS: u32 = 4;

/// Environment variable naming a font file for text runs.
pub(crate) const FONT_ENV: &str = "PIE_CHART_FONT";

/// Fonts tried when [`FONT_ENV`] is unset.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, thiserror::Error)]
pub(crate) enum RasterError {
    #[error("no font loaded; set PIE_CHART_FONT to a TrueType or OpenType file")]
    NoFont,
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Loads the first readable font from [`FONT_ENV`] or the platform candidates.
pub(crate) fn find_font() -> Option<FontArc> {
    let configured = std::env::var_os(FONT_ENV).map(PathBuf::from);
    let candidates = configured
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from));
    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "raster font loaded");
                return Some(font);
            }
            Err(err) => tracing::warn!(path = %path.display(), %err, "unusable font file"),
        }
    }
    None
}

#[derive(Debug)]
pub(crate) struct RasterRenderer {
    width: u32,
    height: u32,
    scale: u32,
    canvas: RgbImage,
    font: Option<FontArc>,
}

impl RasterRenderer {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self::with_antialias(width, height, DEFAULT_ANTIALIAS)
    }

    /// `0` and `1` both disable supersampling.
    pub(crate) fn with_antialias(width: u32, height: u32, antialias: u32) -> Self {
        let scale = antialias.max(1);
        Self {
            width,
            height,
            scale,
            canvas: RgbImage::new(width * scale, height * scale),
            font: None,
        }
    }

    /// Draws text runs with `font`.
    pub(crate) fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    fn pixel(color: ColorValue) -> Rgb<u8> {
        Rgb([color.r(), color.g(), color.b()])
    }

    /// Canvas pixel range covering `rect` in chart units, clamped to the canvas.
    fn pixel_bounds(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let s = f64::from(self.scale);
        let clamp_x = |v: f64| to_pixel(v * s, self.canvas.width());
        let clamp_y = |v: f64| to_pixel(v * s, self.canvas.height());
        (
            clamp_x(rect.x0.floor()),
            clamp_y(rect.y0.floor()),
            clamp_x(rect.x1.ceil()),
            clamp_y(rect.y1.ceil()),
        )
    }

    fn fill(&mut self, rect: Rect, color: ColorValue, inside: impl Fn(Point) -> bool) {
        let (x0, y0, x1, y1) = self.pixel_bounds(rect);
        let s = f64::from(self.scale);
        let rgb = Self::pixel(color);
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Point::new((f64::from(x) + 0.5) / s, (f64::from(y) + 0.5) / s);
                if inside(sample) {
                    self.canvas.put_pixel(x, y, rgb);
                }
            }
        }
    }

    fn downsampled(&self) -> RgbImage {
        if self.scale == 1 {
            return self.canvas.clone();
        }
        imageops::resize(&self.canvas, self.width, self.height, FilterType::Triangle)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to the canvas range"
)]
fn to_pixel(v: f64, max: u32) -> u32 {
    v.clamp(0.0, f64::from(max)) as u32
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "checked against the canvas range"
)]
fn glyph_pixel(v: f32, max: u32) -> Option<u32> {
    (v >= 0.0 && v < max as f32).then(|| v as u32)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "glyph coordinates are far inside f32 range"
)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "a blend of two u8 values stays in 0..=255"
)]
fn blend(from: u8, to: u8, coverage: f32) -> u8 {
    let from = f32::from(from);
    (from + (f32::from(to) - from) * coverage).round() as u8
}

impl Renderer for RasterRenderer {
    type Error = RasterError;

    fn draw_background(&mut self, _canvas: Rect, color: ColorValue) -> Result<(), Self::Error> {
        let rgb = Self::pixel(color);
        for pixel in self.canvas.pixels_mut() {
            *pixel = rgb;
        }
        Ok(())
    }

    fn draw_wedge(&mut self, wedge: &Wedge) -> Result<(), Self::Error> {
        let r = wedge.radius;
        let bounds = Rect::new(
            wedge.center.x - r,
            wedge.center.y - r,
            wedge.center.x + r,
            wedge.center.y + r,
        );
        self.fill(bounds, wedge.color, |p| wedge.contains(p));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: ColorValue) -> Result<(), Self::Error> {
        self.fill(rect, color, |p| rect.contains(p));
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), Self::Error> {
        let Self {
            scale,
            canvas,
            font,
            ..
        } = self;
        let font = font.as_ref().ok_or(RasterError::NoFont)?;
        let s = to_f32(f64::from(*scale));
        let scaled = font.as_scaled(PxScale::from(to_f32(run.style.font_size) * s));
        let baseline = to_f32(run.origin.y) * s + scaled.ascent();
        let target = [run.color.r(), run.color.g(), run.color.b()];
        let (width, height) = canvas.dimensions();

        let mut caret = to_f32(run.origin.x) * s;
        let mut previous = None;
        for c in run.text.chars() {
            let mut glyph = scaled.scaled_glyph(c);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, glyph.id);
            }
            previous = Some(glyph.id);
            glyph.position = point(caret, baseline);
            caret += scaled.h_advance(glyph.id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = glyph_pixel(bounds.min.x + x as f32, width);
                let py = glyph_pixel(bounds.min.y + y as f32, height);
                if let (Some(px), Some(py)) = (px, py) {
                    let pixel = canvas.get_pixel_mut(px, py);
                    for (channel, to) in pixel.0.iter_mut().zip(target) {
                        *channel = blend(*channel, to, coverage.clamp(0.0, 1.0));
                    }
                }
            });
        }
        Ok(())
    }

    fn encode(&mut self, format: ImageFormat, quality: Quality) -> Result<Vec<u8>, Self::Error> {
        let image = self.downsampled();
        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut bytes, quality.get().max(1))
                    .encode_image(&image)?;
            }
            ImageFormat::Png => {
                DynamicImage::ImageRgb8(image)
                    .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
            }
            ImageFormat::Gif => {
                DynamicImage::ImageRgb8(image)
                    .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Gif)?;
            }
        }
        Ok(bytes)
    }
}
