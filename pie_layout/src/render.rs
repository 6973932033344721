// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer seam and output descriptors.
//!
//! Layout never touches pixels. [`PieChart::draw`] walks a [`LayoutResult`]
//! and issues primitive calls on a [`Renderer`]; [`PieChart::render`] then asks
//! the renderer to encode the surface. Rasterization, glyph drawing and image
//! encoding all live behind the trait.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use pie_text::{TextMeasurer, TextStyle};

use crate::{ColorValue, LayoutError, LayoutResult, PieChart, Wedge};

/// Encoded image formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// GIF.
    Gif,
    /// JPEG.
    Jpeg,
    /// PNG.
    Png,
}

impl ImageFormat {
    /// MIME type for HTTP responses.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Filename used when the caller does not supply one.
    pub fn default_filename(self) -> &'static str {
        match self {
            Self::Gif => "pie-chart.gif",
            Self::Jpeg => "pie-chart.jpg",
            Self::Png => "pie-chart.png",
        }
    }
}

/// How encoded bytes reach their destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Displayed in place, e.g. an HTTP response body.
    #[default]
    Inline,
    /// Offered as a file download.
    Download,
    /// Written to the filesystem.
    Save,
}

impl OutputMode {
    /// `Content-Disposition` type for HTTP transports; `None` for [`OutputMode::Save`].
    pub fn disposition(self) -> Option<&'static str> {
        match self {
            Self::Inline => Some("inline"),
            Self::Download => Some("attachment"),
            Self::Save => None,
        }
    }

    /// `Content-Type` for HTTP transports. Downloads go out as opaque bytes so
    /// browsers save them instead of displaying them.
    pub fn content_type(self, format: ImageFormat) -> &'static str {
        match self {
            Self::Download => "application/octet-stream",
            Self::Inline | Self::Save => format.mime_type(),
        }
    }

    /// Cache headers sent ahead of the content headers.
    pub fn cache_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Download => &[
                ("Pragma", "public"),
                (
                    "Cache-Control",
                    "must-revalidate, post-check=0, pre-check=0",
                ),
            ],
            Self::Inline | Self::Save => &[],
        }
    }
}

/// Errors in output configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Quality outside `0..=100`.
    #[error("quality {0} is outside 0..=100")]
    InvalidQuality(u8),
}

/// Encoder quality, `0..=100`. Lossless formats may ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Highest quality.
    pub const MAX: Self = Self(100);

    /// Validates `value`.
    pub fn new(value: u8) -> Result<Self, RenderError> {
        if value > 100 {
            return Err(RenderError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    /// The raw value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}

/// What to produce and where it goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRequest {
    /// Encoding.
    pub format: ImageFormat,
    /// Transport.
    pub mode: OutputMode,
    /// Target filename; [`ImageFormat::default_filename`] when `None`.
    pub filename: Option<String>,
    /// Encoder quality.
    pub quality: Quality,
}

impl OutputRequest {
    /// A request with the default filename and quality.
    pub fn new(format: ImageFormat, mode: OutputMode) -> Self {
        Self {
            format,
            mode,
            filename: None,
            quality: Quality::default(),
        }
    }

    /// Sets the filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the quality.
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// The effective filename.
    pub fn filename(&self) -> &str {
        self.filename
            .as_deref()
            .unwrap_or_else(|| self.format.default_filename())
    }
}

/// Encoded bytes plus what the transport needs to deliver them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoding.
    pub format: ImageFormat,
    /// Transport.
    pub mode: OutputMode,
    /// Effective filename.
    pub filename: String,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// MIME type of `bytes`.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// HTTP response headers in send order; empty for [`OutputMode::Save`].
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let Some(disposition) = self.mode.disposition() else {
            return Vec::new();
        };
        let mut headers: Vec<(&'static str, String)> = self
            .mode
            .cache_headers()
            .iter()
            .map(|&(name, value)| (name, String::from(value)))
            .collect();
        headers.push((
            "Content-Type",
            String::from(self.mode.content_type(self.format)),
        ));
        headers.push((
            "Content-Disposition",
            format!("{disposition}; filename=\"{}\"", self.filename),
        ));
        headers
    }
}

/// A single-line text draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun<'a> {
    /// The text.
    pub text: &'a str,
    /// Font and size.
    pub style: TextStyle,
    /// Top-left of the measured text box.
    pub origin: Point,
    /// Measured width.
    pub width: f64,
    /// Measured height.
    pub height: f64,
    /// Fill color.
    pub color: ColorValue,
}

impl TextRun<'_> {
    /// The measured text box.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
    }
}

/// A drawing surface that can also encode itself.
pub trait Renderer {
    /// Backend failure.
    type Error;

    /// Fills the whole canvas.
    fn draw_background(&mut self, canvas: Rect, color: ColorValue) -> Result<(), Self::Error>;

    /// Fills one pie wedge.
    fn draw_wedge(&mut self, wedge: &Wedge) -> Result<(), Self::Error>;

    /// Fills an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: Rect, color: ColorValue) -> Result<(), Self::Error>;

    /// Draws a line of text.
    fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), Self::Error>;

    /// Encodes what has been drawn so far.
    fn encode(&mut self, format: ImageFormat, quality: Quality) -> Result<Vec<u8>, Self::Error>;
}

/// Failure of [`PieChart::draw`] or [`PieChart::render`].
#[derive(Debug, thiserror::Error)]
pub enum DrawError<E> {
    /// The chart could not be laid out.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The renderer failed.
    #[error("renderer failed: {0}")]
    Backend(E),
}

impl PieChart {
    /// Lays out the chart and draws it: background, wedges, legend, then title.
    ///
    /// Returns the layout that was drawn.
    pub fn draw<R: Renderer + ?Sized>(
        &self,
        measurer: &dyn TextMeasurer,
        renderer: &mut R,
    ) -> Result<LayoutResult, DrawError<R::Error>> {
        let layout = self.layout(measurer)?;

        renderer
            .draw_background(layout.canvas, self.background_color)
            .map_err(DrawError::Backend)?;

        for wedge in &layout.pie.wedges {
            renderer.draw_wedge(wedge).map_err(DrawError::Backend)?;
        }

        if let Some(legend) = &layout.legend {
            let style = self.legend_font.at_size(legend.font_size);
            for key in &legend.keys {
                renderer
                    .draw_rect(key.square, key.color)
                    .map_err(DrawError::Backend)?;
                renderer
                    .draw_text(&TextRun {
                        text: &key.label,
                        style: style.clone(),
                        origin: key.label_origin,
                        width: key.label_width,
                        height: key.label_height,
                        color: self.text_color,
                    })
                    .map_err(DrawError::Backend)?;
            }
        }

        if let Some(title) = &layout.title {
            renderer
                .draw_text(&TextRun {
                    text: &self.title,
                    style: self.title_font.at_size(title.font_size),
                    origin: title.origin,
                    width: title.text_size.width,
                    height: title.text_size.height,
                    color: self.text_color,
                })
                .map_err(DrawError::Backend)?;
        }

        Ok(layout)
    }

    /// Draws the chart and encodes it as requested.
    pub fn render<R: Renderer + ?Sized>(
        &self,
        measurer: &dyn TextMeasurer,
        renderer: &mut R,
        request: &OutputRequest,
    ) -> Result<EncodedImage, DrawError<R::Error>> {
        self.draw(measurer, renderer)?;
        let bytes = renderer
            .encode(request.format, request.quality)
            .map_err(DrawError::Backend)?;
        tracing::debug!(
            format = request.format.extension(),
            bytes = bytes.len(),
            "chart encoded"
        );
        Ok(EncodedImage {
            format: request.format,
            mode: request.mode,
            filename: String::from(request.filename()),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;

    use pie_text::HeuristicTextMeasurer;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Background(ColorValue),
        Wedge(usize),
        Rect(ColorValue),
        Text(String),
        Encode(ImageFormat, u8),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        fail_on_text: bool,
    }

    impl Renderer for Recorder {
        type Error = &'static str;

        fn draw_background(&mut self, _: Rect, color: ColorValue) -> Result<(), Self::Error> {
            self.ops.push(Op::Background(color));
            Ok(())
        }

        fn draw_wedge(&mut self, wedge: &Wedge) -> Result<(), Self::Error> {
            self.ops.push(Op::Wedge(wedge.slice));
            Ok(())
        }

        fn draw_rect(&mut self, _: Rect, color: ColorValue) -> Result<(), Self::Error> {
            self.ops.push(Op::Rect(color));
            Ok(())
        }

        fn draw_text(&mut self, run: &TextRun<'_>) -> Result<(), Self::Error> {
            if self.fail_on_text {
                return Err("no fonts");
            }
            self.ops.push(Op::Text(run.text.to_string()));
            Ok(())
        }

        fn encode(
            &mut self,
            format: ImageFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, Self::Error> {
            self.ops.push(Op::Encode(format, quality.get()));
            Ok(vec![1, 2, 3])
        }
    }

    fn chart() -> PieChart {
        let red = ColorValue::rgb(255, 0, 0);
        let blue = ColorValue::rgb(0, 0, 255);
        let mut chart = PieChart::new(600, 375).with_title("Fruit");
        chart.add_slice("Apples", 3.0, red).unwrap();
        chart.add_slice("Plums", 0.0, ColorValue::BLACK).unwrap();
        chart.add_slice("Berries", 1.0, blue).unwrap();
        chart
    }

    #[test]
    fn draw_order_and_contents() {
        let chart = chart();
        let mut recorder = Recorder::default();
        chart.draw(&HeuristicTextMeasurer, &mut recorder).unwrap();

        assert_eq!(
            recorder.ops,
            vec![
                Op::Background(ColorValue::WHITE),
                Op::Wedge(0),
                Op::Wedge(2),
                Op::Rect(ColorValue::rgb(255, 0, 0)),
                Op::Text("Apples".into()),
                Op::Rect(ColorValue::BLACK),
                Op::Text("Plums".into()),
                Op::Rect(ColorValue::rgb(0, 0, 255)),
                Op::Text("Berries".into()),
                Op::Text("Fruit".into()),
            ]
        );
    }

    #[test]
    fn render_encodes_with_default_filename() {
        let chart = chart();
        let mut recorder = Recorder::default();
        let request = OutputRequest::new(ImageFormat::Jpeg, OutputMode::Download)
            .with_quality(Quality::new(80).unwrap());
        let image = chart
            .render(&HeuristicTextMeasurer, &mut recorder, &request)
            .unwrap();

        assert_eq!(image.filename, "pie-chart.jpg");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.mode.disposition(), Some("attachment"));
        assert_eq!(recorder.ops.last(), Some(&Op::Encode(ImageFormat::Jpeg, 80)));
    }

    #[test]
    fn headers_follow_the_output_mode() {
        let image = |mode| EncodedImage {
            format: ImageFormat::Gif,
            mode,
            filename: String::from("usage.gif"),
            bytes: Vec::new(),
        };

        assert_eq!(
            image(OutputMode::Inline).headers(),
            vec![
                ("Content-Type", String::from("image/gif")),
                ("Content-Disposition", String::from("inline; filename=\"usage.gif\"")),
            ]
        );
        assert_eq!(
            image(OutputMode::Download).headers(),
            vec![
                ("Pragma", String::from("public")),
                (
                    "Cache-Control",
                    String::from("must-revalidate, post-check=0, pre-check=0")
                ),
                ("Content-Type", String::from("application/octet-stream")),
                (
                    "Content-Disposition",
                    String::from("attachment; filename=\"usage.gif\"")
                ),
            ]
        );
        assert!(image(OutputMode::Save).headers().is_empty());
        assert_eq!(OutputMode::Save.content_type(ImageFormat::Png), "image/png");
    }

    #[test]
    fn custom_filename_wins() {
        let request =
            OutputRequest::new(ImageFormat::Png, OutputMode::Save).with_filename("out.png");
        assert_eq!(request.filename(), "out.png");
        assert_eq!(request.quality, Quality::MAX);
        assert_eq!(request.mode.disposition(), None);
    }

    #[test]
    fn backend_errors_propagate() {
        let chart = chart();
        let mut recorder = Recorder {
            fail_on_text: true,
            ..Recorder::default()
        };
        let err = chart.draw(&HeuristicTextMeasurer, &mut recorder).unwrap_err();
        assert!(matches!(err, DrawError::Backend("no fonts")));
        assert_eq!(format!("{err}"), "renderer failed: no fonts");
    }

    #[test]
    fn layout_errors_stop_before_drawing() {
        let chart = PieChart::new(100, 100);
        let mut recorder = Recorder::default();
        let err = chart.draw(&HeuristicTextMeasurer, &mut recorder).unwrap_err();
        assert!(matches!(err, DrawError::Layout(LayoutError::DegenerateChart)));
        assert!(recorder.ops.is_empty());
    }

    #[test]
    fn quality_is_validated() {
        assert_eq!(Quality::new(100).unwrap().get(), 100);
        assert_eq!(Quality::new(0).unwrap().get(), 0);
        assert_eq!(Quality::new(101), Err(RenderError::InvalidQuality(101)));
    }

    #[test]
    fn format_descriptors() {
        for (format, mime, ext) in [
            (ImageFormat::Gif, "image/gif", "gif"),
            (ImageFormat::Jpeg, "image/jpeg", "jpg"),
            (ImageFormat::Png, "image/png", "png"),
        ] {
            assert_eq!(format.mime_type(), mime);
            assert_eq!(format.extension(), ext);
            assert_eq!(format.default_filename(), format!("pie-chart.{ext}"));
        }
    }
}
