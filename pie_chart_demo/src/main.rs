// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie chart demo for `pie_layout`.
//!
//! Builds the "Browser Usage" sample chart and writes it as PNG, JPEG and GIF
//! through the raster backend plus an SVG copy. Pass `inline` or `download` to
//! stream the PNG to stdout with HTTP-style headers instead.
//!
//! Raster text needs a font file: set `PIE_CHART_FONT`, or rely on a DejaVu or
//! Arial install. Without one the raster outputs omit the title and legend.
//! Set `RUST_LOG=pie_layout=debug` to see band suppression decisions.

mod raster;
mod svg;

use std::error::Error;
use std::io::Write as _;

use pie_layout::{
    CachingTextMeasurer, ColorValue, EncodedImage, ImageFormat, OutputMode, OutputRequest,
    PieChart, Quality, TextMeasurer,
};
use tracing_subscriber::EnvFilter;

use crate::raster::RasterRenderer;
use crate::svg::SvgRenderer;

fn browser_usage() -> Result<PieChart, Box<dyn Error>> {
    let mut chart = PieChart::new(600, 375).with_title("Browser Usage");
    chart.add_slice("Chrome", 27.0, ColorValue::parse("#4285F4")?)?;
    chart.add_slice("Firefox", 23.0, ColorValue::parse("rgb(255, 149, 0)")?)?;
    chart.add_slice("Safari", 11.0, ColorValue::parse([0_u8, 191, 255])?)?;
    chart.add_slice("Opera", 3.0, ColorValue::parse(0x00FF_1B2D_u32)?)?;
    chart.add_slice("Other", 5.0, ColorValue::parse("#888")?)?;
    Ok(chart)
}

#[cfg(feature = "parley")]
fn text_measurer() -> impl TextMeasurer {
    CachingTextMeasurer::new(pie_text_parley::ParleyTextMeasurer::new())
}

#[cfg(not(feature = "parley"))]
fn text_measurer() -> impl TextMeasurer {
    CachingTextMeasurer::new(pie_layout::HeuristicTextMeasurer)
}

fn output_mode() -> Result<OutputMode, String> {
    match std::env::args().nth(1).as_deref() {
        None | Some("save") => Ok(OutputMode::Save),
        Some("inline") => Ok(OutputMode::Inline),
        Some("download") => Ok(OutputMode::Download),
        Some(other) => Err(format!(
            "unknown output mode {other:?}; expected save, inline or download"
        )),
    }
}

fn deliver(image: &EncodedImage) -> std::io::Result<()> {
    match image.mode {
        OutputMode::Save => {
            std::fs::write(&image.filename, &image.bytes)?;
            println!("wrote {} ({} bytes)", image.filename, image.bytes.len());
        }
        OutputMode::Inline | OutputMode::Download => {
            let mut out = std::io::stdout().lock();
            for (name, value) in image.headers() {
                write!(out, "{name}: {value}\r\n")?;
            }
            write!(out, "\r\n")?;
            out.write_all(&image.bytes)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = output_mode()?;
    let chart = browser_usage()?;
    let measurer = text_measurer();

    let layout = chart.layout(&measurer)?;
    tracing::info!(
        title = layout.title.is_some(),
        legend = layout.legend.is_some(),
        wedges = layout.pie.wedges.len(),
        diameter = layout.pie.diameter,
        "laid out chart"
    );

    let font = raster::find_font();
    let raster_chart = if font.is_some() {
        chart.clone()
    } else {
        tracing::warn!(
            env = raster::FONT_ENV,
            "no font for the raster backend; raster outputs omit the title and legend"
        );
        let mut bare = chart.clone().with_title("");
        bare.set_legend(false, None);
        bare
    };

    let formats: &[ImageFormat] = match mode {
        OutputMode::Save => &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif],
        OutputMode::Inline | OutputMode::Download => &[ImageFormat::Png],
    };
    for &format in formats {
        let mut renderer = RasterRenderer::new(chart.width, chart.height);
        if let Some(font) = &font {
            renderer = renderer.with_font(font.clone());
        }
        let request = OutputRequest::new(format, mode).with_quality(Quality::new(90)?);
        let image = raster_chart.render(&measurer, &mut renderer, &request)?;
        deliver(&image)?;
    }

    if mode == OutputMode::Save {
        let mut svg = SvgRenderer::new();
        chart.draw(&measurer, &mut svg)?;
        std::fs::write("pie-chart.svg", svg.finish())?;
        println!("wrote pie-chart.svg");
    }
    Ok(())
}
