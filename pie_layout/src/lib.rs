// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive pie chart layout.
//!
//! Given a canvas size, an optional title and a set of named, colored slices,
//! this crate decides:
//! - **Title**: the largest font size (stepping down from a height-relative
//!   start) at which the title fits the width budget, or no title at all.
//! - **Legend**: a right-aligned column of color keys and labels sized from the
//!   chart dimensions, dropped when illegible or too large.
//! - **Pie**: the center, whole-pixel diameter and angular span of every
//!   non-zero slice in the remaining area.
//!
//! The result is a backend-neutral [`LayoutResult`]. Drawing goes through the
//! [`Renderer`] trait; text widths come from a [`TextMeasurer`].
//!
//! ```
//! use pie_layout::{ColorValue, HeuristicTextMeasurer, PieChart};
//!
//! let mut chart = PieChart::new(600, 375).with_title("Browser Usage");
//! chart.add_slice("Chrome", 27.0, ColorValue::parse("#4285F4")?)?;
//! chart.add_slice("Firefox", 23.0, ColorValue::parse("rgb(255, 149, 0)")?)?;
//!
//! let layout = chart.layout(&HeuristicTextMeasurer)?;
//! assert_eq!(layout.pie.wedges.len(), 2);
//! assert!(layout.title.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]

extern crate alloc;

mod chart;
mod color;
mod config;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod layout;
mod legend;
mod pie;
mod render;
mod slices;
mod title;

pub use chart::{DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR, PieChart};
pub use color::{ColorParseMode, ColorSource, ColorValue, FormatIssue, InvalidColorFormat};
pub use config::{LayoutConfig, LegendPadding};
pub use error::LayoutError;
pub use layout::LayoutResult;
pub use legend::{LegendBand, LegendKey};
pub use pie::{PieLayout, Wedge};
pub use render::{
    DrawError, EncodedImage, ImageFormat, OutputMode, OutputRequest, Quality, RenderError,
    Renderer, TextRun,
};
pub use slices::{Slice, SliceSet, SortOrder};
pub use title::TitleBand;

pub use pie_text::{
    CachingTextMeasurer, FontFamily, FontRef, FontStyle, FontWeight, HeuristicTextMeasurer,
    TextMeasurer, TextMetrics, TextStyle,
};
