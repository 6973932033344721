// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout errors.
//!
//! A title or legend that does not fit is not an error: it is reported as an
//! absent band in [`crate::LayoutResult`].

extern crate alloc;

use alloc::string::String;

/// Errors returned by slice bookkeeping and the layout pass.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The slices sum to zero, so no slice has an angular share.
    ///
    /// Callers that want to draw an empty chart should check
    /// [`crate::SliceSet::total_value`] first and skip the pie.
    #[error("slice values sum to zero; the pie has no angular spans")]
    DegenerateChart,
    /// The chart has no drawable area.
    #[error("chart size {width}x{height} has no drawable area")]
    EmptyCanvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A slice value is negative or not finite.
    #[error("slice {name:?} has invalid value {value}")]
    InvalidSliceValue {
        /// Slice name.
        name: String,
        /// Rejected value.
        value: f64,
    },
}
