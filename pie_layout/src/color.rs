// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slice, text and background colors.
//!
//! Charts accept colors in the encodings people paste from CSS and from packed
//! integer constants: `#RRGGBB`, `#RGB`, `rgb(r, g, b)`, an `[r, g, b]` triple
//! or a packed `0xRRGGBB` integer. Everything is normalized to an 8-bit RGB
//! triple; alpha is not modelled.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use peniko::Color;
use smallvec::SmallVec;

/// How forgiving [`ColorValue::parse_with`] is about malformed components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorParseMode {
    /// Accept what the legacy PHP charting code accepted.
    ///
    /// - Out-of-range tuple components are clamped into `0..=255`.
    /// - Non-hex characters in `#RRGGBB`/`#RGB` are skipped, so `#zz0000` is black.
    /// - `rgb()` fragments are read like PHP `intval`: leading digits are used,
    ///   anything else (including a missing fragment) becomes `0`.
    #[default]
    Lenient,
    /// Reject anything that is not a well-formed color.
    Strict,
}

/// What was wrong with a rejected color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatIssue {
    /// The input matches none of the recognized encodings.
    UnrecognizedEncoding,
    /// A hex color contains a non-hex digit.
    InvalidHexDigit,
    /// `rgb()` did not contain exactly three components.
    ComponentCount(usize),
    /// An `rgb()` component is not a decimal integer.
    InvalidComponent(String),
    /// A component is outside `0..=255`.
    ComponentOutOfRange(i64),
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedEncoding => f.write_str("unrecognized color encoding"),
            Self::InvalidHexDigit => f.write_str("invalid hex digit"),
            Self::ComponentCount(n) => write!(f, "expected 3 components, found {n}"),
            Self::InvalidComponent(fragment) => write!(f, "invalid component {fragment:?}"),
            Self::ComponentOutOfRange(v) => write!(f, "component {v} is outside 0..=255"),
        }
    }
}

/// Error returned when a color cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid color format {input:?}: {reason}")]
pub struct InvalidColorFormat {
    /// The rejected input, as written by the caller.
    pub input: String,
    /// Why it was rejected.
    pub reason: FormatIssue,
}

impl InvalidColorFormat {
    fn new(input: impl Into<String>, reason: FormatIssue) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

/// The encodings a color can be given in.
///
/// Each variant has a distinct shape, so there is no ambiguity about which
/// parser applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSource<'a> {
    /// An `[r, g, b]` triple.
    Triple([i64; 3]),
    /// A packed `0x(AA)RRGGBB` integer; the alpha byte is ignored.
    Packed(u32),
    /// `#RRGGBB`, `#RGB` or `rgb(r, g, b)`.
    Text(&'a str),
}

impl From<[i64; 3]> for ColorSource<'_> {
    fn from(rgb: [i64; 3]) -> Self {
        Self::Triple(rgb)
    }
}

impl From<[u8; 3]> for ColorSource<'_> {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::Triple([i64::from(r), i64::from(g), i64::from(b)])
    }
}

impl From<u32> for ColorSource<'_> {
    fn from(packed: u32) -> Self {
        Self::Packed(packed)
    }
}

impl<'a> From<&'a str> for ColorSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for ColorSource<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorValue {
    r: u8,
    g: u8,
    b: u8,
}

impl ColorValue {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates a color from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpacks a `0x(AA)RRGGBB` integer. The alpha byte is ignored.
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        let [_alpha, r, g, b] = packed.to_be_bytes();
        Self { r, g, b }
    }

    /// Parses any supported encoding in [`ColorParseMode::Lenient`] mode.
    pub fn parse<'a>(source: impl Into<ColorSource<'a>>) -> Result<Self, InvalidColorFormat> {
        Self::parse_with(source, ColorParseMode::Lenient)
    }

    /// Parses any supported encoding.
    pub fn parse_with<'a>(
        source: impl Into<ColorSource<'a>>,
        mode: ColorParseMode,
    ) -> Result<Self, InvalidColorFormat> {
        match source.into() {
            ColorSource::Triple(rgb) => Self::from_triple(rgb, mode),
            ColorSource::Packed(packed) => Ok(Self::from_packed(packed)),
            ColorSource::Text(text) => Self::parse_text(text, mode),
        }
    }

    /// Builds a color from an `[r, g, b]` triple.
    ///
    /// Lenient mode clamps each component into `0..=255`; strict mode rejects
    /// out-of-range components.
    pub fn from_triple(rgb: [i64; 3], mode: ColorParseMode) -> Result<Self, InvalidColorFormat> {
        let mut out = [0_u8; 3];
        for (slot, &value) in out.iter_mut().zip(&rgb) {
            *slot = match u8::try_from(value) {
                Ok(v) => v,
                Err(_) if mode == ColorParseMode::Lenient => clamp_component(value),
                Err(_) => {
                    return Err(InvalidColorFormat::new(
                        format!("[{}, {}, {}]", rgb[0], rgb[1], rgb[2]),
                        FormatIssue::ComponentOutOfRange(value),
                    ));
                }
            };
        }
        Ok(Self::rgb(out[0], out[1], out[2]))
    }

    /// Parses `#RRGGBB`, `#RGB` or `rgb(r, g, b)` (the `rgb` prefix is case-insensitive).
    pub fn parse_text(text: &str, mode: ColorParseMode) -> Result<Self, InvalidColorFormat> {
        let bytes = text.as_bytes();
        if let Some(digits) = bytes.strip_prefix(b"#") {
            let reject = |reason: FormatIssue| InvalidColorFormat::new(text, reason);
            return match digits.len() {
                6 => {
                    let mut out = [0_u8; 3];
                    for (slot, pair) in out.iter_mut().zip(digits.chunks(2)) {
                        *slot = hex_component(pair, mode)
                            .ok_or_else(|| reject(FormatIssue::InvalidHexDigit))?;
                    }
                    Ok(Self::rgb(out[0], out[1], out[2]))
                }
                3 => {
                    let mut out = [0_u8; 3];
                    for (slot, digit) in out.iter_mut().zip(digits.chunks(1)) {
                        let nibble = hex_component(digit, mode)
                            .ok_or_else(|| reject(FormatIssue::InvalidHexDigit))?;
                        // `F` expands to `FF`.
                        *slot = nibble * 17;
                    }
                    Ok(Self::rgb(out[0], out[1], out[2]))
                }
                _ => Err(reject(FormatIssue::UnrecognizedEncoding)),
            };
        }

        let is_rgb = bytes.len() >= 5
            && bytes[..4].eq_ignore_ascii_case(b"rgb(")
            && bytes.ends_with(b")");
        if !is_rgb {
            return Err(InvalidColorFormat::new(
                text,
                FormatIssue::UnrecognizedEncoding,
            ));
        }

        // Both bounds are ASCII, so these are char boundaries.
        let interior = &text[4..text.len() - 1];
        let fragments: SmallVec<[&str; 4]> = interior.split(',').collect();
        match mode {
            ColorParseMode::Lenient => {
                let component = |i: usize| {
                    clamp_component(fragments.get(i).map_or(0, |f| leading_integer(f)))
                };
                Ok(Self::rgb(component(0), component(1), component(2)))
            }
            ColorParseMode::Strict => {
                if fragments.len() != 3 {
                    return Err(InvalidColorFormat::new(
                        text,
                        FormatIssue::ComponentCount(fragments.len()),
                    ));
                }
                let mut out = [0_u8; 3];
                for (slot, fragment) in out.iter_mut().zip(&fragments) {
                    let trimmed = fragment.trim();
                    let value: i64 = trimmed.parse().map_err(|_| {
                        InvalidColorFormat::new(
                            text,
                            FormatIssue::InvalidComponent(String::from(trimmed)),
                        )
                    })?;
                    *slot = u8::try_from(value).map_err(|_| {
                        InvalidColorFormat::new(text, FormatIssue::ComponentOutOfRange(value))
                    })?;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
        }
    }

    /// Red component.
    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    /// Green component.
    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    /// Blue component.
    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }

    /// Packs the color as `0x00RRGGBB`; the inverse of [`ColorValue::from_packed`].
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Formats the color as `rgb(r,g,b)`.
    #[must_use]
    pub fn to_rgb_string(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Formats the color as lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for ColorValue {
    type Err = InvalidColorFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s, ColorParseMode::Lenient)
    }
}

impl From<ColorValue> for Color {
    fn from(c: ColorValue) -> Self {
        Self::from_rgba8(c.r, c.g, c.b, 255)
    }
}

impl From<Color> for ColorValue {
    /// Drops alpha; pie charts are drawn opaque.
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::rgb(rgba.r, rgba.g, rgba.b)
    }
}

fn clamp_component(value: i64) -> u8 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Value is clamped into 0..=255 first"
    )]
    {
        value.clamp(0, 255) as u8
    }
}

/// Parses one or two hex digits.
///
/// Lenient mode skips non-hex bytes the way PHP's `hexdec` does.
fn hex_component(digits: &[u8], mode: ColorParseMode) -> Option<u8> {
    let mut acc = 0_u8;
    for &byte in digits {
        let nibble = match (hex_val(byte), mode) {
            (Some(n), _) => n,
            (None, ColorParseMode::Lenient) => continue,
            (None, ColorParseMode::Strict) => return None,
        };
        acc = (acc << 4) | nibble;
    }
    Some(acc)
}

fn hex_val(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Reads a fragment like PHP `intval`: optional leading whitespace and sign,
/// then as many decimal digits as are present. No digits yields `0`.
fn leading_integer(fragment: &str) -> i64 {
    let s = fragment.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative { -magnitude } else { magnitude }
}
