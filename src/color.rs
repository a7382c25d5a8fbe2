//! Colour values with synchronized RGBA and HSLA views.
//!
//! A [`Colour`] holds both representations at once. Every setter writes the
//! channel into the view it belongs to and eagerly recomputes the other view,
//! so the two never disagree about the colour they describe.
//!
//! # Examples
//!
//! ## Parsing
//!
//! ```
//! use colour_rs::color::{Colour, Format};
//!
//! let red = Colour::new("#ff0000");
//! assert_eq!(red.stringify(Format::Hsl), "hsl(0, 100%, 50%)");
//!
//! let green = Colour::new("rgb(0, 255, 0)");
//! assert_eq!(green.h(), 120.0);
//!
//! let blue = Colour::new("hsl(240, 100%, 50%)");
//! assert_eq!(blue.stringify(Format::Rgb), "rgb(0, 0, 255)");
//!
//! // Unrecognized input falls back to opaque black.
//! assert_eq!(Colour::new("not-a-color").stringify(Format::Rgba), "rgba(0, 0, 0, 1)");
//! ```
//!
//! ## Chaining
//!
//! ```
//! use colour_rs::color::{Colour, Format};
//!
//! let mut colour = Colour::new("fff");
//! colour.set_r(0).set_g("80").set_b("7f");
//! assert_eq!(colour.stringify(Format::Hex), "00507f");
//!
//! colour.set_l(0.25).set_a(0.5);
//! assert_eq!(colour.stringify(Format::Hsla), "hsla(202, 100%, 25%, 0.5)");
//! ```
//!
//! ## Strict parsing
//!
//! ```
//! use colour_rs::color::Colour;
//! use colour_rs::parse::ColourParseError;
//!
//! assert!("rgba(1, 2, 3, 0.5)".parse::<Colour>().is_ok());
//! assert_eq!(
//!     Colour::try_parse("red"),
//!     Err(ColourParseError::UnrecognizedFormat("red".to_string()))
//! );
//! ```

use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::Mutex;

use crate::parse::{
    self, ChannelInput, ColourParseError, Grammar, HUE_MAX, RGB_MAX, UNIT_MAX,
};
use crate::sync::lock_recover;

/// Hue reported when saturation is zero and the hue is undefined.
pub const UNDEFINED_HUE: f64 = -1.0;

/// Tolerance applied before flooring values for display, so `0.29 * 100`
/// prints as `29` rather than `28`.
const FLOOR_EPSILON: f64 = 1e-9;

const PARSE_CACHE_CAPACITY: usize = 256;

/// Parsed colours keyed by lowercased input and model, with the grammar
/// that matched (`None` for the black fallback).
type ParseCache = LruCache<(String, Conversion), (Colour, Option<Grammar>)>;

/// Red, green and blue channels plus alpha.
///
/// Channels are nominally in `0..=255` but are stored as floats: percentage
/// tokens and the legacy conversion can produce fractional or out-of-range
/// values, which are floored and clamped when serialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// The RGB channels floored and clamped to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 3] {
        [byte(self.r), byte(self.g), byte(self.b)]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Hue, saturation and lightness plus alpha.
///
/// `h` is in degrees, `[0, 360]`, or [`UNDEFINED_HUE`]. The other channels
/// are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Whether the hue is the undefined sentinel.
    #[must_use]
    pub fn hue_is_undefined(&self) -> bool {
        self.h < 0.0
    }
}

/// How RGB and HSL coordinates map onto each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conversion {
    /// CSS HSL. Lightness is the mean of the largest and smallest channel and
    /// channels are scaled by 255 and rounded.
    #[default]
    Standard,
    /// Lightness is the largest channel (the HSV value) and channels are
    /// scaled by 256 and floored. Kept for output compatibility with older
    /// palettes; fully saturated channels come out as 256 and are clamped
    /// on output.
    Legacy,
}

impl Conversion {
    /// Parse a model name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "css" => Some(Self::Standard),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }
}

/// Convert RGBA to HSLA.
///
/// Uses the min/max/delta method. Grey inputs (including black) get
/// [`UNDEFINED_HUE`] and zero saturation.
#[must_use]
pub fn rgba_to_hsla(rgba: Rgba, conversion: Conversion) -> Hsla {
    let r = rgba.r / RGB_MAX;
    let g = rgba.g / RGB_MAX;
    let b = rgba.b / RGB_MAX;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta <= 0.0 {
        let l = match conversion {
            Conversion::Standard => f64::midpoint(max, min),
            Conversion::Legacy => max,
        };
        return Hsla::new(UNDEFINED_HUE, 0.0, l, rgba.a);
    }

    let mut hue = if (max - r).abs() < f64::EPSILON {
        (g - b) / delta
    } else if (max - g).abs() < f64::EPSILON {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    hue *= 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    match conversion {
        Conversion::Legacy => Hsla::new(hue, delta / max, max, rgba.a),
        Conversion::Standard => {
            let l = f64::midpoint(max, min);
            let s = (delta / (1.0 - (2.0 * l - 1.0).abs())).min(1.0);
            Hsla::new(hue, s, l, rgba.a)
        }
    }
}

/// Convert HSLA to RGBA.
///
/// A negative (undefined) hue is treated as 0 degrees and a hue of 360 lands
/// back in the first sector.
#[must_use]
pub fn hsla_to_rgba(hsla: Hsla, conversion: Conversion) -> Rgba {
    let (value, saturation) = match conversion {
        Conversion::Legacy => (hsla.l, hsla.s),
        Conversion::Standard => {
            let value = hsla.l + hsla.s * hsla.l.min(1.0 - hsla.l);
            let saturation = if value > 0.0 {
                2.0 * (1.0 - hsla.l / value)
            } else {
                0.0
            };
            (value, saturation)
        }
    };

    let (r, g, b) = sector_rgb(hsla.h, saturation, value);
    let scale = |channel: f64| match conversion {
        Conversion::Standard => (channel * RGB_MAX).round().clamp(0.0, RGB_MAX),
        Conversion::Legacy => (channel * 256.0).floor(),
    };

    Rgba::new(scale(r), scale(g), scale(b), hsla.a)
}

/// The six-sector hue table, returning unit-range channels.
fn sector_rgb(hue: f64, saturation: f64, value: f64) -> (f64, f64, f64) {
    if saturation <= 0.0 {
        return (value, value, value);
    }

    let sector = hue.max(0.0) / 60.0;
    let i = sector.floor();
    let f = sector - i;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    #[expect(clippy::cast_possible_truncation, reason = "hue is at most 360, so i is at most 6")]
    let index = (i as i64).rem_euclid(6);
    match index {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    }
}

/// Output formats for [`Colour::stringify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// `rrggbb`, lowercase, no `#`.
    #[default]
    Hex,
    /// `rgb(R, G, B)`.
    Rgb,
    /// `rgba(R, G, B, A)`.
    Rgba,
    /// `hsl(H, S%, L%)`.
    Hsl,
    /// `hsla(H, S%, L%, A)`.
    Hsla,
    /// Colour names. Not implemented; always renders as an empty string.
    Name,
}

impl Format {
    /// Parse a format name, case-insensitively. Unknown names mean [`Format::Hex`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rgb" => Self::Rgb,
            "rgba" => Self::Rgba,
            "hsl" => Self::Hsl,
            "hsla" => Self::Hsla,
            "name" => Self::Name,
            _ => Self::Hex,
        }
    }

    /// Lowercase name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Hsl => "hsl",
            Self::Hsla => "hsla",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A colour with RGBA and HSLA views that are kept in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Colour {
    rgba: Rgba,
    hsla: Hsla,
    conversion: Conversion,
}

impl Default for Colour {
    fn default() -> Self {
        Self::from_rgba(Rgba::BLACK, Conversion::default())
    }
}

impl Colour {
    /// Parse a colour string (cached).
    ///
    /// Accepts hex, `rgb()`, `rgba()`, `hsl()` and `hsla()`. Anything else
    /// yields opaque black; use [`Colour::try_parse`] to detect that case.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::with_conversion(text, Conversion::default())
    }

    /// Parse a colour string using a specific conversion model (cached).
    #[must_use]
    pub fn with_conversion(text: &str, conversion: Conversion) -> Self {
        static CACHE: LazyLock<Mutex<ParseCache>> =
            LazyLock::new(|| {
                Mutex::new(LruCache::new(
                    NonZeroUsize::new(PARSE_CACHE_CAPACITY).expect("non-zero"),
                ))
            });

        // Every grammar is ASCII case-insensitive. Whitespace is significant
        // for hex, so the key is not trimmed.
        let key = (text.to_ascii_lowercase(), conversion);

        let cached = lock_recover(&CACHE).get(&key).cloned();
        let (colour, grammar) = cached.unwrap_or_else(|| {
            let grammar = parse::classify(text);
            let colour = Self::from_grammar(text, grammar, conversion);
            lock_recover(&CACHE).put(key, (colour.clone(), grammar));
            (colour, grammar)
        });

        if grammar.is_none() {
            log::debug!("unrecognized colour {text:?}, defaulting to black");
        }
        colour
    }

    fn from_grammar(text: &str, grammar: Option<Grammar>, conversion: Conversion) -> Self {
        match grammar {
            Some(Grammar::Hex) => Self::from_rgba(parse::parse_hex(text), conversion),
            Some(Grammar::Rgb | Grammar::Rgba) => {
                Self::from_rgba(parse::parse_rgba(text), conversion)
            }
            Some(Grammar::Hsl | Grammar::Hsla) => {
                Self::from_hsla(parse::parse_hsla(text), conversion)
            }
            None => Self::from_rgba(Rgba::BLACK, conversion),
        }
    }

    /// Strict parse with the standard conversion model.
    ///
    /// # Errors
    ///
    /// Returns `ColourParseError::Empty` for blank input and
    /// `ColourParseError::UnrecognizedFormat` if no grammar matches.
    pub fn try_parse(text: &str) -> Result<Self, ColourParseError> {
        parse::try_classify(text)?;
        Ok(Self::new(text))
    }

    /// Build from RGBA, deriving HSLA.
    #[must_use]
    pub fn from_rgba(rgba: Rgba, conversion: Conversion) -> Self {
        Self {
            rgba,
            hsla: rgba_to_hsla(rgba, conversion),
            conversion,
        }
    }

    /// Build from HSLA, deriving RGBA.
    #[must_use]
    pub fn from_hsla(hsla: Hsla, conversion: Conversion) -> Self {
        Self {
            rgba: hsla_to_rgba(hsla, conversion),
            hsla,
            conversion,
        }
    }

    /// Opaque colour from byte channels.
    #[must_use]
    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(
            Rgba::new(f64::from(red), f64::from(green), f64::from(blue), 1.0),
            Conversion::default(),
        )
    }

    /// The conversion model in use.
    #[must_use]
    pub const fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Switch conversion model. RGBA is kept and HSLA is re-derived from it.
    pub fn set_conversion(&mut self, conversion: Conversion) -> &mut Self {
        self.conversion = conversion;
        self.updated_rgba();
        self
    }

    /// Snapshot of the RGBA view.
    #[must_use]
    pub const fn rgba(&self) -> Rgba {
        self.rgba
    }

    /// Snapshot of the HSLA view.
    #[must_use]
    pub const fn hsla(&self) -> Hsla {
        self.hsla
    }

    #[must_use]
    pub const fn r(&self) -> f64 {
        self.rgba.r
    }

    #[must_use]
    pub const fn g(&self) -> f64 {
        self.rgba.g
    }

    #[must_use]
    pub const fn b(&self) -> f64 {
        self.rgba.b
    }

    /// Alpha, shared by both views.
    #[must_use]
    pub const fn a(&self) -> f64 {
        self.rgba.a
    }

    /// Hue in degrees, or [`UNDEFINED_HUE`].
    #[must_use]
    pub const fn h(&self) -> f64 {
        self.hsla.h
    }

    #[must_use]
    pub const fn s(&self) -> f64 {
        self.hsla.s
    }

    #[must_use]
    pub const fn l(&self) -> f64 {
        self.hsla.l
    }

    /// Set red from a percentage, number or hex digit pair.
    pub fn set_r(&mut self, value: impl ChannelInput) -> &mut Self {
        self.rgba.r = value.to_channel();
        self.updated_rgba();
        self
    }

    /// Set green from a percentage, number or hex digit pair.
    pub fn set_g(&mut self, value: impl ChannelInput) -> &mut Self {
        self.rgba.g = value.to_channel();
        self.updated_rgba();
        self
    }

    /// Set blue from a percentage, number or hex digit pair.
    pub fn set_b(&mut self, value: impl ChannelInput) -> &mut Self {
        self.rgba.b = value.to_channel();
        self.updated_rgba();
        self
    }

    /// Set alpha. Coerced like an RGB channel, then capped at 1.
    pub fn set_a(&mut self, value: impl ChannelInput) -> &mut Self {
        self.rgba.a = value.to_channel().min(UNIT_MAX);
        self.updated_rgba();
        self
    }

    /// Set hue in degrees, clamped to `[0, 360]`.
    pub fn set_h(&mut self, value: impl ChannelInput) -> &mut Self {
        self.hsla.h = value.to_bounded(HUE_MAX);
        self.updated_hsla();
        self
    }

    /// Set saturation, clamped to `[0, 1]`.
    pub fn set_s(&mut self, value: impl ChannelInput) -> &mut Self {
        self.hsla.s = value.to_bounded(UNIT_MAX);
        self.updated_hsla();
        self
    }

    /// Set lightness, clamped to `[0, 1]`.
    pub fn set_l(&mut self, value: impl ChannelInput) -> &mut Self {
        self.hsla.l = value.to_bounded(UNIT_MAX);
        self.updated_hsla();
        self
    }

    fn updated_rgba(&mut self) {
        self.hsla = rgba_to_hsla(self.rgba, self.conversion);
    }

    fn updated_hsla(&mut self) {
        self.rgba = hsla_to_rgba(self.hsla, self.conversion);
    }

    /// Render the colour in the given format.
    #[must_use]
    pub fn stringify(&self, format: Format) -> String {
        let [r, g, b] = self.rgba.to_bytes();
        match format {
            Format::Hex => format!("{r:02x}{g:02x}{b:02x}"),
            Format::Rgb => format!("rgb({r}, {g}, {b})"),
            Format::Rgba => format!("rgba({r}, {g}, {b}, {})", self.rgba.a),
            Format::Hsl => format!(
                "hsl({}, {}%, {}%)",
                floor_display(self.hsla.h),
                floor_display(self.hsla.s * 100.0),
                floor_display(self.hsla.l * 100.0),
            ),
            Format::Hsla => format!(
                "hsla({}, {}%, {}%, {})",
                floor_display(self.hsla.h),
                floor_display(self.hsla.s * 100.0),
                floor_display(self.hsla.l * 100.0),
                self.hsla.a,
            ),
            Format::Name => {
                log::debug!("colour names are not supported");
                String::new()
            }
        }
    }

    /// Render using a format name; unknown names render as hex.
    #[must_use]
    pub fn stringify_str(&self, format: &str) -> String {
        self.stringify(Format::from_name(format))
    }

    /// A new colour with each RGB channel replaced by `255 - channel`.
    ///
    /// Alpha and the conversion model are copied; `self` is untouched.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut colour = Self::from_rgba(Rgba::BLACK, self.conversion);
        colour
            .set_r(RGB_MAX - self.rgba.r)
            .set_g(RGB_MAX - self.rgba.g)
            .set_b(RGB_MAX - self.rgba.b)
            .set_a(self.rgba.a);
        colour
    }

    /// SGR parameters selecting this colour as a 24-bit foreground or
    /// background.
    #[must_use]
    pub fn ansi_codes(&self, foreground: bool) -> Vec<String> {
        let [r, g, b] = self.rgba.to_bytes();
        vec![
            if foreground { "38" } else { "48" }.to_string(),
            "2".to_string(),
            r.to_string(),
            g.to_string(),
            b.to_string(),
        ]
    }
}

#[expect(clippy::cast_possible_truncation, reason = "clamped to 0..=255 first")]
#[expect(clippy::cast_sign_loss, reason = "clamped to 0..=255 first")]
fn byte(channel: f64) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel + FLOOR_EPSILON).floor().clamp(0.0, RGB_MAX) as u8
}

#[expect(clippy::cast_possible_truncation, reason = "display values are small")]
fn floor_display(value: f64) -> i64 {
    (value + FLOOR_EPSILON).floor() as i64
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(Format::Rgba))
    }
}

impl FromStr for Colour {
    type Err = ColourParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl TryFrom<&str> for Colour {
    type Error = ColourParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_parse(value.as_str())
    }
}

impl From<Rgba> for Colour {
    fn from(rgba: Rgba) -> Self {
        Self::from_rgba(rgba, Conversion::default())
    }
}

impl From<Hsla> for Colour {
    fn from(hsla: Hsla) -> Self {
        Self::from_hsla(hsla, Conversion::default())
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::from_rgb(red, green, blue)
    }
}
