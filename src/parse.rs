//! Grammar recognition and token coercion for colour strings.
//!
//! Everything in this module is total: the lenient functions return a
//! bounded value for any input, substituting `0` (or opaque black for whole
//! colours) when a token does not match its grammar. The `try_*` variants
//! report the same conditions as [`ColourParseError`] for callers that want
//! to know what went wrong.
//!
//! # Grammars
//!
//! Checked in this order, first match wins:
//!
//! | Grammar | Shape |
//! |---------|-------|
//! | hex  | `#?` followed by 3 or 6 hex digits |
//! | rgb  | `rgb(c, c, c)` where `c` is `N` or `N%` |
//! | rgba | `rgba(c, c, c, A)` where `A` is a plain float |
//! | hsl  | `hsl(H, S%, L%)` with 1-3 digit fields |
//! | hsla | `hsla(H, S%, L%, A)` |
//!
//! ```
//! use colour_rs::parse::{classify, parse_channel, Grammar};
//!
//! assert_eq!(classify("#fa0"), Some(Grammar::Hex));
//! assert_eq!(classify(" hsla( 120 , 50% , 25% , .5 ) "), Some(Grammar::Hsla));
//! assert_eq!(classify("red"), None);
//!
//! assert_eq!(parse_channel("50%"), 0.5);
//! assert_eq!(parse_channel("300"), 255.0);
//! assert_eq!(parse_channel("f"), 255.0);
//! assert_eq!(parse_channel("nope"), 0.0);
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::color::{Hsla, Rgba};

/// Upper bound for an RGB channel.
pub const RGB_MAX: f64 = 255.0;
/// Upper bound for hue, in degrees.
pub const HUE_MAX: f64 = 360.0;
/// Upper bound for saturation, lightness and alpha.
pub const UNIT_MAX: f64 = 1.0;

// Case folding and `\s` are ASCII-only (`-u`), like the grammars themselves.
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^#?((?:[0-9a-f]{3}){1,2})$").expect("valid regex")
});
static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)^\s*rgb\s*\(\s*([0-9]+%?)\s*,\s*([0-9]+%?)\s*,\s*([0-9]+%?)\s*\)\s*$",
    )
    .expect("valid regex")
});
static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)^\s*rgba\s*\(\s*([0-9]+%?)\s*,\s*([0-9]+%?)\s*,\s*([0-9]+%?)\s*,\s*([0-9]*\.?[0-9]+)\s*\)\s*$",
    )
    .expect("valid regex")
});
static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)^\s*hsl\s*\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3}%)\s*,\s*([0-9]{1,3}%)\s*\)\s*$",
    )
    .expect("valid regex")
});
static HSLA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)^\s*hsla\s*\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3}%)\s*,\s*([0-9]{1,3}%)\s*,\s*([0-9]*\.?[0-9]+)\s*\)\s*$",
    )
    .expect("valid regex")
});
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]+$").expect("valid regex"));
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+%$").expect("valid regex"));
static HEX_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)^[0-9a-f]{1,2}$").expect("valid regex"));

/// The textual colour formats understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `#rgb` or `#rrggbb`, hash optional.
    Hex,
    /// `rgb(r, g, b)`.
    Rgb,
    /// `rgba(r, g, b, a)`.
    Rgba,
    /// `hsl(h, s%, l%)`.
    Hsl,
    /// `hsla(h, s%, l%, a)`.
    Hsla,
}

impl Grammar {
    /// All grammars in precedence order.
    pub const ALL: [Self; 5] = [Self::Hex, Self::Rgb, Self::Rgba, Self::Hsl, Self::Hsla];

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Hsl => "hsl",
            Self::Hsla => "hsla",
        }
    }

    /// Whether this grammar describes RGB channels (hex included).
    #[must_use]
    pub const fn is_rgb(self) -> bool {
        matches!(self, Self::Hex | Self::Rgb | Self::Rgba)
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Hex => &HEX_RE,
            Self::Rgb => &RGB_RE,
            Self::Rgba => &RGBA_RE,
            Self::Hsl => &HSL_RE,
            Self::Hsla => &HSLA_RE,
        }
    }

    /// Test whether `text` matches this grammar.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        self.regex().is_match(text)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of token a coercion function expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain decimal, integer or float, no sign.
    Number,
    /// Integer followed by `%`.
    Percent,
    /// One or two hex digits.
    HexDigit,
    /// Percentage, number or hex digit pair.
    Channel,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "a number",
            Self::Percent => "a percentage",
            Self::HexDigit => "one or two hex digits",
            Self::Channel => "a percentage, number or hex digit pair",
        })
    }
}

/// Error type for colour parsing.
///
/// Only returned by the strict entry points. The lenient API substitutes
/// the documented default and logs the same condition at debug level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColourParseError {
    /// Input was empty or only whitespace.
    Empty,
    /// Input matched none of the supported grammars.
    UnrecognizedFormat(String),
    /// A single token failed its grammar.
    MalformedToken {
        /// The offending token.
        token: String,
        /// What was expected in its place.
        expected: TokenKind,
    },
}

impl fmt::Display for ColourParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty colour string"),
            Self::UnrecognizedFormat(s) => write!(f, "Unrecognized colour format: {s}"),
            Self::MalformedToken { token, expected } => {
                write!(f, "Malformed token `{token}`: expected {expected}")
            }
        }
    }
}

impl std::error::Error for ColourParseError {}

/// Find the first grammar that matches `text`.
#[must_use]
pub fn classify(text: &str) -> Option<Grammar> {
    Grammar::ALL.into_iter().find(|grammar| grammar.matches(text))
}

/// Strict classification.
///
/// # Errors
///
/// Returns `ColourParseError::Empty` for blank input and
/// `ColourParseError::UnrecognizedFormat` when no grammar matches.
pub fn try_classify(text: &str) -> Result<Grammar, ColourParseError> {
    if text.trim().is_empty() {
        return Err(ColourParseError::Empty);
    }
    classify(text).ok_or_else(|| ColourParseError::UnrecognizedFormat(text.to_string()))
}

/// Clamp an already-numeric value into `[0, max]`.
///
/// Negative and non-finite values become `0`, mirroring how their textual
/// form would fail the number grammar.
#[must_use]
pub fn clamp_number(value: f64, max: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(max)
    } else {
        0.0
    }
}

/// Parse a plain number and clamp it to `[0, max]`.
///
/// # Errors
///
/// Returns `MalformedToken` if `token` is not an unsigned decimal.
pub fn try_parse_number(token: &str, max: f64) -> Result<f64, ColourParseError> {
    if NUMBER_RE.is_match(token)
        && let Ok(value) = token.parse::<f64>()
    {
        return Ok(clamp_number(value, max));
    }
    Err(malformed(token, TokenKind::Number))
}

/// Lenient [`try_parse_number`]: malformed tokens become `0`.
#[must_use]
pub fn parse_number(token: &str, max: f64) -> f64 {
    try_parse_number(token, max).unwrap_or_else(|err| fallback(&err, 0.0))
}

/// Parse `N%` into `[0, 1]`, clamping `N` to 100 first.
///
/// # Errors
///
/// Returns `MalformedToken` if `token` is not an integer followed by `%`.
pub fn try_parse_percent(token: &str) -> Result<f64, ColourParseError> {
    if PERCENT_RE.is_match(token)
        && let Ok(value) = token[..token.len() - 1].parse::<f64>()
    {
        return Ok(clamp_number(value, 100.0) / 100.0);
    }
    Err(malformed(token, TokenKind::Percent))
}

/// Lenient [`try_parse_percent`]: malformed tokens become `0`.
#[must_use]
pub fn parse_percent(token: &str) -> f64 {
    try_parse_percent(token).unwrap_or_else(|err| fallback(&err, 0.0))
}

/// Parse one or two hex digits. A single digit is doubled (`f` is `ff`).
///
/// # Errors
///
/// Returns `MalformedToken` unless `token` is exactly 1 or 2 hex digits.
pub fn try_parse_hex_digit(token: &str) -> Result<u8, ColourParseError> {
    if HEX_DIGIT_RE.is_match(token) {
        let pair = if token.len() == 1 {
            token.repeat(2)
        } else {
            token.to_string()
        };
        if let Ok(value) = u8::from_str_radix(&pair, 16) {
            return Ok(value);
        }
    }
    Err(malformed(token, TokenKind::HexDigit))
}

/// Lenient [`try_parse_hex_digit`]: malformed tokens become `0`.
#[must_use]
pub fn parse_hex_digit(token: &str) -> u8 {
    try_parse_hex_digit(token).unwrap_or_else(|err| fallback(&err, 0))
}

/// Parse a generic channel value.
///
/// Tries a percentage, then a plain number clamped to 255, then a hex digit
/// pair.
///
/// # Errors
///
/// Returns `MalformedToken` if none of the three grammars match.
pub fn try_parse_channel(token: &str) -> Result<f64, ColourParseError> {
    if PERCENT_RE.is_match(token) {
        try_parse_percent(token)
    } else if NUMBER_RE.is_match(token) {
        try_parse_number(token, RGB_MAX)
    } else if HEX_DIGIT_RE.is_match(token) {
        try_parse_hex_digit(token).map(f64::from)
    } else {
        Err(malformed(token, TokenKind::Channel))
    }
}

/// Lenient [`try_parse_channel`]: malformed tokens become `0`.
#[must_use]
pub fn parse_channel(token: &str) -> f64 {
    try_parse_channel(token).unwrap_or_else(|err| fallback(&err, 0.0))
}

/// Parse a hex colour. Anything that is not 3 or 6 hex digits (with an
/// optional `#`) is treated as `000000`.
#[must_use]
pub fn parse_hex(text: &str) -> Rgba {
    let digits = HEX_RE
        .captures(text)
        .map_or_else(|| "000000".to_string(), |caps| caps[1].to_ascii_lowercase());

    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits
    };

    let channel = |range: std::ops::Range<usize>| {
        expanded
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .map_or(0.0, f64::from)
    };

    Rgba::new(channel(0..2), channel(2..4), channel(4..6), 1.0)
}

/// Parse `rgba(...)` or `rgb(...)`. Non-matching input yields opaque black.
#[must_use]
pub fn parse_rgba(text: &str) -> Rgba {
    if let Some(caps) = RGBA_RE.captures(text) {
        Rgba::new(
            parse_channel(&caps[1]),
            parse_channel(&caps[2]),
            parse_channel(&caps[3]),
            parse_number(&caps[4], UNIT_MAX),
        )
    } else if let Some(caps) = RGB_RE.captures(text) {
        Rgba::new(
            parse_channel(&caps[1]),
            parse_channel(&caps[2]),
            parse_channel(&caps[3]),
            1.0,
        )
    } else {
        log::debug!("not an rgb/rgba colour: {text:?}");
        Rgba::BLACK
    }
}

/// Parse `hsla(...)` or `hsl(...)`. Non-matching input yields `hsla(0, 0%, 0%, 1)`.
#[must_use]
pub fn parse_hsla(text: &str) -> Hsla {
    if let Some(caps) = HSLA_RE.captures(text) {
        Hsla::new(
            parse_number(&caps[1], HUE_MAX),
            parse_percent(&caps[2]),
            parse_percent(&caps[3]),
            parse_number(&caps[4], UNIT_MAX),
        )
    } else if let Some(caps) = HSL_RE.captures(text) {
        Hsla::new(
            parse_number(&caps[1], HUE_MAX),
            parse_percent(&caps[2]),
            parse_percent(&caps[3]),
            1.0,
        )
    } else {
        log::debug!("not an hsl/hsla colour: {text:?}");
        Hsla::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Values that can be written into a colour channel.
///
/// Strings go through the token grammars; numbers skip them and are clamped
/// directly.
pub trait ChannelInput {
    /// Coerce as a generic channel value (see [`parse_channel`]).
    fn to_channel(&self) -> f64;

    /// Coerce as a number bounded by `max` (see [`parse_number`]).
    fn to_bounded(&self, max: f64) -> f64;
}

impl ChannelInput for str {
    fn to_channel(&self) -> f64 {
        parse_channel(self)
    }

    fn to_bounded(&self, max: f64) -> f64 {
        parse_number(self, max)
    }
}

impl ChannelInput for String {
    fn to_channel(&self) -> f64 {
        parse_channel(self)
    }

    fn to_bounded(&self, max: f64) -> f64 {
        parse_number(self, max)
    }
}

impl<T: ChannelInput + ?Sized> ChannelInput for &T {
    fn to_channel(&self) -> f64 {
        (**self).to_channel()
    }

    fn to_bounded(&self, max: f64) -> f64 {
        (**self).to_bounded(max)
    }
}

macro_rules! numeric_channel_input {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ChannelInput for $ty {
                fn to_channel(&self) -> f64 {
                    clamp_number(f64::from(*self), RGB_MAX)
                }

                fn to_bounded(&self, max: f64) -> f64 {
                    clamp_number(f64::from(*self), max)
                }
            }
        )*
    };
}

numeric_channel_input!(u8, u16, u32, i8, i16, i32, f32, f64);

fn malformed(token: &str, expected: TokenKind) -> ColourParseError {
    ColourParseError::MalformedToken {
        token: token.to_string(),
        expected,
    }
}

fn fallback<T>(err: &ColourParseError, default: T) -> T {
    log::debug!("{err}; using default");
    default
}
