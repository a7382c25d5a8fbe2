//! # colour_rs
//!
//! Colour values that keep an RGBA view and an HSLA view in sync.
//!
//! Strings in hex, `rgb()`, `rgba()`, `hsl()` or `hsla()` notation are parsed
//! leniently: malformed input never fails, it falls back to zero channels or
//! opaque black. Every channel setter updates the other colour space right
//! away, and setters chain.
//!
//! ## Quick Start
//!
//! ```rust
//! use colour_rs::prelude::*;
//!
//! let mut colour = Colour::new("#ff0000");
//! colour.set_h(240).set_l(0.25);
//! assert_eq!(colour.stringify(Format::Rgb), "rgb(0, 0, 128)");
//! assert_eq!(colour.inverse().stringify(Format::Hex), "ffff7f");
//! ```
//!
//! ## Core Concepts
//!
//! - **Colour**: the value type, with `r/g/b/a` and `h/s/l` accessors
//! - **Parser**: grammar recognition and token coercion (`parse`)
//! - **Conversion**: CSS HSL (default) or the legacy max-lightness model
//! - **Palette**: a list of colours with bulk adjustments and reset

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod logging;
pub mod palette;
pub mod parse;
pub mod sync;

/// Re-exports for convenient usage
pub mod prelude {
    pub use crate::color::{Colour, Conversion, Format, Hsla, Rgba, UNDEFINED_HUE};
    pub use crate::palette::Palette;
    pub use crate::parse::{ChannelInput, ColourParseError, Grammar};
}

// Re-export key types at crate root
pub use color::{Colour, Conversion, Format, Hsla, Rgba};
pub use palette::Palette;
pub use parse::ColourParseError;
