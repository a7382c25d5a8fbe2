//! Palettes: ordered colours with bulk adjustments.
//!
//! A palette remembers the colours it was built from, so any sequence of
//! adjustments can be undone with [`Palette::reset`].
//!
//! ```
//! use colour_rs::color::Format;
//! use colour_rs::palette::Palette;
//!
//! let mut palette = Palette::from_strings(["hsl(0, 100%, 50%)", "#333333"]);
//! palette.lighten(0.2).shift_hue(20.0);
//! assert_eq!(palette.render(Format::Hex), ["ff9966", "666666"]);
//!
//! palette.reset();
//! assert_eq!(palette.render(Format::Hex), ["ff0000", "333333"]);
//! ```

use crate::color::{Colour, Conversion, Format};

/// Default step for lightness and saturation adjustments.
pub const DEFAULT_STEP: f64 = 0.1;
/// Default hue shift, in degrees.
pub const DEFAULT_HUE_STEP: f64 = 10.0;

/// An ordered list of colours plus the list it started from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    colours: Vec<Colour>,
    backup: Vec<Colour>,
}

impl Palette {
    /// Build a palette from colours. They also become the reset point.
    #[must_use]
    pub fn new(colours: Vec<Colour>) -> Self {
        Self {
            backup: colours.clone(),
            colours,
        }
    }

    /// Build a palette from colour strings. Unparseable entries become black.
    #[must_use]
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_strings_with(strings, Conversion::default())
    }

    /// Like [`Palette::from_strings`] with an explicit conversion model.
    #[must_use]
    pub fn from_strings_with<I, S>(strings: I, conversion: Conversion) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            strings
                .into_iter()
                .map(|s| Colour::with_conversion(s.as_ref(), conversion))
                .collect(),
        )
    }

    /// Append white and black. They are not part of the reset point.
    #[must_use]
    pub fn with_extremes(mut self) -> Self {
        let conversion = self
            .colours
            .first()
            .map_or_else(Conversion::default, Colour::conversion);
        self.colours.push(Colour::with_conversion("ffffff", conversion));
        self.colours.push(Colour::with_conversion("000000", conversion));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Colour> {
        self.colours.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Colour> {
        self.colours.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Colour> {
        self.colours.iter()
    }

    /// The colours as a slice.
    #[must_use]
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Raise lightness of every colour by `step`.
    pub fn lighten(&mut self, step: f64) -> &mut Self {
        self.adjust(|c| {
            let l = c.l();
            c.set_l(l + step);
        })
    }

    /// Lower lightness of every colour by `step`.
    pub fn darken(&mut self, step: f64) -> &mut Self {
        self.lighten(-step)
    }

    /// Raise saturation of every colour by `step`.
    pub fn saturate(&mut self, step: f64) -> &mut Self {
        self.adjust(|c| {
            let s = c.s();
            c.set_s(s + step);
        })
    }

    /// Lower saturation of every colour by `step`.
    pub fn desaturate(&mut self, step: f64) -> &mut Self {
        self.saturate(-step)
    }

    /// Shift the hue of every colour by `degrees`.
    ///
    /// The result is clamped rather than wrapped, matching the hue setter.
    pub fn shift_hue(&mut self, degrees: f64) -> &mut Self {
        self.adjust(|c| {
            let h = c.h();
            c.set_h(h + degrees);
        })
    }

    /// Replace every colour with its inverse.
    pub fn invert(&mut self) -> &mut Self {
        self.adjust(|c| *c = c.inverse())
    }

    fn adjust(&mut self, mut f: impl FnMut(&mut Colour)) -> &mut Self {
        self.colours.iter_mut().for_each(&mut f);
        log::trace!("adjusted {} colours", self.colours.len());
        self
    }

    /// Randomly reorder the colours.
    pub fn shuffle(&mut self) -> &mut Self {
        fastrand::shuffle(&mut self.colours);
        self
    }

    /// Reorder using a caller-provided generator (deterministic with a seed).
    pub fn shuffle_with(&mut self, rng: &mut fastrand::Rng) -> &mut Self {
        rng.shuffle(&mut self.colours);
        self
    }

    /// Rebuild the palette from the colours it was created with.
    ///
    /// Each colour is re-parsed from its `rgb` form, so any extremes added
    /// by [`Palette::with_extremes`] are dropped.
    pub fn reset(&mut self) -> &mut Self {
        self.colours = self
            .backup
            .iter()
            .map(|c| Colour::with_conversion(&c.stringify(Format::Rgb), c.conversion()))
            .collect();
        self
    }

    /// Render every colour in one format.
    #[must_use]
    pub fn render(&self, format: Format) -> Vec<String> {
        self.colours.iter().map(|c| c.stringify(format)).collect()
    }

    /// The inverse of every colour, for contrasting text.
    #[must_use]
    pub fn inverses(&self) -> Vec<Colour> {
        self.colours.iter().map(Colour::inverse).collect()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Colour;
    type IntoIter = std::slice::Iter<'a, Colour>;

    fn into_iter(self) -> Self::IntoIter {
        self.colours.iter()
    }
}

impl IntoIterator for Palette {
    type Item = Colour;
    type IntoIter = std::vec::IntoIter<Colour>;

    fn into_iter(self) -> Self::IntoIter {
        self.colours.into_iter()
    }
}

impl FromIterator<Colour> for Palette {
    fn from_iter<T: IntoIterator<Item = Colour>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
