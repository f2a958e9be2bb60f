//! Palette struct: an ordered, non-empty set of unique colors.

use std::collections::HashSet;
use std::str::FromStr;

use rand::Rng;

use super::error::PaletteError;
use crate::color::Rgb;

/// An ordered, non-empty palette of unique colors.
///
/// Order matters: the matchers break distance ties in favour of the
/// earlier entry, and the striped initializer paints cells in palette
/// order.
///
/// # Example
///
/// ```
/// use palette_convolve::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from colors that must already be unique.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::DuplicateColor`] with the index of the first repeat
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette, silently dropping repeated colors.
    ///
    /// The first occurrence of each color is kept, so the relative order of
    /// the surviving entries matches the input.
    ///
    /// # Example
    ///
    /// ```
    /// use palette_convolve::{Palette, Rgb};
    ///
    /// let red = Rgb::new(255, 0, 0);
    /// let palette = Palette::dedup([red, Rgb::BLACK, red]).unwrap();
    /// assert_eq!(palette.colors(), &[red, Rgb::BLACK]);
    /// ```
    pub fn dedup<I>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = Rgb>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<Rgb> = colors.into_iter().filter(|c| seen.insert(*c)).collect();

        if unique.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { colors: unique })
    }

    /// Create a palette from hex color strings such as `"#1d2b53"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] if any hex string is invalid,
    /// or the validation errors of [`Palette::new`].
    pub fn from_hex(hex: &[&str]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| Rgb::from_str(s).map_err(PaletteError::ParseColor))
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(&colors)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `idx`, if in range.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Rgb> {
        self.colors.get(idx).copied()
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Iterate over the colors in palette order.
    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied()
    }

    /// Returns true if `color` is a palette entry.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Pick a palette entry uniformly at random.
    #[inline]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        self.colors[rng.gen_range(0..self.colors.len())]
    }

    /// Euclidean distance from each entry to its nearest other entry.
    ///
    /// A single-color palette has no neighbours; its only entry reports
    /// `f64::INFINITY`. Because entries are unique, every distance is
    /// strictly positive.
    pub fn nearest_neighbor_distances(&self) -> Vec<f64> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                self.colors
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, &other)| color.distance(other))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Rgb;
    type IntoIter = std::slice::Iter<'a, Rgb>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}
