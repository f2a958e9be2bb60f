//! 8-bit RGB color type
//!
//! Palette entries and quantized pixels are plain 8-bit sRGB triples. No
//! gamma handling happens anywhere in the pipeline: convolution sums and
//! palette distances are computed directly on the stored byte values.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// An opaque 8-bit RGB color.
///
/// Immutable value type used for palette entries and for the result of
/// every [`ColorMapper`](crate::palette::ColorMapper) query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    ///
    /// # Example
    /// ```
    /// use palette_convolve::Rgb;
    /// let red = Rgb::new(255, 0, 0);
    /// assert_eq!(red.to_bytes(), [255, 0, 0]);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to an RGBA byte array with the given alpha.
    #[inline]
    pub const fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Create a color by saturating and rounding float channel values.
    ///
    /// Values are rounded to nearest and clamped to 0..=255, so negative
    /// and overshooting convolution sums are stored as 0 and 255.
    ///
    /// # Example
    /// ```
    /// use palette_convolve::Rgb;
    /// assert_eq!(Rgb::saturating_from_f64(-12.0, 127.5, 300.0), Rgb::new(0, 128, 255));
    /// ```
    #[inline]
    pub fn saturating_from_f64(r: f64, g: f64, b: f64) -> Self {
        Self::new(saturate(r), saturate(g), saturate(b))
    }

    /// Euclidean distance to another color in RGB byte space.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared_f64(other.r as f64, other.g as f64, other.b as f64)
            .sqrt()
    }

    /// Squared Euclidean distance from this color to real-valued channels.
    ///
    /// The channels may lie outside 0..=255.
    #[inline]
    pub fn distance_squared_f64(self, r: f64, g: f64, b: f64) -> f64 {
        let dr = r - self.r as f64;
        let dg = g - self.g as f64;
        let db = b - self.b as f64;
        dr * dr + dg * dg + db * db
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

/// Round-to-nearest saturating store of a float channel.
#[inline]
pub(crate) fn saturate(v: f64) -> u8 {
    // NaN maps to 0 through the saturating cast.
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive and surrounding whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use palette_convolve::Rgb;
    ///
    /// let navy: Rgb = "#1d2b53".parse().unwrap();
    /// assert_eq!(navy, Rgb::new(0x1d, 0x2b, 0x53));
    ///
    /// let red: Rgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        if !s.is_ascii() {
            return Err(ParseColorError::NonAscii);
        }

        match s.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
