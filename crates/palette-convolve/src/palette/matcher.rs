//! Nearest-color lookup strategies.
//!
//! Convolution passes its raw channel sums to a [`ColorMapper`]. Two
//! implementations are provided:
//!
//! - [`LinearScan`]: plain squared-Euclidean nearest color.
//! - [`WeightedMatcher`]: squared-Euclidean distance divided by a per-color
//!   weight, so colors that sit in tight clusters get a larger catchment
//!   area than isolated ones.
//!
//! Any `Fn(f64, f64, f64) -> Rgb` closure is also a `ColorMapper`.

use super::error::PaletteError;
use super::palette::Palette;
use crate::color::Rgb;

/// A function from real-valued (r, g, b) to a palette color.
///
/// Inputs are raw convolution sums: they may be negative, fractional or
/// larger than 255.
pub trait ColorMapper {
    /// Return the palette color judged closest to (r, g, b).
    fn nearest(&self, r: f64, g: f64, b: f64) -> Rgb;
}

impl<F> ColorMapper for F
where
    F: Fn(f64, f64, f64) -> Rgb,
{
    #[inline]
    fn nearest(&self, r: f64, g: f64, b: f64) -> Rgb {
        self(r, g, b)
    }
}

/// Unweighted nearest-color search over a raw color list.
///
/// Duplicates are harmless here (the first one wins), so this adapter
/// accepts any non-empty slice.
#[derive(Debug, Clone)]
pub struct LinearScan {
    colors: Vec<Rgb>,
}

impl LinearScan {
    /// Wrap a raw color list.
    ///
    /// # Errors
    ///
    /// [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Colors searched by this adapter.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl From<&Palette> for LinearScan {
    fn from(palette: &Palette) -> Self {
        Self {
            colors: palette.colors().to_vec(),
        }
    }
}

impl ColorMapper for LinearScan {
    fn nearest(&self, r: f64, g: f64, b: f64) -> Rgb {
        let mut best = self.colors[0];
        let mut best_dist = f64::INFINITY;

        for &color in &self.colors {
            let dist = color.distance_squared_f64(r, g, b);
            if dist < best_dist {
                best_dist = dist;
                best = color;
            }
        }

        best
    }
}

/// Weighted nearest-color matcher.
///
/// Built once from a [`Palette`]:
///
/// 1. `min_dist[i]`: Euclidean distance from entry `i` to its nearest
///    other entry.
/// 2. `max_min = max(min_dist)`.
/// 3. `weight[i] = sqrt(max_min / min_dist[i])`.
///
/// A query divides each candidate's squared distance by its weight and
/// returns the smallest. Isolated colors end up with weight 1 and
/// clustered colors with weight > 1, which shrinks their effective
/// distance and widens their catchment area. The square root keeps
/// weights moderate; repeated convolution feeds the matcher's output back
/// into itself every cycle, and large weights make a few colors swallow
/// the canvas.
///
/// # Example
///
/// ```
/// use palette_convolve::{ColorMapper, Palette, Rgb, WeightedMatcher};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let matcher = WeightedMatcher::new(palette);
///
/// assert_eq!(matcher.nearest(10.0, 10.0, 10.0), Rgb::BLACK);
/// assert_eq!(matcher.nearest(200.0, 200.0, 200.0), Rgb::WHITE);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedMatcher {
    palette: Palette,
    weights: Vec<f64>,
}

impl WeightedMatcher {
    /// Precompute per-color weights for `palette`.
    pub fn new(palette: Palette) -> Self {
        let weights = if palette.len() == 1 {
            // No neighbours: the single color always wins.
            vec![1.0]
        } else {
            let min_dists = palette.nearest_neighbor_distances();
            let max_min = min_dists.iter().copied().fold(0.0, f64::max);
            min_dists.iter().map(|&d| (max_min / d).sqrt()).collect()
        };

        Self { palette, weights }
    }

    /// The palette this matcher was built from.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Per-color weights, in palette order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the nearest palette entry under the weighted metric.
    ///
    /// Ties go to the earlier entry.
    pub fn nearest_index(&self, r: f64, g: f64, b: f64) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, (color, &weight)) in self.palette.iter().zip(&self.weights).enumerate() {
            let dist = color.distance_squared_f64(r, g, b) / weight;
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }
}

impl ColorMapper for WeightedMatcher {
    #[inline]
    fn nearest(&self, r: f64, g: f64, b: f64) -> Rgb {
        self.palette.colors()[self.nearest_index(r, g, b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Palette {
        Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap()
    }

    #[test]
    fn test_weighted_black_white_examples() {
        let matcher = WeightedMatcher::new(bw());
        assert_eq!(matcher.nearest(10.0, 10.0, 10.0), Rgb::BLACK);
        assert_eq!(matcher.nearest(200.0, 200.0, 200.0), Rgb::WHITE);
    }

    #[test]
    fn test_weights_equal_for_symmetric_palette() {
        let matcher = WeightedMatcher::new(bw());
        assert_eq!(matcher.weights(), &[1.0, 1.0]);
    }

    #[test]
    fn test_single_color_palette_always_wins() {
        let only = Rgb::new(12, 34, 56);
        let matcher = WeightedMatcher::new(Palette::new(&[only]).unwrap());
        assert_eq!(matcher.weights(), &[1.0]);
        assert_eq!(matcher.nearest(-100.0, 900.0, 0.5), only);
        assert_eq!(matcher.nearest(f64::NAN, 0.0, 0.0), only);
    }

    #[test]
    fn test_clustered_colors_get_larger_weight() {
        // Two near-identical reds and one distant blue.
        let palette = Palette::new(&[
            Rgb::new(200, 0, 0),
            Rgb::new(210, 0, 0),
            Rgb::new(0, 0, 255),
        ])
        .unwrap();
        let matcher = WeightedMatcher::new(palette);
        let w = matcher.weights();

        assert!((w[2] - 1.0).abs() < 1e-12, "isolated color has weight 1");
        assert!(w[0] > 1.0 && w[1] > 1.0);
        assert!((w[0] - w[1]).abs() < 1e-12);
    }

    #[test]
    fn test_weighting_widens_cluster_catchment() {
        // Black sits alone; the two greys are 10 apart. A point exactly
        // halfway between black and the darker grey goes to black under a
        // plain scan (first wins on tie) but to grey once weighted.
        let palette = Palette::new(&[
            Rgb::new(0, 0, 0),
            Rgb::new(100, 100, 100),
            Rgb::new(110, 110, 110),
        ])
        .unwrap();
        let weighted = WeightedMatcher::new(palette.clone());
        let plain = LinearScan::from(&palette);

        assert_eq!(plain.nearest(50.0, 50.0, 50.0), Rgb::new(0, 0, 0));
        assert_eq!(weighted.nearest(50.0, 50.0, 50.0), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_exact_entry_returns_itself() {
        let palette = Palette::from_hex(&[
            "#000000", "#1d2b53", "#7e2553", "#008751", "#ab5236", "#5f574f", "#c2c3c7",
            "#fff1e8", "#ff004d", "#ffa300", "#ffec27", "#00e436",
        ])
        .unwrap();
        let matcher = WeightedMatcher::new(palette.clone());
        for color in palette.iter() {
            let got = matcher.nearest(color.r as f64, color.g as f64, color.b as f64);
            assert_eq!(got, color);
        }
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(2, 0, 0)]).unwrap();
        let matcher = WeightedMatcher::new(palette.clone());
        assert_eq!(matcher.nearest_index(1.0, 0.0, 0.0), 0);

        let reversed = Palette::new(&[Rgb::new(2, 0, 0), Rgb::new(0, 0, 0)]).unwrap();
        let matcher = WeightedMatcher::new(reversed);
        assert_eq!(matcher.nearest_index(1.0, 0.0, 0.0), 0);
    }

    #[test]
    fn test_out_of_range_inputs() {
        let matcher = WeightedMatcher::new(bw());
        assert_eq!(matcher.nearest(-300.0, -1.0, -50.0), Rgb::BLACK);
        assert_eq!(matcher.nearest(1000.0, 400.0, 256.0), Rgb::WHITE);
    }

    #[test]
    fn test_linear_scan_allows_duplicates() {
        let scan = LinearScan::new(&[Rgb::WHITE, Rgb::BLACK, Rgb::WHITE]).unwrap();
        assert_eq!(scan.nearest(250.0, 250.0, 250.0), Rgb::WHITE);
        assert_eq!(scan.colors().len(), 3);
        assert!(matches!(LinearScan::new(&[]), Err(PaletteError::EmptyPalette)));
    }

    #[test]
    fn test_closure_is_a_color_mapper() {
        let always_red = |_: f64, _: f64, _: f64| Rgb::new(255, 0, 0);
        assert_eq!(always_red.nearest(0.0, 0.0, 0.0), Rgb::new(255, 0, 0));
    }
}
