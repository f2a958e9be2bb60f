//! Domain-critical regression tests for palette-convolve.
//!
//! These tests exercise several modules together and document the class
//! of bug each one guards against.

#[cfg(test)]
mod domain_tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::buffer::PixelBuffer;
    use crate::color::Rgb;
    use crate::convolve::convolve;
    use crate::kernel::{EmbossState, Kernel};
    use crate::palette::{ColorMapper, LinearScan, Palette, WeightedMatcher};
    use crate::pattern;

    const PICO: [&str; 16] = [
        "#000000", "#1d2b53", "#7e2553", "#008751", "#ab5236", "#5f574f", "#c2c3c7",
        "#fff1e8", "#ff004d", "#ffa300", "#ffec27", "#00e436", "#29adff", "#83769c",
        "#ff77a8", "#ffccaa",
    ];

    fn pico() -> Palette {
        Palette::from_hex(&PICO).unwrap()
    }

    // ========================================================================
    // Convolution invariants
    // ========================================================================

    /// If this breaks, it means: convolution is either resizing the canvas
    /// or leaking kernel arithmetic into the alpha channel. Alpha must be
    /// copied verbatim from the source pixel.
    #[test]
    fn test_dimensions_and_alpha_survive_every_kernel() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut data = Vec::new();
        for i in 0..(9 * 7) {
            data.extend_from_slice(&[(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, (i * 3) as u8]);
        }
        let buffer = PixelBuffer::from_raw(9, 7, data).unwrap();

        let mut emboss = EmbossState::new(0.0);
        let kernels = vec![
            Kernel::identity(3).unwrap(),
            Kernel::box_blur(3).unwrap(),
            Kernel::sharpen(),
            Kernel::random(3, 2.0, &mut rng).unwrap(),
            emboss.next_kernel(7, &mut rng).unwrap(),
        ];

        for kernel in &kernels {
            let out = convolve(&buffer, kernel, None);
            assert_eq!((out.width(), out.height()), (9, 7));
            for (a, b) in out.pixels().zip(buffer.pixels()) {
                assert_eq!(a[3], b[3], "alpha changed under {}x{} kernel", kernel.size(), kernel.size());
            }
        }
    }

    /// If this breaks, it means: edges are sampled with zero padding
    /// instead of clamping, so a blur darkens the border of a uniform
    /// canvas.
    #[test]
    fn test_blur_of_uniform_canvas_is_exact_at_borders() {
        for size in [3, 5, 9] {
            let buffer = PixelBuffer::filled(6, 4, [37, 180, 222, 255]).unwrap();
            let out = convolve(&buffer, &Kernel::box_blur(size).unwrap(), None);
            assert_eq!(out, buffer, "{size}x{size} box blur");
        }
    }

    // ========================================================================
    // Palette closure
    // ========================================================================

    /// If this breaks, it means: quantized output contains colors outside
    /// the palette, so repeated convolution drifts off-palette.
    #[test]
    fn test_long_run_stays_on_palette() {
        let mut rng = StdRng::seed_from_u64(2024);
        let palette = pico();
        let matcher = WeightedMatcher::new(palette.clone());
        let mut canvas = pattern::randomize(32, 20, &palette, &mut rng).unwrap();
        let mut emboss = EmbossState::random(&mut rng);

        for step in 0..40 {
            let kernel = match step % 3 {
                0 => Kernel::box_blur(3).unwrap(),
                1 => Kernel::sharpen(),
                _ => emboss.next_kernel(5, &mut rng).unwrap(),
            };
            canvas = convolve(&canvas, &kernel, Some(&matcher));
        }

        for p in canvas.pixels() {
            assert!(palette.contains(Rgb::new(p[0], p[1], p[2])));
            assert_eq!(p[3], 255);
        }
    }

    /// If this breaks, it means: a de-duplicated palette still contains a
    /// zero nearest-neighbour distance, which would turn into an infinite
    /// weight in the matcher.
    #[test]
    fn test_dedup_palette_has_positive_min_distances() {
        let mut raw: Vec<Rgb> = PICO.iter().map(|s| s.parse().unwrap()).collect();
        raw.extend_from_slice(&raw.clone()[..5]);
        let palette = Palette::dedup(raw).unwrap();
        assert_eq!(palette.len(), 16);

        for d in palette.nearest_neighbor_distances() {
            assert!(d > 0.0 && d.is_finite());
        }
        let matcher = WeightedMatcher::new(palette);
        assert!(matcher.weights().iter().all(|w| w.is_finite() && *w >= 1.0));
    }

    /// If this breaks, it means: weighting changed the answer for inputs
    /// that are exactly a palette color.
    #[test]
    fn test_palette_entries_are_fixed_points() {
        let palette = pico();
        let weighted = WeightedMatcher::new(palette.clone());
        let plain = LinearScan::from(&palette);
        for color in palette.iter() {
            let (r, g, b) = (color.r as f64, color.g as f64, color.b as f64);
            assert_eq!(weighted.nearest(r, g, b), color);
            assert_eq!(plain.nearest(r, g, b), color);
        }
    }

    /// If this breaks, it means: an on-palette canvas is no longer a fixed
    /// point of identity convolution followed by quantization.
    #[test]
    fn test_identity_with_matcher_is_noop_on_palette_canvas() {
        let mut rng = StdRng::seed_from_u64(77);
        let palette = pico();
        let matcher = WeightedMatcher::new(palette.clone());
        let canvas = pattern::randomize(10, 10, &palette, &mut rng).unwrap();
        let out = convolve(&canvas, &Kernel::identity(3).unwrap(), Some(&matcher));
        assert_eq!(out, canvas);
    }

    // ========================================================================
    // Kernel generation
    // ========================================================================

    /// If this breaks, it means: generated kernels change overall
    /// brightness because normalization was skipped.
    #[test]
    fn test_generated_kernels_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut emboss = EmbossState::random(&mut rng);
        for _ in 0..100 {
            for kernel in [
                Kernel::random(3, 2.0, &mut rng).unwrap(),
                emboss.next_kernel(5, &mut rng).unwrap(),
            ] {
                let scale = kernel.weights().iter().fold(1.0_f64, |m, w| m.max(w.abs()));
                assert!((kernel.sum() - 1.0).abs() < 1e-9 * scale);
            }
        }
    }

    /// If this breaks, it means: two runs with the same seed diverge, so
    /// rendered sketches are no longer reproducible.
    #[test]
    fn test_seeded_runs_are_reproducible() {
        fn run(seed: u64) -> PixelBuffer {
            let mut rng = StdRng::seed_from_u64(seed);
            let palette = pico();
            let matcher = WeightedMatcher::new(palette.clone());
            let mut canvas = pattern::randomize(16, 12, &palette, &mut rng).unwrap();
            let mut emboss = EmbossState::random(&mut rng);
            for _ in 0..5 {
                let kernel = emboss.next_kernel(5, &mut rng).unwrap();
                canvas = convolve(&canvas, &kernel, Some(&matcher));
            }
            canvas
        }
        assert_eq!(run(12), run(12));
    }
}
