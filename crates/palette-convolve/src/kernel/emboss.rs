//! Directional emboss kernels with a slowly rotating bias direction.

use std::f64::consts::TAU;

use rand::Rng;

use super::kernel::{check_size, normalize, Kernel, KernelError};

/// Maximum forward drift of the emboss angle per generated kernel, in radians.
pub const EMBOSS_DRIFT: f64 = 0.3;

/// Caller-owned emboss direction.
///
/// Every call to [`next_kernel`](Self::next_kernel) advances the angle by
/// `U(0, EMBOSS_DRIFT)`. The angle only grows and is never wrapped, so the
/// bas-relief direction rotates slowly and monotonically over a run.
///
/// # Example
///
/// ```
/// use palette_convolve::EmbossState;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let mut state = EmbossState::new(0.0);
/// let kernel = state.next_kernel(5, &mut rng).unwrap();
///
/// assert_eq!(kernel.size(), 5);
/// assert!(state.angle() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbossState {
    angle: f64,
}

impl EmbossState {
    /// Start from a fixed angle (radians).
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    /// Start from a uniformly random angle in `[0, 2π)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen::<f64>() * TAU)
    }

    /// Current angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Generate the next emboss kernel and advance the angle.
    ///
    /// For the drifted angle `θ'`, the cell at offset `(dx, dy)` from the
    /// center gets weight `(dx·cos θ' + dy·sin θ') · U(0, 1)`. Weights are
    /// then normalized by their sum (left raw when the sum is exactly
    /// zero, which is always the case for `size == 1`).
    ///
    /// The state is only advanced when `size` is valid.
    pub fn next_kernel<R: Rng + ?Sized>(
        &mut self,
        size: usize,
        rng: &mut R,
    ) -> Result<Kernel, KernelError> {
        check_size(size)?;

        let angle = self.angle + rng.gen::<f64>() * EMBOSS_DRIFT;
        let (sin, cos) = angle.sin_cos();
        let center = (size - 1) as f64 / 2.0;

        let mut weights = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 - center;
                let dy = y as f64 - center;
                let projection = dx * cos + dy * sin;
                weights.push(projection * rng.gen::<f64>());
            }
        }

        self.angle = angle;
        Ok(Kernel::from_parts(size, normalize(weights)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_angle_strictly_increases() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut state = EmbossState::random(&mut rng);
        let mut previous = state.angle();
        for _ in 0..500 {
            state.next_kernel(5, &mut rng).unwrap();
            assert!(state.angle() > previous);
            assert!(state.angle() - previous < EMBOSS_DRIFT);
            previous = state.angle();
        }
        // 500 draws of U(0, 0.3) average 0.15 each.
        assert!(previous > 30.0, "angle should drift well past 2π without wrapping");
    }

    #[test]
    fn test_random_start_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let angle = EmbossState::random(&mut rng).angle();
            assert!((0.0..TAU).contains(&angle));
        }
    }

    #[test]
    fn test_emboss_kernel_normalized() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = EmbossState::new(1.0);
        for size in [3, 5, 7, 9, 25] {
            let k = state.next_kernel(size, &mut rng).unwrap();
            assert_eq!(k.size(), size);
            let scale = k.weights().iter().fold(1.0_f64, |m, w| m.max(w.abs()));
            assert!((k.sum() - 1.0).abs() < 1e-9 * scale, "size {size}");
        }
    }

    #[test]
    fn test_size_one_is_zero_sum_and_unnormalized() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = EmbossState::new(0.5);
        let k = state.next_kernel(1, &mut rng).unwrap();
        assert_eq!(k.weights(), &[0.0]);
        assert!(state.angle() >= 0.5);
    }

    #[test]
    fn test_direction_follows_angle() {
        // Starting at 0 the drifted angle stays below 0.3, where
        // cos θ > sin θ: the raw right column is positive and the raw left
        // column negative. Normalization divides both by the same sum, so
        // the two columns keep opposite signs.
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = EmbossState::new(0.0);
        let k = state.next_kernel(3, &mut rng).unwrap();
        for y in 0..3 {
            assert!(k.get(0, y) * k.get(2, y) <= 0.0, "row {y}");
        }
    }

    #[test]
    fn test_invalid_size_leaves_state_untouched() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = EmbossState::new(2.0);
        assert_eq!(
            state.next_kernel(4, &mut rng),
            Err(KernelError::EvenSize { size: 4 })
        );
        assert_eq!(state.angle(), 2.0);
    }

    #[test]
    fn test_oversized_kernel_rejected_without_allocating() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = EmbossState::new(1.0);
        assert!(matches!(
            state.next_kernel(usize::MAX, &mut rng),
            Err(KernelError::TooLarge { size: usize::MAX, .. })
        ));
        assert!(matches!(
            state.next_kernel(100_001, &mut rng),
            Err(KernelError::TooLarge { size: 100_001, .. })
        ));
        assert_eq!(state.angle(), 1.0);
    }
}
