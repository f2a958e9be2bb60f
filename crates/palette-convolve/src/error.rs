//! Unified error type for the palette-convolve public API.
//!
//! [`ConvolveError`] wraps every error type in the crate into a single enum
//! for convenient `?` propagation in application code.

use thiserror::Error;

use crate::buffer::BufferError;
use crate::kernel::KernelError;
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the palette-convolve public API.
///
/// # Example
///
/// ```
/// use palette_convolve::{ConvolveError, Kernel, Palette};
///
/// fn setup() -> Result<(Palette, Kernel), ConvolveError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"])?;
///     let kernel = Kernel::box_blur(3)?;
///     Ok((palette, kernel))
/// }
/// # setup().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvolveError {
    /// Palette validation error (empty, duplicate, or parse error)
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
    /// Kernel construction error
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
    /// Pixel buffer construction error
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kernel, Palette, PixelBuffer};

    #[test]
    fn test_question_mark_conversions() {
        fn palette() -> Result<Palette, ConvolveError> {
            Ok(Palette::from_hex(&[])?)
        }
        fn kernel() -> Result<Kernel, ConvolveError> {
            Ok(Kernel::from_weights(vec![1.0; 4])?)
        }
        fn buffer() -> Result<PixelBuffer, ConvolveError> {
            Ok(PixelBuffer::from_raw(1, 1, vec![0; 3])?)
        }
        fn color() -> Result<crate::Rgb, ConvolveError> {
            Ok("#12".parse()?)
        }

        assert!(matches!(palette(), Err(ConvolveError::Palette(_))));
        assert!(matches!(kernel(), Err(ConvolveError::Kernel(_))));
        assert!(matches!(buffer(), Err(ConvolveError::Buffer(_))));
        assert!(matches!(color(), Err(ConvolveError::ParseColor(_))));
    }

    #[test]
    fn test_display() {
        let err = ConvolveError::from(KernelError::EvenSize { size: 4 });
        assert_eq!(err.to_string(), "kernel error: kernel size 4 is even (must be odd)");
    }
}
