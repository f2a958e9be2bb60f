//! RGBA pixel buffer.
//!
//! [`PixelBuffer`] is the raster every pipeline stage reads and produces:
//! `width × height` pixels, row-major, four bytes per pixel in R, G, B, A
//! order. The length invariant `data.len() == 4 · width · height` is
//! checked once at construction and preserved by every method.

use thiserror::Error;

use crate::color::Rgb;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Error type for pixel buffer construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Raw data length does not match the declared dimensions
    #[error("buffer length {actual} does not match {width}x{height} (expected {expected} bytes)")]
    LengthMismatch {
        /// Declared width in pixels
        width: usize,
        /// Declared height in pixels
        height: usize,
        /// Required byte length
        expected: usize,
        /// Supplied byte length
        actual: usize,
    },
    /// `width · height · channels` does not fit in `usize`
    #[error("buffer dimensions {width}x{height} overflow")]
    Overflow {
        /// Declared width in pixels
        width: usize,
        /// Declared height in pixels
        height: usize,
    },
}

/// A rectangular RGBA raster.
///
/// # Example
///
/// ```
/// use palette_convolve::{PixelBuffer, Rgb};
///
/// let mut buffer = PixelBuffer::new(4, 2).unwrap();
/// buffer.fill_rect(0, 0, 2, 2, Rgb::new(255, 0, 0).to_rgba(255));
///
/// assert_eq!(buffer.pixel(1, 1), [255, 0, 0, 255]);
/// assert_eq!(buffer.pixel(2, 0), [0, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent black buffer, like a freshly created canvas.
    pub fn new(width: usize, height: usize) -> Result<Self, BufferError> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Buffer with every pixel set to `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self, BufferError> {
        let len = byte_len(width, height, CHANNELS)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`BufferError::LengthMismatch`] unless `data.len() == 4 · width · height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected = byte_len(width, height, CHANNELS)?;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from packed RGB bytes; every pixel becomes fully opaque.
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self, BufferError> {
        let expected = byte_len(width, height, 3)?;
        if rgb.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }
        let data = rgb
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its RGBA bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Iterate over pixels as 4-byte slices, row-major.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(CHANNELS)
    }

    /// New buffer with these dimensions and `data`, which must have the
    /// same length as this buffer's.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    #[inline]
    pub(crate) fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If `(x, y)` is outside the buffer.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.data[i..i + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// Fill the rectangle at `(x, y)` of size `w × h`, clipped to the buffer.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgba: [u8; 4]) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                let i = self.offset(px, py);
                self.data[i..i + CHANNELS].copy_from_slice(&rgba);
            }
        }
    }

    /// Packed RGB bytes, alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels().flat_map(|p| [p[0], p[1], p[2]]).collect()
    }

    /// Color at `(x, y)` without its alpha.
    pub fn color(&self, x: usize, y: usize) -> Rgb {
        let [r, g, b, _] = self.pixel(x, y);
        Rgb::new(r, g, b)
    }
}

fn byte_len(width: usize, height: usize, channels: usize) -> Result<usize, BufferError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(BufferError::Overflow { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent_black() {
        let buffer = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(buffer.as_raw().len(), 3 * 2 * 4);
        assert!(buffer.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.as_raw(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_from_raw_length_check() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BufferError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(0, 5, Vec::new()).is_ok());
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            PixelBuffer::new(usize::MAX, 2),
            Err(BufferError::Overflow { .. })
        ));
    }

    #[test]
    fn test_rgb_conversions() {
        let buffer = PixelBuffer::from_rgb(2, 1, &[10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(buffer.as_raw(), &[10, 20, 30, 255, 40, 50, 60, 255]);
        assert_eq!(buffer.to_rgb(), vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(buffer.color(1, 0), Rgb::new(40, 50, 60));
        assert!(PixelBuffer::from_rgb(2, 1, &[0; 5]).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let mut buffer = PixelBuffer::new(3, 3).unwrap();
        buffer.put_pixel(2, 1, [9, 8, 7, 6]);
        assert_eq!(buffer.pixel(2, 1), [9, 8, 7, 6]);
        assert_eq!(buffer.get_pixel(3, 0), None);
        buffer.put_pixel(5, 5, [1, 1, 1, 1]);
        assert_eq!(buffer.pixels().filter(|p| p[3] != 0).count(), 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        PixelBuffer::new(2, 2).unwrap().pixel(2, 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut buffer = PixelBuffer::new(4, 4).unwrap();
        buffer.fill_rect(2, 3, 10, 10, [255, 255, 255, 255]);
        let filled: Vec<(usize, usize)> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.pixel(x, y)[3] == 255)
            .collect();
        assert_eq!(filled, vec![(2, 3), (3, 3)]);

        // Entirely outside: no-op.
        buffer.fill_rect(10, 10, 2, 2, [1, 1, 1, 1]);
        assert_eq!(buffer.pixels().filter(|p| p[3] != 0).count(), 2);
    }
}
