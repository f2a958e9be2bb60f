//! 2D convolution with clamped edges and optional palette quantization.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::saturate;
use crate::kernel::Kernel;
use crate::palette::ColorMapper;

/// Convolve `buffer` with `kernel`, producing a new buffer of the same size.
///
/// For each pixel the kernel is centered on `(x, y)` and the red, green and
/// blue channels are accumulated independently in `f64`. Samples outside
/// the raster are clamped to the nearest edge pixel (edge replication).
/// Alpha is copied from the source pixel and never convolved.
///
/// With a `mapper`, the raw sums (which may be negative, fractional or
/// above 255) are handed to [`ColorMapper::nearest`] and its color is
/// stored. Without one, each sum is rounded to nearest and saturated to
/// `0..=255`.
///
/// The input is never modified.
///
/// # Example
///
/// ```
/// use palette_convolve::{convolve, Kernel, PixelBuffer};
///
/// let buffer = PixelBuffer::from_raw(1, 1, vec![10, 20, 30, 255]).unwrap();
/// let out = convolve(&buffer, &Kernel::identity(3).unwrap(), None);
/// assert_eq!(out.as_raw(), &[10, 20, 30, 255]);
/// ```
pub fn convolve(
    buffer: &PixelBuffer,
    kernel: &Kernel,
    mapper: Option<&dyn ColorMapper>,
) -> PixelBuffer {
    let width = buffer.width();
    let height = buffer.height();
    let data = buffer.as_raw();
    let size = kernel.size();
    let half = kernel.half() as isize;
    let weights = kernel.weights();

    let mut output = vec![0u8; data.len()];

    for y in 0..height {
        for x in 0..width {
            let (mut r, mut g, mut b) = (0.0f64, 0.0f64, 0.0f64);

            for ky in 0..size {
                let py = clamp_coord(y as isize + ky as isize - half, height);
                let row = py * width;
                for kx in 0..size {
                    let px = clamp_coord(x as isize + kx as isize - half, width);
                    let i = (row + px) * CHANNELS;
                    let weight = weights[ky * size + kx];
                    r += data[i] as f64 * weight;
                    g += data[i + 1] as f64 * weight;
                    b += data[i + 2] as f64 * weight;
                }
            }

            let i = (y * width + x) * CHANNELS;
            match mapper {
                Some(mapper) => {
                    let color = mapper.nearest(r, g, b);
                    output[i] = color.r;
                    output[i + 1] = color.g;
                    output[i + 2] = color.b;
                }
                None => {
                    output[i] = saturate(r);
                    output[i + 1] = saturate(g);
                    output[i + 2] = saturate(b);
                }
            }
            output[i + 3] = data[i + 3];
        }
    }

    buffer.with_data(output)
}

#[inline]
fn clamp_coord(v: isize, len: usize) -> usize {
    v.clamp(0, len as isize - 1) as usize
}
