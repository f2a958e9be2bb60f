//! Initial canvas patterns.
//!
//! Two initializers seed the first frame before any convolution runs:
//!
//! - [`stripes`]: a grid of solid rectangles painted with the palette
//!   colors in order.
//! - [`randomize`]: every pixel an independent, uniformly random palette
//!   color.

use rand::Rng;

use crate::buffer::{BufferError, PixelBuffer};
use crate::color::Rgb;
use crate::palette::Palette;

/// Paint a `columns × rows` grid of solid cells.
///
/// Cells are painted column by column, top to bottom within a column,
/// consuming `colors` in order. Once the colors run out the remaining cells
/// stay transparent black. Cell size is the integer division of the canvas
/// by the grid; the last column and row absorb the remainder.
///
/// `colors` is the raw, possibly repeating color list; repeats simply paint
/// several cells the same color.
///
/// # Example
///
/// ```
/// use palette_convolve::{pattern, Rgb};
///
/// let red = Rgb::new(255, 0, 0);
/// let buffer = pattern::stripes(4, 2, &[red, Rgb::WHITE], 2, 1).unwrap();
/// assert_eq!(buffer.pixel(0, 1), [255, 0, 0, 255]);
/// assert_eq!(buffer.pixel(3, 0), [255, 255, 255, 255]);
/// ```
pub fn stripes(
    width: usize,
    height: usize,
    colors: &[Rgb],
    columns: usize,
    rows: usize,
) -> Result<PixelBuffer, BufferError> {
    let mut buffer = PixelBuffer::new(width, height)?;
    if columns == 0 || rows == 0 {
        return Ok(buffer);
    }

    let cell_w = width / columns;
    let cell_h = height / rows;
    let mut colors = colors.iter();

    for col in 0..columns {
        for row in 0..rows {
            let Some(color) = colors.next() else {
                return Ok(buffer);
            };
            let x = col * cell_w;
            let y = row * cell_h;
            let w = if col + 1 == columns { width - x } else { cell_w };
            let h = if row + 1 == rows { height - y } else { cell_h };
            buffer.fill_rect(x, y, w, h, color.to_rgba(255));
        }
    }

    Ok(buffer)
}

/// Fill every pixel with an independently chosen palette color at full
/// opacity.
pub fn randomize<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    palette: &Palette,
    rng: &mut R,
) -> Result<PixelBuffer, BufferError> {
    let mut buffer = PixelBuffer::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            buffer.put_pixel(x, y, palette.choose(rng).to_rgba(255));
        }
    }
    Ok(buffer)
}
