use crate::error::RenderError;
use palette_convolve::{Palette, PixelBuffer, Rgb};
use std::io::Cursor;
use std::path::Path;

/// PNG output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    /// Nearest-neighbour upscale factor
    pub scale: u32,
    /// Re-compress with oxipng
    pub optimize: bool,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            optimize: false,
        }
    }
}

/// Encode `buffer` as an 8-bit RGBA PNG, upscaled by `scale`.
pub fn encode_rgba(buffer: &PixelBuffer, scale: u32) -> Result<Vec<u8>, RenderError> {
    let (width, height) = scaled_dimensions(buffer, scale)?;
    let data = upscale(buffer.as_raw(), buffer.width(), scale as usize, 4);
    encode_png(
        width,
        height,
        png::ColorType::Rgba,
        png::BitDepth::Eight,
        None,
        None,
        &data,
    )
}

/// Encode a frame for writing to disk.
///
/// With a palette, the frame is written as an indexed PNG (1, 2, 4 or 8
/// bits per pixel depending on palette size) whenever every pixel is a
/// palette color; transparent pixels get an extra fully transparent
/// palette slot. Anything else falls back to RGBA.
pub fn encode_frame(
    buffer: &PixelBuffer,
    palette: Option<&Palette>,
    options: PngOptions,
) -> Result<Vec<u8>, RenderError> {
    let png_bytes = match palette.and_then(|p| index_pixels(buffer, p)) {
        Some(indexed) => encode_indexed(buffer, &indexed, options.scale)?,
        None => encode_rgba(buffer, options.scale)?,
    };

    if !options.optimize {
        return Ok(png_bytes);
    }

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    Ok(oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes))
}

/// Write encoded PNG bytes, creating parent directories as needed.
pub fn write_png(path: &Path, png_bytes: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png_bytes)?;
    tracing::debug!(path = %path.display(), bytes = png_bytes.len(), "Wrote PNG");
    Ok(())
}

/// Per-pixel palette indices plus the PLTE/tRNS colors they refer to.
struct IndexedPixels {
    indices: Vec<u8>,
    colors: Vec<Rgb>,
    transparent: Option<u8>,
}

fn index_pixels(buffer: &PixelBuffer, palette: &Palette) -> Option<IndexedPixels> {
    let mut colors = palette.colors().to_vec();
    let mut transparent = None;
    let mut indices = Vec::with_capacity(buffer.width() * buffer.height());

    for p in buffer.pixels() {
        let idx = match p[3] {
            0 => *transparent.get_or_insert_with(|| {
                colors.push(Rgb::BLACK);
                colors.len() - 1
            }),
            255 => palette.colors().iter().position(|c| c.to_bytes() == [p[0], p[1], p[2]])?,
            _ => return None,
        };
        indices.push(u8::try_from(idx).ok()?);
    }

    if colors.len() > 256 {
        return None;
    }
    Some(IndexedPixels {
        indices,
        colors,
        transparent: transparent.map(|t| t as u8),
    })
}

fn encode_indexed(
    buffer: &PixelBuffer,
    indexed: &IndexedPixels,
    scale: u32,
) -> Result<Vec<u8>, RenderError> {
    let (width, height) = scaled_dimensions(buffer, scale)?;
    let (depth, bits) = match indexed.colors.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };

    let plte: Vec<u8> = indexed.colors.iter().flat_map(|c| c.to_bytes()).collect();
    let trns = indexed.transparent.map(|t| {
        let mut alpha = vec![255u8; t as usize + 1];
        alpha[t as usize] = 0;
        alpha
    });

    let scaled = upscale(&indexed.indices, buffer.width(), scale as usize, 1);
    let packed = if bits == 8 {
        scaled
    } else {
        pack_nbits(&scaled, width, bits)
    };

    encode_png(
        width,
        height,
        png::ColorType::Indexed,
        depth,
        Some(&plte),
        trns.as_deref(),
        &packed,
    )
}

fn scaled_dimensions(buffer: &PixelBuffer, scale: u32) -> Result<(u32, u32), RenderError> {
    let unsupported = RenderError::UnsupportedDimensions {
        width: buffer.width(),
        height: buffer.height(),
    };
    if buffer.width() == 0 || buffer.height() == 0 || scale == 0 {
        return Err(unsupported);
    }
    let width = u32::try_from(buffer.width())
        .ok()
        .and_then(|w| w.checked_mul(scale));
    let height = u32::try_from(buffer.height())
        .ok()
        .and_then(|h| h.checked_mul(scale));
    match (width, height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(unsupported),
    }
}

/// Nearest-neighbour upscale of row-major samples with `channels` bytes each.
fn upscale(data: &[u8], width: usize, scale: usize, channels: usize) -> Vec<u8> {
    if scale == 1 {
        return data.to_vec();
    }
    let row_len = width * channels;
    let mut out = Vec::with_capacity(data.len() * scale * scale);
    for row in data.chunks_exact(row_len) {
        let start = out.len();
        for px in row.chunks_exact(channels) {
            for _ in 0..scale {
                out.extend_from_slice(px);
            }
        }
        let scaled_row = out[start..].to_vec();
        for _ in 1..scale {
            out.extend_from_slice(&scaled_row);
        }
    }
    out
}

/// Encode packed pixel data as a PNG.
fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    trns: Option<&[u8]>,
    packed: &[u8],
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into `bits`-wide samples (1, 2 or 4), most
/// significant first. Each row starts on a fresh byte.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let per_byte = usize::from(8 / bits);
    let mask = (1u8 << bits) - 1;

    indices
        .chunks(width as usize)
        .flat_map(|row| row.chunks(per_byte))
        .map(|group| {
            group.iter().enumerate().fold(0u8, |byte, (slot, &idx)| {
                let shift = 8 - bits * (slot as u8 + 1);
                byte | ((idx & mask) << shift)
            })
        })
        .collect()
}
