//! Assertion helpers for tests.

use palette_convolve::{Palette, PixelBuffer, Rgb};
use pretty_assertions::assert_eq;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Assert bytes are a PNG with the expected dimensions
pub fn assert_png(bytes: &[u8], width: u32, height: u32) {
    assert!(
        bytes.starts_with(&PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().expect("PNG header should decode");
    let info = reader.info();
    assert_eq!((info.width, info.height), (width, height));
}

/// Assert every opaque pixel is a palette color
pub fn assert_on_palette(buffer: &PixelBuffer, palette: &Palette) {
    for (i, p) in buffer.pixels().enumerate() {
        if p[3] == 0 {
            continue;
        }
        let color = Rgb::new(p[0], p[1], p[2]);
        assert!(
            palette.contains(color),
            "Pixel {i} ({color}) is not in the palette"
        );
    }
}
