//! Headless capture: PNG screenshots and per-frame dumps.

use std::error::Error;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Nes;

/// Convert ARGB32 pixels to opaque RGBA bytes.
#[must_use]
pub fn rgba(pixels: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pixels.len() * 4);
    for &pixel in pixels {
        let [_, r, g, b] = pixel.to_be_bytes();
        bytes.extend_from_slice(&[r, g, b, 0xFF]);
    }
    bytes
}

fn write_png<W: Write>(
    out: W,
    width: u32,
    height: u32,
    pixels: &[u32],
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(out, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgba(pixels))?;
    Ok(())
}

/// Save the current framebuffer as a PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(nes: &Nes, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    write_png(
        BufWriter::new(file),
        nes.framebuffer_width(),
        nes.framebuffer_height(),
        &nes.framebuffer(),
    )?;
    log::info!("screenshot saved to {}", path.display());
    Ok(())
}

/// Run `num_frames` frames, saving each as `dir/frames/NNNNNN.png`.
///
/// # Errors
///
/// Returns an error if a frame cannot be saved.
pub fn record(nes: &mut Nes, dir: &Path, num_frames: u32) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        nes.run_frame();
        save_screenshot(nes, &frames_dir.join(format!("{i:06}.png")))?;
    }

    log::info!("captured {num_frames} frames to {}", frames_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_to_rgba() {
        assert_eq!(
            rgba(&[0xFF12_3456, 0x00AB_CDEF]),
            vec![0x12, 0x34, 0x56, 0xFF, 0xAB, 0xCD, 0xEF, 0xFF]
        );
    }

    #[test]
    fn encodes_a_png() {
        let mut out = Vec::new();
        write_png(&mut out, 2, 1, &[0xFF00_0000, 0xFFFF_FFFF]).expect("encode");
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
    }
}
