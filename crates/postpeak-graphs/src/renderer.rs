//! Chart rendering trait and PNG output helpers

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;
use postpeak_common::{PostPeakError, Result};
use postpeak_config::ChartConfig;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Trait for charts that render to PNG
pub trait ChartRenderer {
    /// Render the chart to PNG bytes
    fn render_to_bytes(&self, style: &ChartConfig) -> Result<Vec<u8>>;

    /// Render the chart and write it to `path`.
    ///
    /// The image is fully rendered before anything touches the file system,
    /// and then written through a temporary file in the destination
    /// directory, so a failure never leaves a partial image at `path`.
    fn render_to_file(&self, style: &ChartConfig, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(style)?;
        write_atomically(path, &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        parse_color(color_str)
    }
}

/// Parses `#rrggbb`, falling back to black.
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    // Default to black if parsing fails
    RGBColor(0, 0, 0)
}

/// Encodes a packed RGB buffer as PNG.
pub fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(buffer, width, height, ColorType::Rgb8)
        .map_err(|e| PostPeakError::render_with_source("PNG encoding failed", e))?;
    Ok(bytes)
}

/// Replaces `path` with `bytes` via a temporary file in the same directory.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::Builder::new()
        .prefix(".postpeak-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| {
            PostPeakError::render_with_source(
                format!("cannot create a temporary file in {}", dir.display()),
                e,
            )
        })?;

    file.write_all(bytes)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| {
            PostPeakError::render_with_source(format!("cannot write {}", path.display()), e)
        })?;

    file.persist(path).map_err(|e| {
        PostPeakError::render_with_source(format!("cannot write {}", path.display()), e.error)
    })?;
    Ok(())
}
