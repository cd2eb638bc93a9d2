use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::canvas::Canvas;

/// Output image format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LayerfillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(LayerfillError::config(format!(
                "unsupported output format '{other}' (expected png or jpg)"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoder settings shared by every output of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOpts {
    pub format: OutputFormat,
    /// JPEG quality, `1..=100`.
    pub jpeg_quality: u8,
    /// Straight RGBA8 colour transparent pixels are flattened onto for JPEG.
    pub jpeg_background: [u8; 4],
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            jpeg_quality: 95,
            jpeg_background: [0, 0, 0, 255],
        }
    }
}

/// Encode `canvas` into an in-memory image file.
pub fn encode_canvas(canvas: &Canvas, opts: &EncodeOpts) -> LayerfillResult<Vec<u8>> {
    let (w, h) = (canvas.width(), canvas.height());
    let mut out = Vec::new();
    match opts.format {
        OutputFormat::Png => {
            let rgba = canvas.to_rgba_image()?;
            PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
                .write_image(rgba.as_raw(), w, h, image::ExtendedColorType::Rgba8)
                .map_err(|e| LayerfillError::encode(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            if !(1..=100).contains(&opts.jpeg_quality) {
                return Err(LayerfillError::config(format!(
                    "jpeg quality must be in 1..=100, got {}",
                    opts.jpeg_quality
                )));
            }
            let mut rgba = vec![0u8; canvas.data().len()];
            flatten_premul_over_bg_to_opaque_rgba8(&mut rgba, canvas.data(), opts.jpeg_background)?;
            let rgb = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect::<Vec<u8>>();
            JpegEncoder::new_with_quality(&mut out, opts.jpeg_quality)
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| LayerfillError::encode(format!("jpeg: {e}")))?;
        }
    }
    Ok(out)
}

/// Encode and write `canvas` to `path`, creating parent directories as needed.
pub fn write_canvas(canvas: &Canvas, path: &Path, opts: &EncodeOpts) -> LayerfillResult<()> {
    let bytes = encode_canvas(canvas, opts)?;
    ensure_parent_dir(path)?;
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("failed to create output file '{}'", path.display()))?;
    f.write_all(&bytes)
        .with_context(|| format!("failed to write output file '{}'", path.display()))?;
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> LayerfillResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> LayerfillResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(LayerfillError::encode(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255_u16(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/writer.rs"]
mod tests;
