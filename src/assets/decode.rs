use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::{PreparedImage, read_asset_bytes};
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Decode any raster format supported by `image` into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> LayerfillResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(prepared_from_rgba(dyn_img.to_rgba8()))
}

/// Read and decode a straight-alpha image from disk, keeping it as an `RgbaImage`.
///
/// Used for row-supplied pictures, which are resampled before being premultiplied.
pub fn open_rgba(path: &Path) -> LayerfillResult<image::RgbaImage> {
    let bytes = read_asset_bytes(path)?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(dyn_img.to_rgba8())
}

pub fn parse_svg(bytes: &[u8]) -> LayerfillResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Convert a straight-alpha `RgbaImage` into a [`PreparedImage`].
pub fn prepared_from_rgba(rgba: image::RgbaImage) -> PreparedImage {
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

/// Convert premultiplied bytes back into a straight-alpha `RgbaImage`.
pub fn rgba_from_premul(
    width: u32,
    height: u32,
    premul: &[u8],
) -> LayerfillResult<image::RgbaImage> {
    let mut straight = premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    image::RgbaImage::from_raw(width, height, straight).ok_or_else(|| {
        LayerfillError::render(format!(
            "pixel buffer of {} bytes does not match {width}x{height}",
            premul.len()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
