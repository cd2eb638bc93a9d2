use crate::assets::store::PreparedImage;
use crate::foundation::error::{LayerfillError, LayerfillResult};

const MAX_DIM: u32 = 16_384;

/// Rasterize an SVG tree stretched to exactly `width`x`height` pixels.
///
/// Static SVG artwork in a template is drawn at its layer size, so the document's own aspect
/// ratio is not preserved.
pub fn rasterize_svg(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> LayerfillResult<PreparedImage> {
    if width == 0 || height == 0 {
        return Err(LayerfillError::config("svg layer must have a non-empty size"));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(LayerfillError::config(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let size = tree.size();
    if !(size.width().is_finite() && size.height().is_finite())
        || size.width() <= 0.0
        || size.height() <= 0.0
    {
        return Err(LayerfillError::config("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LayerfillError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    // tiny-skia pixmaps are already premultiplied RGBA8.
    PreparedImage::new(width, height, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
