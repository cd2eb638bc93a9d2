//! Cover/contain fitting of row-supplied pictures into a layer box.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::template::directive::{Anchor, FitMode, HAlign, VAlign};

/// Scale, crop or pad `src` so that it is exactly `width`x`height`.
///
/// Aspect ratio is always preserved. `Cover` crops the overflow and `Contain` pads with fully
/// transparent pixels; in both cases the anchor decides which part lines up with the box.
pub fn fit_image(
    src: &RgbaImage,
    width: u32,
    height: u32,
    mode: FitMode,
    anchor: Anchor,
) -> LayerfillResult<RgbaImage> {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return Err(LayerfillError::render("source image is empty"));
    }
    if width == 0 || height == 0 {
        return Err(LayerfillError::render(format!(
            "target box must be non-empty, got {width}x{height}"
        )));
    }

    let rx = f64::from(width) / f64::from(sw);
    let ry = f64::from(height) / f64::from(sh);

    match mode {
        FitMode::Cover => {
            let scale = rx.max(ry);
            // Never let rounding leave the scaled image smaller than the box.
            let nw = scaled_dim(sw, scale).max(width);
            let nh = scaled_dim(sh, scale).max(height);
            let scaled = resize(src, nw, nh);
            let x = anchor_offset_h(anchor.horizontal, nw - width);
            let y = anchor_offset_v(anchor.vertical, nh - height);
            Ok(imageops::crop_imm(&scaled, x, y, width, height).to_image())
        }
        FitMode::Contain => {
            let scale = rx.min(ry);
            let nw = scaled_dim(sw, scale).min(width);
            let nh = scaled_dim(sh, scale).min(height);
            let scaled = resize(src, nw, nh);
            let x = anchor_offset_h(anchor.horizontal, width - nw);
            let y = anchor_offset_v(anchor.vertical, height - nh);
            let mut out = RgbaImage::new(width, height);
            imageops::replace(&mut out, &scaled, i64::from(x), i64::from(y));
            Ok(out)
        }
    }
}

fn scaled_dim(src: u32, scale: f64) -> u32 {
    ((f64::from(src) * scale).round() as u32).max(1)
}

fn resize(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    imageops::resize(src, w, h, FilterType::Lanczos3)
}

fn anchor_offset_h(align: HAlign, slack: u32) -> u32 {
    match align {
        HAlign::Left => 0,
        HAlign::Center => slack / 2,
        HAlign::Right => slack,
    }
}

fn anchor_offset_v(align: VAlign, slack: u32) -> u32 {
    match align {
        VAlign::Top => 0,
        VAlign::Middle => slack / 2,
        VAlign::Bottom => slack,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fit.rs"]
mod tests;
