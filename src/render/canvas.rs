use crate::assets::decode::rgba_from_premul;
use crate::assets::store::PreparedImage;
use crate::foundation::core::CanvasSize;
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::foundation::math::mul_div255_u16;

/// Output accumulator: one premultiplied RGBA8 surface per (template, row).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: CanvasSize,
    data: Vec<u8>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            data: vec![0; size.rgba_len()],
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha copy for encoding.
    pub fn to_rgba_image(&self) -> LayerfillResult<image::RgbaImage> {
        rgba_from_premul(self.size.width, self.size.height, &self.data)
    }

    pub fn draw_image(&mut self, img: &PreparedImage, x: i32, y: i32) -> LayerfillResult<()> {
        self.draw_premul(&img.rgba8_premul, img.width, img.height, x, y)
    }

    /// Source-over composite a premultiplied `w`x`h` buffer with its top-left at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn draw_premul(
        &mut self,
        src: &[u8],
        w: u32,
        h: u32,
        x: i32,
        y: i32,
    ) -> LayerfillResult<()> {
        let expected = (w as usize).saturating_mul(h as usize).saturating_mul(4);
        if src.len() != expected {
            return Err(LayerfillError::render(format!(
                "source buffer of {} bytes does not match {w}x{h}",
                src.len()
            )));
        }

        let cw = i64::from(self.size.width);
        let ch = i64::from(self.size.height);
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(w)).min(cw);
        let y1 = (i64::from(y) + i64::from(h)).min(ch);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let span = ((x1 - x0) as usize) * 4;
        for dy in y0..y1 {
            let sy = (dy - i64::from(y)) as usize;
            let sx = (x0 - i64::from(x)) as usize;
            let s_start = (sy * (w as usize) + sx) * 4;
            let d_start = ((dy as usize) * (cw as usize) + (x0 as usize)) * 4;
            let src_row = &src[s_start..s_start + span];
            let dst_row = &mut self.data[d_start..d_start + span];
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                premul_over_px(d, s);
            }
        }
        Ok(())
    }
}

fn premul_over_px(dst: &mut [u8], src: &[u8]) {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        dst.copy_from_slice(src);
        return;
    }
    let inv = 255 - sa;
    for i in 0..4 {
        let v = u16::from(src[i]) + mul_div255_u16(u16::from(dst[i]), inv);
        dst[i] = v.min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
