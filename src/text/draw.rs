use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::render::canvas::Canvas;
use crate::text::layout::PlacedLine;
use crate::text::metrics::{TextBrushRgba8, TextMeasure, TextShaper};

/// Measures and paints text for the compositor.
pub trait TextRenderer: TextMeasure {
    fn draw_lines(
        &mut self,
        canvas: &mut Canvas,
        lines: &[PlacedLine],
        font_size: f32,
        brush: TextBrushRgba8,
        rotation_deg: Option<f64>,
    ) -> LayerfillResult<()>;
}

impl TextRenderer for TextShaper {
    fn draw_lines(
        &mut self,
        canvas: &mut Canvas,
        lines: &[PlacedLine],
        font_size: f32,
        brush: TextBrushRgba8,
        rotation_deg: Option<f64>,
    ) -> LayerfillResult<()> {
        draw_text_lines(canvas, self, lines, font_size, brush, rotation_deg)
    }
}

/// Rasterize positioned lines and composite them onto `canvas`.
///
/// With a rotation the whole block turns about the centre of its line boxes; positive degrees are
/// counter-clockwise on screen.
pub fn draw_text_lines(
    canvas: &mut Canvas,
    shaper: &mut TextShaper,
    lines: &[PlacedLine],
    font_size: f32,
    brush: TextBrushRgba8,
    rotation_deg: Option<f64>,
) -> LayerfillResult<()> {
    let w: u16 = canvas
        .width()
        .try_into()
        .map_err(|_| LayerfillError::render("canvas width exceeds u16 for text rendering"))?;
    let h: u16 = canvas
        .height()
        .try_into()
        .map_err(|_| LayerfillError::render("canvas height exceeds u16 for text rendering"))?;

    let mut shaped = Vec::with_capacity(lines.len());
    for line in lines.iter().filter(|l| !l.text.is_empty()) {
        let layout = shaper.layout_line(&line.text, font_size, brush)?;
        shaped.push((Point::new(f64::from(line.x), f64::from(line.y)), layout));
    }
    if shaped.is_empty() {
        return Ok(());
    }

    let rotation = match rotation_deg {
        Some(deg) if deg != 0.0 => {
            let bounds = shaped
                .iter()
                .map(|(p, l)| {
                    Rect::new(
                        p.x,
                        p.y,
                        p.x + f64::from(l.width()),
                        p.y + f64::from(l.height()),
                    )
                })
                .reduce(|a, b| a.union(b))
                .unwrap_or_default();
            Affine::rotate_about(-deg.to_radians(), bounds.center())
        }
        _ => Affine::IDENTITY,
    };

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        brush.r, brush.g, brush.b, brush.a,
    ));
    for (origin, layout) in &shaped {
        ctx.set_transform(affine_to_cpu(
            rotation * Affine::translate(origin.to_vec2()),
        ));
        fill_layout(&mut ctx, shaper.font_data(), layout);
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    canvas.draw_premul(
        pixmap.data_as_u8_slice(),
        u32::from(w),
        u32::from(h),
        0,
        0,
    )
}

fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    font_data: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<TextBrushRgba8>,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let mut x = run.offset();
            let y = run.baseline();
            let glyphs = run
                .glyphs()
                .map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    };
                    x += g.advance;
                    glyph
                })
                .collect::<Vec<_>>();
            ctx.glyph_run(font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs.into_iter());
        }
    }
}

/// Horizontal ink extent of `text` set at `font_size`, relative to the line origin.
///
/// The line is rasterized exactly as [`draw_text_lines`] paints it and the covered pixel
/// columns are scanned, so the result is the tight box of the rendered glyphs rather than the
/// advance width. `None` when nothing is inked (empty or whitespace-only text).
pub(crate) fn ink_extent(
    shaper: &mut TextShaper,
    text: &str,
    font_size: f32,
) -> LayerfillResult<Option<(f32, f32)>> {
    if text.is_empty() {
        return Ok(None);
    }
    let layout = shaper.layout_line(text, font_size, TextBrushRgba8::default())?;

    // Margin for side bearings that reach past the advance box.
    let pad = f64::from(font_size.ceil());
    let too_large = || LayerfillError::render("text line too large to measure");
    let w: u16 = to_u16(f64::from(layout.width()) + 2.0 * pad).ok_or_else(too_large)?;
    let h: u16 = to_u16(f64::from(layout.height()) + 2.0 * pad).ok_or_else(too_large)?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((pad, pad)));
    fill_layout(&mut ctx, shaper.font_data(), &layout);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);

    let stride = usize::from(w) * 4;
    let mut inked = vec![false; usize::from(w)];
    for row in pixmap.data_as_u8_slice().chunks_exact(stride) {
        for (col, px) in row.chunks_exact(4).enumerate() {
            if px[3] > 0 {
                inked[col] = true;
            }
        }
    }
    let Some(first) = inked.iter().position(|&i| i) else {
        return Ok(None);
    };
    let last = inked.iter().rposition(|&i| i).unwrap_or(first);
    let pad = pad as f32;
    Ok(Some((first as f32 - pad, (last + 1) as f32 - pad)))
}

fn to_u16(v: f64) -> Option<u16> {
    let v = v.ceil();
    (v >= 1.0 && v <= f64::from(u16::MAX)).then_some(v as u16)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/text/draw.rs"]
mod tests;
