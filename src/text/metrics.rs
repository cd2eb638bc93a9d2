use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::color::ColorDef;
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::text::draw::ink_extent;

/// Text width measurement used by layout.
///
/// Widths are the tight horizontal extent of the rendered glyphs (right ink edge minus left ink
/// edge), never advance sums or per-character estimates.
pub trait TextMeasure {
    /// Width in pixels of `text` set on one line at `font_size`.
    fn measure_width(&mut self, text: &str, font_size: f32) -> LayerfillResult<f32>;
}

/// Font file loaded once and shared read-only between render workers.
#[derive(Clone, Debug)]
pub struct FontHandle {
    pub path: PathBuf,
    pub bytes: Arc<Vec<u8>>,
}

impl FontHandle {
    pub fn load(path: impl AsRef<Path>) -> LayerfillResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LayerfillError::font(format!("failed to open font '{}': {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(LayerfillError::font(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            bytes: Arc::new(bytes),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<ColorDef> for TextBrushRgba8 {
    fn from(c: ColorDef) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Parley shaping state bound to one font.
///
/// Not `Sync`: each render worker owns its own shaper.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font_data: vello_cpu::peniko::FontData,
}

impl TextShaper {
    pub fn new(font: &FontHandle) -> LayerfillResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LayerfillError::font(format!(
                "no font families registered from '{}'",
                font.path.display()
            ))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LayerfillError::font("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_data,
        })
    }

    /// Font data for glyph drawing with `vello_cpu`.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LayerfillResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LayerfillError::render(
                "text size must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextShaper {
    fn measure_width(&mut self, text: &str, font_size: f32) -> LayerfillResult<f32> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(ink_extent(self, text, font_size)?.map_or(0.0, |(left, right)| right - left))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
