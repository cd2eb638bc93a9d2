//! Depth-first layer compositing for one (template, row) pair.

use std::path::PathBuf;

use crate::assets::decode::{open_rgba, prepared_from_rgba};
use crate::assets::fit::fit_image;
use crate::data::row::Row;
use crate::data::value::Value;
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::render::canvas::Canvas;
use crate::template::directive::{Directive, DirectiveKind, ImageDirective, TextDirective};
use crate::template::document::{Layer, LayerId, Template};
use crate::text::draw::TextRenderer;
use crate::text::layout::{TextBox, compute_origin, glyph_size};
use crate::text::metrics::TextBrushRgba8;
use crate::text::normalize::normalize_text;

/// Per-render visibility decisions layered over an immutable [`Template`].
///
/// Layers without an entry keep their authored visibility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityOverlay {
    resolved: Vec<Option<bool>>,
}

impl VisibilityOverlay {
    pub fn new(template: &Template) -> Self {
        Self {
            resolved: vec![None; template.layer_count()],
        }
    }

    pub fn set(&mut self, id: LayerId, visible: bool) {
        if let Some(slot) = self.resolved.get_mut(id) {
            *slot = Some(visible);
        }
    }

    /// Resolved visibility for `id`, if this render decided one.
    pub fn get(&self, id: LayerId) -> Option<bool> {
        self.resolved.get(id).copied().flatten()
    }

    pub fn is_visible(&self, layer: &Layer) -> bool {
        self.get(layer.id).unwrap_or(layer.visible)
    }
}

/// Result of compositing one row onto one template.
#[derive(Clone, Debug)]
pub struct ComposedImage {
    pub canvas: Canvas,
    pub overlay: VisibilityOverlay,
}

/// Walks a template's layer tree and paints one row onto a fresh canvas.
pub struct LayerCompositor<'a, T: TextRenderer + ?Sized> {
    template: &'a Template,
    text: &'a mut T,
}

impl<'a, T: TextRenderer + ?Sized> LayerCompositor<'a, T> {
    pub fn new(template: &'a Template, text: &'a mut T) -> Self {
        Self { template, text }
    }

    pub fn render(&mut self, row: &Row) -> LayerfillResult<ComposedImage> {
        let template = self.template;
        let mut canvas = Canvas::new(template.canvas);
        let mut overlay = VisibilityOverlay::new(template);
        for layer in &template.layers {
            self.visit(layer, row, &mut canvas, &mut overlay)?;
        }
        Ok(ComposedImage { canvas, overlay })
    }

    fn visit(
        &mut self,
        layer: &Layer,
        row: &Row,
        canvas: &mut Canvas,
        overlay: &mut VisibilityOverlay,
    ) -> LayerfillResult<()> {
        if let Some(directive) = &layer.directive {
            let value = row_value(row, directive)?;
            match directive.kind {
                DirectiveKind::Visibility => overlay.set(layer.id, value.as_bool()),
                DirectiveKind::Text(td) => {
                    overlay.set(layer.id, false);
                    self.paint_text(layer, &td, &value.as_text(), canvas)?;
                    return Ok(());
                }
                DirectiveKind::Image(img) => {
                    overlay.set(layer.id, false);
                    paint_picture(layer, &img, value.as_path(), canvas)?;
                    return Ok(());
                }
            }
        }

        if !overlay.is_visible(layer) {
            return Ok(());
        }
        if layer.is_group() {
            for child in layer.children() {
                self.visit(child, row, canvas, overlay)?;
            }
        } else if let Some(raster) = &layer.raster {
            canvas.draw_image(raster, layer.bbox.x, layer.bbox.y)?;
        }
        Ok(())
    }

    fn paint_text(
        &mut self,
        layer: &Layer,
        td: &TextDirective,
        raw: &str,
        canvas: &mut Canvas,
    ) -> LayerfillResult<()> {
        let style = layer.text_style.ok_or_else(|| {
            LayerfillError::render(format!("text layer '{}' has no text style", layer.name))
        })?;
        let text = normalize_text(raw);
        let tb = TextBox {
            bbox: layer.bbox,
            font_size: style.font_size,
            align: td.align,
            valign: td.valign,
            wrapped: td.is_wrapped(),
        };
        let lines = compute_origin(&text, &tb, &mut *self.text).map_err(|e| {
            LayerfillError::render(format!("measure text for layer '{}': {e}", layer.name))
        })?;
        tracing::trace!(layer = %layer.name, lines = lines.len(), "text placed");
        self.text.draw_lines(
            canvas,
            &lines,
            glyph_size(style.font_size),
            TextBrushRgba8::from(style.fill),
            td.rotation_deg,
        )
    }
}

fn row_value<'r>(row: &'r Row, directive: &Directive) -> LayerfillResult<&'r Value> {
    if !row.contains(&directive.field) {
        return Err(LayerfillError::render(format!(
            "row has no column '{}'",
            directive.field
        )));
    }
    Ok(row.get(&directive.field))
}

fn paint_picture(
    layer: &Layer,
    img: &ImageDirective,
    path: Option<PathBuf>,
    canvas: &mut Canvas,
) -> LayerfillResult<()> {
    let Some(path) = path else {
        tracing::warn!(layer = %layer.name, "image cell is empty; layer skipped");
        return Ok(());
    };
    if !path.is_file() {
        tracing::warn!(
            layer = %layer.name,
            path = %path.display(),
            "image file does not exist; layer skipped"
        );
        return Ok(());
    }
    if layer.bbox.is_empty() {
        tracing::warn!(layer = %layer.name, "image layer has an empty box; layer skipped");
        return Ok(());
    }

    let src = open_rgba(&path)?;
    let fitted = fit_image(&src, layer.bbox.width, layer.bbox.height, img.fit, img.anchor)?;
    tracing::trace!(layer = %layer.name, fit = ?img.fit, anchor = %img.anchor, "image fitted");
    canvas.draw_image(&prepared_from_rgba(fitted), layer.bbox.x, layer.bbox.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
