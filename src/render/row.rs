use std::path::{Path, PathBuf};

use crate::batch::naming::output_stem;
use crate::data::row::Row;
use crate::encode::writer::{EncodeOpts, write_canvas};
use crate::foundation::error::LayerfillResult;
use crate::render::compositor::{ComposedImage, LayerCompositor};
use crate::template::document::Template;
use crate::text::draw::TextRenderer;

/// Options for turning rows into files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    pub encode: EncodeOpts,
    /// Directory run directories are created under.
    pub output_root: PathBuf,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            encode: EncodeOpts::default(),
            output_root: PathBuf::from("export"),
        }
    }
}

/// Composite one row onto one template without writing anything.
pub fn compose_row<T: TextRenderer + ?Sized>(
    template: &Template,
    row: &Row,
    text: &mut T,
) -> LayerfillResult<ComposedImage> {
    LayerCompositor::new(template, text).render(row)
}

/// Renders rows of one source into a fixed run directory.
#[derive(Clone, Copy, Debug)]
pub struct RowRenderer<'a> {
    encode: &'a EncodeOpts,
    run_dir: &'a Path,
    source_base: &'a str,
}

impl<'a> RowRenderer<'a> {
    pub fn new(encode: &'a EncodeOpts, run_dir: &'a Path, source_base: &'a str) -> Self {
        Self {
            encode,
            run_dir,
            source_base,
        }
    }

    /// Where the output of (`template`, row `row_index`) is written.
    pub fn output_path(&self, template: &Template, row: &Row, row_index: usize) -> PathBuf {
        let stem = output_stem(row, row_index, &template.name, self.source_base);
        self.run_dir
            .join(format!("{stem}.{}", self.encode.format.extension()))
    }

    /// Composite, encode and write one row; returns the written path.
    #[tracing::instrument(level = "debug", skip_all, fields(template = %template.name, row = row_index))]
    pub fn render_one<T: TextRenderer + ?Sized>(
        &self,
        template: &Template,
        row: &Row,
        row_index: usize,
        text: &mut T,
    ) -> LayerfillResult<PathBuf> {
        let composed = compose_row(template, row, text)?;
        let path = self.output_path(template, row, row_index);
        write_canvas(&composed.canvas, &path, self.encode)?;
        tracing::debug!(path = %path.display(), "row written");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/row.rs"]
mod tests;
