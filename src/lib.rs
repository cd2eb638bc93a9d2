//! layerfill renders rows of tabular data into layered image templates.
//!
//! A template is a tree of named layers. Layers whose names carry an `@field#opcode` directive
//! are filled from the matching column of each row:
//!
//! - `t` draws the cell as text inside the layer box
//! - `i` loads the image the cell points at and fits it into the box
//! - `v` shows or hides the layer (and its subtree) based on the cell
//!
//! Every row is rendered once per template and written into a run-scoped output directory.
//! The typical flow is [`Template::from_path`], [`rows_from_path`], [`validate_rows`] and
//! finally [`run_batch`].
#![forbid(unsafe_code)]

mod assets;
mod batch;
mod data;
mod encode;
mod foundation;
mod render;
mod template;
mod text;

pub use crate::foundation::core::{Affine, CanvasSize, LayerBox, Point, Rect, Rgba8Premul};
pub use crate::foundation::error::{LayerfillError, LayerfillResult};

pub use crate::assets::color::ColorDef;
pub use crate::assets::decode::decode_image;
pub use crate::assets::fit::fit_image;
pub use crate::assets::store::PreparedImage;
pub use crate::batch::activity_log::{ActivityLog, LOG_HEADER};
pub use crate::batch::naming::{
    matching_templates, output_stem, row_base_name, run_dir, sanitize_filename, template_suffix,
};
pub use crate::batch::runner::{BatchOpts, BatchSummary, run_batch, run_batch_with};
pub use crate::batch::validate::{ValidationReport, validate_rows};
pub use crate::data::row::{Row, column_names, rows_from_path, rows_from_reader};
pub use crate::data::value::Value;
pub use crate::encode::writer::{EncodeOpts, OutputFormat, encode_canvas, write_canvas};
pub use crate::render::canvas::Canvas;
pub use crate::render::compositor::{ComposedImage, LayerCompositor, VisibilityOverlay};
pub use crate::render::row::{RenderOpts, RowRenderer, compose_row};
pub use crate::template::directive::{
    Anchor, Directive, DirectiveKind, FitMode, HAlign, ImageDirective, TextDirective, VAlign,
};
pub use crate::template::document::{
    DirectiveFields, Layer, LayerId, TEMPLATE_SUFFIX, Template, TextStyle,
    collect_directive_fields, template_stem,
};
pub use crate::text::draw::TextRenderer;
pub use crate::text::layout::{PlacedLine, TextBox, compute_origin, glyph_size, wrap_text};
pub use crate::text::metrics::{FontHandle, TextBrushRgba8, TextMeasure, TextShaper};
pub use crate::text::normalize::normalize_text;
