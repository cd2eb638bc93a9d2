//! Opened template documents.
//!
//! A [`Template`] is the immutable layer tree of one template manifest with its static artwork
//! already decoded. It is shared read-only between render tasks; per-render state lives in
//! [`crate::VisibilityOverlay`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::imageops::{self, FilterType};

use crate::assets::color::ColorDef;
use crate::assets::decode::{parse_svg, prepared_from_rgba};
use crate::assets::store::{PreparedImage, read_asset_bytes, resolve_asset_path};
use crate::assets::svg_raster::rasterize_svg;
use crate::foundation::core::{CanvasSize, LayerBox};
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::template::directive::Directive;
use crate::template::model::{LayerDef, RasterDef, TemplateDef, TextStyleDef};

/// File-name suffix used by template manifests.
pub const TEMPLATE_SUFFIX: &str = ".template.json";

/// Index of a layer in pre-order traversal of its template.
pub type LayerId = usize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub fill: ColorDef,
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub bbox: LayerBox,
    /// Visibility as authored in the template.
    pub visible: bool,
    pub directive: Option<Directive>,
    pub text_style: Option<TextStyle>,
    /// Decoded static artwork, for non-group layers that have any.
    pub raster: Option<PreparedImage>,
    /// `Some` for group layers.
    pub children: Option<Vec<Layer>>,
}

impl Layer {
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> &[Layer] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Field names referenced by a template's directive layers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectiveFields {
    /// Every directive field regardless of opcode.
    pub all: BTreeSet<String>,
    /// Fields used by image (`i`) directives.
    pub image: BTreeSet<String>,
}

impl DirectiveFields {
    pub fn extend(&mut self, other: &DirectiveFields) {
        self.all.extend(other.all.iter().cloned());
        self.image.extend(other.image.iter().cloned());
    }
}

#[derive(Clone, Debug)]
pub struct Template {
    /// Manifest stem without [`TEMPLATE_SUFFIX`]; used for output naming.
    pub name: String,
    pub path: Option<PathBuf>,
    pub canvas: CanvasSize,
    pub layers: Vec<Layer>,
    layer_count: usize,
}

impl Template {
    /// Open a template manifest; raster paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> LayerfillResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| {
            LayerfillError::config(format!("open template '{}': {e}", path.display()))
        })?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        let mut template = Self::from_reader(std::io::BufReader::new(f), root, template_stem(path))?;
        template.path = Some(path.to_path_buf());
        Ok(template)
    }

    pub fn from_reader<R: std::io::Read>(
        reader: R,
        root: &Path,
        name: impl Into<String>,
    ) -> LayerfillResult<Self> {
        let def: TemplateDef = serde_json::from_reader(reader)
            .map_err(|e| LayerfillError::config(format!("parse template JSON: {e}")))?;
        Self::from_def(def, root, name.into())
    }

    fn from_def(def: TemplateDef, root: &Path, name: String) -> LayerfillResult<Self> {
        let canvas = CanvasSize::new(def.canvas.width, def.canvas.height)?;
        let mut next_id = 0;
        let layers = def
            .layers
            .into_iter()
            .map(|l| build_layer(l, root, &mut next_id))
            .collect::<LayerfillResult<Vec<_>>>()?;

        tracing::debug!(template = %name, layers = next_id, "template opened");
        Ok(Self {
            name,
            path: None,
            canvas,
            layers,
            layer_count: next_id,
        })
    }

    /// Total number of layers, groups included.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Pre-order, depth-first walk over every layer.
    pub fn iter(&self) -> LayerIter<'_> {
        LayerIter {
            stack: self.layers.iter().rev().collect(),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Layer> {
        self.iter().find(|l| l.name == name)
    }

    pub fn directive_fields(&self) -> DirectiveFields {
        let mut out = DirectiveFields::default();
        for d in self.iter().filter_map(|l| l.directive.as_ref()) {
            out.all.insert(d.field.clone());
            if d.is_image() {
                out.image.insert(d.field.clone());
            }
        }
        out
    }
}

pub struct LayerIter<'a> {
    stack: Vec<&'a Layer>,
}

impl<'a> Iterator for LayerIter<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<Self::Item> {
        let layer = self.stack.pop()?;
        self.stack.extend(layer.children().iter().rev());
        Some(layer)
    }
}

/// Union of directive fields across several templates.
pub fn collect_directive_fields<'a>(
    templates: impl IntoIterator<Item = &'a Template>,
) -> DirectiveFields {
    let mut out = DirectiveFields::default();
    for t in templates {
        out.extend(&t.directive_fields());
    }
    out
}

/// Manifest stem: `card#b.template.json` -> `card#b`.
pub fn template_stem(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stem) => stem.to_owned(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file),
    }
}

fn build_layer(def: LayerDef, root: &Path, next_id: &mut LayerId) -> LayerfillResult<Layer> {
    let id = *next_id;
    *next_id += 1;

    let bbox = LayerBox::new(def.offset[0], def.offset[1], def.size[0], def.size[1]);
    let directive = Directive::parse(&def.name);
    let text_style = def.text.as_ref().map(text_style_from_def).transpose()?;

    let raster = match (&def.children, def.raster) {
        (Some(_), Some(_)) => {
            return Err(LayerfillError::config(format!(
                "group layer '{}' cannot carry a raster",
                def.name
            )));
        }
        (_, Some(raster)) => Some(load_raster(&raster, bbox, root, &def.name)?),
        (_, None) => None,
    };

    let children = match def.children {
        Some(children) => Some(
            children
                .into_iter()
                .map(|c| build_layer(c, root, next_id))
                .collect::<LayerfillResult<Vec<_>>>()?,
        ),
        None => None,
    };

    Ok(Layer {
        id,
        name: def.name,
        bbox,
        visible: def.visible,
        directive,
        text_style,
        raster,
        children,
    })
}

fn text_style_from_def(def: &TextStyleDef) -> LayerfillResult<TextStyle> {
    if !def.font_size.is_finite() || def.font_size <= 0.0 {
        return Err(LayerfillError::config(format!(
            "text font_size must be > 0, got {}",
            def.font_size
        )));
    }
    let fill = match (def.fill, def.fill_argb) {
        (Some(c), _) => c,
        (None, Some(argb)) => ColorDef::from_argb(argb),
        (None, None) => ColorDef::default(),
    };
    Ok(TextStyle {
        font_size: def.font_size as f32,
        fill,
    })
}

fn load_raster(
    raster: &RasterDef,
    bbox: LayerBox,
    root: &Path,
    layer_name: &str,
) -> LayerfillResult<PreparedImage> {
    if bbox.is_empty() {
        return Err(LayerfillError::config(format!(
            "layer '{layer_name}' has a raster but an empty size"
        )));
    }
    match raster {
        RasterDef::Fill(color) => Ok(PreparedImage::solid(
            bbox.width,
            bbox.height,
            color.to_rgba8_premul().to_array(),
        )),
        RasterDef::Svg(rel) => {
            let path = resolve_asset_path(root, rel)?;
            let tree = parse_svg(&read_asset_bytes(&path)?)?;
            rasterize_svg(&tree, bbox.width, bbox.height)
        }
        RasterDef::Image(rel) => {
            let path = resolve_asset_path(root, rel)?;
            let bytes = read_asset_bytes(&path)?;
            let rgba = image::load_from_memory(&bytes)
                .with_context(|| format!("decode '{}'", path.display()))?
                .to_rgba8();
            if rgba.dimensions() == (bbox.width, bbox.height) {
                return Ok(prepared_from_rgba(rgba));
            }
            // Artwork is drawn at its layer size.
            let resized = imageops::resize(&rgba, bbox.width, bbox.height, FilterType::Lanczos3);
            Ok(prepared_from_rgba(resized))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/document.rs"]
mod tests;
