use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::foundation::core::CanvasSize;

/// On-disk template manifest: the decoded layer tree of a layered document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TemplateDef {
    pub(crate) canvas: CanvasSize,
    #[serde(default)]
    pub(crate) layers: Vec<LayerDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LayerDef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) offset: [i32; 2],
    #[serde(default)]
    pub(crate) size: [u32; 2],
    #[serde(default = "default_visible")]
    pub(crate) visible: bool,

    /// Present (even when empty) for group layers.
    #[serde(default)]
    pub(crate) children: Option<Vec<LayerDef>>,
    #[serde(default)]
    pub(crate) text: Option<TextStyleDef>,
    #[serde(default)]
    pub(crate) raster: Option<RasterDef>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TextStyleDef {
    pub(crate) font_size: f64,
    #[serde(default)]
    pub(crate) fill: Option<ColorDef>,
    /// Photoshop-style `[a, r, g, b]` floats in `0.0..=1.0`.
    #[serde(default)]
    pub(crate) fill_argb: Option<[f64; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RasterDef {
    Image(String),
    Svg(String),
    Fill(ColorDef),
}
