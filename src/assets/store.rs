use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{LayerfillError, LayerfillResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> LayerfillResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(LayerfillError::render(format!(
                "prepared image byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Solid rectangle of one premultiplied colour.
    pub fn solid(width: u32, height: u32, px: [u8; 4]) -> Self {
        let n = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat(n)),
        }
    }
}

/// Normalize and validate template-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> LayerfillResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LayerfillError::config("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(LayerfillError::config("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LayerfillError::config("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LayerfillError::config(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Resolve a template-relative asset path against the template's directory.
pub(crate) fn resolve_asset_path(root: &Path, rel: &str) -> LayerfillResult<PathBuf> {
    let norm = normalize_rel_path(rel)?;
    Ok(root.join(Path::new(&norm)))
}

/// Read an asset file, mapping IO failures to configuration errors.
pub(crate) fn read_asset_bytes(path: &Path) -> LayerfillResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        LayerfillError::config(format!("failed to read asset '{}': {e}", path.display()))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
