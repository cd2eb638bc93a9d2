//! Output file naming and template discovery.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Local};

use crate::data::row::Row;
use crate::foundation::error::LayerfillResult;
use crate::template::document::{TEMPLATE_SUFFIX, template_stem};
use crate::text::normalize::strip_spreadsheet_escapes;

/// Name used when sanitizing leaves nothing behind.
pub const PLACEHOLDER_NAME: &str = "unnamed";
/// Longest file stem produced, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Make `name` safe to use as a file stem on common filesystems.
pub fn sanitize_filename(name: Option<&str>) -> String {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return PLACEHOLDER_NAME.to_owned();
    };

    let replaced: String = strip_spreadsheet_escapes(name)
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if u32::from(c) < 0x20 => '_',
            c => c,
        })
        .collect();

    let capped: String = replaced
        .trim_matches(|c| c == ' ' || c == '.')
        .chars()
        .take(MAX_NAME_CHARS)
        .collect();

    if capped.is_empty() {
        PLACEHOLDER_NAME.to_owned()
    } else {
        capped
    }
}

/// Discriminator appended to outputs of `template_name` when rendering rows of `source_base`.
///
/// `card#back` with source `card` gives `_back`; a template that does not share the source prefix
/// contributes its whole name.
pub fn template_suffix(template_name: &str, source_base: &str) -> String {
    let suffix = match template_name.strip_prefix(source_base) {
        Some(rest) => rest.strip_prefix('#').unwrap_or(rest),
        None => template_name,
    };
    if suffix.is_empty() || suffix.starts_with('_') {
        suffix.to_owned()
    } else {
        format!("_{suffix}")
    }
}

/// Base output name of a row: its first cell, or `image_<n>` for 1-based row number `n`.
pub fn row_base_name(row: &Row, row_index: usize) -> String {
    match row.first().filter(|v| !v.is_empty()) {
        Some(v) => v.as_text(),
        None => format!("image_{}", row_index + 1),
    }
}

/// Sanitized output file stem for one (row, template) pair.
pub fn output_stem(row: &Row, row_index: usize, template_name: &str, source_base: &str) -> String {
    let base = row_base_name(row, row_index);
    let suffix = template_suffix(template_name, source_base);
    sanitize_filename(Some(&format!("{base}{suffix}")))
}

/// Run directory `<root>/<YYYYMMDD_HHMMSS>_<source_id>` for a batch started at `started`.
pub fn run_dir(root: &Path, source_id: &str, started: DateTime<Local>) -> PathBuf {
    root.join(format!(
        "{}_{}",
        started.format("%Y%m%d_%H%M%S"),
        sanitize_filename(Some(source_id))
    ))
}

/// Template manifests in `dir` whose name before the first `#` equals `source_base`.
///
/// Sorted by file name.
pub fn matching_templates(dir: &Path, source_base: &str) -> LayerfillResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("list templates in '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("list templates in '{}'", dir.display()))?
            .path();
        let is_manifest = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TEMPLATE_SUFFIX));
        if !is_manifest || !path.is_file() {
            continue;
        }
        let stem = template_stem(&path);
        let prefix = stem.split('#').next().unwrap_or_default();
        if prefix == source_base {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/naming.rs"]
mod tests;
