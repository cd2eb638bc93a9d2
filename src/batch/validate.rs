//! Pre-flight checks of row data against the templates it will be rendered into.

use std::collections::BTreeSet;

use crate::data::row::{Row, column_names};
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::template::document::{Template, collect_directive_fields};

/// Column that never needs a matching directive besides the first one.
pub const FILE_NAME_COLUMN: &str = "File_name";

/// Outcome of [`validate_rows`]: errors abort the batch, warnings are only reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Log every finding through `tracing`.
    pub fn log(&self) {
        for w in &self.warnings {
            tracing::warn!("{w}");
        }
        for e in &self.errors {
            tracing::error!("{e}");
        }
    }

    /// `Ok(warnings)` when there are no errors, otherwise [`LayerfillError::Validation`].
    pub fn into_result(self) -> LayerfillResult<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(LayerfillError::Validation(self.errors))
        }
    }
}

/// Check that `rows` can be rendered into every template in `templates`.
///
/// Every directive field must be a column, and every non-blank cell of an image column must
/// name an existing file. Columns no template reads are warnings.
pub fn validate_rows(rows: &[Row], templates: &[Template]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let fields = collect_directive_fields(templates);
    let columns = column_names(rows);
    let column_set: BTreeSet<&str> = columns.iter().map(String::as_str).collect();

    for (i, col) in columns.iter().enumerate() {
        if i == 0 || col == FILE_NAME_COLUMN || fields.all.contains(col) {
            continue;
        }
        report
            .warnings
            .push(format!("column '{col}' is not used by any template"));
    }

    let missing: Vec<&str> = fields
        .all
        .iter()
        .map(String::as_str)
        .filter(|f| !column_set.contains(f))
        .collect();
    if !missing.is_empty() {
        report.errors.push(format!(
            "required columns missing from row data: {}",
            missing.join(", ")
        ));
    }

    for field in fields.image.iter().filter(|f| column_set.contains(f.as_str())) {
        for (i, row) in rows.iter().enumerate() {
            let Some(path) = row.get(field).as_path() else {
                continue;
            };
            if !path.exists() {
                report.errors.push(format!(
                    "row {}, column '{field}': image file not found: {}",
                    i + 1,
                    path.display()
                ));
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "../../tests/unit/batch/validate.rs"]
mod tests;
