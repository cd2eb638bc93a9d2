use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

use crate::data::value::Value;
use crate::foundation::error::{LayerfillError, LayerfillResult};

/// One spreadsheet record: column name to cell value, in column order.
///
/// Column order matters because the first column names the output file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell, replacing an existing column with the same name in place.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Look up a cell; missing columns read as [`Value::Empty`].
    pub fn get(&self, column: &str) -> &Value {
        const EMPTY: &Value = &Value::Empty;
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
            .unwrap_or(EMPTY)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c == column)
    }

    /// Value of the first column, if the row has any columns.
    pub fn first(&self) -> Option<&Value> {
        self.cells.first().map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping column names to scalar cells")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Row, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut row = Row::new();
                while let Some((column, value)) = map.next_entry::<String, Value>()? {
                    row.insert(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Parse rows from a JSON array of objects.
pub fn rows_from_reader<R: std::io::Read>(r: R) -> LayerfillResult<Vec<Row>> {
    serde_json::from_reader(r)
        .map_err(|e| LayerfillError::config(format!("parse rows JSON: {e}")))
}

/// Parse rows from a JSON file on disk.
pub fn rows_from_path(path: impl AsRef<Path>) -> LayerfillResult<Vec<Row>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        LayerfillError::config(format!("open rows JSON '{}': {e}", path.display()))
    })?;
    rows_from_reader(BufReader::new(f))
}

/// Union of the column names of `rows`, in first-seen order.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        for c in row.columns() {
            if !out.iter().any(|seen| seen == c) {
                out.push(c.to_owned());
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/data/row.rs"]
mod tests;
