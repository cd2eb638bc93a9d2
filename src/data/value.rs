use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One spreadsheet cell.
///
/// Rows only ever carry scalars; consumers pick an explicit coercion (`as_text`, `as_bool`,
/// `as_path`) instead of inspecting the variant themselves.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Blank cell, `null`, or a missing column.
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

const TRUTHY: [&str; 6] = ["true", "1", "yes", "on", "t", "y"];
const FALSY: [&str; 6] = ["false", "0", "no", "off", "f", "n"];

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Canonical visibility coercion.
    ///
    /// Strings are matched case-insensitively against the usual spellings of true/false, then
    /// parsed as a number (nonzero is true); anything else non-empty counts as true.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => {
                let lowered = s.trim().to_lowercase();
                if lowered.is_empty() {
                    return false;
                }
                if TRUTHY.contains(&lowered.as_str()) {
                    return true;
                }
                if FALSY.contains(&lowered.as_str()) {
                    return false;
                }
                match lowered.parse::<f64>() {
                    Ok(n) => n != 0.0,
                    Err(_) => true,
                }
            }
        }
    }

    /// String form used for text layers and file names.
    ///
    /// Whole numbers print without a fractional part so that `3.0` read from a sheet renders as
    /// `3`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(true) => "True".to_owned(),
            Self::Bool(false) => "False".to_owned(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Image path referenced by the cell, if any.
    pub fn as_path(&self) -> Option<PathBuf> {
        if self.is_empty() {
            return None;
        }
        let text = self.as_text();
        Some(PathBuf::from(text.trim()))
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Number(f64),
            Text(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(Self::Empty),
            Some(Repr::Bool(b)) => Ok(Self::Bool(b)),
            Some(Repr::Number(n)) => Ok(Self::Number(n)),
            Some(Repr::Text(s)) => Ok(Self::Text(s)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/value.rs"]
mod tests;
