//! Append-only CSV record of finished batches.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{DateTime, Local};

use crate::encode::writer::ensure_parent_dir;
use crate::foundation::error::LayerfillResult;

pub const LOG_HEADER: &str = "timestamp,image_count,source";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one batch stamped with the current local time.
    pub fn append(&self, source_id: &str, image_count: usize) -> LayerfillResult<()> {
        self.append_at(Local::now(), source_id, image_count)
    }

    pub fn append_at(
        &self,
        at: DateTime<Local>,
        source_id: &str,
        image_count: usize,
    ) -> LayerfillResult<()> {
        ensure_parent_dir(&self.path)?;
        let is_new = !self.path.exists();
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open activity log '{}'", self.path.display()))?;

        let mut out = String::new();
        if is_new {
            out.push_str(LOG_HEADER);
            out.push('\n');
        }
        out.push_str(&log_line(at, source_id, image_count));
        out.push('\n');
        f.write_all(out.as_bytes())
            .with_context(|| format!("write activity log '{}'", self.path.display()))?;
        Ok(())
    }
}

fn log_line(at: DateTime<Local>, source_id: &str, image_count: usize) -> String {
    format!(
        "{},{image_count},{}",
        at.format("%Y-%m-%d %H:%M:%S"),
        csv_field(source_id)
    )
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/activity_log.rs"]
mod tests;
