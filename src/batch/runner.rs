//! Batch execution: every row rendered into every template.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::batch::activity_log::ActivityLog;
use crate::batch::naming::run_dir;
use crate::data::row::Row;
use crate::foundation::error::{LayerfillError, LayerfillResult};
use crate::render::row::{RenderOpts, RowRenderer};
use crate::template::document::Template;
use crate::text::draw::TextRenderer;
use crate::text::metrics::{FontHandle, TextShaper};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOpts {
    pub render: RenderOpts,
    /// Render tasks on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Worker count for the parallel pool; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// CSV file that receives one line per batch with at least one output.
    pub activity_log: Option<PathBuf>,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            render: RenderOpts::default(),
            parallel: true,
            threads: None,
            activity_log: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub run_dir: PathBuf,
    /// Written files in task order.
    pub outputs: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failed as f64 / self.total as f64
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RenderTask {
    template: usize,
    row: usize,
}

/// Render every row into every template with one [`TextShaper`] per worker.
///
/// A font that cannot be registered is a [`LayerfillError::Font`] raised before any task runs.
pub fn run_batch(
    rows: &[Row],
    templates: &[Template],
    font: &FontHandle,
    source_id: &str,
    opts: &BatchOpts,
) -> LayerfillResult<BatchSummary> {
    TextShaper::new(font)?;
    run_batch_with(rows, templates, source_id, opts, || TextShaper::new(font))
}

/// Like [`run_batch`], with a caller-supplied text renderer factory.
///
/// `make_text` is called once per worker (once in total when sequential). If it fails, every
/// task that worker picks up is counted as failed.
pub fn run_batch_with<T, F>(
    rows: &[Row],
    templates: &[Template],
    source_id: &str,
    opts: &BatchOpts,
    make_text: F,
) -> LayerfillResult<BatchSummary>
where
    T: TextRenderer,
    F: Fn() -> LayerfillResult<T> + Sync,
{
    let run_dir = run_dir(&opts.render.output_root, source_id, chrono::Local::now());
    if rows.is_empty() || templates.is_empty() {
        tracing::warn!(
            rows = rows.len(),
            templates = templates.len(),
            "nothing to render"
        );
        return Ok(BatchSummary {
            run_dir,
            ..BatchSummary::default()
        });
    }

    let tasks: Vec<RenderTask> = (0..templates.len())
        .flat_map(|template| (0..rows.len()).map(move |row| RenderTask { template, row }))
        .collect();
    let total = tasks.len();
    tracing::info!(
        tasks = total,
        templates = templates.len(),
        rows = rows.len(),
        run_dir = %run_dir.display(),
        "batch started"
    );

    let renderer = RowRenderer::new(&opts.render.encode, &run_dir, source_id);
    let done = AtomicUsize::new(0);
    let run_task = |text: &mut LayerfillResult<T>, task: &RenderTask| -> Option<PathBuf> {
        let template = &templates[task.template];
        let result = match text {
            Ok(text) => renderer.render_one(template, &rows[task.row], task.row, text),
            Err(e) => Err(LayerfillError::font(format!("text renderer unavailable: {e}"))),
        };
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        match result {
            Ok(path) => {
                tracing::info!("[{n}/{total}] {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::error!(
                    template = %template.name,
                    row = task.row + 1,
                    error = %e,
                    "[{n}/{total}] row failed"
                );
                None
            }
        }
    };

    let results: Vec<Option<PathBuf>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            tasks
                .par_iter()
                .map_init(&make_text, |text, task| run_task(text, task))
                .collect()
        })
    } else {
        let mut text = make_text();
        tasks.iter().map(|task| run_task(&mut text, task)).collect()
    };

    let outputs: Vec<PathBuf> = results.into_iter().flatten().collect();
    let summary = BatchSummary {
        total,
        succeeded: outputs.len(),
        failed: total - outputs.len(),
        run_dir,
        outputs,
    };
    report(&summary);

    if let Some(path) = &opts.activity_log
        && summary.succeeded > 0
    {
        let log = ActivityLog::new(path);
        log.append(source_id, summary.succeeded)?;
        tracing::debug!(path = %log.path().display(), "activity log updated");
    }
    Ok(summary)
}

fn report(summary: &BatchSummary) {
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch finished"
    );
    let rate = summary.failure_rate();
    if rate > 0.5 {
        tracing::warn!("most renders failed; check the template and row data formats");
    } else if rate > 0.2 {
        tracing::warn!("many renders failed; check that image and font files exist");
    }
}

fn build_thread_pool(threads: Option<usize>) -> LayerfillResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(LayerfillError::config("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LayerfillError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/runner.rs"]
mod tests;
