use std::path::Path;

use super::*;
use crate::encode::writer::OutputFormat;
use crate::render::canvas::Canvas;
use crate::text::layout::PlacedLine;
use crate::text::metrics::{TextBrushRgba8, TextMeasure};

struct NoText;

impl TextMeasure for NoText {
    fn measure_width(&mut self, text: &str, font_size: f32) -> LayerfillResult<f32> {
        Ok(text.chars().count() as f32 * 0.5 * font_size)
    }
}

impl TextRenderer for NoText {
    fn draw_lines(
        &mut self,
        _canvas: &mut Canvas,
        _lines: &[PlacedLine],
        _font_size: f32,
        _brush: TextBrushRgba8,
        _rotation_deg: Option<f64>,
    ) -> LayerfillResult<()> {
        Ok(())
    }
}

const CARD: &str = r##"{
  "canvas": {"width": 8, "height": 6},
  "layers": [
    {"name": "bg", "size": [8, 6], "raster": {"fill": "#336699"}},
    {"name": "@title#t_c", "size": [8, 3], "text": {"font_size": 2}}
  ]
}"##;

fn templates(names: &[&str]) -> Vec<Template> {
    names
        .iter()
        .map(|n| Template::from_reader(CARD.as_bytes(), Path::new("."), *n).unwrap())
        .collect()
}

fn rows() -> Vec<Row> {
    vec![
        Row::new().with("id", "a").with("title", "one"),
        Row::new().with("id", "b").with("title", "two"),
        Row::new().with("id", "c").with("title", "three"),
    ]
}

fn opts(root: &Path, parallel: bool) -> BatchOpts {
    BatchOpts {
        render: RenderOpts {
            output_root: root.to_path_buf(),
            ..RenderOpts::default()
        },
        parallel,
        threads: Some(2),
        activity_log: Some(root.join("activity.csv")),
    }
}

#[test]
fn default_opts_are_parallel_png() {
    let o = BatchOpts::default();
    assert!(o.parallel);
    assert_eq!(o.threads, None);
    assert_eq!(o.render.encode.format, OutputFormat::Png);
    assert!(o.activity_log.is_none());
}

#[test]
fn sequential_batch_is_template_major() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_batch_with(
        &rows(),
        &templates(&["cards#a", "cards#b"]),
        "cards",
        &opts(dir.path(), false),
        || Ok(NoText),
    )
    .unwrap();

    assert_eq!((summary.total, summary.succeeded, summary.failed), (6, 6, 0));
    assert!(summary.run_dir.starts_with(dir.path()));
    let names: Vec<String> = summary
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        ["a_a.png", "b_a.png", "c_a.png", "a_b.png", "b_b.png", "c_b.png"]
    );
    for p in &summary.outputs {
        assert!(p.is_file(), "{}", p.display());
    }

    let log = std::fs::read_to_string(dir.path().join("activity.csv")).unwrap();
    assert!(log.lines().nth(1).unwrap().ends_with(",6,cards"), "{log}");
}

#[test]
fn parallel_batch_matches_sequential_outputs() {
    let seq_dir = tempfile::tempdir().unwrap();
    let par_dir = tempfile::tempdir().unwrap();
    let t = templates(&["cards"]);

    let seq = run_batch_with(&rows(), &t, "cards", &opts(seq_dir.path(), false), || Ok(NoText))
        .unwrap();
    let par = run_batch_with(&rows(), &t, "cards", &opts(par_dir.path(), true), || Ok(NoText))
        .unwrap();

    assert_eq!(seq.succeeded, par.succeeded);
    for (a, b) in seq.outputs.iter().zip(&par.outputs) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }
}

#[test]
fn failing_rows_are_counted_and_the_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = rows();
    data[1] = Row::new().with("id", "b");

    let summary = run_batch_with(
        &data,
        &templates(&["cards"]),
        "cards",
        &opts(dir.path(), true),
        || Ok(NoText),
    )
    .unwrap();
    assert_eq!((summary.total, summary.succeeded, summary.failed), (3, 2, 1));
    assert!((summary.failure_rate() - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn renderer_factory_failure_fails_every_task_and_skips_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_batch_with::<NoText, _>(
        &rows(),
        &templates(&["cards"]),
        "cards",
        &opts(dir.path(), false),
        || Err(LayerfillError::font("no font")),
    )
    .unwrap();
    assert_eq!((summary.succeeded, summary.failed), (0, 3));
    assert!(!dir.path().join("activity.csv").exists());
}

#[test]
fn empty_input_is_an_empty_summary() {
    let dir = tempfile::tempdir().unwrap();
    let summary = run_batch_with(&[], &templates(&["cards"]), "cards", &opts(dir.path(), true), || {
        Ok(NoText)
    })
    .unwrap();
    assert_eq!(summary.total, 0);
    assert!(summary.outputs.is_empty());

    let summary =
        run_batch_with(&rows(), &[], "cards", &opts(dir.path(), true), || Ok(NoText)).unwrap();
    assert_eq!(summary.total, 0);
}

#[test]
fn zero_threads_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut o = opts(dir.path(), true);
    o.threads = Some(0);
    let err = run_batch_with(&rows(), &templates(&["cards"]), "cards", &o, || Ok(NoText))
        .unwrap_err();
    assert!(matches!(err, LayerfillError::Config(_)));
}

#[test]
fn unusable_font_aborts_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let font_path = dir.path().join("not-a-font.ttf");
    std::fs::write(&font_path, b"plain text, no font tables").unwrap();
    let font = FontHandle::load(&font_path).unwrap();

    let out_root = dir.path().join("export");
    let o = opts(&out_root, false);
    let err = run_batch(&rows(), &templates(&["cards"]), &font, "cards", &o).unwrap_err();
    assert!(matches!(err, LayerfillError::Font(_)), "{err}");
    assert!(!out_root.exists());
}
