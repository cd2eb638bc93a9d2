use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use layerfill::{
    BatchOpts, EncodeOpts, FontHandle, OutputFormat, RenderOpts, Template, matching_templates,
    rows_from_path, validate_rows,
};

#[derive(Parser, Debug)]
#[command(name = "layerfill", version, about = "Render data rows into layered image templates")]
struct Cli {
    /// Row data: a JSON array of objects, one per output image.
    #[arg(long)]
    rows: PathBuf,

    /// Template manifest (`*.template.json`). Repeatable; when omitted, manifests next to the
    /// rows file whose name starts with the rows file stem are used.
    #[arg(long = "template")]
    templates: Vec<PathBuf>,

    /// Directory searched for templates when none are given explicitly.
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// TrueType/OpenType font used for every text layer.
    #[arg(long)]
    font: PathBuf,

    /// Output format: png or jpg.
    #[arg(long, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Root directory for run output folders.
    #[arg(long, default_value = "export")]
    out: PathBuf,

    /// Worker thread count (default: one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Render on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Activity log CSV appended after each batch.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let source_id = file_stem(&cli.rows)?;
    let rows = rows_from_path(&cli.rows)?;
    let templates = load_templates(&cli, &source_id)?;

    let report = validate_rows(&rows, &templates);
    report.log();
    report.into_result()?;

    let font = FontHandle::load(&cli.font)?;

    let opts = BatchOpts {
        render: RenderOpts {
            encode: EncodeOpts {
                format: cli.format,
                ..EncodeOpts::default()
            },
            output_root: cli.out.clone(),
        },
        parallel: !cli.sequential,
        threads: cli.threads,
        activity_log: cli.log.clone(),
    };
    let summary = layerfill::run_batch(&rows, &templates, &font, &source_id, &opts)?;

    eprintln!(
        "{} of {} images written to {} ({} failed)",
        summary.succeeded,
        summary.total,
        summary.run_dir.display(),
        summary.failed
    );
    if summary.total > 0 && summary.succeeded == 0 {
        anyhow::bail!("no images were rendered");
    }
    Ok(())
}

fn file_stem(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))
}

fn load_templates(cli: &Cli, source_id: &str) -> anyhow::Result<Vec<Template>> {
    let paths = if cli.templates.is_empty() {
        let dir = match &cli.template_dir {
            Some(dir) => dir.clone(),
            None => cli
                .rows
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
        };
        let found = matching_templates(&dir, source_id)?;
        if found.is_empty() {
            anyhow::bail!(
                "no '{source_id}*.template.json' templates found in '{}'",
                dir.display()
            );
        }
        found
    } else {
        cli.templates.clone()
    };

    paths
        .iter()
        .map(|p| Template::from_path(p).with_context(|| format!("open template '{}'", p.display())))
        .collect()
}
