use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use doodle_raster::{IndexMode, Pipeline, PipelineConfig, SourceStatus};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doodle-raster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a directory of NDJSON sources into a per-class PNG corpus.
    Convert(ConvertArgs),
    /// Render a single record of one NDJSON file as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Directory holding `*.ndjson` sources.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output root; one sub-directory per class is created.
    #[arg(long)]
    out: PathBuf,

    /// JSON config file (`{"raster": {...}, "batch": {...}}`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum records read per source.
    #[arg(long)]
    max_per_class: Option<usize>,

    /// How output files are numbered.
    #[arg(long, value_enum)]
    index_mode: Option<IndexChoice>,

    /// Worker threads for converting sources in parallel.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input NDJSON file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Record index (0-based line number).
    #[arg(long, default_value_t = 0)]
    line: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON config file (`{"raster": {...}, "batch": {...}}`).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexChoice {
    /// Gap-free numbering over rendered images.
    Dense,
    /// Number by record position; skipped records leave gaps.
    SourceLine,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_json_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_ref())?;
    if let Some(n) = args.max_per_class {
        cfg.batch.max_per_class = Some(n);
    }
    if let Some(choice) = args.index_mode {
        cfg.batch.index_mode = match choice {
            IndexChoice::Dense => IndexMode::Dense,
            IndexChoice::SourceLine => IndexMode::SourceLine,
        };
    }
    if args.threads.is_some() {
        cfg.batch.threads = args.threads;
    }

    let pipeline = Pipeline::new(cfg.raster.clone(), &cfg.batch)?;
    let sources = doodle_raster::discover_sources(&args.in_dir, &cfg.batch.class_prefix)?;
    tracing::info!(sources = sources.len(), "found sources");

    let report = doodle_raster::convert_corpus(&pipeline, &sources, &args.out, &cfg.batch)?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(r) => {
                let note = match r.status() {
                    SourceStatus::Converted => "",
                    SourceStatus::Empty => "  (no images)",
                };
                eprintln!(
                    "{:<24} attempted {:>6}  rendered {:>6}  skipped {:>6}{note}",
                    r.class, r.attempted, r.rendered, r.skipped
                );
            }
            Err(e) => eprintln!("{:<24} FAILED: {e}", outcome.source.class),
        }
    }
    eprintln!(
        "wrote {} images, labels in {}",
        report.total_rendered(),
        report.label_index.display()
    );

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!("{failed} source(s) failed");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let pipeline = Pipeline::new(cfg.raster, &cfg.batch)?;

    let f = File::open(&args.in_path)
        .with_context(|| format!("open source '{}'", args.in_path.display()))?;
    let line = BufReader::new(f)
        .lines()
        .nth(args.line)
        .with_context(|| format!("source has no record {}", args.line))?
        .with_context(|| format!("read source '{}'", args.in_path.display()))?;

    let image = pipeline
        .render_line(&line)
        .with_context(|| format!("record {}", args.line))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    doodle_raster::save_gray_png(&args.out, &image)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
