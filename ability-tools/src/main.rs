mod reports;

use ability_data::constants::{DEFAULT_FIXED_DATASET, DEFAULT_RAW_CORPUS};
use ability_data::{
    AnalysisConfig, DatasetSource, DiversityReport, RepairOutcome, analyze, load_dataset,
    read_corpus, repair, write_records,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stderr, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Recover valid abilities from the raw corpus and write the fixed dataset
    Repair,
    /// Measure the diversity of the fixed dataset (or the raw corpus if missing)
    Analyze,
    /// Repair, then analyze the freshly written dataset
    Both,
}

impl Mode {
    const fn repairs(self) -> bool {
        matches!(self, Self::Repair | Self::Both)
    }

    const fn analyzes(self) -> bool {
        matches!(self, Self::Analyze | Self::Both)
    }
}

#[derive(Debug, Parser)]
#[command(name = "ability-tools", version)]
#[command(about = "Repair and diversity analysis for ability training data")]
struct Args {
    /// What to run: repair, analyze, or both
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Directory holding the corpus files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Raw corpus file (relative to --data-dir unless absolute)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Repaired dataset file (relative to --data-dir unless absolute)
    #[arg(long)]
    fixed: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding analysis thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (lists every rejected object, debug logging)
    #[arg(short, long)]
    verbose: bool,
}

/// Resolved corpus locations.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataPaths {
    raw: PathBuf,
    fixed: PathBuf,
}

impl DataPaths {
    fn from_args(args: &Args) -> Self {
        Self {
            raw: resolve(&args.data_dir, args.input.as_deref(), DEFAULT_RAW_CORPUS),
            fixed: resolve(&args.data_dir, args.fixed.as_deref(), DEFAULT_FIXED_DATASET),
        }
    }
}

// `join` keeps absolute overrides as-is.
fn resolve(data_dir: &Path, given: Option<&Path>, default: &str) -> PathBuf {
    data_dir.join(given.unwrap_or_else(|| Path::new(default)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let mut status = status_writer(&args);
    announce_banner(&mut status)?;

    let start_time = Instant::now();
    let config = load_config(args.config.as_deref())?;
    let paths = DataPaths::from_args(&args);
    log::debug!("resolved paths: {paths:?}");

    if args.mode.repairs() {
        run_repair(&paths, args.verbose, &mut status)?;
    }
    if args.mode.analyzes() {
        let (report, source) = run_analysis(&paths, &config, &mut status)?;
        write_reports(&args, &report, &source)?;
    }

    writeln!(status, "🏁 Total time: {:?}", start_time.elapsed())?;
    status.flush()?;
    Ok(())
}

/// Progress lines move to stderr when a JSON or markdown report goes to stdout.
fn status_on_stderr(args: &Args) -> bool {
    args.output.is_none() && args.report != "console"
}

fn status_writer(args: &Args) -> Box<dyn Write> {
    if status_on_stderr(args) {
        Box::new(stderr())
    } else {
        Box::new(stdout())
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", "🧪 Ability Training Data Tools".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    AnalysisConfig::from_json(&json)
        .with_context(|| format!("invalid analysis config {}", path.display()))
}

fn run_repair(paths: &DataPaths, verbose: bool, out: &mut dyn Write) -> Result<RepairOutcome> {
    writeln!(out, "📖 Reading {}", paths.raw.display())?;
    let text = read_corpus(&paths.raw).context("cannot repair the training data")?;
    let outcome = repair(&text, &paths.raw)?;
    write_records(&paths.fixed, &outcome.recovery.objects)?;

    write_repair_summary(out, &outcome, &paths.fixed, verbose)?;
    out.flush()?;
    Ok(outcome)
}

fn write_repair_summary(
    out: &mut dyn Write,
    outcome: &RepairOutcome,
    fixed: &Path,
    verbose: bool,
) -> Result<()> {
    let summary = &outcome.summary;
    writeln!(out)?;
    writeln!(out, "{}", "🔧 Repair Summary".bright_yellow().bold())?;
    writeln!(out, "{}", "=================".yellow())?;
    writeln!(out, "Extracted abilities: {}", summary.extracted)?;
    writeln!(out, "Valid: {}", summary.valid.to_string().green())?;
    writeln!(out, "Invalid: {}", summary.invalid.to_string().red())?;
    writeln!(out, "Unparseable objects: {}", summary.parse_failures)?;
    writeln!(out, "💾 Saved to {}", fixed.display())?;
    writeln!(
        out,
        "Unique element combinations: {}",
        summary.unique_element_pairs
    )?;
    writeln!(out, "Average per combination: {:.1}", summary.avg_per_pair)?;

    let rejections = &outcome.recovery.rejections;
    if rejections.is_empty() {
        return Ok(());
    }
    if verbose {
        writeln!(out, "\nRejected objects:")?;
        for rejection in rejections {
            writeln!(
                out,
                "  • {} (byte {}): {}",
                rejection.label(),
                rejection.offset,
                rejection.error.to_string().red()
            )?;
        }
    } else {
        writeln!(
            out,
            "{}",
            format!(
                "{} objects rejected (run with --verbose to list them)",
                rejections.len()
            )
            .dimmed()
        )?;
    }
    Ok(())
}

fn run_analysis(
    paths: &DataPaths,
    config: &AnalysisConfig,
    out: &mut dyn Write,
) -> Result<(DiversityReport, DatasetSource)> {
    let dataset = load_dataset(&paths.fixed, &paths.raw).context("no ability data to analyze")?;
    match &dataset.source {
        DatasetSource::Fixed(path) => writeln!(out, "📂 Loaded {}", path.display())?,
        DatasetSource::RawFallback(path) => {
            writeln!(
                out,
                "{}",
                format!(
                    "⚠️  Fixed dataset not found, extracted from {} (run --mode repair first for best results)",
                    path.display()
                )
                .yellow()
            )?;
        }
    }
    writeln!(out, "Loaded {} abilities", dataset.records.len())?;
    let report = analyze(&dataset.records, config);
    Ok((report, dataset.source))
}

fn write_reports(args: &Args, report: &DiversityReport, source: &DatasetSource) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, report, source)?,
        _ => reports::generate_console_report(&mut output_target, report, source)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
