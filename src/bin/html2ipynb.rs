//! CLI binary for html2ipynb.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and writes the recovered notebook.

use anyhow::{Context, Result};
use clap::Parser;
use html2ipynb::{
    convert, convert_to_file, ConversionConfig, ConversionProgressCallback, ConversionStats,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Renders a file-level progress bar plus one log line per input.
///
/// Files may finish out of order when `--concurrency > 1`; start times are
/// keyed by file number.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix("Recovering");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, file_num: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&file_num)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Reading {total_files} HTML export(s)…"))
        ));
    }

    fn on_file_start(&self, file_num: usize, _total_files: usize, path: &Path) {
        self.start_times
            .lock()
            .unwrap()
            .insert(file_num, Instant::now());
        self.bar.set_message(path.display().to_string());
    }

    fn on_file_complete(&self, file_num: usize, total_files: usize, cell_count: usize) {
        let secs = self.elapsed_secs(file_num);
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}  {}",
            green("✓"),
            file_num,
            total_files,
            dim(&format!("{cell_count:>4} cells")),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, file_num: usize, total_files: usize, error: &str) {
        let secs = self.elapsed_secs(file_num);
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}  {}",
            red("✗"),
            file_num,
            total_files,
            red(&msg),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} file(s) read successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files read  ({} skipped)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Recover a notebook to stdout
  html2ipynb analysis.html > analysis.ipynb

  # Write to a file
  html2ipynb analysis.html -o analysis.ipynb

  # Merge several exports into one notebook, in the order given
  html2ipynb part1.html part2.html part3.html -o course.ipynb

  # Per-file diagnostics and a JSON summary
  html2ipynb -v --stats export.html -o export.ipynb

WHAT IS RECOVERED:
  Markdown cells   rebuilt from the rendered HTML (headings, lists, links,
                   emphasis, inline code, code blocks, blockquotes)
  Code cells       verbatim source from the highlighted block, plus the
                   execution count from the "In [n]:" prompt
  Outputs          not recovered; every code cell has "outputs": []

  Inputs that are missing or unreadable are skipped with a warning. When
  none of the inputs can be read an empty notebook is still written, but
  the command exits with a non-zero status.

ENVIRONMENT VARIABLES:
  HTML2IPYNB_OUTPUT       Default output path
  HTML2IPYNB_CONCURRENCY  Files read in parallel (default 4)
  RUST_LOG                Override the log filter (e.g. html2ipynb=debug)
"#;

/// Recover Jupyter notebooks from JupyterLab HTML exports.
#[derive(Parser, Debug)]
#[command(
    name = "html2ipynb",
    version,
    about = "Recover Jupyter notebooks from JupyterLab HTML exports",
    long_about = "Rebuild an nbformat 4 notebook (.ipynb) from one or more HTML files exported \
by JupyterLab. Cells from every input are concatenated in the order the files are given.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML export file(s), processed in the order given.
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Write the notebook to this file instead of stdout.
    #[arg(short, long, env = "HTML2IPYNB_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of input files read in parallel.
    #[arg(short, long, env = "HTML2IPYNB_CONCURRENCY", default_value_t = 4,
          value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,

    /// Enable DEBUG-level diagnostics (per-file cell counts).
    #[arg(short, long, env = "HTML2IPYNB_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "HTML2IPYNB_QUIET")]
    quiet: bool,

    /// Disable progress bar.
    #[arg(long, env = "HTML2IPYNB_NO_PROGRESS")]
    no_progress: bool,

    /// Print a JSON summary of the conversion to stderr.
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs; skipped-file
    // warnings are shown by the bar itself.
    let show_progress = !cli.quiet && !cli.verbose && !cli.no_progress && cli.inputs.len() > 1;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let stats = if let Some(ref output_path) = cli.output {
        let output = convert_to_file(&cli.inputs, output_path, &config)
            .await
            .context("Conversion failed")?;

        if !cli.quiet && !cli.verbose {
            eprintln!(
                "Notebook written to {}",
                bold(&output_path.display().to_string())
            );
        }
        output.stats
    } else {
        let output = convert(&cli.inputs, &config)
            .await
            .context("Conversion failed")?;

        let json = output
            .notebook
            .to_json()
            .context("Failed to serialise notebook")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .context("Failed to write to stdout")?;
        handle.flush().context("Failed to write to stdout")?;
        output.stats
    };

    if cli.stats {
        print_stats(&stats)?;
    } else if !cli.quiet && !show_progress {
        eprintln!(
            "{}",
            dim(&format!(
                "{} cells ({} markdown, {} code) from {}/{} files in {}ms",
                stats.total_cells,
                stats.markdown_cells,
                stats.code_cells,
                stats.processed_files,
                stats.total_files,
                stats.total_duration_ms
            ))
        );
    }

    // The (empty) notebook has already been emitted; only the exit status
    // reports that nothing could be read.
    if stats.processed_files == 0 {
        anyhow::bail!(
            "None of the {} input file(s) could be read",
            stats.total_files
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().concurrency(cli.concurrency as usize);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

fn print_stats(stats: &ConversionStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialise stats")?;
    eprintln!("{json}");
    Ok(())
}
