//! CLI binary for ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ocr2md::convert::write_markdown;
use ocr2md::pipeline::input::default_output_path;
use ocr2md::{
    convert, convert_response, ConversionConfig, ConversionOutput, ConversionProgressCallback,
    DocumentKind, OcrResponse, PageSelection, ProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

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
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner while the OCR service works, then a page bar while pages render.
struct CliProgressCallback {
    bar: ProgressBar,
    failed: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(SPINNER),
        );
        bar.set_prefix("Preparing");
        bar.set_message("Reading input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            failed: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_ocr_request(&self, name: &str, bytes: usize) {
        self.bar.set_prefix("Recognising");
        self.bar
            .set_message(format!("{name} {}", dim(&format!("({} KiB)", bytes / 1024))));
    }

    fn on_conversion_start(&self, total_pages: usize) {
        self.bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(SPINNER),
        );
        self.bar.set_length(total_pages as u64);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_complete(&self, page_num: usize, total: usize, markdown_len: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{markdown_len:>5} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = self.failed.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} page(s) rendered",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} page(s) rendered  ({} not recognised)",
                yellow("⚠"),
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a scanned PDF (stdout)
  ocr2md scan.pdf

  # Convert an image to a file
  ocr2md receipt.jpg -o receipt.md

  # Save next to the input as scan_extracted.md
  ocr2md --save scan.pdf

  # Only pages 2 to 4 and 7
  ocr2md --pages 2-4,7 scan.pdf

  # Re-render a saved OCR response without calling the service
  ocr2md --from-json response.json

  # Stricter table/heading detection
  ocr2md --heading-max-chars 30 --x-gap-threshold 80 scan.pdf

  # JSON output with per-page stats
  ocr2md --json scan.pdf > scan.json

ENVIRONMENT VARIABLES:
  NAVER_OCR_API_URL       General OCR invoke URL
  NAVER_OCR_SECRET_KEY    General OCR secret (sent as X-OCR-SECRET)
  RUST_LOG                Override the log filter (e.g. ocr2md=trace)

  Variables may also be placed in a .env file in the working directory.
"#;

/// Convert scanned PDFs and images to Markdown via OCR.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Convert scanned PDFs and images to Markdown via OCR",
    long_about = "Send a PDF or image (local file or URL) to a General OCR service and rebuild \
reading order, paragraphs, headings and tables from the positions of the recognised text.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF/image path or HTTP/HTTPS URL (a JSON response with --from-json).
    input: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "OCR2MD_OUTPUT", conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Write Markdown next to the input as `<stem>_extracted.md`.
    #[arg(long, env = "OCR2MD_SAVE")]
    save: bool,

    /// Treat INPUT as a saved OCR response and render it offline.
    #[arg(long)]
    from_json: bool,

    /// Document kind of a saved response (only with --from-json).
    #[arg(long, value_enum, default_value = "pdf")]
    kind: KindArg,

    /// OCR invoke URL.
    #[arg(long, env = "NAVER_OCR_API_URL")]
    api_url: Option<String>,

    /// OCR secret key.
    #[arg(long, env = "NAVER_OCR_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Page selection for PDFs: all, 5, 3-15, 1,3,5 or 2-4,7.
    #[arg(long, env = "OCR2MD_PAGES", default_value = "all")]
    pages: String,

    /// Max vertical offset (px) for fragments to share a line.
    #[arg(long, env = "OCR2MD_Y_THRESHOLD", default_value_t = 10.0)]
    y_threshold: f64,

    /// Horizontal gap (px) that separates table cells with a tab.
    #[arg(long, env = "OCR2MD_X_GAP_THRESHOLD", default_value_t = 50.0)]
    x_gap_threshold: f64,

    /// Vertical gap, in line heights, that starts a new paragraph.
    #[arg(long, env = "OCR2MD_PARAGRAPH_GAP", default_value_t = 1.5)]
    paragraph_gap_factor: f64,

    /// Lines shorter than this many characters may become headings.
    #[arg(long, env = "OCR2MD_HEADING_MAX_CHARS", default_value_t = 50)]
    heading_max_chars: usize,

    /// Label used in PDF page headings (`## <label> N`).
    #[arg(long, env = "OCR2MD_PAGE_LABEL", default_value = "페이지")]
    page_label: String,

    /// OCR timeout for PDFs, in seconds.
    #[arg(long, env = "OCR2MD_PDF_TIMEOUT", default_value_t = 100)]
    pdf_timeout: u64,

    /// OCR timeout for images, in seconds.
    #[arg(long, env = "OCR2MD_IMAGE_TIMEOUT", default_value_t = 30)]
    image_timeout: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "OCR2MD_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output structured JSON (ConversionOutput) instead of Markdown.
    #[arg(long, env = "OCR2MD_JSON")]
    json: bool,

    /// Exit with an error on OCR failure, unrecognised pages or empty output.
    #[arg(long, env = "OCR2MD_STRICT")]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "OCR2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Pdf,
    Image,
}

impl KindArg {
    fn document_kind(self) -> DocumentKind {
        match self {
            KindArg::Pdf => DocumentKind::Pdf,
            KindArg::Image => DocumentKind::Image {
                format: "png".to_string(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs; -v brings them back.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = if cli.from_json {
        render_saved_response(&cli.input, cli.kind.document_kind(), &config).await?
    } else {
        convert(&cli.input, &config)
            .await
            .context("Conversion failed")?
    };

    if let Some(ref reason) = output.failure {
        if !cli.quiet {
            eprintln!("{} OCR failed: {}", red("✘"), reason);
        }
    }

    let output = if cli.strict {
        output.into_result().context("Strict mode")?
    } else {
        output
    };

    // ── Write result ─────────────────────────────────────────────────────
    let destination = match (&cli.output, cli.save) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(default_output_path(&cli.input)),
        (None, false) => None,
    };

    let rendered = if cli.json {
        serde_json::to_string_pretty(&output).context("Failed to serialise output")?
    } else {
        output.markdown.clone()
    };

    match destination {
        Some(ref path) => {
            write_markdown(path, &rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !cli.quiet {
                print_summary(&output, Some(path));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            if !rendered.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
            if !cli.quiet && !show_progress && !cli.json {
                print_summary(&output, None);
            }
        }
    }

    Ok(())
}

/// Load a saved OCR response and run the layout pipeline on it.
async fn render_saved_response(
    path: &str,
    kind: DocumentKind,
    config: &ConversionConfig,
) -> Result<ConversionOutput> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read OCR response from {path}"))?;
    let response: OcrResponse =
        serde_json::from_str(&json).with_context(|| format!("{path} is not an OCR response"))?;

    let name = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    convert_response(&response, &name, kind, config).context("Rendering failed")
}

fn print_summary(output: &ConversionOutput, path: Option<&Path>) {
    let stats = &output.stats;
    let mark = if output.failure.is_some() {
        red("✘")
    } else if stats.failed_pages > 0 {
        yellow("⚠")
    } else {
        green("✔")
    };
    let selected = stats.processed_pages + stats.failed_pages;
    let target = path
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();
    eprintln!(
        "{}  {}/{} pages  {} fragments ({} vertical dropped)  {}ms{}",
        mark,
        stats.processed_pages,
        selected,
        stats.total_fragments,
        stats.dropped_fragments,
        stats.total_duration_ms,
        target,
    );
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .pages(parse_pages(&cli.pages)?)
        .y_threshold(cli.y_threshold)
        .x_gap_threshold(cli.x_gap_threshold)
        .paragraph_gap_factor(cli.paragraph_gap_factor)
        .heading_max_chars(cli.heading_max_chars)
        .page_heading_label(cli.page_label.clone())
        .pdf_timeout_secs(cli.pdf_timeout)
        .image_timeout_secs(cli.image_timeout)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref url) = cli.api_url {
        builder = builder.api_url(url.clone());
    }
    if let Some(ref key) = cli.secret_key {
        builder = builder.secret_key(key.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` into a `PageSelection`.
///
/// A lone number or range maps to `Single` / `Range`; any comma list is
/// flattened into a `Set`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }

    let items: Vec<&str> = s.split(',').map(str::trim).collect();
    if let [single] = items.as_slice() {
        return match parse_span(single)? {
            (first, last) if first == last => Ok(PageSelection::Single(first)),
            (first, last) => Ok(PageSelection::Range(first, last)),
        };
    }

    let mut pages = Vec::new();
    for item in items {
        let (first, last) = parse_span(item)?;
        pages.extend(first..=last);
    }
    Ok(PageSelection::Set(pages))
}

/// `"4"` → (4, 4), `"2-7"` → (2, 7).
fn parse_span(item: &str) -> Result<(usize, usize)> {
    let page = |p: &str| -> Result<usize> {
        let n: usize = p
            .trim()
            .parse()
            .with_context(|| format!("Invalid page number: '{}'", p.trim()))?;
        if n == 0 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1");
        }
        Ok(n)
    };

    match item.split_once('-') {
        Some((first, last)) => {
            let (first, last) = (page(first)?, page(last)?);
            if first > last {
                anyhow::bail!("Invalid page range '{item}': start must be <= end");
            }
            Ok((first, last))
        }
        None => {
            let n = page(item)?;
            Ok((n, n))
        }
    }
}
