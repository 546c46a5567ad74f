//! Conversion entry points.
//!
//! Every path ends in [`convert_response`]: the network-facing functions
//! resolve the input, make one OCR call, and hand the response over. Callers
//! that already hold a response (a saved JSON file, another OCR client) can
//! call [`convert_response`] directly and never touch the network.
//!
//! ## Failure handling
//!
//! A failed OCR call is not an `Err`. The document renders as the fixed
//! fallback message and [`ConversionOutput::failure`] carries the reason, so
//! a caller showing the Markdown always has something to show. Use
//! [`ConversionOutput::into_result`] to turn that into an error instead.

use crate::config::ConversionConfig;
use crate::error::Ocr2MdError;
use crate::ocr::{resolve_engine, OcrRequest, OcrResponse};
use crate::output::{ConversionOutput, ConversionStats, PageResult};
use crate::pipeline::assemble::{self, EXTRACTION_FAILED};
use crate::pipeline::input::{self, DocumentKind, ResolvedInput};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Convert a PDF or image file (or URL) to Markdown.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`: Local file path or HTTP/HTTPS URL
/// * `config`: Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` whenever the input could be read, even if the OCR
/// call failed (check `output.failure`) or some pages were not recognised
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(Ocr2MdError)` only for fatal errors:
/// - File not found / permission denied / download failed
/// - Neither a PDF nor a supported image
/// - No OCR endpoint configured
/// - Page selection matches no page
///
/// # Example
/// ```rust,no_run
/// use ocr2md::{convert, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConversionConfig::builder()
///     .api_url("https://example.apigw.ntruss.com/custom/v1/1/abc/general")
///     .secret_key("secret")
///     .build()?;
/// let output = convert("scan.pdf", &config).await?;
/// println!("{}", output.markdown);
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Ocr2MdError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    convert_resolved(resolved, config, total_start).await
}

/// Convert an in-memory PDF or image to Markdown.
///
/// `name` is the file name reported to the OCR service; the document kind
/// is sniffed from the bytes, not from the name.
pub async fn convert_bytes(
    bytes: impl Into<Vec<u8>>,
    name: impl Into<String>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Ocr2MdError> {
    let total_start = Instant::now();
    let resolved = input::classify(name, bytes.into())?;
    convert_resolved(resolved, config, total_start).await
}

/// Convert a PDF or image and write the Markdown directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Ocr2MdError> {
    let output = convert(input_str, config).await?;
    write_markdown(output_path.as_ref(), &output.markdown).await?;
    Ok(output)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Ocr2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Ocr2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, config))
}

/// Write Markdown to `path`, creating parent directories.
///
/// Atomic write: write to a sibling temp file, then rename over the target.
pub async fn write_markdown(path: &Path, markdown: &str) -> Result<(), Ocr2MdError> {
    let write_err = |e| Ocr2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    Ok(())
}

/// Run the layout pipeline over an OCR response that is already at hand.
///
/// PDFs honour `config.pages`; pages keep their original number. Images use
/// the first page only.
///
/// # Errors
/// [`Ocr2MdError::PageOutOfRange`] when the selection matches no page of a
/// non-empty response. A response without pages is not an error: it yields
/// the fallback document.
pub fn convert_response(
    response: &OcrResponse,
    name: &str,
    kind: DocumentKind,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Ocr2MdError> {
    let start = Instant::now();
    let total_pages = response.images.len();

    if total_pages == 0 {
        warn!("OCR response for '{}' contained no pages", name);
        return Ok(fallback_output(
            name,
            kind,
            "OCR response contained no pages".into(),
        ));
    }

    let page_indices = if kind.is_pdf() {
        config.pages.to_indices(total_pages)
    } else {
        vec![0]
    };
    if page_indices.is_empty() {
        return Err(Ocr2MdError::PageOutOfRange { total: total_pages });
    }
    debug!(
        "Rendering {} of {} page(s) for '{}'",
        page_indices.len(),
        total_pages,
        name
    );

    let selected = page_indices.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(selected);
    }

    let mut pages: Vec<PageResult> = Vec::with_capacity(selected);
    for (idx, image) in page_indices
        .iter()
        .filter_map(|&idx| response.images.get(idx).map(|image| (idx, image)))
    {
        let page_num = idx + 1;
        let page = assemble::render_page(page_num, image, &kind, &config.layout);

        match &page.error {
            None => {
                debug!(
                    "Page {}: {} fragments → {} bytes of Markdown",
                    page_num,
                    page.fragments,
                    page.markdown.len()
                );
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, selected, page.markdown.len());
                }
            }
            Some(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, selected, &e.to_string());
                }
            }
        }
        pages.push(page);
    }

    let markdown = assemble::assemble_document(&pages, &kind, &config.page_heading_label);

    let processed = pages.iter().filter(|p| p.error.is_none()).count();
    let stats = ConversionStats {
        total_pages,
        processed_pages: processed,
        failed_pages: pages.len() - processed,
        empty_pages: pages.iter().filter(|p| p.is_empty()).count(),
        skipped_pages: total_pages.saturating_sub(pages.len()),
        total_fragments: pages.iter().map(|p| p.fragments).sum(),
        dropped_fragments: pages.iter().map(|p| p.dropped_vertical).sum(),
        ocr_duration_ms: 0,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} pages rendered, {} failed",
        processed, selected, stats.failed_pages
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(selected, processed);
    }

    Ok(ConversionOutput {
        markdown,
        name: name.to_string(),
        kind,
        pages,
        stats,
        failure: None,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Send one resolved document to the OCR engine and render the answer.
async fn convert_resolved(
    resolved: ResolvedInput,
    config: &ConversionConfig,
    total_start: Instant,
) -> Result<ConversionOutput, Ocr2MdError> {
    let engine = resolve_engine(config)?;
    let ResolvedInput { name, data, kind } = resolved;

    let timeout = Duration::from_secs(if kind.is_pdf() {
        config.pdf_timeout_secs
    } else {
        config.image_timeout_secs
    });

    if let Some(ref cb) = config.progress_callback {
        cb.on_ocr_request(&name, data.len());
    }

    let request = OcrRequest {
        name: name.clone(),
        format: kind.format().to_string(),
        data,
        timeout,
    };

    let ocr_start = Instant::now();
    let result = match tokio::time::timeout(timeout, engine.recognise(request)).await {
        Ok(result) => result,
        Err(_) => Err(Ocr2MdError::OcrTimeout {
            secs: timeout.as_secs(),
        }),
    };
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    let mut output = match result {
        Ok(response) => convert_response(&response, &name, kind, config)?,
        Err(e) => {
            warn!("OCR failed for '{}': {}", name, e);
            fallback_output(&name, kind, e.to_string())
        }
    };

    output.stats.ocr_duration_ms = ocr_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

fn fallback_output(name: &str, kind: DocumentKind, reason: String) -> ConversionOutput {
    ConversionOutput {
        markdown: EXTRACTION_FAILED.to_string(),
        name: name.to_string(),
        kind,
        pages: Vec::new(),
        stats: ConversionStats::default(),
        failure: Some(reason),
    }
}
