//! Error types for the ocr2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Ocr2MdError`] is **fatal**: the conversion cannot proceed at all
//!   (missing input file, unsupported format, OCR endpoint not configured).
//!   Returned as `Err(Ocr2MdError)` from the top-level `convert*` functions.
//!
//! * [`PageError`] is **non-fatal**: the OCR service answered, but reported
//!   that one page could not be recognised. Stored inside
//!   [`crate::output::PageResult`] so a failed page stays distinguishable from
//!   a page that was recognised and legitimately contains no text.
//!
//! The layout pipeline itself (line grouping, paragraph assembly, Markdown
//! emission) never fails: every fragment shape the OCR service can produce
//! has a defined rendering.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocr2md library.
#[derive(Debug, Error)]
pub enum Ocr2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input is neither a PDF nor an image format the OCR service accepts.
    #[error("Unsupported input '{name}': expected a PDF or an image (png, jpg, bmp, webp, tiff, gif)\nFirst bytes: {magic:?}")]
    UnsupportedFormat { name: String, magic: Vec<u8> },

    // ── OCR collaborator errors ───────────────────────────────────────────
    /// No OCR endpoint or secret was supplied.
    #[error("OCR engine is not configured.\n{hint}")]
    EngineNotConfigured { hint: String },

    /// The OCR request could not be sent or returned a non-success status.
    #[error("OCR request failed: {reason}")]
    OcrRequestFailed { reason: String },

    /// The OCR request exceeded its timeout.
    #[error("OCR request timed out after {secs}s")]
    OcrTimeout { secs: u64 },

    /// The OCR service answered with something that is not a valid result.
    #[error("OCR response could not be parsed: {detail}")]
    OcrResponseInvalid { detail: String },

    /// The OCR call produced no usable pages at all.
    ///
    /// Returned by [`crate::output::ConversionOutput::into_result`]; the
    /// eager entry points report this through `ConversionOutput::failure`
    /// and a fallback Markdown string instead.
    #[error("Text extraction failed: {detail}")]
    ExtractionFailed { detail: String },

    /// OCR succeeded but not a single line of text was recovered.
    #[error("No text could be extracted from '{name}'")]
    NoTextExtracted { name: String },

    /// Some pages were recognised but at least one failed.
    #[error("{failed}/{total} pages failed during recognition")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    /// The page selection does not match any page the OCR service returned.
    #[error("Page selection matches none of the document's {total} page(s)")]
    PageOutOfRange { total: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageResult`] when the OCR service
/// reports a page as unrecognised. Other pages of the document are still
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR service returned a non-`SUCCESS` status for this page.
    #[error("Page {page}: recognition failed: {detail}")]
    RecognitionFailed { page: usize, detail: String },
}
