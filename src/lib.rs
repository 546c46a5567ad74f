//! # ocr2md
//!
//! Turn OCR output into structured Markdown.
//!
//! ## Why this crate?
//!
//! An OCR service hands back a flat list of text fragments, each with a
//! bounding box on the page image, and nothing else: no fonts, no styles, no
//! layout tags. This crate rebuilds the document structure from geometry
//! alone. Fragments are grouped into rows, wrapped rows are merged back into
//! paragraphs, and short lines and pipe/tab rows become headings and tables.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / image
//!  │
//!  ├─ 1. Input       resolve local file or download from URL, sniff the kind
//!  ├─ 2. OCR         one call to the recognition service (OcrEngine)
//!  ├─ 3. Filter      drop vertical text (taller than wide)
//!  ├─ 4. Lines       cluster fragments into rows, mark paragraph gaps
//!  ├─ 5. Paragraphs  merge rows that do not end a sentence
//!  ├─ 6. Markdown    ### headings, | tables, plain paragraphs
//!  └─ 7. Assemble    ## 페이지 N sections (PDF) + per-page stats
//! ```
//!
//! Steps 3 to 7 are pure functions of the OCR response and are available
//! offline through [`convert_response`] and [`render_fragments`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr2md::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Endpoint and secret from NAVER_OCR_API_URL / NAVER_OCR_SECRET_KEY
//!     let config = ConversionConfig::default();
//!     let output = convert("scan.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     eprintln!("{} pages, {} fragments",
//!         output.stats.processed_pages,
//!         output.stats.total_fragments);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! ocr2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, LayoutConfig, PageSelection};
pub use convert::{convert, convert_bytes, convert_response, convert_sync, convert_to_file};
pub use error::{Ocr2MdError, PageError};
pub use ocr::{ClovaOcrEngine, OcrEngine, OcrRequest, OcrResponse};
pub use output::{ConversionOutput, ConversionStats, PageResult};
pub use pipeline::fragment::{BoundingBox, Fragment};
pub use pipeline::input::DocumentKind;
pub use pipeline::{render_fragments, PageContent};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
