//! Configuration types for OCR-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The geometric thresholds used by the
//! layout pipeline live in their own [`LayoutConfig`] so they can be tuned
//! (or exposed as CLI options) without touching the algorithm.

use crate::error::Ocr2MdError;
use crate::ocr::OcrEngine;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the OCR endpoint URL.
pub const ENV_API_URL: &str = "NAVER_OCR_API_URL";

/// Environment variable holding the OCR secret key.
pub const ENV_SECRET_KEY: &str = "NAVER_OCR_SECRET_KEY";

/// Geometric thresholds for rebuilding lines, paragraphs and headings.
///
/// All distances are in page-image pixels. They are fixed values tuned on
/// scanned A4 pages; no attempt is made to calibrate them from DPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical displacement (px) above which a fragment starts a new line. Default: 10.
    pub y_threshold: f64,

    /// Horizontal gap (px) on the same row above which a fragment starts a
    /// new line. Default: 50.
    pub x_gap_threshold: f64,

    /// Multiple of the page's line height above which a vertical jump also
    /// starts a new paragraph. Default: 1.5.
    pub paragraph_gap_factor: f64,

    /// Entries shorter than this many characters may be rendered as headings. Default: 50.
    pub heading_max_chars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            y_threshold: 10.0,
            x_gap_threshold: 50.0,
            paragraph_gap_factor: 1.5,
            heading_max_chars: 50,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), Ocr2MdError> {
        for (name, value) in [
            ("y_threshold", self.y_threshold),
            ("x_gap_threshold", self.x_gap_threshold),
            ("paragraph_gap_factor", self.paragraph_gap_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Ocr2MdError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for an OCR-to-Markdown conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use ocr2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .api_url("https://example.apigw.ntruss.com/custom/v1/123/abc/general")
///     .secret_key("secret")
///     .y_threshold(12.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Geometric thresholds for the layout pipeline.
    pub layout: LayoutConfig,

    /// OCR endpoint URL. Falls back to `NAVER_OCR_API_URL` when None.
    pub api_url: Option<String>,

    /// OCR secret key sent as `X-OCR-SECRET`. Falls back to
    /// `NAVER_OCR_SECRET_KEY` when None.
    pub secret_key: Option<String>,

    /// Pre-constructed OCR engine. Takes precedence over `api_url`/`secret_key`.
    pub engine: Option<Arc<dyn OcrEngine>>,

    /// Timeout for a whole-document PDF request in seconds. Default: 100.
    ///
    /// The service recognises every page of a PDF in one call, so this is
    /// much longer than the single-image timeout.
    pub pdf_timeout_secs: u64,

    /// Timeout for a single-image request in seconds. Default: 30.
    pub image_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Page selection (PDF only). Default: All pages.
    pub pages: PageSelection,

    /// Word used in the per-page heading `## {label} {n}`. Default: "페이지".
    pub page_heading_label: String,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            api_url: None,
            secret_key: None,
            engine: None,
            pdf_timeout_secs: 100,
            image_timeout_secs: 30,
            download_timeout_secs: 120,
            pages: PageSelection::default(),
            page_heading_label: "페이지".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("layout", &self.layout)
            .field("api_url", &self.api_url)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("engine", &self.engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("pdf_timeout_secs", &self.pdf_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("pages", &self.pages)
            .field("page_heading_label", &self.page_heading_label)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn y_threshold(mut self, px: f64) -> Self {
        self.config.layout.y_threshold = px;
        self
    }

    pub fn x_gap_threshold(mut self, px: f64) -> Self {
        self.config.layout.x_gap_threshold = px;
        self
    }

    pub fn paragraph_gap_factor(mut self, factor: f64) -> Self {
        self.config.layout.paragraph_gap_factor = factor;
        self
    }

    pub fn heading_max_chars(mut self, n: usize) -> Self {
        self.config.layout.heading_max_chars = n;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = Some(url.into());
        self
    }

    pub fn secret_key(mut self, key: impl Into<String>) -> Self {
        self.config.secret_key = Some(key.into());
        self
    }

    pub fn engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.engine = Some(engine);
        self
    }

    pub fn pdf_timeout_secs(mut self, secs: u64) -> Self {
        self.config.pdf_timeout_secs = secs;
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_heading_label(mut self, label: impl Into<String>) -> Self {
        self.config.page_heading_label = label.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Ocr2MdError> {
        let c = &self.config;
        c.layout.validate()?;
        if c.pdf_timeout_secs == 0 || c.image_timeout_secs == 0 {
            return Err(Ocr2MdError::InvalidConfig(
                "OCR timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(Ocr2MdError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of a PDF to keep in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Keep all pages (default).
    #[default]
    All,
    /// Keep a single page (1-indexed).
    Single(usize),
    /// Keep a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Keep specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
