//! The OCR collaborator: the seam between this crate and a recognition service.
//!
//! The layout pipeline only needs a page list of positioned fragments. Where
//! they come from is hidden behind [`OcrEngine`], so tests and callers with
//! their own recognition backend can plug in without touching the pipeline.
//! [`clova::ClovaOcrEngine`] is the bundled HTTP implementation.

pub mod clova;
pub mod response;

use crate::config::{ConversionConfig, ENV_API_URL, ENV_SECRET_KEY};
use crate::error::Ocr2MdError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use clova::ClovaOcrEngine;
pub use response::{BoundingPoly, OcrField, OcrImage, OcrResponse, Vertex};

/// One document to recognise.
#[derive(Debug, Clone)]
pub struct OcrRequest {
    /// File name reported to the service.
    pub name: String,
    /// `pdf` or an image format such as `png`.
    pub format: String,
    /// Raw file contents.
    pub data: Vec<u8>,
    /// Upper bound for the whole request.
    pub timeout: Duration,
}

/// Interface to an OCR service.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognise every page of the document.
    ///
    /// Pages must come back in document order, and fragments within a page
    /// in approximate reading order (row by row, left to right).
    async fn recognise(&self, request: OcrRequest) -> Result<OcrResponse, Ocr2MdError>;
}

/// Resolve the OCR engine, from most-specific to least-specific.
///
/// 1. **Pre-built engine** (`config.engine`): used as-is.
/// 2. **Explicit endpoint** (`config.api_url` + `config.secret_key`).
/// 3. **Environment** (`NAVER_OCR_API_URL` + `NAVER_OCR_SECRET_KEY`), each
///    consulted only for the value the config leaves unset.
pub fn resolve_engine(config: &ConversionConfig) -> Result<Arc<dyn OcrEngine>, Ocr2MdError> {
    if let Some(ref engine) = config.engine {
        return Ok(Arc::clone(engine));
    }

    let api_url = setting(config.api_url.as_deref(), ENV_API_URL);
    let secret_key = setting(config.secret_key.as_deref(), ENV_SECRET_KEY);

    match (api_url, secret_key) {
        (Some(url), Some(key)) => Ok(Arc::new(ClovaOcrEngine::new(url, key)?)),
        (url, key) => {
            let mut missing = Vec::new();
            if url.is_none() {
                missing.push(ENV_API_URL);
            }
            if key.is_none() {
                missing.push(ENV_SECRET_KEY);
            }
            Err(Ocr2MdError::EngineNotConfigured {
                hint: format!(
                    "Set {} (or pass --api-url / --secret-key).",
                    missing.join(" and ")
                ),
            })
        }
    }
}

fn setting(explicit: Option<&str>, env_key: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_key).ok())
        .filter(|v| !v.trim().is_empty())
}
