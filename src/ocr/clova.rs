//! HTTP engine for the NAVER CLOVA General OCR API (V2).
//!
//! Two request shapes are used, matching what the API accepts for each input:
//!
//! * **PDF**: a JSON body whose `images[0].data` is the base64 document.
//!   The service recognises every page in one call.
//! * **Image**: `multipart/form-data` with a `message` part holding the
//!   JSON envelope and a `file` part holding the raw bytes.
//!
//! Both carry the secret in the `X-OCR-SECRET` header.

use super::response::OcrResponse;
use super::{OcrEngine, OcrRequest};
use crate::error::Ocr2MdError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

const SECRET_HEADER: &str = "X-OCR-SECRET";

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 300;

/// OCR engine backed by the CLOVA General OCR HTTP API.
#[derive(Debug, Clone)]
pub struct ClovaOcrEngine {
    client: reqwest::Client,
    api_url: String,
    secret_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestMessage<'a> {
    version: &'static str,
    request_id: String,
    timestamp: u64,
    images: Vec<RequestImage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestImage<'a> {
    format: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl ClovaOcrEngine {
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, Ocr2MdError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Ocr2MdError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            secret_key: secret_key.into(),
        })
    }

    /// JSON envelope for a request. PDFs embed their data; images ship it as
    /// a separate multipart file.
    fn message<'a>(request: &'a OcrRequest) -> RequestMessage<'a> {
        let data = (request.format == "pdf").then(|| STANDARD.encode(&request.data));
        RequestMessage {
            version: "V2",
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            images: vec![RequestImage {
                format: &request.format,
                name: &request.name,
                data,
            }],
        }
    }

    fn build(&self, request: OcrRequest) -> Result<reqwest::RequestBuilder, Ocr2MdError> {
        let message = Self::message(&request);
        let builder = self
            .client
            .post(&self.api_url)
            .header(SECRET_HEADER, &self.secret_key)
            .timeout(request.timeout);

        if message.images[0].data.is_some() {
            return Ok(builder.json(&message));
        }

        let message_json = serde_json::to_string(&message)
            .map_err(|e| Ocr2MdError::Internal(format!("Failed to encode OCR message: {e}")))?;
        let file = Part::bytes(request.data).file_name(request.name);
        let form = Form::new().text("message", message_json).part("file", file);
        Ok(builder.multipart(form))
    }
}

#[async_trait]
impl OcrEngine for ClovaOcrEngine {
    async fn recognise(&self, request: OcrRequest) -> Result<OcrResponse, Ocr2MdError> {
        let timeout_secs = request.timeout.as_secs();
        info!(
            "Sending '{}' ({}, {} bytes) to OCR",
            request.name,
            request.format,
            request.data.len()
        );

        let response = self.build(request)?.send().await.map_err(|e| {
            if e.is_timeout() {
                Ocr2MdError::OcrTimeout { secs: timeout_secs }
            } else {
                Ocr2MdError::OcrRequestFailed {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Ocr2MdError::OcrRequestFailed {
                reason: e.to_string(),
            })?;

        if !status.is_success() {
            warn!("OCR API returned HTTP {}", status);
            return Err(Ocr2MdError::OcrRequestFailed {
                reason: format!("HTTP {status}: {}", truncate(&body, MAX_ERROR_BODY)),
            });
        }

        let parsed: OcrResponse =
            serde_json::from_str(&body).map_err(|e| Ocr2MdError::OcrResponseInvalid {
                detail: format!("{e}; body: {}", truncate(&body, MAX_ERROR_BODY)),
            })?;
        debug!("OCR response has {} page(s)", parsed.images.len());
        Ok(parsed)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}\u{2026}")
    }
}
