//! Input resolution: read a local file or download a URL, then sniff its kind.
//!
//! The OCR service needs to be told whether it receives a PDF or an image
//! (and which image format), so the kind is decided from magic bytes rather
//! than from the file extension. A renamed `.jpg` that is really a PNG is
//! sent as PNG; a text file is rejected before any network call is made.

use crate::error::Ocr2MdError;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What kind of document is being converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentKind {
    /// Multi-page PDF; each page gets a numbered heading.
    Pdf,
    /// A single image in the given format (`png`, `jpg`, ...).
    Image { format: String },
}

impl DocumentKind {
    /// Format string sent to the OCR service.
    pub fn format(&self) -> &str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Image { format } => format,
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, DocumentKind::Pdf)
    }
}

/// A document loaded into memory and ready to send.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    /// File name reported to the OCR service.
    pub name: String,
    /// Raw file contents.
    pub data: Vec<u8>,
    pub kind: DocumentKind,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Decide the document kind from its leading bytes.
pub fn sniff_kind(data: &[u8]) -> Option<DocumentKind> {
    if data.starts_with(b"%PDF") {
        return Some(DocumentKind::Pdf);
    }
    let format = match image::guess_format(data).ok()? {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Bmp => "bmp",
        ImageFormat::WebP => "webp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Gif => "gif",
        _ => return None,
    };
    Some(DocumentKind::Image {
        format: format.to_string(),
    })
}

/// Wrap in-memory data, rejecting anything that is not a PDF or a known image.
pub fn classify(name: impl Into<String>, data: Vec<u8>) -> Result<ResolvedInput, Ocr2MdError> {
    let name = name.into();
    let Some(kind) = sniff_kind(&data) else {
        let magic = data.iter().take(4).copied().collect();
        return Err(Ocr2MdError::UnsupportedFormat { name, magic });
    };
    debug!("Classified '{}' as {}", name, kind.format());
    Ok(ResolvedInput { name, data, kind })
}

/// Resolve the input string to an in-memory document.
///
/// If the input is a URL, download it. Otherwise read the local file.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Ocr2MdError> {
    if input.trim().is_empty() {
        return Err(Ocr2MdError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(Path::new(input)).await
    }
}

async fn read_local(path: &Path) -> Result<ResolvedInput, Ocr2MdError> {
    let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Ocr2MdError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Ocr2MdError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    let name = file_name(path);
    debug!("Read {} bytes from {}", data.len(), path.display());
    classify(name, data)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Ocr2MdError> {
    info!("Downloading input from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Ocr2MdError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Ocr2MdError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Ocr2MdError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Ocr2MdError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Ocr2MdError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    classify(filename_from_url(url), bytes.to_vec())
}

/// Last path segment of the URL when it looks like a file name.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded".to_string()
}

/// Default output path next to the input: `scan.pdf` → `scan_extracted.md`.
pub fn default_output_path(input: &str) -> PathBuf {
    let stem = if is_url(input) {
        filename_from_url(input)
    } else {
        file_name(Path::new(input))
    };
    let stem = Path::new(&stem)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extracted_text".to_string());
    if is_url(input) {
        PathBuf::from(format!("{stem}_extracted.md"))
    } else {
        Path::new(input).with_file_name(format!("{stem}_extracted.md"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.png"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn sniffs_pdf() {
        assert_eq!(sniff_kind(b"%PDF-1.7\n..."), Some(DocumentKind::Pdf));
    }

    #[test]
    fn sniffs_images() {
        assert_eq!(
            sniff_kind(PNG_MAGIC).map(|k| k.format().to_string()),
            Some("png".to_string())
        );
        assert_eq!(
            sniff_kind(JPEG_MAGIC).map(|k| k.format().to_string()),
            Some("jpg".to_string())
        );
    }

    #[test]
    fn rejects_text() {
        let err = classify("notes.txt", b"hello world".to_vec()).unwrap_err();
        match err {
            Ocr2MdError::UnsupportedFormat { name, magic } => {
                assert_eq!(name, "notes.txt");
                assert_eq!(magic, b"hell".to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn kind_serialises_with_tag() {
        let json = serde_json::to_string(&DocumentKind::Image {
            format: "png".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"image","format":"png"}"#);
    }

    #[test]
    fn filename_from_url_uses_last_segment() {
        assert_eq!(filename_from_url("https://host/a/scan.pdf"), "scan.pdf");
        assert_eq!(filename_from_url("https://host/a/"), "downloaded");
    }

    #[test]
    fn default_output_path_sits_next_to_input() {
        assert_eq!(
            default_output_path("/tmp/docs/scan.pdf"),
            PathBuf::from("/tmp/docs/scan_extracted.md")
        );
        assert_eq!(
            default_output_path("https://host/receipt.png"),
            PathBuf::from("receipt_extracted.md")
        );
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = resolve_input("/definitely/not/here.pdf", 5).await.unwrap_err();
        assert!(matches!(err, Ocr2MdError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn reads_local_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4 minimal").unwrap();

        let resolved = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.name, "scan.pdf");
        assert_eq!(resolved.kind, DocumentKind::Pdf);
    }
}
