//! Result types returned by the conversion entry points.

use crate::error::{Ocr2MdError, PageError};
use crate::pipeline::input::DocumentKind;
use serde::{Deserialize, Serialize};

/// The assembled result of converting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Final Markdown: page sections for PDFs, the single page for images,
    /// or the fallback message when the OCR call produced nothing.
    pub markdown: String,

    /// File name sent to the OCR service.
    pub name: String,

    /// What kind of document was converted.
    pub kind: DocumentKind,

    /// Per-page results, in page order.
    pub pages: Vec<PageResult>,

    /// Counters and timings.
    pub stats: ConversionStats,

    /// Set when the OCR call itself failed or returned no pages. `markdown`
    /// then holds the fallback message and `pages` is empty.
    pub failure: Option<String>,
}

impl ConversionOutput {
    /// Pages the OCR service reported as unrecognised.
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageResult> {
        self.pages.iter().filter(|p| p.error.is_some())
    }

    /// Treat any failure as an error.
    ///
    /// * whole-document failure → [`Ocr2MdError::ExtractionFailed`]
    /// * one or more failed pages → [`Ocr2MdError::PartialFailure`]
    /// * every page recognised but empty → [`Ocr2MdError::NoTextExtracted`]
    pub fn into_result(self) -> Result<Self, Ocr2MdError> {
        if let Some(detail) = &self.failure {
            return Err(Ocr2MdError::ExtractionFailed {
                detail: detail.clone(),
            });
        }

        let total = self.pages.len();
        let failed = self.failed_pages().count();
        if failed > 0 {
            return Err(Ocr2MdError::PartialFailure {
                success: total - failed,
                failed,
                total,
            });
        }

        if self.pages.iter().all(PageResult::is_empty) {
            return Err(Ocr2MdError::NoTextExtracted { name: self.name });
        }

        Ok(self)
    }
}

/// The rendering of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number within the document.
    pub page_num: usize,

    /// Page Markdown, without the page heading.
    pub markdown: String,

    /// Fragments the OCR service returned for this page.
    pub fragments: usize,

    /// Fragments dropped as vertical text.
    pub dropped_vertical: usize,

    /// Set when the OCR service could not recognise this page.
    pub error: Option<PageError>,
}

impl PageResult {
    /// True when the page was recognised but produced no text.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.markdown.trim().is_empty()
    }
}

/// Conversion counters and timings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the OCR response.
    pub total_pages: usize,
    /// Pages rendered without error.
    pub processed_pages: usize,
    /// Pages the OCR service reported as unrecognised.
    pub failed_pages: usize,
    /// Pages rendered without error but with no text.
    pub empty_pages: usize,
    /// Pages excluded by the page selection.
    pub skipped_pages: usize,
    /// Fragments across all rendered pages.
    pub total_fragments: usize,
    /// Vertical fragments dropped across all rendered pages.
    pub dropped_fragments: usize,
    /// Wall-clock time spent waiting on the OCR service.
    pub ocr_duration_ms: u64,
    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_num: usize, markdown: &str, error: Option<PageError>) -> PageResult {
        PageResult {
            page_num,
            markdown: markdown.to_string(),
            fragments: 0,
            dropped_vertical: 0,
            error,
        }
    }

    fn output(pages: Vec<PageResult>, failure: Option<String>) -> ConversionOutput {
        ConversionOutput {
            markdown: String::new(),
            name: "scan.pdf".into(),
            kind: DocumentKind::Pdf,
            pages,
            stats: ConversionStats::default(),
            failure,
        }
    }

    #[test]
    fn into_result_ok_when_text_present() {
        let out = output(vec![page(1, "Hello.\n\n", None)], None);
        assert!(out.into_result().is_ok());
    }

    #[test]
    fn into_result_reports_document_failure() {
        let out = output(vec![], Some("HTTP 500".into()));
        let err = out.into_result().unwrap_err();
        assert!(matches!(err, Ocr2MdError::ExtractionFailed { .. }));
    }

    #[test]
    fn into_result_reports_partial_failure() {
        let failed = PageError::RecognitionFailed {
            page: 2,
            detail: "FAILURE".into(),
        };
        let out = output(vec![page(1, "ok", None), page(2, "", Some(failed))], None);
        match out.into_result().unwrap_err() {
            Ocr2MdError::PartialFailure {
                success,
                failed,
                total,
            } => assert_eq!((success, failed, total), (1, 1, 2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn into_result_reports_empty_document() {
        let out = output(vec![page(1, "\n", None), page(2, "", None)], None);
        assert!(matches!(
            out.into_result().unwrap_err(),
            Ocr2MdError::NoTextExtracted { .. }
        ));
    }

    #[test]
    fn failed_page_is_not_empty() {
        let p = page(
            1,
            "",
            Some(PageError::RecognitionFailed {
                page: 1,
                detail: "ERROR".into(),
            }),
        );
        assert!(!p.is_empty());
    }
}
