//! Page aggregation: render each OCR page and join them into one document.
//!
//! PDFs get a `## 페이지 N` heading per page (the label is configurable) and
//! pages are joined with a blank line. An image is a single page and gets no
//! heading. A page the OCR service failed to recognise keeps its heading and
//! carries a `>` quote with the failure, so it reads differently from a
//! recognised page that simply had no text.

use super::input::DocumentKind;
use super::{render_fragments, PageContent};
use crate::config::LayoutConfig;
use crate::error::PageError;
use crate::ocr::OcrImage;
use crate::output::PageResult;
use tracing::warn;

/// Emitted in place of a document when the OCR call produced no pages.
pub const EXTRACTION_FAILED: &str = "OCR 결과를 불러오지 못했습니다.";

/// Render one OCR page.
///
/// For images a page with only a `title` renders as `# {title}`; for PDFs
/// such a page renders empty, like a page without fields.
pub fn render_page(
    page_num: usize,
    image: &OcrImage,
    kind: &DocumentKind,
    layout: &LayoutConfig,
) -> PageResult {
    let fragments = image.fields.as_ref().map_or(0, Vec::len);

    if let Err(detail) = image.status() {
        warn!("Page {}: OCR reported {}", page_num, detail);
        return PageResult {
            page_num,
            markdown: String::new(),
            fragments,
            dropped_vertical: 0,
            error: Some(PageError::RecognitionFailed {
                page: page_num,
                detail,
            }),
        };
    }

    let (markdown, dropped_vertical) = match image.content() {
        PageContent::Fragments(fragments) => {
            let rendered = render_fragments(&fragments, layout);
            (rendered.markdown, rendered.dropped_vertical)
        }
        PageContent::Title(title) if !kind.is_pdf() => (format!("# {title}\n\n"), 0),
        PageContent::Title(_) | PageContent::Empty => (String::new(), 0),
    };

    PageResult {
        page_num,
        markdown,
        fragments,
        dropped_vertical,
        error: None,
    }
}

/// `## {label} {page_num}`
pub fn page_heading(label: &str, page_num: usize) -> String {
    format!("## {label} {page_num}")
}

fn page_body(page: &PageResult) -> String {
    match &page.error {
        Some(err) => format!("> {err}\n"),
        None => page.markdown.clone(),
    }
}

/// Join rendered pages into the final document.
pub fn assemble_document(pages: &[PageResult], kind: &DocumentKind, heading_label: &str) -> String {
    let Some(first) = pages.first() else {
        return EXTRACTION_FAILED.to_string();
    };

    match kind {
        DocumentKind::Pdf => pages
            .iter()
            .map(|p| format!("{}\n\n{}", page_heading(heading_label, p.page_num), page_body(p)))
            .collect::<Vec<_>>()
            .join("\n\n"),
        DocumentKind::Image { .. } => page_body(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image(value: serde_json::Value) -> OcrImage {
        serde_json::from_value(value).unwrap()
    }

    fn png() -> DocumentKind {
        DocumentKind::Image {
            format: "png".into(),
        }
    }

    fn ok_page(page_num: usize, markdown: &str) -> PageResult {
        PageResult {
            page_num,
            markdown: markdown.into(),
            fragments: 1,
            dropped_vertical: 0,
            error: None,
        }
    }

    #[test]
    fn pdf_pages_get_numbered_headings() {
        let pages = [ok_page(1, "first\n\n"), ok_page(2, "second\n\n")];
        let doc = assemble_document(&pages, &DocumentKind::Pdf, "페이지");
        assert_eq!(doc, "## 페이지 1\n\nfirst\n\n\n\n## 페이지 2\n\nsecond\n\n");
    }

    #[test]
    fn empty_pdf_page_keeps_its_heading() {
        let pages = [ok_page(1, "")];
        assert_eq!(assemble_document(&pages, &DocumentKind::Pdf, "Page"), "## Page 1\n\n");
    }

    #[test]
    fn image_has_no_heading() {
        let pages = [ok_page(1, "body\n\n")];
        assert_eq!(assemble_document(&pages, &png(), "페이지"), "body\n\n");
    }

    #[test]
    fn no_pages_yields_fallback() {
        assert_eq!(assemble_document(&[], &DocumentKind::Pdf, "페이지"), EXTRACTION_FAILED);
    }

    #[test]
    fn failed_page_is_marked() {
        let page = render_page(
            2,
            &image(json!({ "inferResult": "FAILURE", "message": "bad scan" })),
            &DocumentKind::Pdf,
            &LayoutConfig::default(),
        );
        assert!(page.error.is_some());
        let doc = assemble_document(&[page], &DocumentKind::Pdf, "페이지");
        assert_eq!(
            doc,
            "## 페이지 2\n\n> Page 2: recognition failed: FAILURE: bad scan\n"
        );
    }

    #[test]
    fn title_only_image_renders_title() {
        let page = render_page(
            1,
            &image(json!({ "title": { "inferText": "영수증" } })),
            &png(),
            &LayoutConfig::default(),
        );
        assert_eq!(page.markdown, "# 영수증\n\n");
    }

    #[test]
    fn title_only_pdf_page_is_empty() {
        let page = render_page(
            1,
            &image(json!({ "title": { "inferText": "영수증" } })),
            &DocumentKind::Pdf,
            &LayoutConfig::default(),
        );
        assert!(page.is_empty());
    }

    #[test]
    fn fields_are_rendered() {
        let page = render_page(
            1,
            &image(json!({
                "inferResult": "SUCCESS",
                "fields": [
                    { "inferText": "Hello", "boundingPoly": { "vertices": [
                        {"x": 0, "y": 0}, {"x": 50, "y": 0}, {"x": 50, "y": 20}, {"x": 0, "y": 20}
                    ] } },
                    { "inferText": "world.", "boundingPoly": { "vertices": [
                        {"x": 55, "y": 0}, {"x": 120, "y": 0}, {"x": 120, "y": 20}, {"x": 55, "y": 20}
                    ] } }
                ]
            })),
            &png(),
            &LayoutConfig::default(),
        );
        assert_eq!(page.markdown, "Hello world.\n\n");
        assert_eq!(page.fragments, 2);
        assert_eq!(page.dropped_vertical, 0);
    }
}
