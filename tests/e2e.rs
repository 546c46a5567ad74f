//! End-to-end integration tests for ocr2md.
//!
//! These tests send real documents from `./test_cases/` to a live General OCR
//! endpoint. They are gated behind the `E2E_ENABLED` environment variable so
//! they do not run in CI unless explicitly requested, and also need
//! `NAVER_OCR_API_URL` and `NAVER_OCR_SECRET_KEY`.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use ocr2md::{convert, convert_to_file, ConversionConfig, DocumentKind, PageSelection};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/output");
    std::fs::create_dir_all(&d).ok();
    d
}

/// Skip this test unless E2E is enabled, credentials are set and `path` exists.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        if std::env::var("NAVER_OCR_API_URL").is_err()
            || std::env::var("NAVER_OCR_SECRET_KEY").is_err()
        {
            println!("SKIP: NAVER_OCR_API_URL / NAVER_OCR_SECRET_KEY not set");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP: test file not found: {}", p.display());
            return;
        }
        p
    }};
}

/// Basic shape checks that hold for any successfully recognised document.
fn assert_markdown_shape(md: &str, context: &str) {
    assert!(!md.trim().is_empty(), "[{context}] Markdown is empty");
    assert!(
        md.ends_with('\n'),
        "[{context}] Markdown must end with a newline"
    );

    // Every table separator row has as many cells as the header above it.
    let lines: Vec<&str> = md.lines().collect();
    for pair in lines.windows(2) {
        if pair[1].starts_with("| ---") {
            let header_cells = pair[0].matches(" | ").count() + 1;
            let separator_cells = pair[1].matches("---").count();
            assert_eq!(
                header_cells, separator_cells,
                "[{context}] separator width differs from header: {:?}",
                pair
            );
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_pdf_has_page_headings() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let config = ConversionConfig::default();

    let output = convert(path.to_str().unwrap(), &config)
        .await
        .expect("conversion");

    assert!(output.failure.is_none(), "OCR failed: {:?}", output.failure);
    assert_eq!(output.kind, DocumentKind::Pdf);
    assert!(output.markdown.starts_with("## 페이지 1\n\n"));
    assert_eq!(output.stats.failed_pages, 0);
    assert_markdown_shape(&output.markdown, "sample.pdf");
    println!(
        "{} pages, {} fragments, {}ms OCR",
        output.stats.processed_pages, output.stats.total_fragments, output.stats.ocr_duration_ms
    );
}

#[tokio::test]
async fn e2e_pdf_first_page_only() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let config = ConversionConfig::builder()
        .pages(PageSelection::Single(1))
        .build()
        .unwrap();

    let output = convert(path.to_str().unwrap(), &config)
        .await
        .expect("conversion");
    assert_eq!(output.pages.len(), 1);
    assert!(!output.markdown.contains("## 페이지 2"));
}

#[tokio::test]
async fn e2e_image_has_no_page_heading() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.png"));
    let target = output_dir().join("sample_png.md");

    let output = convert_to_file(path.to_str().unwrap(), &target, &ConversionConfig::default())
        .await
        .expect("conversion");

    assert!(output.failure.is_none(), "OCR failed: {:?}", output.failure);
    assert!(!output.markdown.contains("## 페이지"));
    assert_markdown_shape(&output.markdown, "sample.png");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), output.markdown);
}
