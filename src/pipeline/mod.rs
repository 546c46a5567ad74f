//! Pipeline stages for OCR-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step. Everything
//! after [`input`] is synchronous and pure: the same fragments always give
//! the same Markdown.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ (OCR engine) ──▶ filter ──▶ lines ──▶ paragraphs ──▶ markdown ──▶ assemble
//! (path/URL)  (fragments)    (vertical)  (rows)    (merge)        (###, |)     (pages)
//! ```
//!
//! 1. [`input`]     : read the file or URL and sniff PDF vs image
//! 2. [`filter`]    : drop fragments taller than they are wide
//! 3. [`lines`]     : cluster fragments into rows, mark paragraph gaps
//! 4. [`paragraphs`]: merge wrapped rows using sentence punctuation
//! 5. [`markdown`]  : headings, pipe/tab tables, plain paragraphs
//! 6. [`assemble`]  : per-page results and the final document

pub mod assemble;
pub mod filter;
pub mod fragment;
pub mod input;
pub mod lines;
pub mod markdown;
pub mod paragraphs;

use crate::config::LayoutConfig;
use fragment::Fragment;
use tracing::debug;

/// What one OCR page hands to the layout pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    /// Positioned fragments in reading order (possibly none).
    Fragments(Vec<Fragment>),
    /// No fragments, only a page title.
    Title(String),
    /// Neither fragments nor title.
    Empty,
}

/// Markdown for one page plus counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedFragments {
    pub markdown: String,
    pub fragments: usize,
    pub dropped_vertical: usize,
}

/// Run filter → lines → paragraphs → markdown over one page's fragments.
pub fn render_fragments(fragments: &[Fragment], layout: &LayoutConfig) -> RenderedFragments {
    let grouped = lines::group_lines(fragments, layout);
    let paragraphs = paragraphs::assemble_paragraphs(&grouped.lines);
    let markdown = markdown::emit_markdown(&paragraphs, layout);

    debug!(
        "{} fragments → {} lines → {} paragraphs ({} vertical dropped)",
        fragments.len(),
        grouped.lines.len(),
        paragraphs.len(),
        grouped.dropped_vertical
    );

    RenderedFragments {
        markdown,
        fragments: fragments.len(),
        dropped_vertical: grouped.dropped_vertical,
    }
}
