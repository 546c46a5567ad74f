//! Line grouping: cluster fragments into visual rows and mark paragraph gaps.
//!
//! Fragments are consumed in the order the OCR service emitted them; that
//! order is the reading order. They are never re-sorted by coordinates.
//! Each fragment is compared only with the previous positioned fragment:
//!
//! * a vertical jump larger than `y_threshold` closes the current line, and
//!   if the jump also exceeds `paragraph_gap_factor × line_height` an empty
//!   marker line is emitted after it;
//! * otherwise a horizontal gap larger than `x_gap_threshold` closes the
//!   current line (indentation, or a second cell on the same row).
//!
//! `line_height` is the height of the first fragment on the page that has a
//! bounding box, and stays fixed for the page. A zero line height is not an
//! error: it only means any vertical jump past `y_threshold` also starts a
//! new paragraph.

use super::filter;
use super::fragment::Fragment;
use crate::config::LayoutConfig;
use tracing::trace;

/// Output of [`group_lines`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedLines {
    /// Closed lines in reading order. Empty strings are paragraph breaks.
    pub lines: Vec<String>,
    /// Fragments excluded as vertical text.
    pub dropped_vertical: usize,
}

/// Group one page's fragments into lines.
pub fn group_lines(fragments: &[Fragment], layout: &LayoutConfig) -> GroupedLines {
    let mut grouper = LineGrouper::new(layout);
    for fragment in fragments {
        grouper.push(fragment);
    }
    grouper.finish()
}

/// Single-pass state machine behind [`group_lines`].
struct LineGrouper<'a> {
    layout: &'a LayoutConfig,
    last_y: Option<f64>,
    last_x_end: Option<f64>,
    line_height: Option<f64>,
    current_line: Vec<String>,
    out: GroupedLines,
}

impl<'a> LineGrouper<'a> {
    fn new(layout: &'a LayoutConfig) -> Self {
        Self {
            layout,
            last_y: None,
            last_x_end: None,
            line_height: None,
            current_line: Vec::new(),
            out: GroupedLines::default(),
        }
    }

    fn push(&mut self, fragment: &Fragment) {
        let Some(bounds) = fragment.bounds else {
            // No position: continue the current line without moving the cursor.
            self.current_line.push(fragment.text.clone());
            return;
        };

        // Seeded before filtering: a leading vertical fragment still fixes
        // the page's line height.
        let line_height = *self.line_height.get_or_insert(bounds.height());

        if !filter::keeps(fragment) {
            trace!(text = %fragment.text, "dropping vertical fragment");
            self.out.dropped_vertical += 1;
            return;
        }

        let current_y = bounds.y_min;
        let mut new_line = false;
        let mut new_paragraph = false;

        if let Some(last_y) = self.last_y {
            let y_diff = (current_y - last_y).abs();
            if y_diff > self.layout.y_threshold {
                new_line = true;
                if y_diff > line_height * self.layout.paragraph_gap_factor {
                    new_paragraph = true;
                }
            } else if let Some(last_x_end) = self.last_x_end {
                if bounds.x_min - last_x_end > self.layout.x_gap_threshold {
                    new_line = true;
                }
            }
        }

        if new_line {
            trace!(y = current_y, new_paragraph, "line break");
            self.flush_line();
            if new_paragraph {
                self.out.lines.push(String::new());
            }
        }

        self.current_line.push(fragment.text.clone());
        self.last_y = Some(current_y);
        self.last_x_end = Some(bounds.x_max);
    }

    fn flush_line(&mut self) {
        if !self.current_line.is_empty() {
            self.out.lines.push(self.current_line.join(" "));
            self.current_line.clear();
        }
    }

    fn finish(mut self) -> GroupedLines {
        self.flush_line();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(fragments: &[Fragment]) -> Vec<String> {
        group_lines(fragments, &LayoutConfig::default()).lines
    }

    #[test]
    fn adjacent_fragments_share_a_line() {
        let fragments = [
            Fragment::boxed("X", 0.0, 0.0, 30.0, 20.0),
            Fragment::boxed("Y", 30.0, 0.0, 60.0, 20.0),
        ];
        assert_eq!(lines(&fragments), vec!["X Y"]);
    }

    #[test]
    fn large_vertical_jump_starts_paragraph() {
        let fragments = [
            Fragment::boxed("first", 0.0, 0.0, 100.0, 20.0),
            Fragment::boxed("second", 0.0, 100.0, 100.0, 120.0),
        ];
        assert_eq!(lines(&fragments), vec!["first", "", "second"]);
    }

    #[test]
    fn small_vertical_jump_starts_line_only() {
        // 25 > 10 but 25 <= 1.5 × 20
        let fragments = [
            Fragment::boxed("one", 0.0, 0.0, 100.0, 20.0),
            Fragment::boxed("two", 0.0, 25.0, 100.0, 45.0),
        ];
        assert_eq!(lines(&fragments), vec!["one", "two"]);
    }

    #[test]
    fn jitter_within_threshold_stays_on_line() {
        let fragments = [
            Fragment::boxed("a", 0.0, 100.0, 40.0, 120.0),
            Fragment::boxed("b", 45.0, 108.0, 90.0, 128.0),
            Fragment::boxed("c", 95.0, 99.0, 140.0, 119.0),
        ];
        assert_eq!(lines(&fragments), vec!["a b c"]);
    }

    #[test]
    fn wide_horizontal_gap_splits_row() {
        let fragments = [
            Fragment::boxed("Name", 0.0, 0.0, 60.0, 20.0),
            Fragment::boxed("Value", 200.0, 0.0, 260.0, 20.0),
        ];
        assert_eq!(lines(&fragments), vec!["Name", "Value"]);
    }

    #[test]
    fn gap_exactly_at_threshold_stays_on_line() {
        let fragments = [
            Fragment::boxed("a", 0.0, 0.0, 50.0, 20.0),
            Fragment::boxed("b", 100.0, 0.0, 150.0, 20.0),
        ];
        assert_eq!(lines(&fragments), vec!["a b"]);
    }

    #[test]
    fn vertical_fragment_never_appears() {
        let fragments = [
            Fragment::boxed("Body", 0.0, 0.0, 100.0, 20.0),
            Fragment::boxed("SIDEBAR", 110.0, 0.0, 120.0, 300.0),
            Fragment::boxed("text", 105.0, 0.0, 160.0, 20.0),
        ];
        let grouped = group_lines(&fragments, &LayoutConfig::default());
        assert_eq!(grouped.lines, vec!["Body text"]);
        assert_eq!(grouped.dropped_vertical, 1);
    }

    #[test]
    fn leading_vertical_fragment_sets_line_height() {
        // The dropped 200px-tall fragment fixes line_height, so a 100px jump
        // (< 1.5 × 200) is only a line break.
        let fragments = [
            Fragment::boxed("|", 0.0, 0.0, 10.0, 200.0),
            Fragment::boxed("top", 20.0, 0.0, 100.0, 20.0),
            Fragment::boxed("below", 20.0, 100.0, 100.0, 120.0),
        ];
        assert_eq!(lines(&fragments), vec!["top", "below"]);
    }

    #[test]
    fn unpositioned_fragment_joins_current_line() {
        let fragments = [
            Fragment::boxed("Hello", 0.0, 0.0, 60.0, 20.0),
            Fragment::unpositioned("there"),
            Fragment::boxed("world", 70.0, 0.0, 130.0, 20.0),
        ];
        assert_eq!(lines(&fragments), vec!["Hello there world"]);
    }

    #[test]
    fn unpositioned_only_page_is_one_line() {
        let fragments = [Fragment::unpositioned("a"), Fragment::unpositioned("b")];
        assert_eq!(lines(&fragments), vec!["a b"]);
    }

    #[test]
    fn zero_height_line_makes_every_jump_a_paragraph() {
        let fragments = [
            Fragment::boxed("flat", 0.0, 0.0, 100.0, 0.0),
            Fragment::boxed("next", 0.0, 15.0, 100.0, 35.0),
        ];
        assert_eq!(lines(&fragments), vec!["flat", "", "next"]);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        let grouped = group_lines(&[], &LayoutConfig::default());
        assert!(grouped.lines.is_empty());
        assert_eq!(grouped.dropped_vertical, 0);
    }

    #[test]
    fn grouping_is_deterministic() {
        let fragments = [
            Fragment::boxed("Title", 0.0, 0.0, 100.0, 20.0),
            Fragment::boxed("body", 0.0, 60.0, 100.0, 80.0),
            Fragment::boxed("more", 300.0, 60.0, 360.0, 80.0),
        ];
        assert_eq!(lines(&fragments), lines(&fragments));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let layout = LayoutConfig {
            x_gap_threshold: 500.0,
            ..LayoutConfig::default()
        };
        let fragments = [
            Fragment::boxed("Name", 0.0, 0.0, 60.0, 20.0),
            Fragment::boxed("Value", 200.0, 0.0, 260.0, 20.0),
        ];
        assert_eq!(group_lines(&fragments, &layout).lines, vec!["Name Value"]);
    }
}
