//! Fragment filter: drop vertical (rotated) text.
//!
//! The line model only understands horizontal rows, so a fragment whose box
//! is taller than it is wide is silently excluded. Fragments without a box
//! always pass; the line grouper appends them to the current line.

use super::fragment::{BoundingBox, Fragment};

/// True when `bounds` describes text running top-to-bottom.
pub fn is_vertical(bounds: &BoundingBox) -> bool {
    bounds.width() < bounds.height()
}

/// True when the fragment takes part in line grouping.
pub fn keeps(fragment: &Fragment) -> bool {
    fragment.bounds.as_ref().is_none_or(|b| !is_vertical(b))
}
