#![forbid(unsafe_code)]

//! Drag-to-reorder geometry.
//!
//! While a column is dragged its siblings are hit-tested and laid out as if
//! the dragged column had been lifted out of the header. The candidate
//! destination is the full-sequence index of the sibling under the hot spot;
//! the gap opens in front of the sibling whose position among siblings
//! equals that candidate.
//!
//! Nothing here touches the animator or the sequence. [`ColumnView`]
//! drives these helpers and owns the session.
//!
//! [`ColumnView`]: crate::ColumnView

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnId};
use crate::layout::find_in_spans;

/// State of one in-progress reorder gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// Column being dragged.
    pub column: ColumnId,
    /// Index of the dragged column when the gesture started.
    pub dragging_index: usize,
    /// Last accepted candidate destination. Starts equal to
    /// `dragging_index`; may reach the column count.
    pub destination_index: usize,
    /// Pointer offset from the column's left edge at drag start.
    pub pointer_offset: f64,
}

impl DragSession {
    #[must_use]
    pub fn new(column: ColumnId, index: usize, pointer_offset: f64) -> Self {
        Self {
            column,
            dragging_index: index,
            destination_index: index,
            pointer_offset,
        }
    }

    /// Index the dragged column lands at if the gesture completes now.
    #[must_use]
    pub fn final_index(&self) -> usize {
        final_index(self.dragging_index, self.destination_index)
    }
}

/// Where a dragged column settles once it is removed from `dragging` and
/// reinserted relative to `destination`.
///
/// Dropping before itself keeps the destination; dropping after shifts one
/// left because the column's own slot closes.
#[must_use]
pub const fn final_index(dragging: usize, destination: usize) -> usize {
    if dragging >= destination {
        destination
    } else {
        destination - 1
    }
}

/// Candidate destination for `hot_spot`, hit-testing visible siblings packed
/// from 0 with the dragged column removed.
///
/// Returns full-sequence indices. Negative hot spots give 0; hot spots past
/// the packed right edge give the column count.
#[must_use]
pub fn hit_test(columns: &[Rc<Column>], dragging: usize, hot_spot: f64) -> usize {
    let mut left = 0.0;
    let spans = columns
        .iter()
        .enumerate()
        .filter(|(i, c)| *i != dragging && c.is_visible())
        .map(|(i, c)| {
            let span = (i, left, c.width());
            left += c.width();
            span
        })
        .collect::<Vec<_>>();
    find_in_spans(spans, hot_spot, columns.len())
}

/// Target `left` for each visible sibling with a gap of the dragged width
/// opened before the sibling at sibling-position `candidate`.
///
/// Returns `(full_index, target_left)` pairs in sequence order.
#[must_use]
pub fn gap_layout(columns: &[Rc<Column>], dragging: usize, candidate: usize) -> Vec<(usize, f64)> {
    let gap = columns.get(dragging).map_or(0.0, |c| c.width());
    let mut targets = Vec::with_capacity(columns.len().saturating_sub(1));
    let mut offset = 0.0;
    let mut walked = 0;
    for (index, column) in columns.iter().enumerate() {
        if index == dragging {
            continue;
        }
        if walked == candidate {
            offset += gap;
        }
        walked += 1;
        if !column.is_visible() {
            continue;
        }
        targets.push((index, offset));
        offset += column.width();
    }
    targets
}
