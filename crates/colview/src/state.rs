#![forbid(unsafe_code)]

//! Serializable views of a header: point-in-time snapshots for rendering and
//! golden tests, and persisted layout for save/restore.

use serde::{Deserialize, Serialize};

use crate::column::{Column, ColumnId};
use crate::config::Orientation;
use crate::drag::DragSession;
use crate::sort::{SortDescriptor, SortDirection};

/// Everything a renderer needs to draw one column header cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub id: ColumnId,
    pub header: String,
    pub sort_member_path: String,
    pub index: usize,
    pub left: f64,
    pub desired_left: f64,
    pub width: f64,
    pub visible: bool,
    pub z_index: i32,
    pub sort_direction: Option<SortDirection>,
    pub sort_order: Option<usize>,
}

impl ColumnSnapshot {
    #[must_use]
    pub fn capture(index: usize, column: &Column) -> Self {
        Self {
            id: column.id(),
            header: column.header().to_owned(),
            sort_member_path: column.sort_member_path().to_owned(),
            index,
            left: column.left(),
            desired_left: column.desired_left(),
            width: column.width(),
            visible: column.is_visible(),
            z_index: column.z_index(),
            sort_direction: column.sort_direction(),
            sort_order: column.sort_order(),
        }
    }
}

/// Whole-header snapshot in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSnapshot {
    pub orientation: Orientation,
    pub allow_reorder: bool,
    pub total_width: f64,
    pub columns: Vec<ColumnSnapshot>,
    pub sort: Vec<SortDescriptor>,
    pub drag: Option<DragSession>,
}

/// Persisted layout of one column, keyed by sort-member-path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnState {
    pub member_path: String,
    pub width: f64,
    pub visible: bool,
}

/// Persisted header layout: column order, sizes, visibility and sort.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub columns: Vec<ColumnState>,
    #[serde(default)]
    pub sort: Vec<SortDescriptor>,
}
