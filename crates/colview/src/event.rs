#![forbid(unsafe_code)]

//! Input events routed through [`ColumnView::update`](crate::ColumnView::update).

use std::time::Duration;

use crate::column::ColumnId;
use crate::sort::SortDescriptor;

/// One input to the reconciler, as delivered by a gesture recognizer,
/// header click handler, resize grip or frame clock.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEvent {
    /// Pointer pressed on a header and began moving.
    DragStarted {
        column: ColumnId,
        /// Pointer position relative to the column's left edge.
        pointer_offset: f64,
    },
    /// Pointer moved by `delta` along the header axis.
    DragDelta { delta: f64 },
    DragCompleted,
    DragCanceled,
    /// Header clicked; `extended` when the multi-sort modifier is held.
    SortRequested { column: ColumnId, extended: bool },
    Resized { column: ColumnId, width: f64 },
    VisibilityChanged { column: ColumnId, visible: bool },
    /// A sort order arrived from outside the view.
    ExternalSort(Vec<SortDescriptor>),
    /// Frame clock advanced.
    Tick(Duration),
}

impl ColumnEvent {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStarted { .. } => "drag_started",
            Self::DragDelta { .. } => "drag_delta",
            Self::DragCompleted => "drag_completed",
            Self::DragCanceled => "drag_canceled",
            Self::SortRequested { .. } => "sort_requested",
            Self::Resized { .. } => "resized",
            Self::VisibilityChanged { .. } => "visibility_changed",
            Self::ExternalSort(_) => "external_sort",
            Self::Tick(_) => "tick",
        }
    }
}
