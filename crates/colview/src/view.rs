#![forbid(unsafe_code)]

//! [`ColumnView`]: the reconciler façade.
//!
//! A view owns one column sequence, one sort state, at most one drag session
//! and an injected [`Animator`]. Hosts drive it either through the direct
//! methods or by feeding [`ColumnEvent`]s to [`ColumnView::update`].
//!
//! # Sort channel
//!
//! A view built with a [`SortChannel`] subscribes to it. Every external
//! publication is reconciled into the columns; every sort click and every
//! [`ColumnView::reconcile_external_sort`] publishes the resulting list back. The echo of a view's own publication matches its
//! state and changes nothing.
//!
//! # Failure Modes
//!
//! - Calling drag operations without a session returns
//!   [`ColumnViewError::NoDragSession`], unless reordering is disabled, in
//!   which case the whole gesture is ignored.
//! - Resizing or hiding a column mid-drag re-arranges the header, which snaps
//!   the dragged column back to its slot until the next delta.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::animation::{Animator, ImmediateAnimator, Transition, TweenAnimator};
use crate::channel::SortChannel;
use crate::column::{Column, ColumnId, ColumnSpec};
use crate::config::ViewConfig;
use crate::drag::{self, DragSession};
use crate::error::{ColumnViewError, Result};
use crate::event::ColumnEvent;
use crate::layout::{ColumnSequence, SharedColumns};
use crate::observable::Subscription;
use crate::sort::{self, SortDescriptor, SortState};
use crate::state::{ColumnSnapshot, ColumnState, HeaderSnapshot, ViewState};

pub struct ColumnView {
    config: ViewConfig,
    allow_reorder: bool,
    sequence: ColumnSequence,
    sort: Rc<RefCell<SortState>>,
    channel: Option<SortChannel>,
    _channel_subscription: Option<Subscription>,
    animator: Box<dyn Animator>,
    drag: Option<DragSession>,
    next_id: u64,
}

impl Default for ColumnView {
    fn default() -> Self {
        Self::new(ViewConfig::default(), Box::new(ImmediateAnimator), None)
    }
}

impl std::fmt::Debug for ColumnView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnView")
            .field("allow_reorder", &self.allow_reorder)
            .field("sequence", &self.sequence)
            .field("sort", &self.sort.borrow())
            .field("drag", &self.drag)
            .field("animating", &!self.animator.is_idle())
            .finish_non_exhaustive()
    }
}

impl ColumnView {
    /// Build a view around `animator`, optionally joined to a shared sort
    /// channel.
    ///
    /// A `drag_z_index` that does not exceed `base_z_index` is raised to
    /// `base_z_index + 1`, so a dragged column always renders above its
    /// siblings.
    #[must_use]
    pub fn new(
        mut config: ViewConfig,
        animator: Box<dyn Animator>,
        channel: Option<SortChannel>,
    ) -> Self {
        if config.drag_z_index <= config.base_z_index {
            let raised = config.base_z_index.saturating_add(1);
            warn!(
                base_z_index = config.base_z_index,
                drag_z_index = config.drag_z_index,
                raised,
                "drag z-order not above base; raised"
            );
            config.drag_z_index = raised;
        }
        let sequence = ColumnSequence::new();
        let sort = Rc::new(RefCell::new(SortState::default()));
        let subscription = channel
            .as_ref()
            .map(|channel| subscribe_channel(channel, &sequence.shared(), &sort));
        Self {
            allow_reorder: config.allow_reorder,
            config,
            sequence,
            sort,
            channel,
            _channel_subscription: subscription,
            animator,
            drag: None,
            next_id: 0,
        }
    }

    /// A view driven by a [`TweenAnimator`] using the configured easing.
    #[must_use]
    pub fn with_tween(config: ViewConfig, channel: Option<SortChannel>) -> Self {
        let animator = TweenAnimator::from_config(&config);
        Self::new(config, Box::new(animator), channel)
    }

    /// The effective configuration, after z-order normalization.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Columns
    // -----------------------------------------------------------------------

    /// Append a column. The channel's current sort, if any, is applied to it.
    pub fn add_column(&mut self, spec: ColumnSpec) -> ColumnId {
        let column = self.make_column(spec);
        let id = column.id();
        self.sequence.add(column);
        self.adopt_channel_sort();
        id
    }

    /// Insert a column at `index` (`0..=len`). Rejected while a drag is in
    /// progress.
    pub fn insert_column(&mut self, index: usize, spec: ColumnSpec) -> Result<ColumnId> {
        self.ensure_idle()?;
        let len = self.sequence.len();
        if index > len {
            return Err(ColumnViewError::IndexOutOfRange { index, len });
        }
        let column = self.make_column(spec);
        let id = column.id();
        self.sequence.insert(index, column)?;
        self.adopt_channel_sort();
        Ok(id)
    }

    /// Remove a column, cancelling any drag first. A sorted column leaves the
    /// sort list and the shortened list is published.
    pub fn remove_column(&mut self, id: ColumnId) -> Result<Rc<Column>> {
        if self.sequence.index_of(id).is_none() {
            return Err(ColumnViewError::UnknownColumn(id));
        }
        if self.drag.is_some() {
            self.cancel_drag()?;
        }
        let column = self.sequence.remove(id)?;
        let forgotten = self.sort.borrow_mut().forget(id);
        if forgotten {
            column.set_sort_direction(None);
            column.set_sort_order(None);
            self.refresh_ranks();
            let descriptors = self.sort_descriptors();
            self.publish(&descriptors);
        }
        Ok(column)
    }

    /// Move the column at `from` to `to`; `to == len` means last. Rejected
    /// while a drag is in progress.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        self.sequence.move_column(from, to)
    }

    /// Look a column up by id.
    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<Rc<Column>> {
        self.sequence.find(id)
    }

    /// The column at display index `index`.
    #[must_use]
    pub fn column_at(&self, index: usize) -> Option<Rc<Column>> {
        self.sequence.get(index)
    }

    /// Display index of `id`, if it belongs to this view.
    #[must_use]
    pub fn index_of(&self, id: ColumnId) -> Option<usize> {
        self.sequence.index_of(id)
    }

    /// Columns in display order.
    #[must_use]
    pub fn columns(&self) -> Vec<Rc<Column>> {
        self.sequence.to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Set a column's width (clamped to its bounds). Returns whether the
    /// width changed.
    pub fn resize_column(&mut self, id: ColumnId, width: f64) -> Result<bool> {
        Ok(self.require(id)?.set_width(width))
    }

    /// Show or hide a column. Returns whether visibility changed; hidden
    /// columns keep their slot but take no space.
    pub fn set_column_visible(&mut self, id: ColumnId, visible: bool) -> Result<bool> {
        Ok(self.require(id)?.set_visible(visible))
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Recompute every visible column's offset. Width and visibility changes
    /// already trigger this; hosts call it after restyling.
    pub fn arrange_header(&self) {
        self.sequence.arrange();
    }

    /// Index of the column covering `offset`: 0 for negative offsets,
    /// `len()` past the last visible column.
    #[must_use]
    pub fn find_index(&self, offset: f64) -> usize {
        self.sequence.find_index(offset)
    }

    /// Sum of visible column widths.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.sequence.total_width()
    }

    // -----------------------------------------------------------------------
    // Drag & reorder
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn allow_reorder(&self) -> bool {
        self.allow_reorder
    }

    /// Enable or disable drag reordering. A drag already in progress is
    /// left alone.
    pub fn set_allow_reorder(&mut self, allow: bool) {
        self.allow_reorder = allow;
    }

    /// The active drag, if any.
    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Begin dragging `id`. Returns `Ok(false)` when reordering is disabled
    /// and the gesture is ignored.
    pub fn start_drag(&mut self, id: ColumnId, pointer_offset: f64) -> Result<bool> {
        if !self.allow_reorder {
            debug!(column = %id, "reorder disabled; drag ignored");
            return Ok(false);
        }
        if self.drag.is_some() {
            return Err(ColumnViewError::DragInProgress);
        }
        let index = self
            .sequence
            .index_of(id)
            .ok_or(ColumnViewError::UnknownColumn(id))?;
        self.require(id)?.set_z_index(self.config.drag_z_index);
        self.drag = Some(DragSession::new(id, index, pointer_offset));
        debug!(column = %id, index, pointer_offset, "drag started");
        Ok(true)
    }

    /// Move the dragged column by `delta` and open a gap at the candidate
    /// destination under its hot spot.
    pub fn drag(&mut self, delta: f64) -> Result<()> {
        let Some(mut session) = self.drag else {
            return self.missing_session();
        };
        let shared = self.sequence.shared();
        let columns = shared.borrow();
        let dragged = columns
            .get(session.dragging_index)
            .ok_or(ColumnViewError::UnknownColumn(session.column))?;

        let left = dragged.left() + delta;
        dragged.set_left(left);
        let hot_spot = left + session.pointer_offset;
        let candidate = drag::hit_test(&columns, session.dragging_index, hot_spot);
        trace!(delta, left, hot_spot, candidate, "drag moved");

        if candidate != session.destination_index && candidate != session.dragging_index {
            let duration = self.config.animation_duration();
            for (index, target) in drag::gap_layout(&columns, session.dragging_index, candidate) {
                let sibling = &columns[index];
                if sibling.desired_left() == target {
                    continue;
                }
                trace!(column = %sibling.id(), from = sibling.left(), to = target, "sibling slides");
                self.animator.animate(Transition {
                    column: sibling.id(),
                    target: sibling.left_property(),
                    from: sibling.left(),
                    to: target,
                    duration,
                });
                sibling.set_desired_left(target);
            }
        }

        session.destination_index = candidate;
        self.drag = Some(session);
        Ok(())
    }

    /// Drop the dragged column. Returns the `(from, to)` move applied, or
    /// `None` when the gesture was ignored.
    pub fn complete_drag(&mut self) -> Result<Option<(usize, usize)>> {
        let Some(session) = self.drag.take() else {
            return self.missing_session().map(|()| None);
        };
        if let Some(column) = self.sequence.get(session.dragging_index) {
            column.set_z_index(self.config.base_z_index);
        }
        self.animator.finish();
        let to = session.final_index();
        self.sequence.move_column(session.dragging_index, to)?;
        debug!(
            column = %session.column,
            from = session.dragging_index,
            to,
            "drag completed"
        );
        Ok(Some((session.dragging_index, to)))
    }

    /// Abandon the gesture and snap every column back to its slot.
    pub fn cancel_drag(&mut self) -> Result<()> {
        let Some(session) = self.drag.take() else {
            return self.missing_session();
        };
        if let Some(column) = self.sequence.get(session.dragging_index) {
            column.set_z_index(self.config.base_z_index);
        }
        self.animator.finish();
        self.sequence.arrange();
        debug!(column = %session.column, "drag canceled");
        Ok(())
    }

    /// Advance running transitions.
    pub fn tick(&mut self, dt: Duration) {
        self.animator.tick(dt);
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    // -----------------------------------------------------------------------
    // Sort
    // -----------------------------------------------------------------------

    /// Apply a header click and publish the resulting order.
    pub fn on_column_sort_requested(
        &mut self,
        id: ColumnId,
        extended: bool,
    ) -> Result<Vec<SortDescriptor>> {
        let descriptors = self.sequence.with(|columns| {
            sort::request_sort(columns, &mut self.sort.borrow_mut(), id, extended)
        })?;
        self.publish(&descriptors);
        Ok(descriptors)
    }

    /// Adopt an externally supplied order and publish it, so columns added
    /// later reconcile against the same list. Returns whether this view's
    /// sort list changed.
    pub fn reconcile_external_sort(&mut self, descriptors: &[SortDescriptor]) -> bool {
        let changed = self.sequence.with(|columns| {
            sort::reconcile_external(columns, &mut self.sort.borrow_mut(), descriptors)
        });
        self.publish(descriptors);
        changed
    }

    /// The current sort list as (member path, direction) pairs.
    #[must_use]
    pub fn sort_descriptors(&self) -> Vec<SortDescriptor> {
        self.sequence
            .with(|columns| sort::descriptors(columns, &self.sort.borrow()))
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.sort.borrow().clone()
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route one input event to the matching operation.
    pub fn update(&mut self, event: ColumnEvent) -> Result<()> {
        trace!(event = event.kind(), "column event");
        match event {
            ColumnEvent::DragStarted {
                column,
                pointer_offset,
            } => self.start_drag(column, pointer_offset).map(drop),
            ColumnEvent::DragDelta { delta } => self.drag(delta),
            ColumnEvent::DragCompleted => self.complete_drag().map(drop),
            ColumnEvent::DragCanceled => self.cancel_drag(),
            ColumnEvent::SortRequested { column, extended } => {
                self.on_column_sort_requested(column, extended).map(drop)
            }
            ColumnEvent::Resized { column, width } => self.resize_column(column, width).map(drop),
            ColumnEvent::VisibilityChanged { column, visible } => {
                self.set_column_visible(column, visible).map(drop)
            }
            ColumnEvent::ExternalSort(descriptors) => {
                self.reconcile_external_sort(&descriptors);
                Ok(())
            }
            ColumnEvent::Tick(dt) => {
                self.tick(dt);
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots & persistence
    // -----------------------------------------------------------------------

    /// Serializable picture of the header for hosts and golden tests.
    #[must_use]
    pub fn snapshot(&self) -> HeaderSnapshot {
        let columns = self.sequence.with(|columns| {
            columns
                .iter()
                .enumerate()
                .map(|(index, column)| ColumnSnapshot::capture(index, column))
                .collect()
        });
        HeaderSnapshot {
            orientation: self.config.orientation,
            allow_reorder: self.allow_reorder,
            total_width: self.total_width(),
            columns,
            sort: self.sort_descriptors(),
            drag: self.drag,
        }
    }

    /// Column order, widths, visibility and sort, keyed by member path.
    #[must_use]
    pub fn save_state(&self) -> ViewState {
        let columns = self.sequence.with(|columns| {
            columns
                .iter()
                .map(|column| ColumnState {
                    member_path: column.sort_member_path().to_owned(),
                    width: column.width(),
                    visible: column.is_visible(),
                })
                .collect()
        });
        ViewState {
            columns,
            sort: self.sort_descriptors(),
        }
    }

    /// Reapply a saved layout. Known columns move to the saved order (columns
    /// the state does not mention keep their relative order after them);
    /// saved entries with no matching column are skipped.
    pub fn restore_state(&mut self, state: &ViewState) -> Result<()> {
        self.ensure_idle()?;
        let current = self.sequence.to_vec();
        let mut order: Vec<ColumnId> = Vec::with_capacity(current.len());
        for saved in &state.columns {
            let hit = current
                .iter()
                .find(|c| c.sort_member_path() == saved.member_path && !order.contains(&c.id()));
            match hit {
                Some(column) => {
                    order.push(column.id());
                    column.set_width(saved.width);
                    column.set_visible(saved.visible);
                }
                None => warn!(member_path = %saved.member_path, "saved column not present; skipped"),
            }
        }
        for column in &current {
            if !order.contains(&column.id()) {
                order.push(column.id());
            }
        }
        self.sequence.reorder(&order)?;

        let changed = self.reconcile_external_sort(&state.sort);
        debug!(columns = order.len(), sort_changed = changed, "view state restored");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn make_column(&mut self, spec: ColumnSpec) -> Rc<Column> {
        let id = ColumnId::new(self.next_id);
        self.next_id += 1;
        Rc::new(Column::new(
            id,
            spec,
            self.config.default_min_width,
            self.config.default_max_width,
            self.config.base_z_index,
        ))
    }

    fn require(&self, id: ColumnId) -> Result<Rc<Column>> {
        self.sequence
            .find(id)
            .ok_or(ColumnViewError::UnknownColumn(id))
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.drag.is_some() {
            Err(ColumnViewError::DragInProgress)
        } else {
            Ok(())
        }
    }

    fn missing_session(&self) -> Result<()> {
        if self.allow_reorder {
            Err(ColumnViewError::NoDragSession)
        } else {
            Ok(())
        }
    }

    fn refresh_ranks(&self) {
        let state = self.sort.borrow();
        self.sequence.with(|columns| {
            for (rank, id) in state.order().iter().enumerate() {
                if let Some(column) = columns.iter().find(|c| c.id() == *id) {
                    column.set_sort_order(Some(rank));
                }
            }
        });
    }

    fn adopt_channel_sort(&mut self) {
        if let Some(current) = self.channel.as_ref().map(SortChannel::current) {
            self.sequence.with(|columns| {
                sort::reconcile_external(columns, &mut self.sort.borrow_mut(), &current)
            });
        }
    }

    fn publish(&self, descriptors: &[SortDescriptor]) {
        if let Some(channel) = &self.channel
            && channel.publish(descriptors.to_vec())
        {
            debug!(count = descriptors.len(), "sort published");
        }
    }
}

fn subscribe_channel(
    channel: &SortChannel,
    columns: &SharedColumns,
    sort: &Rc<RefCell<SortState>>,
) -> Subscription {
    let columns: Weak<_> = Rc::downgrade(columns);
    let sort = Rc::downgrade(sort);
    channel.subscribe(move |descriptors| {
        let (Some(columns), Some(sort)) = (columns.upgrade(), sort.upgrade()) else {
            return;
        };
        let (Ok(columns), Ok(mut state)) = (columns.try_borrow(), sort.try_borrow_mut()) else {
            warn!("sort publication arrived mid-update; skipped");
            return;
        };
        sort::reconcile_external(&columns, &mut state, descriptors);
    })
}
