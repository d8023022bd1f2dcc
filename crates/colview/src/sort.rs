#![forbid(unsafe_code)]

//! Multi-column sort reconciliation.
//!
//! The sort list is an ordered set of column ids, most significant first.
//! Each column also carries its own direction and rank so a header can draw
//! its indicator without consulting the list.
//!
//! # Invariants
//!
//! 1. A column appears in the list at most once.
//! 2. A column absent from the list has no direction and no rank.
//! 3. Every write is skipped when the stored value already matches, so
//!    reconciling an unchanged order produces no notifications.

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::column::{Column, ColumnId};
use crate::error::{ColumnViewError, Result};

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// One entry of the sort order exchanged with the sort command channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub member_path: String,
    pub direction: SortDirection,
}

impl SortDescriptor {
    #[must_use]
    pub fn new(member_path: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            member_path: member_path.into(),
            direction,
        }
    }

    #[must_use]
    pub fn ascending(member_path: impl Into<String>) -> Self {
        Self::new(member_path, SortDirection::Ascending)
    }

    #[must_use]
    pub fn descending(member_path: impl Into<String>) -> Self {
        Self::new(member_path, SortDirection::Descending)
    }
}

/// Ordered list of sorted columns, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    order: Vec<ColumnId>,
}

impl SortState {
    #[must_use]
    pub fn order(&self) -> &[ColumnId] {
        &self.order
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn contains(&self, id: ColumnId) -> bool {
        self.order.contains(&id)
    }

    /// Drop a column from the list, e.g. when it leaves the view.
    pub(crate) fn forget(&mut self, id: ColumnId) -> bool {
        let before = self.order.len();
        self.order.retain(|c| *c != id);
        before != self.order.len()
    }

    fn debug_check_unique(&self) {
        debug_assert_eq!(
            self.order.iter().collect::<HashSet<_>>().len(),
            self.order.len(),
            "sort list holds a column twice: {:?}",
            self.order
        );
    }
}

fn find(columns: &[Rc<Column>], id: ColumnId) -> Option<&Rc<Column>> {
    columns.iter().find(|c| c.id() == id)
}

/// Apply a user sort click on `id`.
///
/// - If `id` is the last (most recently added) entry, its direction toggles.
/// - Else an extended click appends `id` ascending unless already listed.
/// - Else the list is reset to `id` ascending.
///
/// Afterwards every unlisted column is cleared and ranks are refreshed.
/// Returns the reconciled descriptor list.
pub fn request_sort(
    columns: &[Rc<Column>],
    state: &mut SortState,
    id: ColumnId,
    extended: bool,
) -> Result<Vec<SortDescriptor>> {
    let column = find(columns, id).ok_or(ColumnViewError::UnknownColumn(id))?;

    if state.order.last() == Some(&id) {
        let next = column
            .sort_direction()
            .map_or(SortDirection::Ascending, SortDirection::toggled);
        column.set_sort_direction(Some(next));
        debug!(column = %id, direction = ?next, "sort direction toggled");
    } else if extended {
        if !state.contains(id) {
            state.order.push(id);
            column.set_sort_direction(Some(SortDirection::Ascending));
            debug!(column = %id, depth = state.len(), "sort column appended");
        }
    } else {
        state.order.clear();
        state.order.push(id);
        column.set_sort_direction(Some(SortDirection::Ascending));
        debug!(column = %id, "sort reset to single column");
    }
    state.debug_check_unique();

    for col in columns {
        match state.order.iter().position(|c| *c == col.id()) {
            Some(rank) => {
                col.set_sort_order(Some(rank));
            }
            None => {
                col.set_sort_direction(None);
                col.set_sort_order(None);
            }
        }
    }

    Ok(descriptors(columns, state))
}

/// Adopt a sort order published by an external source.
///
/// Columns are matched by exact sort-member-path; the list follows the
/// descriptor order and each matched column takes the descriptor's
/// direction and position as rank. Unmatched columns are cleared. Returns
/// `true` when the list itself changed.
pub fn reconcile_external(
    columns: &[Rc<Column>],
    state: &mut SortState,
    descriptors: &[SortDescriptor],
) -> bool {
    let mut paths = HashSet::with_capacity(descriptors.len());
    for d in descriptors {
        if !paths.insert(d.member_path.as_str()) {
            warn!(
                member_path = %d.member_path,
                "duplicate sort descriptor; first entry wins"
            );
        }
    }

    let mut matched: Vec<(usize, ColumnId)> = Vec::with_capacity(descriptors.len());
    for column in columns {
        let hit = descriptors
            .iter()
            .position(|d| d.member_path == column.sort_member_path());
        match hit {
            Some(rank) => {
                column.set_sort_direction(Some(descriptors[rank].direction));
                column.set_sort_order(Some(rank));
                matched.push((rank, column.id()));
            }
            None => {
                column.set_sort_direction(None);
                column.set_sort_order(None);
            }
        }
    }
    matched.sort_by_key(|(rank, _)| *rank);

    let order: Vec<ColumnId> = matched.into_iter().map(|(_, id)| id).collect();
    if state.order == order {
        return false;
    }
    debug!(from = ?state.order, to = ?order, "external sort adopted");
    state.order = order;
    state.debug_check_unique();
    true
}

/// The current sort list as descriptors, most significant first.
#[must_use]
pub fn descriptors(columns: &[Rc<Column>], state: &SortState) -> Vec<SortDescriptor> {
    state
        .order
        .iter()
        .filter_map(|id| find(columns, *id))
        .map(|col| {
            SortDescriptor::new(
                col.sort_member_path(),
                col.sort_direction().unwrap_or(SortDirection::Ascending),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::column::ColumnSpec;

    fn columns(names: &[&str]) -> Vec<Rc<Column>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Rc::new(Column::new(
                    ColumnId::new(i as u64),
                    ColumnSpec::new(*name, 50.0),
                    0.0,
                    None,
                    0,
                ))
            })
            .collect()
    }

    fn id(i: u64) -> ColumnId {
        ColumnId::new(i)
    }

    #[test]
    fn simple_click_toggles_last_entry() {
        let cols = columns(&["A", "B"]);
        let mut state = SortState::default();

        let d = request_sort(&cols, &mut state, id(0), false).unwrap();
        assert_eq!(d, vec![SortDescriptor::ascending("A")]);

        let d = request_sort(&cols, &mut state, id(0), false).unwrap();
        assert_eq!(d, vec![SortDescriptor::descending("A")]);

        let d = request_sort(&cols, &mut state, id(0), false).unwrap();
        assert_eq!(d, vec![SortDescriptor::ascending("A")]);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn extended_click_accumulates_and_simple_click_resets() {
        let cols = columns(&["A", "B", "C"]);
        let mut state = SortState::default();

        request_sort(&cols, &mut state, id(0), false).unwrap();
        let d = request_sort(&cols, &mut state, id(1), true).unwrap();
        assert_eq!(
            d,
            vec![SortDescriptor::ascending("A"), SortDescriptor::ascending("B")]
        );
        assert_eq!(cols[0].sort_order(), Some(0));
        assert_eq!(cols[1].sort_order(), Some(1));

        let d = request_sort(&cols, &mut state, id(2), false).unwrap();
        assert_eq!(d, vec![SortDescriptor::ascending("C")]);
        assert_eq!(cols[0].sort_direction(), None);
        assert_eq!(cols[0].sort_order(), None);
        assert_eq!(cols[1].sort_direction(), None);
        assert_eq!(cols[2].sort_order(), Some(0));
    }

    #[test]
    fn extended_click_on_listed_non_last_column_is_a_no_op() {
        let cols = columns(&["A", "B"]);
        let mut state = SortState::default();
        request_sort(&cols, &mut state, id(0), false).unwrap();
        request_sort(&cols, &mut state, id(1), true).unwrap();

        let d = request_sort(&cols, &mut state, id(0), true).unwrap();
        assert_eq!(
            d,
            vec![SortDescriptor::ascending("A"), SortDescriptor::ascending("B")]
        );
    }

    #[test]
    fn extended_click_on_last_entry_toggles() {
        let cols = columns(&["A", "B"]);
        let mut state = SortState::default();
        request_sort(&cols, &mut state, id(0), false).unwrap();
        request_sort(&cols, &mut state, id(1), true).unwrap();

        let d = request_sort(&cols, &mut state, id(1), true).unwrap();
        assert_eq!(
            d,
            vec![SortDescriptor::ascending("A"), SortDescriptor::descending("B")]
        );
    }

    #[test]
    fn unknown_column_is_rejected() {
        let cols = columns(&["A"]);
        let mut state = SortState::default();
        assert_eq!(
            request_sort(&cols, &mut state, id(9), false),
            Err(ColumnViewError::UnknownColumn(id(9)))
        );
        assert!(state.is_empty());
    }

    #[test]
    fn external_order_follows_descriptors() {
        let cols = columns(&["A", "B", "C"]);
        let mut state = SortState::default();

        let changed = reconcile_external(
            &cols,
            &mut state,
            &[
                SortDescriptor::descending("C"),
                SortDescriptor::ascending("missing"),
                SortDescriptor::ascending("A"),
            ],
        );
        assert!(changed);
        assert_eq!(state.order(), &[id(2), id(0)]);
        assert_eq!(cols[2].sort_direction(), Some(SortDirection::Descending));
        assert_eq!(cols[2].sort_order(), Some(0));
        assert_eq!(cols[0].sort_order(), Some(2), "rank is the descriptor position");
        assert_eq!(cols[1].sort_direction(), None);
    }

    #[test]
    fn external_duplicates_first_match_wins() {
        let cols = columns(&["A"]);
        let mut state = SortState::default();
        reconcile_external(
            &cols,
            &mut state,
            &[SortDescriptor::descending("A"), SortDescriptor::ascending("A")],
        );
        assert_eq!(cols[0].sort_direction(), Some(SortDirection::Descending));
        assert_eq!(state.order(), &[id(0)]);
    }

    #[test]
    fn external_reconcile_with_identical_state_is_silent() {
        let cols = columns(&["A", "B"]);
        let mut state = SortState::default();
        request_sort(&cols, &mut state, id(1), false).unwrap();
        let current = descriptors(&cols, &state);

        let notified = Rc::new(Cell::new(0u32));
        let _subs: Vec<_> = cols
            .iter()
            .map(|column| {
                let notified = Rc::clone(&notified);
                column.observe(move |_| notified.set(notified.get() + 1))
            })
            .collect();

        assert!(!reconcile_external(&cols, &mut state, &current));
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn forget_removes_entry() {
        let cols = columns(&["A", "B"]);
        let mut state = SortState::default();
        request_sort(&cols, &mut state, id(0), false).unwrap();
        request_sort(&cols, &mut state, id(1), true).unwrap();
        assert!(state.forget(id(0)));
        assert!(!state.forget(id(0)));
        assert_eq!(state.order(), &[id(1)]);
    }
}
