#![forbid(unsafe_code)]

//! Column sequence and header layout.
//!
//! The sequence owns display order. Every structural mutation, and every
//! width or visibility change on a member column, re-runs
//! [`arrange_header`] so offsets never go stale.
//!
//! # Invariants
//!
//! 1. After arrange, visible columns are contiguous from 0 in sequence
//!    order: `left[i] == sum(width of visible columns before i)`.
//! 2. Invisible columns consume no space.
//! 3. Arranging twice without an intervening mutation writes nothing.
//!
//! # Failure Modes
//!
//! - Mutating the sequence from inside a width/visibility listener of one of
//!   its own columns panics (the listener holds a shared borrow while it
//!   arranges). Listeners registered by the sequence never do this.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::column::{Column, ColumnId};
use crate::error::{ColumnViewError, Result};
use crate::observable::Subscription;

pub(crate) type SharedColumns = Rc<RefCell<Vec<Rc<Column>>>>;

/// Recompute `left` (and reset `desired_left`) for every visible column.
pub fn arrange_header(columns: &[Rc<Column>]) {
    let mut offset = 0.0;
    for column in columns {
        if !column.is_visible() {
            continue;
        }
        column.set_left(offset);
        column.set_desired_left(offset);
        offset += column.width();
    }
}

/// Index of the visible column whose `[left, left + width)` span contains
/// `offset`.
///
/// Negative offsets map to 0; offsets that hit no span (past the right edge,
/// or an empty header) map to the column count.
#[must_use]
pub fn find_index(columns: &[Rc<Column>], offset: f64) -> usize {
    let spans = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_visible())
        .map(|(i, c)| (i, c.left(), c.width()));
    find_in_spans(spans, offset, columns.len())
}

/// Linear first-match scan shared by [`find_index`] and the drag hit test.
pub(crate) fn find_in_spans(
    spans: impl IntoIterator<Item = (usize, f64, f64)>,
    offset: f64,
    count: usize,
) -> usize {
    if offset < 0.0 {
        return 0;
    }
    spans
        .into_iter()
        .find(|&(_, left, width)| offset >= left && offset < left + width)
        .map_or(count, |(index, _, _)| index)
}

/// Sum of visible widths.
#[must_use]
pub fn total_width(columns: &[Rc<Column>]) -> f64 {
    columns
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.width())
        .sum()
}

/// Ordered columns of one view plus the listeners that keep them arranged.
pub struct ColumnSequence {
    columns: SharedColumns,
    listeners: HashMap<ColumnId, [Subscription; 2]>,
}

impl Default for ColumnSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ColumnSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSequence")
            .field("columns", &self.columns.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ColumnSequence {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Rc::new(RefCell::new(Vec::new())),
            listeners: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rc<Column>> {
        self.columns.borrow().get(index).cloned()
    }

    #[must_use]
    pub fn find(&self, id: ColumnId) -> Option<Rc<Column>> {
        self.columns.borrow().iter().find(|c| c.id() == id).cloned()
    }

    #[must_use]
    pub fn index_of(&self, id: ColumnId) -> Option<usize> {
        self.columns.borrow().iter().position(|c| c.id() == id)
    }

    /// Snapshot of the current order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Rc<Column>> {
        self.columns.borrow().clone()
    }

    /// Iterate over a snapshot of the current order.
    pub fn iter(&self) -> std::vec::IntoIter<Rc<Column>> {
        self.to_vec().into_iter()
    }

    /// Run `f` against the live column slice.
    pub fn with<R>(&self, f: impl FnOnce(&[Rc<Column>]) -> R) -> R {
        f(&self.columns.borrow())
    }

    pub(crate) fn shared(&self) -> SharedColumns {
        Rc::clone(&self.columns)
    }

    pub fn add(&mut self, column: Rc<Column>) {
        let index = self.len();
        self.attach(index, column);
    }

    /// Insert at `index` in `[0, len]`.
    pub fn insert(&mut self, index: usize, column: Rc<Column>) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(ColumnViewError::IndexOutOfRange { index, len });
        }
        self.attach(index, column);
        Ok(())
    }

    pub fn remove(&mut self, id: ColumnId) -> Result<Rc<Column>> {
        let index = self
            .index_of(id)
            .ok_or(ColumnViewError::UnknownColumn(id))?;
        let column = self.columns.borrow_mut().remove(index);
        self.listeners.remove(&id);
        debug!(column = %id, index, "column removed");
        self.arrange();
        Ok(column)
    }

    /// Move the column at `from` so it ends up at `to`.
    ///
    /// `to == len` is accepted and means "last".
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.len();
        if from >= len {
            return Err(ColumnViewError::IndexOutOfRange { index: from, len });
        }
        if to > len {
            return Err(ColumnViewError::IndexOutOfRange { index: to, len });
        }
        let to = to.min(len - 1);
        if from != to {
            let mut columns = self.columns.borrow_mut();
            let column = columns.remove(from);
            columns.insert(to, column);
            debug!(from, to, "column moved");
        }
        self.arrange();
        Ok(())
    }

    /// Replace the order wholesale. `order` must be a permutation of the
    /// current ids; anything else is rejected untouched.
    pub(crate) fn reorder(&mut self, order: &[ColumnId]) -> Result<()> {
        let reordered = {
            let columns = self.columns.borrow();
            if order.len() != columns.len() {
                return Err(ColumnViewError::IndexOutOfRange {
                    index: order.len(),
                    len: columns.len(),
                });
            }
            order
                .iter()
                .map(|id| {
                    columns
                        .iter()
                        .find(|c| c.id() == *id)
                        .cloned()
                        .ok_or(ColumnViewError::UnknownColumn(*id))
                })
                .collect::<Result<Vec<_>>>()?
        };
        *self.columns.borrow_mut() = reordered;
        self.arrange();
        Ok(())
    }

    pub fn arrange(&self) {
        arrange_header(&self.columns.borrow());
    }

    #[must_use]
    pub fn find_index(&self, offset: f64) -> usize {
        find_index(&self.columns.borrow(), offset)
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        total_width(&self.columns.borrow())
    }

    fn attach(&mut self, index: usize, column: Rc<Column>) {
        let id = column.id();
        let weak = Rc::downgrade(&self.columns);
        let on_width = {
            let weak = Weak::clone(&weak);
            column.subscribe_width(move |old, new| {
                trace!(column = %id, old, new, "width changed");
                rearrange(&weak);
            })
        };
        let on_visible = column.subscribe_visible(move |old, new| {
            trace!(column = %id, old, new, "visibility changed");
            rearrange(&weak);
        });
        self.listeners.insert(id, [on_width, on_visible]);
        self.columns.borrow_mut().insert(index, column);
        debug!(column = %id, index, "column added");
        self.arrange();
    }
}

fn rearrange(columns: &Weak<RefCell<Vec<Rc<Column>>>>) {
    if let Some(columns) = columns.upgrade() {
        arrange_header(&columns.borrow());
    }
}
