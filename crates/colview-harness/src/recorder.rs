#![forbid(unsafe_code)]

//! Property-change recorder spanning every column of a view.

use std::cell::RefCell;
use std::rc::Rc;

use colview::{ColumnChange, ColumnId, ColumnSubscription, ColumnView};

type Log = Rc<RefCell<Vec<(ColumnId, ColumnChange)>>>;

/// Subscribes to every column present when attached and logs each change.
///
/// Columns added afterwards are not observed; attach a new recorder.
pub struct ChangeRecorder {
    log: Log,
    _subscriptions: Vec<ColumnSubscription>,
}

impl std::fmt::Debug for ChangeRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRecorder")
            .field("changes", &self.log.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ChangeRecorder {
    #[must_use]
    pub fn attach(view: &ColumnView) -> Self {
        let log: Log = Rc::default();
        let subscriptions = view
            .columns()
            .iter()
            .map(|column| {
                let log = Rc::clone(&log);
                let id = column.id();
                column.observe(move |change| log.borrow_mut().push((id, *change)))
            })
            .collect();
        Self {
            log,
            _subscriptions: subscriptions,
        }
    }

    #[must_use]
    pub fn changes(&self) -> Vec<(ColumnId, ColumnChange)> {
        self.log.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }

    #[must_use]
    pub fn count_for(&self, column: ColumnId) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|(id, _)| *id == column)
            .count()
    }

    /// Changes to the named property (see [`ColumnChange::property`]).
    #[must_use]
    pub fn count_property(&self, property: &str) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|(_, change)| change.property() == property)
            .count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}
