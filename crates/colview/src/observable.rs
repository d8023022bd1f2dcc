#![forbid(unsafe_code)]

//! Shared, change-notifying cells for column attributes.
//!
//! Every mutable attribute of a column (width, offset, z-order, sort
//! indicator) lives in an [`Observable<T>`]. Writers call [`Observable::set`];
//! layout, animation and host code listen with [`Observable::subscribe`] and
//! receive `(old, new)` whenever the stored value actually changes.
//!
//! Handles are cheap clones of one `Rc<RefCell<..>>`, so an animator can hold
//! a column's offset cell while the column itself stays owned by the view.
//!
//! # Failure Modes
//!
//! - A listener that writes a *different* value back into the cell it
//!   listens to recurses until the values agree. Writing back an equal value
//!   stops immediately, and the sort channel echo relies on that.
//! - Listeners whose [`Subscription`] was dropped stay in the list until the
//!   next change notification sweeps them out.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace_span;
use web_time::Instant;

type Listener<T> = dyn Fn(&T, &T);

struct Slot<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<Listener<T>>>,
}

/// A value cell with a change counter and `(old, new)` listeners.
///
/// Clones alias the same cell.
///
/// # Invariants
///
/// 1. Storing a value equal to the current one changes nothing and notifies
///    nobody.
/// 2. Each effective change bumps [`version`](Self::version) by one.
/// 3. Listeners run in the order they subscribed, with no borrow of the cell
///    held, so they may read or write it.
pub struct Observable<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Observable")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .field("listeners", &slot.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// A fresh cell at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        let slot = Slot {
            value,
            version: 0,
            listeners: Vec::new(),
        };
        Self {
            slot: Rc::new(RefCell::new(slot)),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow().value)
    }

    /// Store `value`, returning whether it differed from what was there.
    pub fn set(&self, value: T) -> bool {
        let previous = {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return false;
            }
            slot.version += 1;
            std::mem::replace(&mut slot.value, value)
        };
        self.broadcast(&previous);
        true
    }

    /// Edit the value in place. Listeners fire only if the edit changed it.
    pub fn update(&self, edit: impl FnOnce(&mut T)) -> bool {
        let previous = {
            let mut slot = self.slot.borrow_mut();
            let before = slot.value.clone();
            edit(&mut slot.value);
            if slot.value == before {
                return false;
            }
            slot.version += 1;
            before
        };
        self.broadcast(&previous);
        true
    }

    /// Register `listener` for `(old, new)` pairs. It stays registered for
    /// as long as the returned guard lives.
    pub fn subscribe(&self, listener: impl Fn(&T, &T) + 'static) -> Subscription {
        let owned: Rc<Listener<T>> = Rc::new(listener);
        self.slot
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&owned));
        Subscription {
            _keep_alive: Box::new(owned),
        }
    }

    /// Number of effective changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    /// Registered listeners, counting dropped ones not yet swept.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.slot.borrow().listeners.len()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    fn broadcast(&self, previous: &T) {
        let (live, current) = {
            let mut slot = self.slot.borrow_mut();
            let mut live = Vec::with_capacity(slot.listeners.len());
            slot.listeners.retain(|weak| match weak.upgrade() {
                Some(listener) => {
                    live.push(listener);
                    true
                }
                None => false,
            });
            if live.is_empty() {
                return;
            }
            (live, slot.value.clone())
        };

        let started = Instant::now();
        let span = trace_span!(
            "observable.notify",
            listeners = live.len() as u64,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();
        for listener in &live {
            listener(previous, &current);
        }
        span.record("duration_us", started.elapsed().as_micros() as u64);
    }
}

/// Keeps a listener registered. Drop it to stop receiving changes.
pub struct Subscription {
    _keep_alive: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
