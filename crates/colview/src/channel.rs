#![forbid(unsafe_code)]

//! Shared sort command channel.
//!
//! A [`SortChannel`] carries the canonical sort order between a column view
//! and whatever else sorts the same data (a toolbar, a saved query, another
//! view over the same rows). Publishing an identical list is a no-op, so a
//! view that publishes and then hears its own echo does nothing.

use crate::observable::{Observable, Subscription};
use crate::sort::SortDescriptor;

/// Cloneable handle to a shared sort order. Clones see the same value.
#[derive(Clone, Default)]
pub struct SortChannel {
    descriptors: Observable<Vec<SortDescriptor>>,
}

impl std::fmt::Debug for SortChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortChannel")
            .field("descriptors", &self.current())
            .field("subscribers", &self.descriptors.subscriber_count())
            .finish()
    }
}

impl SortChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published order. Returns `true` if it changed.
    pub fn publish(&self, descriptors: Vec<SortDescriptor>) -> bool {
        self.descriptors.set(descriptors)
    }

    #[must_use]
    pub fn current(&self) -> Vec<SortDescriptor> {
        self.descriptors.get()
    }

    /// Listen for new orders. Dropping the guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&[SortDescriptor]) + 'static) -> Subscription {
        self.descriptors.subscribe(move |_old, new| callback(new))
    }

    /// Number of publications that changed the order.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.descriptors.version()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn identical_publication_is_silent() {
        let channel = SortChannel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = channel.subscribe(move |d| sink.borrow_mut().push(d.to_vec()));

        assert!(channel.publish(vec![SortDescriptor::ascending("name")]));
        assert!(!channel.publish(vec![SortDescriptor::ascending("name")]));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(channel.version(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = SortChannel::new();
        let b = a.clone();
        a.publish(vec![SortDescriptor::descending("size")]);
        assert_eq!(b.current(), vec![SortDescriptor::descending("size")]);
    }
}
