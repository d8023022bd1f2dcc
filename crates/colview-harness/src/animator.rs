#![forbid(unsafe_code)]

//! Animator that records what it is asked to do.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use colview::{Animator, ColumnId, Transition};

/// One `animate` call as seen by the recorder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedTransition {
    pub column: ColumnId,
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

#[derive(Default)]
struct Log {
    transitions: Vec<RecordedTransition>,
    pending: Vec<Transition>,
    ticks: Vec<Duration>,
    finishes: usize,
}

/// Records every transition.
///
/// In the default mode transitions stay pending until [`Animator::finish`],
/// which mirrors a real animator mid-flight. [`RecordingAnimator::applying`]
/// writes end values immediately instead.
///
/// Clones share one log, so a test can keep a handle after boxing the
/// animator into a view.
#[derive(Clone, Default)]
pub struct RecordingAnimator {
    log: Rc<RefCell<Log>>,
    apply: bool,
}

impl std::fmt::Debug for RecordingAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log = self.log.borrow();
        f.debug_struct("RecordingAnimator")
            .field("transitions", &log.transitions)
            .field("pending", &log.pending.len())
            .field("finishes", &log.finishes)
            .field("apply", &self.apply)
            .finish()
    }
}

impl RecordingAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn applying() -> Self {
        Self {
            log: Rc::default(),
            apply: true,
        }
    }

    /// Boxed clone sharing this recorder's log.
    #[must_use]
    pub fn boxed(&self) -> Box<dyn Animator> {
        Box::new(self.clone())
    }

    #[must_use]
    pub fn transitions(&self) -> Vec<RecordedTransition> {
        self.log.borrow().transitions.clone()
    }

    /// Transitions requested for `column`, oldest first.
    #[must_use]
    pub fn transitions_for(&self, column: ColumnId) -> Vec<RecordedTransition> {
        self.log
            .borrow()
            .transitions
            .iter()
            .filter(|t| t.column == column)
            .copied()
            .collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.log.borrow().pending.len()
    }

    #[must_use]
    pub fn finish_count(&self) -> usize {
        self.log.borrow().finishes
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<Duration> {
        self.log.borrow().ticks.clone()
    }

    /// Forget recorded history; pending transitions are kept.
    pub fn clear(&self) {
        let mut log = self.log.borrow_mut();
        log.transitions.clear();
        log.ticks.clear();
        log.finishes = 0;
    }
}

impl Animator for RecordingAnimator {
    fn animate(&mut self, transition: Transition) {
        tracing::trace!(
            column = %transition.column,
            from = transition.from,
            to = transition.to,
            "recorded transition"
        );
        self.log.borrow_mut().transitions.push(RecordedTransition {
            column: transition.column,
            from: transition.from,
            to: transition.to,
            duration: transition.duration,
        });
        if self.apply {
            transition.target.set(transition.to);
            return;
        }
        let mut log = self.log.borrow_mut();
        log.pending.retain(|p| !p.target.ptr_eq(&transition.target));
        log.pending.push(transition);
    }

    fn tick(&mut self, dt: Duration) {
        self.log.borrow_mut().ticks.push(dt);
    }

    fn finish(&mut self) {
        let pending = {
            let mut log = self.log.borrow_mut();
            log.finishes += 1;
            std::mem::take(&mut log.pending)
        };
        for transition in pending {
            transition.target.set(transition.to);
        }
    }

    fn is_idle(&self) -> bool {
        self.log.borrow().pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colview::{ColumnSpec, ColumnView, ViewConfig};

    #[test]
    fn pending_transitions_land_on_finish() {
        let recorder = RecordingAnimator::new();
        let mut view = ColumnView::new(ViewConfig::default(), recorder.boxed(), None);
        let a = view.add_column(ColumnSpec::new("A", 100.0));
        let b = view.add_column(ColumnSpec::new("B", 150.0));

        view.start_drag(a, 10.0).unwrap();
        view.drag(200.0).unwrap();
        assert_eq!(recorder.transitions_for(b).len(), 1);
        assert_eq!(view.column(b).unwrap().left(), 100.0, "still in flight");
        assert!(view.is_animating());

        view.complete_drag().unwrap();
        assert_eq!(recorder.finish_count(), 1);
        assert_eq!(recorder.pending(), 0);
        assert_eq!(view.column(b).unwrap().left(), 0.0);
    }
}
