#![forbid(unsafe_code)]

//! Transition runners for column offsets.
//!
//! The reconciler never waits for an animation. It hands a [`Transition`] to
//! an injected [`Animator`] and moves on; the animator owns interpolation and
//! writes the target property as time passes.
//!
//! # Invariants
//!
//! 1. A new transition for a target that is already animating replaces the
//!    running one and starts from the target's *current* value.
//! 2. `finish()` writes every in-flight end value and leaves the animator
//!    idle.
//! 3. A zero duration is clamped to 1ns, so `progress()` never divides by
//!    zero and the first tick completes the tween.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::column::ColumnId;
use crate::config::ViewConfig;
use crate::observable::Observable;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Easing curve applied to linear progress in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Cubic ease-out: fast start, gentle landing.
    #[default]
    EaseOut,
    /// Cubic ease-in-out.
    EaseInOut,
}

impl Easing {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transition / Animator
// ---------------------------------------------------------------------------

/// A request to move `target` from `from` to `to` over `duration`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub column: ColumnId,
    pub target: Observable<f64>,
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

/// Runs transitions on behalf of the reconciler.
///
/// Only [`animate`](Animator::animate) is required. Time-based runners
/// override [`tick`](Animator::tick) and [`finish`](Animator::finish).
pub trait Animator {
    /// Start a transition. Fire-and-forget: no completion is reported back.
    fn animate(&mut self, transition: Transition);

    /// Advance running transitions by `dt`.
    fn tick(&mut self, _dt: Duration) {}

    /// Jump every running transition to its end value and drop it.
    fn finish(&mut self) {}

    /// Whether no transition is running.
    fn is_idle(&self) -> bool {
        true
    }
}

/// Applies every transition's end value synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAnimator;

impl Animator for ImmediateAnimator {
    fn animate(&mut self, transition: Transition) {
        transition.target.set(transition.to);
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Time-based interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Linear progress in `[0.0, 1.0]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.to
    }
}

struct Running {
    column: ColumnId,
    target: Observable<f64>,
    tween: Tween,
}

/// Production animator: interpolates targets as [`tick`](Animator::tick) is
/// driven by the host's frame clock.
pub struct TweenAnimator {
    easing: Easing,
    running: Vec<Running>,
}

impl TweenAnimator {
    #[must_use]
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            running: Vec::new(),
        }
    }

    /// Animator using the configured easing curve.
    #[must_use]
    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.easing)
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Number of transitions still in flight.
    #[must_use]
    pub fn running(&self) -> usize {
        self.running.len()
    }
}

impl Default for TweenAnimator {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}

impl std::fmt::Debug for TweenAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenAnimator")
            .field("easing", &self.easing)
            .field("running", &self.running.len())
            .finish()
    }
}

impl Animator for TweenAnimator {
    fn animate(&mut self, transition: Transition) {
        // Restart from wherever the target is now, not from the caller's
        // `from`, so an interrupted slide continues without a jump.
        let start = transition.target.get();
        let tween = Tween::new(start, transition.to, transition.duration, self.easing);
        trace!(
            column = %transition.column,
            from = start,
            to = transition.to,
            "tween started"
        );
        if let Some(slot) = self
            .running
            .iter_mut()
            .find(|r| r.target.ptr_eq(&transition.target))
        {
            slot.column = transition.column;
            slot.tween = tween;
        } else {
            self.running.push(Running {
                column: transition.column,
                target: transition.target,
                tween,
            });
        }
    }

    fn tick(&mut self, dt: Duration) {
        for running in &mut self.running {
            running.tween.tick(dt);
            running.target.set(running.tween.value());
        }
        self.running.retain(|r| {
            let done = r.tween.is_complete();
            if done {
                trace!(column = %r.column, "tween complete");
            }
            !done
        });
    }

    fn finish(&mut self) {
        for running in self.running.drain(..) {
            running.target.set(running.tween.end());
        }
    }

    fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS100: Duration = Duration::from_millis(100);
    const MS250: Duration = Duration::from_millis(250);

    fn transition(target: &Observable<f64>, to: f64) -> Transition {
        Transition {
            column: ColumnId::new(0),
            target: target.clone(),
            from: target.get(),
            to,
            duration: MS250,
        }
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0, "clamped above");
        }
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn tween_reaches_end() {
        let mut tween = Tween::new(0.0, 100.0, MS250, Easing::Linear);
        tween.tick(MS100);
        assert!((tween.value() - 40.0).abs() < 1e-9);
        tween.tick(Duration::from_secs(1));
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 100.0);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tween = Tween::new(5.0, 9.0, Duration::ZERO, Easing::EaseOut);
        assert!(!tween.is_complete());
        tween.tick(Duration::from_nanos(1));
        assert_eq!(tween.value(), 9.0);
    }

    #[test]
    fn immediate_animator_applies_end_value() {
        let left = Observable::new(10.0);
        ImmediateAnimator.animate(transition(&left, 42.0));
        assert_eq!(left.get(), 42.0);
    }

    #[test]
    fn tween_animator_interpolates_and_prunes() {
        let left = Observable::new(0.0);
        let mut animator = TweenAnimator::new(Easing::Linear);
        animator.animate(transition(&left, 100.0));
        assert!(!animator.is_idle());

        animator.tick(MS100);
        assert!((left.get() - 40.0).abs() < 1e-9);

        animator.tick(MS250);
        assert_eq!(left.get(), 100.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn retarget_restarts_from_current_position() {
        let left = Observable::new(0.0);
        let mut animator = TweenAnimator::new(Easing::Linear);
        animator.animate(transition(&left, 100.0));
        animator.tick(MS100);
        assert!((left.get() - 40.0).abs() < 1e-9);

        animator.animate(transition(&left, 0.0));
        assert_eq!(animator.running(), 1, "same target replaces the tween");

        animator.tick(MS100);
        // 40 -> 0 over 250ms, 100ms in: 40 - 16 = 24.
        assert!((left.get() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn from_config_uses_configured_easing() {
        let config = ViewConfig {
            easing: Easing::EaseInOut,
            ..ViewConfig::default()
        };
        let mut animator = TweenAnimator::from_config(&config);
        assert_eq!(animator.easing(), Easing::EaseInOut);

        let left = Observable::new(0.0);
        animator.animate(transition(&left, 100.0));
        animator.tick(Duration::from_millis(125));
        assert!((left.get() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn finish_jumps_to_end() {
        let a = Observable::new(0.0);
        let b = Observable::new(50.0);
        let mut animator = TweenAnimator::default();
        animator.animate(transition(&a, 10.0));
        animator.animate(transition(&b, 0.0));
        assert_eq!(animator.running(), 2);

        animator.finish();
        assert_eq!(a.get(), 10.0);
        assert_eq!(b.get(), 0.0);
        assert!(animator.is_idle());
    }
}
