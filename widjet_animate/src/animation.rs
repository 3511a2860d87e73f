// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-driven animation loop.

use tracing::trace;

use crate::tween::{Tween, swing};

/// Whether an [`Animator`] wants more frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Call [`Animator::on_frame`] again on the next animation frame.
    Running,
    /// The final value has been delivered and `end` has run.
    Finished,
}

/// A transition from `from` to `to` over `duration` time units.
///
/// Time units are whatever the host's frame timestamps use, typically
/// milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Animation<T> {
    /// Start value.
    pub from: T,
    /// End value.
    pub to: T,
    /// Length of the transition. Zero, negative, or NaN finishes at once.
    pub duration: f64,
}

impl<T: Tween> Animation<T> {
    /// Describe a transition.
    pub fn new(from: T, to: T, duration: f64) -> Self {
        Self { from, to, duration }
    }

    /// Eased progress in `[0, 1]` after `elapsed` time units.
    pub fn eased_at(&self, elapsed: f64) -> f64 {
        swing(self.progress_at(elapsed))
    }

    /// Linear progress in `[0, 1]` after `elapsed` time units.
    pub fn progress_at(&self, elapsed: f64) -> f64 {
        if self.duration > 0.0 {
            (elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// The value after `elapsed` time units.
    pub fn value_at(&self, elapsed: f64) -> T {
        self.from.tween(self.to, self.eased_at(elapsed))
    }

    /// Start at time `now` and deliver the first update immediately.
    ///
    /// `step` receives the current value and the eased progress on every
    /// update. `end` runs once, right after the update that reaches
    /// progress 1.
    pub fn start<S, E>(self, now: f64, step: S, end: E) -> Animator<T, S, E>
    where
        S: FnMut(T, f64),
        E: FnOnce(),
    {
        let mut animator = Animator {
            animation: self,
            started_at: now,
            step,
            end: Some(end),
        };
        animator.on_frame(now);
        animator
    }
}

/// A running [`Animation`]. Drive it with [`Animator::on_frame`].
///
/// ```
/// use widjet_animate::{Animation, FrameStatus};
///
/// let mut values = Vec::new();
/// let mut done = false;
/// let mut anim = Animation::new(0.0, 100.0, 200.0).start(
///     1000.0,
///     |v, _| values.push(v),
///     || done = true,
/// );
/// assert_eq!(anim.on_frame(1100.0), FrameStatus::Running);
/// assert_eq!(anim.on_frame(1200.0), FrameStatus::Finished);
/// drop(anim);
/// assert_eq!(values.len(), 3);
/// assert_eq!((values[0], values[2]), (0.0, 100.0));
/// assert!((values[1] - 50.0).abs() < 1e-9);
/// assert!(done);
/// ```
pub struct Animator<T, S, E> {
    animation: Animation<T>,
    started_at: f64,
    step: S,
    end: Option<E>,
}

impl<T: core::fmt::Debug, S, E> core::fmt::Debug for Animator<T, S, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Animator")
            .field("animation", &self.animation)
            .field("started_at", &self.started_at)
            .field("finished", &self.end.is_none())
            .finish_non_exhaustive()
    }
}

impl<T, S, E> Animator<T, S, E>
where
    T: Tween,
    S: FnMut(T, f64),
    E: FnOnce(),
{
    /// Advance to frame time `now`.
    ///
    /// Once finished, further calls do nothing and return
    /// [`FrameStatus::Finished`].
    pub fn on_frame(&mut self, now: f64) -> FrameStatus {
        let Some(end) = self.end.take() else {
            return FrameStatus::Finished;
        };
        let elapsed = now - self.started_at;
        let progress = self.animation.progress_at(elapsed);
        let eased = swing(progress);
        let value = self.animation.from.tween(self.animation.to, eased);
        (self.step)(value, eased);
        if progress < 1.0 {
            self.end = Some(end);
            FrameStatus::Running
        } else {
            trace!(elapsed, "animation finished");
            end();
            FrameStatus::Finished
        }
    }

    /// Current status.
    pub fn status(&self) -> FrameStatus {
        if self.end.is_some() {
            FrameStatus::Running
        } else {
            FrameStatus::Finished
        }
    }

    /// The animation being run.
    pub fn animation(&self) -> &Animation<T> {
        &self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use kurbo::Point;

    #[test]
    fn zero_duration_finishes_on_start() {
        let ends = Cell::new(0);
        let mut seen = Vec::new();
        let anim = Animation::new(1.0, 2.0, 0.0).start(
            5.0,
            |v, e| seen.push((v, e)),
            || ends.set(ends.get() + 1),
        );
        assert_eq!(anim.status(), FrameStatus::Finished);
        drop(anim);
        assert_eq!(seen, [(2.0, 1.0)]);
        assert_eq!(ends.get(), 1);
    }

    #[test]
    fn end_runs_once_and_frames_after_finish_are_ignored() {
        let ends = Cell::new(0);
        let steps = Cell::new(0);
        let mut anim = Animation::new(0.0, 1.0, 10.0).start(
            0.0,
            |_, _| steps.set(steps.get() + 1),
            || ends.set(ends.get() + 1),
        );
        assert_eq!(anim.on_frame(20.0), FrameStatus::Finished);
        assert_eq!(anim.on_frame(30.0), FrameStatus::Finished);
        assert_eq!(steps.get(), 2);
        assert_eq!(ends.get(), 1);
    }

    #[test]
    fn frames_before_start_clamp_to_origin() {
        let anim = Animation::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 100.0);
        assert_eq!(anim.value_at(-50.0), Point::new(0.0, 0.0));
        assert_eq!(anim.value_at(500.0), Point::new(10.0, 10.0));
        assert_eq!(anim.progress_at(25.0), 0.25);
    }

    #[test]
    fn nan_duration_finishes() {
        let anim = Animation::new(0.0, 1.0, f64::NAN);
        assert_eq!(anim.progress_at(0.0), 1.0);
    }
}
