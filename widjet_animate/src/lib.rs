// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widjet Animate: a small swing-eased animation loop.
//!
//! The host owns the frame clock. [`Animation::start`] performs the first
//! update right away and returns an [`Animator`]; the host then calls
//! [`Animator::on_frame`] with each animation frame timestamp while it
//! returns [`FrameStatus::Running`].
//!
//! Progress is `min(1, elapsed / duration)` (1 for a zero duration), eased
//! with [`swing`]. Any [`Tween`] value can be animated; `f64` and the Kurbo
//! `Point`, `Vec2`, and `Size` types are supported out of the box.
//!
//! ```rust
//! use kurbo::Point;
//! use widjet_animate::{Animation, FrameStatus};
//!
//! let mut position = Point::ZERO;
//! let mut anim = Animation::new(Point::ZERO, Point::new(40.0, 0.0), 100.0)
//!     .start(0.0, |p, _| position = p, || {});
//! let mut t = 0.0;
//! while anim.on_frame(t) == FrameStatus::Running {
//!     t += 16.0;
//! }
//! drop(anim);
//! assert_eq!(position, Point::new(40.0, 0.0));
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): use the standard library for `cos`.
//! - `libm`: use `libm` through Kurbo in `no_std` builds.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod animation;
mod tween;

pub use animation::{Animation, Animator, FrameStatus};
pub use tween::{Tween, swing};
