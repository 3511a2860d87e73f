// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpolation and easing.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};

/// Values that can be linearly interpolated.
pub trait Tween: Copy {
    /// The value at fraction `t` of the way from `self` to `to`.
    ///
    /// `t` is usually in `[0, 1]` but is not clamped.
    fn tween(self, to: Self, t: f64) -> Self;
}

impl Tween for f64 {
    fn tween(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Tween for Point {
    fn tween(self, to: Self, t: f64) -> Self {
        Self::new(self.x.tween(to.x, t), self.y.tween(to.y, t))
    }
}

impl Tween for Vec2 {
    fn tween(self, to: Self, t: f64) -> Self {
        Self::new(self.x.tween(to.x, t), self.y.tween(to.y, t))
    }
}

impl Tween for Size {
    fn tween(self, to: Self, t: f64) -> Self {
        Self::new(self.width.tween(to.width, t), self.height.tween(to.height, t))
    }
}

/// Swing easing: slow at both ends, `0.5 - cos(progress * PI) / 2`.
pub fn swing(progress: f64) -> f64 {
    0.5 - (progress * core::f64::consts::PI).cos() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn swing_endpoints_and_midpoint() {
        assert!(close(swing(0.0), 0.0));
        assert!(close(swing(0.5), 0.5));
        assert!(close(swing(1.0), 1.0));
        assert!(swing(0.25) < 0.25, "eases in");
        assert!(swing(0.75) > 0.75, "eases out");
    }

    #[test]
    fn geometry_tweens_componentwise() {
        let p = Point::new(0.0, 10.0).tween(Point::new(10.0, 20.0), 0.5);
        assert_eq!(p, Point::new(5.0, 15.0));
        let v = Vec2::new(2.0, 2.0).tween(Vec2::ZERO, 0.25);
        assert_eq!(v, Vec2::new(1.5, 1.5));
        let s = Size::new(100.0, 0.0).tween(Size::new(200.0, 50.0), 1.0);
        assert_eq!(s, Size::new(200.0, 50.0));
        assert_eq!(3.0_f64.tween(-1.0, 0.5), 1.0);
    }
}
