// Copyright 2025 the Widjet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation loop basics.
//!
//! Drive a swing-eased move with a simulated 60 Hz frame clock.
//!
//! Run:
//! - `cargo run -p widjet_demos --example animate_basics`

use kurbo::Point;
use widjet_animate::{Animation, FrameStatus};

fn main() {
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut frames = 0_u32;
    let mut anim = Animation::new(Point::new(0.0, 0.0), Point::new(300.0, 120.0), 250.0).start(
        0.0,
        |p, eased| println!("eased {eased:.3}  at ({:.1}, {:.1})", p.x, p.y),
        || println!("done"),
    );
    let mut now = 0.0;
    while anim.status() == FrameStatus::Running {
        now += FRAME_MS;
        anim.on_frame(now);
        frames += 1;
    }
    println!("{frames} frames after the first update");
}
