// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser host for limelight.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafHost`]: [`Host`] over `requestAnimationFrame`, the `window` resize
//!   event, and `devicePixelRatio`
//! - [`WebRenderLoop`]: runs a [`Driver`](limelight_core::driver::Driver) on
//!   animation frames
//! - [`CanvasSurface`]: displayed and backing size of a `<canvas>`
//! - [`StatsPanel`]: DOM frame-rate readout implementing
//!   [`PerformanceMonitor`](limelight_core::backend::PerformanceMonitor)
//! - [`attach_overlay`]: stacks an overlay element above the canvas
//! - [`ConsoleSink`]: trace sink writing to the browser console
//! - [`DevtoolsBridge`]: exposes handles on the global object in dev mode

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

mod canvas;
mod console;
mod devtools;
mod dom;
mod raf;

pub use canvas::CanvasSurface;
pub use console::ConsoleSink;
pub use devtools::DevtoolsBridge;
pub use dom::{StatsPanel, attach_overlay};
pub use limelight_core::backend::Host;
pub use raf::{RafHost, WebRenderLoop};

/// Returns the current time from `performance.now()`, in milliseconds.
#[must_use]
pub fn now_ms() -> f64 {
    raf::performance_now()
}
