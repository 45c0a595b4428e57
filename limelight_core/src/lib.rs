// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive render-loop driver over an external 3D rendering library.
//!
//! `limelight_core` owns the one piece of real control flow in a "set up a
//! camera, lights, renderer and orbit controls, then loop" tool: deciding
//! *when* frames are produced and keeping the renderer's backing buffer in
//! step with its displayed size. Everything that actually draws lives behind
//! the collaborator traits in [`backend`]. The crate is `no_std` (with
//! `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Host (requestAnimationFrame, window signals)
//!       │ schedule_frame()            ▲
//!       ▼                             │ request()
//!   Driver::on_frame(ms) ──► FrameRequests ◄── change / resize listeners
//!       │
//!       ├─► reconcile()  ── backing size, overlay size, camera aspect
//!       │
//!       └─► FrameStrategy::produce_frame()
//!               Continuous │ Bloom │ OnDemand
//!                    │
//!                    ▼
//!   SceneRenderer / OverlayRenderer / Compositor / InputController
//! ```
//!
//! **[`surface`]** — Backing-buffer sizing and the per-frame resize
//! reconciliation step.
//!
//! **[`request`]** — [`FrameRequests`](request::FrameRequests), the shared
//! coalescing "render requested" flag plus the stop flag.
//!
//! **[`strategy`]** — The three frame-production strategies behind one
//! [`FrameStrategy`](strategy::FrameStrategy) trait.
//!
//! **[`driver`]** — [`Driver`](driver::Driver), which runs the shared
//! pre-frame step and dispatches to the active strategy.
//!
//! **[`stage`]** — [`Stage`](stage::Stage), the bundle of scene, camera and
//! collaborators a driver owns, and its constructor defaults.
//!
//! **[`backend`]** — Collaborator and host traits.
//!
//! **[`camera`]**, **[`light`]**, **[`config`]** — Construction parameters
//! and defaults.
//!
//! **[`timing`]** — [`FrameTick`](timing::FrameTick).
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod camera;
pub mod config;
pub mod driver;
pub mod light;
pub mod request;
pub mod stage;
pub mod strategy;
pub mod surface;
pub mod timing;
pub mod trace;

#[cfg(test)]
pub(crate) mod testing;
