// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for render-loop
//! diagnostics.
//!
//! This crate provides [`TraceSink`](limelight_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: Human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: Compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: Writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! Sinks are installed on a dev-mode stage through
//! [`DebugContext::traced`](limelight_core::stage::DebugContext::traced).

pub mod chrome;
pub mod pretty;
pub mod recorder;
