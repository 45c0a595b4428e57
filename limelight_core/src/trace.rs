// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the render loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! driver calls at each step of a frame. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a frame and
//! produces a [`FrameSummary`] at the end. The driver returns the summary from
//! every frame whether or not tracing is enabled.
//!
//! A sink is installed through
//! [`DebugContext::sink`](crate::stage::DebugContext::sink), so only dev-mode
//! stages are ever traced.

use crate::strategy::StrategyKind;
use crate::surface::{BackingSize, Reconciliation};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which step of a frame is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Backing-buffer resize reconciliation.
    Reconcile,
    /// Overlay (label) render.
    Overlay,
    /// Direct scene render.
    Scene,
    /// Post-processing compositor render.
    Composite,
    /// Input controller damping step.
    Input,
    /// Caller-supplied frame callback.
    Callback,
    /// Performance monitor update.
    Monitor,
}

impl PhaseKind {
    /// All phases, in index order.
    pub const ALL: [Self; 7] = [
        Self::Reconcile,
        Self::Overlay,
        Self::Scene,
        Self::Composite,
        Self::Input,
        Self::Callback,
        Self::Monitor,
    ];

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reconcile => "reconcile",
            Self::Overlay => "overlay",
            Self::Scene => "scene",
            Self::Composite => "composite",
            Self::Input => "input",
            Self::Callback => "callback",
            Self::Monitor => "monitor",
        }
    }

    /// Returns the position of this phase in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Reconcile => 0,
            Self::Overlay => 1,
            Self::Scene => 2,
            Self::Composite => 3,
            Self::Input => 4,
            Self::Callback => 5,
            Self::Monitor => 6,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the driver starts producing a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host timestamp the frame was scheduled with.
    pub timestamp_ms: f64,
    /// Active strategy.
    pub strategy: StrategyKind,
}

/// Emitted after resize reconciliation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReconcileEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Whether the backing buffer was resized.
    pub resized: bool,
    /// Backing size after reconciliation.
    pub backing: BackingSize,
    /// Displayed width in CSS pixels.
    pub displayed_width: f64,
    /// Displayed height in CSS pixels.
    pub displayed_height: f64,
    /// Pixel ratio in effect.
    pub pixel_ratio: f64,
}

impl ReconcileEvent {
    /// Creates an event from a reconciliation result.
    #[must_use]
    pub fn new(frame_index: u64, r: &Reconciliation) -> Self {
        Self {
            frame_index,
            resized: r.resized,
            backing: r.backing,
            displayed_width: r.displayed.width,
            displayed_height: r.displayed.height,
            pixel_ratio: r.pixel_ratio,
        }
    }
}

/// Marks the beginning of a frame phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host clock at the start of the phase.
    pub timestamp_ms: f64,
}

/// Marks the end of a frame phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host clock at the end of the phase.
    pub timestamp_ms: f64,
}

/// Per-frame timing summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Active strategy.
    pub strategy: StrategyKind,
    /// Host timestamp the frame was scheduled with.
    pub timestamp_ms: f64,
    /// Whether reconciliation resized the backing buffer.
    pub resized: bool,
    /// Phase durations in milliseconds, indexed by [`PhaseKind::index`].
    /// Phases that did not run are 0.
    pub phase_ms: [f64; 7],
}

impl FrameSummary {
    /// Returns the duration of one phase in milliseconds.
    #[must_use]
    pub fn phase(&self, phase: PhaseKind) -> f64 {
        self.phase_ms[phase.index()]
    }

    /// Returns the sum of all measured phases.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.phase_ms.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the driver.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called after resize reconciliation.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with a per-frame timing summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reconcile(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    begin: FrameBeginEvent,
    resized: bool,
    phase_starts: [Option<f64>; 7],
    phase_ends: [Option<f64>; 7],
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(begin: &FrameBeginEvent) -> Self {
        Self {
            begin: *begin,
            resized: false,
            phase_starts: [None; 7],
            phase_ends: [None; 7],
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t_ms: f64) {
        self.phase_starts[phase.index()] = Some(t_ms);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t_ms: f64) {
        self.phase_ends[phase.index()] = Some(t_ms);
    }

    /// Sets whether reconciliation resized the backing buffer.
    pub fn set_resized(&mut self, resized: bool) {
        self.resized = resized;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        let mut phase_ms = [0.0; 7];
        for (i, out) in phase_ms.iter_mut().enumerate() {
            if let (Some(start), Some(end)) = (self.phase_starts[i], self.phase_ends[i]) {
                *out = (end - start).max(0.0);
            }
        }
        FrameSummary {
            frame_index: self.begin.frame_index,
            strategy: self.begin.strategy,
            timestamp_ms: self.begin.timestamp_ms,
            resized: self.resized,
            phase_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> FrameBeginEvent {
        FrameBeginEvent {
            frame_index: 42,
            timestamp_ms: 1_000.0,
            strategy: StrategyKind::Continuous,
        }
    }

    #[test]
    fn phase_indices_match_all() {
        for (i, phase) in PhaseKind::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i, "{}", phase.name());
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&sample_begin());
        sink.on_frame_summary(&FrameSummaryBuilder::new(&sample_begin()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&sample_begin());
        tracer.frame_summary(&FrameSummaryBuilder::new(&sample_begin()).finish());
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(&sample_begin());

        builder.phase_begin(PhaseKind::Reconcile, 1_000.0);
        builder.phase_end(PhaseKind::Reconcile, 1_000.25);
        builder.phase_begin(PhaseKind::Overlay, 1_000.25);
        builder.phase_end(PhaseKind::Overlay, 1_001.0);
        builder.phase_begin(PhaseKind::Scene, 1_001.0);
        builder.phase_end(PhaseKind::Scene, 1_005.0);
        builder.set_resized(true);

        let summary = builder.finish();
        assert_eq!(summary.phase(PhaseKind::Reconcile), 0.25);
        assert_eq!(summary.phase(PhaseKind::Overlay), 0.75);
        assert_eq!(summary.phase(PhaseKind::Scene), 4.0);
        assert_eq!(summary.phase(PhaseKind::Composite), 0.0);
        assert_eq!(summary.total_ms(), 5.0);
        assert!(summary.resized);
        assert_eq!(summary.frame_index, 42);
        assert_eq!(summary.strategy, StrategyKind::Continuous);
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let mut builder = FrameSummaryBuilder::new(&sample_begin());
        builder.phase_begin(PhaseKind::Monitor, 3.0);
        let summary = builder.finish();
        assert_eq!(summary.phase_ms, [0.0; 7], "begin without end is not measured");
        assert!(!summary.resized);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.frame_begin(&sample_begin());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
