// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Phase events
//! are verbose, so they can be switched off with
//! [`with_phases`](PrettyPrintSink::with_phases).

use std::io::Write;

use limelight_core::trace::{
    FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind, ReconcileEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    phases: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            phases: true,
        }
    }

    /// Enables or disables per-phase begin/end lines.
    #[must_use]
    pub fn with_phases(mut self, phases: bool) -> Self {
        self.phases = phases;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] #{} {} t={:.3}ms",
            e.frame_index,
            e.strategy.name(),
            e.timestamp_ms,
        );
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        if !e.resized {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[resize] #{} backing={}x{} displayed={}x{} ratio={}",
            e.frame_index,
            e.backing.width,
            e.backing.height,
            e.displayed_width,
            e.displayed_height,
            e.pixel_ratio,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        if self.phases {
            let _ = writeln!(
                self.writer,
                "[phase:begin] #{} {} at {:.3}ms",
                e.frame_index,
                e.phase.name(),
                e.timestamp_ms,
            );
        }
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        if self.phases {
            let _ = writeln!(
                self.writer,
                "[phase:end] #{} {} at {:.3}ms",
                e.frame_index,
                e.phase.name(),
                e.timestamp_ms,
            );
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = write!(self.writer, "[summary] #{} {}", s.frame_index, s.strategy.name());
        for phase in PhaseKind::ALL {
            let ms = s.phase(phase);
            if ms > 0.0 {
                let _ = write!(self.writer, " {}={ms:.3}ms", phase.name());
            }
        }
        let resized = if s.resized { " RESIZED" } else { "" };
        let _ = writeln!(self.writer, " total={:.3}ms{resized}", s.total_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_core::strategy::StrategyKind;
    use limelight_core::surface::BackingSize;

    fn captured(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn resize_lines_only_when_resized() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let mut e = ReconcileEvent {
            frame_index: 0,
            resized: false,
            backing: BackingSize::new(1600, 1200),
            displayed_width: 800.0,
            displayed_height: 600.0,
            pixel_ratio: 2.0,
        };
        sink.on_reconcile(&e);
        e.resized = true;
        sink.on_reconcile(&e);

        let output = captured(sink);
        assert_eq!(
            output, "[resize] #0 backing=1600x1200 displayed=800x600 ratio=2\n",
            "got: {output}"
        );
    }

    #[test]
    fn summary_lists_measured_phases() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_phases(false);
        let mut phase_ms = [0.0; 7];
        phase_ms[PhaseKind::Reconcile.index()] = 0.25;
        phase_ms[PhaseKind::Composite.index()] = 4.5;
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 3,
            phase: PhaseKind::Composite,
            timestamp_ms: 10.0,
        });
        sink.on_frame_summary(&FrameSummary {
            frame_index: 3,
            strategy: StrategyKind::Bloom,
            timestamp_ms: 50.0,
            resized: true,
            phase_ms,
        });

        let output = captured(sink);
        assert_eq!(
            output,
            "[summary] #3 bloom reconcile=0.250ms composite=4.500ms total=4.750ms RESIZED\n",
            "phase lines suppressed, got: {output}"
        );
    }

    #[test]
    fn frame_line_names_strategy() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 12,
            timestamp_ms: 200.0,
            strategy: StrategyKind::OnDemand,
        });
        let output = captured(sink);
        assert!(output.contains("[frame] #12 on-demand"), "got: {output}");
    }
}
