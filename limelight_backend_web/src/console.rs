// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace output to the browser console.

use alloc::format;
use alloc::string::String;

use wasm_bindgen::JsValue;
use web_sys::console;

use limelight_core::trace::{
    FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind, ReconcileEvent,
    TraceSink,
};

/// Writes trace events to `console.log`, and frames over budget to
/// `console.warn`.
///
/// By default only resizes and slow frames are logged; [`verbose`](Self::verbose)
/// logs every event.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleSink {
    slow_frame_ms: f64,
    verbose: bool,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    /// Creates a sink that warns about frames taking longer than one 60 Hz
    /// refresh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slow_frame_ms: limelight_stats::FRAME_60HZ_MS,
            verbose: false,
        }
    }

    /// Sets the frame duration above which summaries are logged as warnings.
    #[must_use]
    pub const fn with_slow_frame_ms(mut self, ms: f64) -> Self {
        self.slow_frame_ms = ms;
        self
    }

    /// Logs every event, not just resizes and slow frames.
    #[must_use]
    pub const fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

fn log(line: &str) {
    console::log_1(&JsValue::from_str(line));
}

fn summary_line(s: &FrameSummary) -> String {
    let mut line = format!("[limelight] #{} {}", s.frame_index, s.strategy.name());
    for phase in PhaseKind::ALL {
        let ms = s.phase(phase);
        if ms > 0.0 {
            line.push_str(&format!(" {}={ms:.2}ms", phase.name()));
        }
    }
    line.push_str(&format!(" total={:.2}ms", s.total_ms()));
    line
}

impl TraceSink for ConsoleSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        if self.verbose {
            log(&format!(
                "[limelight] frame #{} {} t={:.2}ms",
                e.frame_index,
                e.strategy.name(),
                e.timestamp_ms
            ));
        }
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        if e.resized {
            log(&format!(
                "[limelight] resize #{} backing {}x{} for {}x{} @{}",
                e.frame_index,
                e.backing.width,
                e.backing.height,
                e.displayed_width,
                e.displayed_height,
                e.pixel_ratio
            ));
        }
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        if self.verbose {
            log(&format!("[limelight]   {} +", e.phase.name()));
        }
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        if self.verbose {
            log(&format!("[limelight]   {} -", e.phase.name()));
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        if s.total_ms() > self.slow_frame_ms {
            console::warn_1(&JsValue::from_str(&summary_line(s)));
        } else if self.verbose {
            log(&summary_line(s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limelight_core::strategy::StrategyKind;

    #[test]
    fn summary_line_skips_idle_phases() {
        let mut phase_ms = [0.0; 7];
        phase_ms[PhaseKind::Overlay.index()] = 0.5;
        phase_ms[PhaseKind::Scene.index()] = 3.25;
        let s = FrameSummary {
            frame_index: 9,
            strategy: StrategyKind::Continuous,
            timestamp_ms: 150.0,
            resized: false,
            phase_ms,
        };
        assert_eq!(
            summary_line(&s),
            "[limelight] #9 continuous overlay=0.50ms scene=3.25ms total=3.75ms"
        );
    }
}
