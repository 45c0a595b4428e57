// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rolling frame-time statistics for performance monitors.
//!
//! [`FrameStats`] keeps the last `N` frame deltas in a ring buffer and turns
//! them into a [`FrameReport`] (frames per second, mean/min/max frame time, a
//! pacing grade) plus an ASCII sparkline for HUDs.

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;

/// Frame time of a 60 Hz display in milliseconds.
pub const FRAME_60HZ_MS: f64 = 1000.0 / 60.0;

/// How evenly frames are being produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacingGrade {
    /// Fewer than 10 slow frames per 1000.
    Smooth,
    /// Fewer than 50 slow frames per 1000.
    Uneven,
    /// Everything else.
    Janky,
}

impl PacingGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Uneven => "uneven",
            Self::Janky => "janky",
        }
    }

    fn for_slow_rate(slow_per_1000: f64) -> Self {
        if slow_per_1000 < 10.0 {
            Self::Smooth
        } else if slow_per_1000 < 50.0 {
            Self::Uneven
        } else {
            Self::Janky
        }
    }
}

/// Aggregated report returned by [`FrameStats::observe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Frames per second over the window.
    pub fps: f64,
    /// Mean frame time over the window, in ms.
    pub mean_ms: f64,
    /// Shortest frame time in the window, in ms.
    pub min_ms: f64,
    /// Longest frame time in the window, in ms.
    pub max_ms: f64,
    /// Frame deltas observed since creation.
    pub total_frames: u64,
    /// Deltas longer than twice the budget since creation.
    pub slow_frames: u64,
    /// Current grade.
    pub grade: PacingGrade,
}

impl FrameReport {
    /// Formats the report as a single HUD line.
    #[must_use]
    pub fn hud_line(&self) -> String {
        format!(
            "{:.0} FPS ({:.1} ms, {:.1}-{:.1}) {}",
            self.fps,
            self.mean_ms,
            self.min_ms,
            self.max_ms,
            self.grade.as_str()
        )
    }
}

/// Rolling frame-time tracker with a fixed-size delta history.
#[derive(Debug)]
pub struct FrameStats<const N: usize> {
    deltas_ms: [f64; N],
    cursor: usize,
    last_ms: Option<f64>,
    budget_ms: f64,
    total_frames: u64,
    slow_frames: u64,
}

impl<const N: usize> Default for FrameStats<N> {
    fn default() -> Self {
        Self::new(FRAME_60HZ_MS)
    }
}

impl<const N: usize> FrameStats<N> {
    /// Creates a tracker for a display with the given frame budget. The
    /// history is prefilled with `budget_ms`.
    #[must_use]
    pub const fn new(budget_ms: f64) -> Self {
        Self {
            deltas_ms: [budget_ms; N],
            cursor: 0,
            last_ms: None,
            budget_ms,
            total_frames: 0,
            slow_frames: 0,
        }
    }

    /// Observes a frame produced at `now_ms`.
    ///
    /// The first call only records the timestamp and returns `None`. A
    /// timestamp earlier than the previous one counts as a zero-length frame.
    pub fn observe(&mut self, now_ms: f64) -> Option<FrameReport> {
        let last = self.last_ms.replace(now_ms)?;
        let delta = (now_ms - last).max(0.0);
        self.push_delta(delta);
        Some(self.report())
    }

    /// Records one frame delta directly.
    pub fn push_delta(&mut self, delta_ms: f64) {
        if N == 0 {
            return;
        }
        self.deltas_ms[self.cursor] = delta_ms;
        self.cursor = (self.cursor + 1) % N;
        self.total_frames = self.total_frames.saturating_add(1);
        if delta_ms > 2.0 * self.budget_ms {
            self.slow_frames = self.slow_frames.saturating_add(1);
        }
    }

    /// Returns the report for the current window.
    #[must_use]
    pub fn report(&self) -> FrameReport {
        let mut sum = 0.0;
        let mut min_ms = f64::INFINITY;
        let mut max_ms = 0.0_f64;
        for &d in &self.deltas_ms {
            sum += d;
            min_ms = min_ms.min(d);
            max_ms = max_ms.max(d);
        }
        let mean_ms = if N == 0 { 0.0 } else { sum / N as f64 };
        let fps = if mean_ms > 0.0 { 1000.0 / mean_ms } else { 0.0 };
        let slow_per_1000 = if self.total_frames == 0 {
            0.0
        } else {
            self.slow_frames as f64 * 1000.0 / self.total_frames as f64
        };
        FrameReport {
            fps,
            mean_ms,
            min_ms: if min_ms.is_finite() { min_ms } else { 0.0 },
            max_ms,
            total_frames: self.total_frames,
            slow_frames: self.slow_frames,
            grade: PacingGrade::for_slow_rate(slow_per_1000),
        }
    }

    /// Returns ring-buffer frame deltas oldest→newest.
    #[must_use]
    pub fn frame_deltas(&self) -> [f64; N] {
        core::array::from_fn(|i| self.deltas_ms[(self.cursor + i) % N])
    }

    /// Returns an ASCII sparkline over [`frame_deltas`](Self::frame_deltas).
    ///
    /// The bounds may be given in either order. A NaN bound yields an empty
    /// line.
    #[must_use]
    pub fn sparkline_ascii(&self, min_ms: f64, max_ms: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        if min_ms.is_nan() || max_ms.is_nan() {
            return String::new();
        }
        let (min_ms, max_ms) = (min_ms.min(max_ms), min_ms.max(max_ms));
        let span = (max_ms - min_ms).max(f64::EPSILON);
        self.frame_deltas()
            .iter()
            .map(|d| {
                let t = (d.clamp(min_ms, max_ms) - min_ms) / span;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "index is clamped to ASCII level count"
                )]
                let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
                LEVELS[level.min(LEVELS.len() - 1)] as char
            })
            .collect()
    }
}
