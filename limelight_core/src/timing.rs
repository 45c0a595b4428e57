// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame timing.

/// One produced frame.
///
/// Created by the driver for each frame callback and not retained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Host timestamp in milliseconds (a `requestAnimationFrame`
    /// `DOMHighResTimeStamp` in the browser). The eager first frame of a
    /// driver uses `0.0`.
    pub timestamp_ms: f64,
    /// Number of frames this driver produced before this one.
    pub frame_index: u64,
}

impl FrameTick {
    /// Creates a tick.
    #[must_use]
    pub const fn new(timestamp_ms: f64, frame_index: u64) -> Self {
        Self {
            timestamp_ms,
            frame_index,
        }
    }

    /// Returns the timestamp in seconds, the value handed to time-driven
    /// frame callbacks.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.timestamp_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_secs_divides_by_thousand() {
        assert_eq!(FrameTick::new(0.0, 0).elapsed_secs(), 0.0);
        assert_eq!(FrameTick::new(16_667.0, 1000).elapsed_secs(), 16.667);
    }
}
