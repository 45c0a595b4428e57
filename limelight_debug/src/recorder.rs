// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary trace recording and playback.
//!
//! [`RecorderSink`] appends each event as a tagged little-endian record to an
//! in-memory buffer. [`decode`] walks a buffer back into [`RecordedEvent`]s.
//!
//! Record layout (all integers little-endian, `f64` as IEEE 754 bits):
//!
//! | Tag | Record        | Payload                                                   |
//! |-----|---------------|-----------------------------------------------------------|
//! | 1   | frame begin   | frame u64, timestamp f64, strategy u8                     |
//! | 2   | reconcile     | frame u64, resized u8, backing w/h u32, displayed w/h f64, ratio f64 |
//! | 3   | phase begin   | frame u64, phase u8, timestamp f64                        |
//! | 4   | phase end     | frame u64, phase u8, timestamp f64                        |
//! | 5   | frame summary | frame u64, strategy u8, timestamp f64, resized u8, 7 × f64 |

use limelight_core::strategy::StrategyKind;
use limelight_core::surface::BackingSize;
use limelight_core::trace::{
    FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind, ReconcileEvent,
    TraceSink,
};

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_RECONCILE: u8 = 2;
const TAG_PHASE_BEGIN: u8 = 3;
const TAG_PHASE_END: u8 = 4;
const TAG_FRAME_SUMMARY: u8 = 5;

fn strategy_to_u8(kind: StrategyKind) -> u8 {
    match kind {
        StrategyKind::Continuous => 0,
        StrategyKind::Bloom => 1,
        StrategyKind::OnDemand => 2,
    }
}

fn strategy_from_u8(v: u8) -> Option<StrategyKind> {
    match v {
        0 => Some(StrategyKind::Continuous),
        1 => Some(StrategyKind::Bloom),
        2 => Some(StrategyKind::OnDemand),
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "PhaseKind has seven variants"
)]
fn phase_to_u8(phase: PhaseKind) -> u8 {
    phase.index() as u8
}

fn phase_from_u8(v: u8) -> Option<PhaseKind> {
    PhaseKind::ALL.get(usize::from(v)).copied()
}

/// A [`TraceSink`] that records events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_f64(e.timestamp_ms);
        self.write_u8(strategy_to_u8(e.strategy));
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.write_u8(TAG_RECONCILE);
        self.write_u64(e.frame_index);
        self.write_bool(e.resized);
        self.write_u32(e.backing.width);
        self.write_u32(e.backing.height);
        self.write_f64(e.displayed_width);
        self.write_f64(e.displayed_height);
        self.write_f64(e.pixel_ratio);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u8(phase_to_u8(e.phase));
        self.write_f64(e.timestamp_ms);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_u8(phase_to_u8(e.phase));
        self.write_f64(e.timestamp_ms);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u8(strategy_to_u8(s.strategy));
        self.write_f64(s.timestamp_ms);
        self.write_bool(s.resized);
        for ms in s.phase_ms {
            self.write_f64(ms);
        }
    }
}

/// A decoded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A frame started.
    FrameBegin(FrameBeginEvent),
    /// The drawing surface was reconciled.
    Reconcile(ReconcileEvent),
    /// A frame phase started.
    PhaseBegin(PhaseBeginEvent),
    /// A frame phase ended.
    PhaseEnd(PhaseEndEvent),
    /// A frame finished.
    FrameSummary(FrameSummary),
}

/// Decodes a byte buffer produced by [`RecorderSink`].
///
/// Iteration stops at the first unknown tag or truncated record.
#[must_use]
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter { bytes, pos: 0 }
}

/// Iterator over [`RecordedEvent`]s in a recorded buffer.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let chunk = self.bytes.get(self.pos..end)?;
        self.pos = end;
        chunk.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_phase_event(&mut self) -> Option<(u64, PhaseKind, f64)> {
        let frame_index = self.read_u64()?;
        let phase = phase_from_u8(self.read_u8()?)?;
        let timestamp_ms = self.read_f64()?;
        Some((frame_index, phase, timestamp_ms))
    }

    fn read_event(&mut self) -> Option<RecordedEvent> {
        let event = match self.read_u8()? {
            TAG_FRAME_BEGIN => RecordedEvent::FrameBegin(FrameBeginEvent {
                frame_index: self.read_u64()?,
                timestamp_ms: self.read_f64()?,
                strategy: strategy_from_u8(self.read_u8()?)?,
            }),
            TAG_RECONCILE => RecordedEvent::Reconcile(ReconcileEvent {
                frame_index: self.read_u64()?,
                resized: self.read_bool()?,
                backing: BackingSize::new(self.read_u32()?, self.read_u32()?),
                displayed_width: self.read_f64()?,
                displayed_height: self.read_f64()?,
                pixel_ratio: self.read_f64()?,
            }),
            TAG_PHASE_BEGIN => {
                let (frame_index, phase, timestamp_ms) = self.read_phase_event()?;
                RecordedEvent::PhaseBegin(PhaseBeginEvent {
                    frame_index,
                    phase,
                    timestamp_ms,
                })
            }
            TAG_PHASE_END => {
                let (frame_index, phase, timestamp_ms) = self.read_phase_event()?;
                RecordedEvent::PhaseEnd(PhaseEndEvent {
                    frame_index,
                    phase,
                    timestamp_ms,
                })
            }
            TAG_FRAME_SUMMARY => {
                let frame_index = self.read_u64()?;
                let strategy = strategy_from_u8(self.read_u8()?)?;
                let timestamp_ms = self.read_f64()?;
                let resized = self.read_bool()?;
                let mut phase_ms = [0.0; 7];
                for slot in &mut phase_ms {
                    *slot = self.read_f64()?;
                }
                RecordedEvent::FrameSummary(FrameSummary {
                    frame_index,
                    strategy,
                    timestamp_ms,
                    resized,
                    phase_ms,
                })
            }
            _ => return None,
        };
        Some(event)
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let event = self.read_event();
        if event.is_none() {
            // Poison the cursor so a bad record ends iteration for good.
            self.pos = self.bytes.len();
        }
        event
    }
}
