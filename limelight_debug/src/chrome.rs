// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][fmt] JSON to the given writer.
//!
//! [fmt]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use limelight_core::trace::PhaseKind;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration slices, frame starts become instant events, and
/// backing-store resizes become counter samples.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameBegin",
                    "cat": "Loop",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "strategy": e.strategy.name(),
                    }
                }));
            }
            RecordedEvent::Reconcile(e) => {
                if !e.resized {
                    continue;
                }
                events.push(json!({
                    "ph": "C",
                    "name": "BackingSize",
                    "cat": "Surface",
                    "ts": last_ts(&events),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "width": e.backing.width,
                        "height": e.backing.height,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.name(),
                    "cat": "Frame",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.name(),
                    "cat": "Frame",
                    "ts": ms_to_us(e.timestamp_ms),
                    "pid": 0,
                    "tid": 0,
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                let mut phases = serde_json::Map::new();
                for phase in PhaseKind::ALL {
                    phases.insert(phase.name().into(), json!(s.phase(phase)));
                }
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Loop",
                    "ts": last_ts(&events),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": s.frame_index,
                        "strategy": s.strategy.name(),
                        "resized": s.resized,
                        "total_ms": s.total_ms(),
                        "phase_ms": Value::Object(phases),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ms_to_us(ms: f64) -> f64 {
    ms * 1000.0
}

/// Reconcile and summary records carry no wall-clock stamp of their own, so
/// they sit at the most recent timestamp in the stream.
fn last_ts(events: &[Value]) -> f64 {
    events
        .last()
        .and_then(|e| e.get("ts"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use limelight_core::strategy::StrategyKind;
    use limelight_core::surface::BackingSize;
    use limelight_core::trace::{
        FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, ReconcileEvent, TraceSink,
    };

    fn exported(bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        export(bytes, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut sink = RecorderSink::new();
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 0,
            timestamp_ms: 0.0,
            strategy: StrategyKind::Bloom,
        });
        sink.on_reconcile(&ReconcileEvent {
            frame_index: 0,
            resized: true,
            backing: BackingSize::new(1280, 720),
            displayed_width: 1280.0,
            displayed_height: 720.0,
            pixel_ratio: 1.0,
        });
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Composite,
            timestamp_ms: 1.5,
        });
        sink.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Composite,
            timestamp_ms: 4.0,
        });
        let mut phase_ms = [0.0; 7];
        phase_ms[PhaseKind::Composite.index()] = 2.5;
        sink.on_frame_summary(&FrameSummary {
            frame_index: 0,
            strategy: StrategyKind::Bloom,
            timestamp_ms: 0.0,
            resized: true,
            phase_ms,
        });

        let events = exported(sink.as_bytes());
        assert_eq!(events.len(), 5);

        assert_eq!(events[0]["name"], "FrameBegin");
        assert_eq!(events[0]["args"]["strategy"], "bloom");
        assert_eq!(events[1]["ph"], "C");
        assert_eq!(events[1]["args"]["width"], 1280);
        assert_eq!(events[2]["ph"], "B");
        assert_eq!(events[2]["name"], "composite");
        assert_eq!(events[2]["ts"], 1500.0);
        assert_eq!(events[3]["ph"], "E");
        assert_eq!(events[3]["ts"], 4000.0);
        assert_eq!(events[4]["ts"], 4000.0, "summary sits at the last stamp");
        assert_eq!(events[4]["args"]["phase_ms"]["composite"], 2.5);
        assert_eq!(events[4]["args"]["total_ms"], 2.5);
    }

    #[test]
    fn unchanged_surface_emits_no_counter() {
        let mut sink = RecorderSink::new();
        sink.on_reconcile(&ReconcileEvent {
            frame_index: 4,
            resized: false,
            backing: BackingSize::new(800, 600),
            displayed_width: 800.0,
            displayed_height: 600.0,
            pixel_ratio: 1.0,
        });
        assert!(exported(sink.as_bytes()).is_empty());
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
