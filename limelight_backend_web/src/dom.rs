// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM placement of the overlay and the stats readout.

use alloc::format;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement};

use limelight_core::backend::PerformanceMonitor;
use limelight_stats::{FrameReport, FrameStats};

use crate::raf::performance_now;

/// Frames averaged by the stats readout.
const STATS_WINDOW: usize = 60;

/// Sparkline range in milliseconds: 60 Hz at the bottom, 15 Hz at the top.
const SPARK_MIN_MS: f64 = 1000.0 / 60.0;
const SPARK_MAX_MS: f64 = 1000.0 / 15.0;

/// Stacks `overlay` above the canvas inside `container`, pinned to the top
/// left corner.
pub fn attach_overlay(container: &HtmlElement, overlay: &HtmlElement) -> Result<(), JsValue> {
    let s = overlay.style();
    s.set_property("position", "absolute")?;
    s.set_property("top", "0")?;
    container.append_child(overlay)?;
    Ok(())
}

/// Frame-rate readout pinned to the bottom of the container.
///
/// Each [`update`](PerformanceMonitor::update) counts as one produced frame,
/// so under on-demand pacing the numbers describe render cadence, not
/// display refresh.
pub struct StatsPanel {
    element: HtmlElement,
    stats: FrameStats<STATS_WINDOW>,
    last: Option<FrameReport>,
}

impl core::fmt::Debug for StatsPanel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StatsPanel")
            .field("element", &"HtmlElement")
            .field("stats", &self.stats)
            .field("last", &self.last)
            .finish()
    }
}

impl StatsPanel {
    /// Creates the panel and appends it to `container`.
    pub fn new(document: &Document, container: &HtmlElement) -> Result<Self, JsValue> {
        let element: HtmlElement = document.create_element("div")?.unchecked_into();
        let s = element.style();
        s.set_property("position", "absolute")?;
        s.set_property("bottom", "0px")?;
        s.set_property("z-index", "100")?;
        s.set_property("padding", "2px 6px")?;
        s.set_property("font", "11px monospace")?;
        s.set_property("white-space", "pre")?;
        s.set_property("color", "#0ff")?;
        s.set_property("background", "rgba(0, 0, 32, 0.8)")?;
        s.set_property("pointer-events", "none")?;
        container.append_child(&element)?;
        Ok(Self {
            element,
            stats: FrameStats::default(),
            last: None,
        })
    }

    /// Returns the panel element.
    #[must_use]
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// Returns the most recent report, if two or more frames were seen.
    #[must_use]
    pub fn last_report(&self) -> Option<FrameReport> {
        self.last
    }
}

impl PerformanceMonitor for StatsPanel {
    fn update(&mut self) {
        let Some(report) = self.stats.observe(performance_now()) else {
            return;
        };
        self.last = Some(report);
        let spark = self.stats.sparkline_ascii(SPARK_MIN_MS, SPARK_MAX_MS);
        let text = format!("{}\n{spark}", report.hud_line());
        self.element.set_text_content(Some(&text));
    }
}

impl Drop for StatsPanel {
    fn drop(&mut self) {
        self.element.remove();
    }
}
