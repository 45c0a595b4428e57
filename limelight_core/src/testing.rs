// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests.
//!
//! Every fake appends a short line to a shared [`Calls`] log so tests can
//! assert on call order across collaborators.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Size;

use crate::backend::{
    Background, Camera, Compositor, Host, InputController, InputTarget, Listener, OverlayRenderer,
    PerformanceMonitor, SceneGraph, SceneRenderer,
};
use crate::config::{BloomParams, Color, StageConfig};
use crate::light::Light;
use crate::stage::{DebugContext, Stage, StageParts};
use crate::surface::BackingSize;

/// Shared, ordered call log.
#[derive(Clone, Debug, Default)]
pub(crate) struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    pub(crate) fn push(&self, call: impl Into<String>) {
        self.0.borrow_mut().push(call.into());
    }

    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

fn hex(c: Color) -> String {
    format!("#{:06x}", c.0)
}

fn size(s: Size) -> String {
    format!("{}x{}", s.width, s.height)
}

// ---------------------------------------------------------------------------
// Scene and camera
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct Scene {
    calls: Calls,
}

impl SceneGraph for Scene {
    fn set_background(&mut self, background: Background<'_>) {
        let line = match background {
            Background::Color(c) => hex(c),
            Background::Skybox(url) => format!("skybox {url}"),
        };
        self.calls.push(format!("scene.set_background({line})"));
    }

    fn add_light(&mut self, light: &Light) {
        let line = match light {
            Light::Directional(d) => {
                let [x, y, z] = d.position;
                format!(
                    "directional {} {} @{x},{y},{z}",
                    hex(d.params.color),
                    d.params.intensity
                )
            }
            Light::Ambient(a) => format!("ambient {} {}", hex(a.params.color), a.params.intensity),
        };
        self.calls.push(format!("scene.add_light({line})"));
    }
}

#[derive(Debug)]
pub(crate) struct TestCamera {
    calls: Calls,
    pub(crate) aspect: f64,
}

impl Camera for TestCamera {
    fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
        self.calls.push(format!("camera.set_aspect({aspect:.4})"));
    }

    fn update_projection(&mut self) {
        self.calls.push("camera.update_projection");
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct FakeRenderer {
    calls: Calls,
    displayed: Rc<Cell<Size>>,
    pub(crate) backing: BackingSize,
}

impl FakeRenderer {
    pub(crate) fn new(calls: &Calls, displayed: Size, backing: BackingSize) -> Self {
        Self::shared(calls, Rc::new(Cell::new(displayed)), backing)
    }

    fn shared(calls: &Calls, displayed: Rc<Cell<Size>>, backing: BackingSize) -> Self {
        Self {
            calls: calls.clone(),
            displayed,
            backing,
        }
    }
}

impl SceneRenderer<Scene, TestCamera> for FakeRenderer {
    fn render(&mut self, _: &Scene, _: &TestCamera) {
        self.calls.push("renderer.render");
    }

    fn displayed_size(&self) -> Size {
        self.displayed.get()
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn set_backing_size(&mut self, size: BackingSize, update_style: bool) {
        self.backing = size;
        self.calls.push(format!(
            "renderer.set_backing_size({}x{}, style={update_style})",
            size.width, size.height
        ));
    }

    fn set_clear_color(&mut self, color: Color) {
        self.calls
            .push(format!("renderer.set_clear_color({})", hex(color)));
    }
}

#[derive(Debug)]
pub(crate) struct FakeOverlay {
    calls: Calls,
}

impl OverlayRenderer<Scene, TestCamera> for FakeOverlay {
    fn render(&mut self, _: &Scene, _: &TestCamera) {
        self.calls.push("overlay.render");
    }

    fn set_size(&mut self, s: Size) {
        self.calls.push(format!("overlay.set_size({})", size(s)));
    }
}

#[derive(Debug)]
pub(crate) struct FakeCompositor {
    calls: Calls,
}

impl FakeCompositor {
    pub(crate) fn new(calls: &Calls) -> Self {
        Self {
            calls: calls.clone(),
        }
    }
}

impl Compositor<Scene, TestCamera> for FakeCompositor {
    fn add_render_pass(&mut self) {
        self.calls.push("compositor.add_render_pass");
    }

    fn add_bloom_pass(&mut self, p: BloomParams) {
        self.calls.push(format!(
            "compositor.add_bloom_pass({}, {}, {})",
            p.strength, p.radius, p.threshold
        ));
    }

    fn set_size(&mut self, s: Size) {
        self.calls.push(format!("compositor.set_size({})", size(s)));
    }

    fn render(&mut self, _: &Scene, _: &TestCamera) {
        self.calls.push("compositor.render");
    }
}

// ---------------------------------------------------------------------------
// Input and monitor
// ---------------------------------------------------------------------------

pub(crate) struct FakeControls {
    calls: Calls,
    change: Rc<RefCell<Option<Listener>>>,
    /// Damped steps left; each `update` consumes one and reports a change.
    motion: Rc<Cell<u32>>,
}

impl InputController for FakeControls {
    fn attach(&mut self, target: InputTarget) {
        self.calls.push(format!("controls.attach({target:?})"));
    }

    fn set_target(&mut self, [x, y, z]: [f64; 3]) {
        self.calls.push(format!("controls.set_target({x},{y},{z})"));
    }

    fn set_damping(&mut self, enabled: bool) {
        self.calls.push(format!("controls.set_damping({enabled})"));
    }

    fn update(&mut self) {
        self.calls.push("controls.update");
        let left = self.motion.get();
        if left > 0 {
            self.motion.set(left - 1);
            if let Some(listener) = self.change.borrow_mut().as_mut() {
                listener();
            }
        }
    }

    fn set_change_listener(&mut self, listener: Option<Listener>) {
        let state = if listener.is_some() { "Some" } else { "None" };
        self.calls
            .push(format!("controls.set_change_listener({state})"));
        *self.change.borrow_mut() = listener;
    }
}

#[derive(Debug)]
pub(crate) struct FakeMonitor {
    calls: Calls,
}

impl FakeMonitor {
    pub(crate) fn new(calls: &Calls) -> Self {
        Self {
            calls: calls.clone(),
        }
    }
}

impl PerformanceMonitor for FakeMonitor {
    fn update(&mut self) {
        self.calls.push("monitor.update");
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// A host whose clock advances 1 ms per read and whose frames are pumped by
/// the test.
pub(crate) struct FakeHost {
    accepting: Cell<bool>,
    scheduled: Cell<u32>,
    cancelled: Cell<u32>,
    clock: Cell<f64>,
    dpr: Cell<f64>,
    window: Cell<Size>,
    resize: RefCell<Option<Listener>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            accepting: Cell::new(true),
            scheduled: Cell::new(0),
            cancelled: Cell::new(0),
            clock: Cell::new(0.0),
            dpr: Cell::new(1.0),
            window: Cell::new(Size::new(1024.0, 768.0)),
            resize: RefCell::new(None),
        }
    }
}

impl FakeHost {
    /// With `false`, `schedule_frame` refuses like a host with no frame
    /// callback installed.
    pub(crate) fn set_accepting(&self, accepting: bool) {
        self.accepting.set(accepting);
    }

    pub(crate) fn scheduled(&self) -> u32 {
        self.scheduled.get()
    }

    pub(crate) fn cancelled(&self) -> u32 {
        self.cancelled.get()
    }

    pub(crate) fn set_device_pixel_ratio(&self, dpr: f64) {
        self.dpr.set(dpr);
    }

    pub(crate) fn set_window_size(&self, size: Size) {
        self.window.set(size);
    }

    pub(crate) fn has_resize_listener(&self) -> bool {
        self.resize.borrow().is_some()
    }

    pub(crate) fn fire_resize(&self) {
        if let Some(listener) = self.resize.borrow_mut().as_mut() {
            listener();
        }
    }
}

impl Host for FakeHost {
    fn schedule_frame(&self) -> bool {
        if !self.accepting.get() {
            return false;
        }
        self.scheduled.set(self.scheduled.get() + 1);
        true
    }

    fn cancel_frame(&self) {
        self.cancelled.set(self.cancelled.get() + 1);
    }

    fn now_ms(&self) -> f64 {
        let t = self.clock.get();
        self.clock.set(t + 1.0);
        t
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    fn window_size(&self) -> Size {
        self.window.get()
    }

    fn set_resize_listener(&self, listener: Option<Listener>) {
        *self.resize.borrow_mut() = listener;
    }
}

// ---------------------------------------------------------------------------
// Rigs
// ---------------------------------------------------------------------------

/// Fresh collaborators sharing one call log.
pub(crate) fn parts(
    calls: &Calls,
    displayed: Size,
    backing: BackingSize,
) -> StageParts<Scene, TestCamera> {
    Rig::with_calls(calls.clone(), displayed).parts(backing)
}

/// A host plus handles into the collaborators it builds, for driver tests.
pub(crate) struct Rig {
    pub(crate) calls: Calls,
    pub(crate) host: Rc<FakeHost>,
    pub(crate) displayed: Rc<Cell<Size>>,
    pub(crate) motion: Rc<Cell<u32>>,
    change: Rc<RefCell<Option<Listener>>>,
}

impl Rig {
    pub(crate) fn new(displayed: Size) -> Self {
        Self::with_calls(Calls::default(), displayed)
    }

    fn with_calls(calls: Calls, displayed: Size) -> Self {
        Self {
            calls,
            host: Rc::new(FakeHost::default()),
            displayed: Rc::new(Cell::new(displayed)),
            motion: Rc::new(Cell::new(0)),
            change: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn parts(&self, backing: BackingSize) -> StageParts<Scene, TestCamera> {
        StageParts {
            scene: Scene {
                calls: self.calls.clone(),
            },
            camera: TestCamera {
                calls: self.calls.clone(),
                aspect: 2.0,
            },
            renderer: Box::new(FakeRenderer::shared(
                &self.calls,
                self.displayed.clone(),
                backing,
            )),
            overlay: Box::new(FakeOverlay {
                calls: self.calls.clone(),
            }),
            controls: Box::new(FakeControls {
                calls: self.calls.clone(),
                change: self.change.clone(),
                motion: self.motion.clone(),
            }),
        }
    }

    /// Builds a stage whose canvas starts with a 0×0 backing buffer.
    pub(crate) fn stage(
        &self,
        config: StageConfig,
        dev: impl FnOnce() -> DebugContext,
    ) -> Stage<Scene, TestCamera> {
        Stage::new(config, self.parts(BackingSize::ZERO), dev)
    }

    /// Fires the controller's "view changed" notification.
    pub(crate) fn fire_change(&self) {
        if let Some(listener) = self.change.borrow_mut().as_mut() {
            listener();
        }
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

#[cfg(feature = "trace")]
pub(crate) use trace_log::EventLog;

#[cfg(feature = "trace")]
mod trace_log {
    use super::*;
    use crate::trace::{
        FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, ReconcileEvent, TraceSink,
    };

    /// A trace sink that formats each event into a shared log.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct EventLog(Calls);

    impl EventLog {
        pub(crate) fn take(&self) -> Vec<String> {
            self.0.take()
        }
    }

    impl TraceSink for EventLog {
        fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
            self.0.push(format!(
                "begin #{} {} @{}",
                e.frame_index,
                e.strategy.name(),
                e.timestamp_ms
            ));
        }

        fn on_reconcile(&mut self, e: &ReconcileEvent) {
            self.0.push(format!(
                "reconcile resized={} {}x{}",
                e.resized, e.backing.width, e.backing.height
            ));
        }

        fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
            self.0.push(format!("phase+ {}", e.phase.name()));
        }

        fn on_phase_end(&mut self, e: &PhaseEndEvent) {
            self.0.push(format!("phase- {}", e.phase.name()));
        }

        fn on_frame_summary(&mut self, s: &FrameSummary) {
            self.0.push(format!("summary #{}", s.frame_index));
        }
    }
}
