// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated browser that exercises the driver and its diagnostics pipeline.
//!
//! Runs the continuous, bloom and on-demand strategies against a fake host
//! with a virtual 60 Hz display. Collaborators burn simulated milliseconds, so
//! the phase timings are meaningful. Events go to both a
//! [`PrettyPrintSink`](limelight_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](limelight_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::Size;

use limelight_core::backend::{
    Background, Compositor, Host, InputController, InputTarget, Listener, OverlayRenderer, PerformanceMonitor,
    SceneGraph, SceneRenderer,
};
use limelight_core::camera::{CameraParams, PerspectiveCamera};
use limelight_core::config::{BloomParams, Color, StageConfig};
use limelight_core::driver::Driver;
use limelight_core::light::Light;
use limelight_core::stage::{DebugContext, Stage, StageParts};
use limelight_core::surface::BackingSize;
use limelight_core::trace::{
    FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, ReconcileEvent, TraceSink,
};

use limelight_debug::pretty::PrettyPrintSink;
use limelight_debug::recorder::RecorderSink;
use limelight_stats::{FRAME_60HZ_MS, FrameStats};

/// Frames produced by each continuous run.
const CONTINUOUS_FRAMES: u64 = 60;
/// Simulated wall time given to the on-demand run.
const ON_DEMAND_MS: f64 = 1000.0;

type Scene3d = Stage<Scene, PerspectiveCamera>;

/// Things a user does during the on-demand run.
#[derive(Clone, Copy, Debug)]
enum Action {
    Drag,
    Resize,
    Request,
    Skybox,
}

// -- simulated time ---------------------------------------------------------

#[derive(Clone, Default)]
struct Clock(Rc<Cell<f64>>);

impl Clock {
    fn now(&self) -> f64 {
        self.0.get()
    }

    fn spend(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }

    /// Jumps to the next vsync boundary.
    fn next_vsync(&self) -> f64 {
        let n = (self.now() / FRAME_60HZ_MS).floor() + 1.0;
        self.0.set(n * FRAME_60HZ_MS);
        self.now()
    }
}

struct SimHost {
    clock: Clock,
    pending: Cell<bool>,
    window: Rc<Cell<Size>>,
    resize: RefCell<Option<Listener>>,
}

impl SimHost {
    fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    fn resize_window(&self, size: Size) {
        self.window.set(size);
        if let Some(listener) = self.resize.borrow_mut().as_mut() {
            listener();
        }
    }
}

impl Host for SimHost {
    fn schedule_frame(&self) -> bool {
        self.pending.set(true);
        true
    }

    fn cancel_frame(&self) {
        self.pending.set(false);
    }

    fn now_ms(&self) -> f64 {
        self.clock.now()
    }

    fn device_pixel_ratio(&self) -> f64 {
        2.0
    }

    fn window_size(&self) -> Size {
        self.window.get()
    }

    fn set_resize_listener(&self, listener: Option<Listener>) {
        *self.resize.borrow_mut() = listener;
    }
}

// -- simulated collaborators ------------------------------------------------

#[derive(Default)]
struct Scene {
    lights: usize,
    spin: f64,
    background: String,
}

impl SceneGraph for Scene {
    fn add_light(&mut self, _light: &Light) {
        self.lights += 1;
    }

    fn set_background(&mut self, background: Background<'_>) {
        self.background = match background {
            Background::Color(c) => format!("#{:06x}", c.0),
            Background::Skybox(url) => url.to_owned(),
        };
    }
}

struct SimRenderer {
    clock: Clock,
    displayed: Rc<Cell<Size>>,
    backing: BackingSize,
}

impl SceneRenderer<Scene, PerspectiveCamera> for SimRenderer {
    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) {
        // Fill cost grows with the backing store.
        let megapixels = f64::from(self.backing.width) * f64::from(self.backing.height) / 1e6;
        self.clock.spend(1.0 + 0.5 * megapixels);
    }

    fn displayed_size(&self) -> Size {
        self.displayed.get()
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn set_backing_size(&mut self, size: BackingSize, _update_style: bool) {
        self.clock.spend(0.4);
        self.backing = size;
    }

    fn set_clear_color(&mut self, _color: Color) {}
}

struct SimOverlay(Clock);

impl OverlayRenderer<Scene, PerspectiveCamera> for SimOverlay {
    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) {
        self.0.spend(0.3);
    }

    fn set_size(&mut self, _size: Size) {}
}

/// Orbit controls whose damping keeps reporting changes for `momentum`
/// updates after a drag.
struct SimControls {
    clock: Clock,
    listener: Rc<RefCell<Option<Listener>>>,
    momentum: Rc<Cell<u32>>,
}

impl InputController for SimControls {
    fn attach(&mut self, _target: InputTarget) {}

    fn set_target(&mut self, _target: [f64; 3]) {}

    fn set_damping(&mut self, _enabled: bool) {}

    fn update(&mut self) {
        self.clock.spend(0.05);
        let left = self.momentum.get();
        if left > 0 {
            self.momentum.set(left - 1);
            if let Some(listener) = self.listener.borrow_mut().as_mut() {
                listener();
            }
        }
    }

    fn set_change_listener(&mut self, listener: Option<Listener>) {
        *self.listener.borrow_mut() = listener;
    }
}

struct SimCompositor(Clock);

impl Compositor<Scene, PerspectiveCamera> for SimCompositor {
    fn add_render_pass(&mut self) {}

    fn add_bloom_pass(&mut self, _params: BloomParams) {}

    fn set_size(&mut self, _size: Size) {}

    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) {
        self.0.spend(4.5);
    }
}

/// Prints a HUD line every 30 produced frames.
struct SimMonitor {
    clock: Clock,
    stats: FrameStats<30>,
}

impl PerformanceMonitor for SimMonitor {
    fn update(&mut self) {
        if let Some(report) = self.stats.observe(self.clock.now())
            && report.total_frames % 30 == 0
        {
            println!("[stats] {}", report.hud_line());
        }
    }
}

/// Forwards every event to the console printer and the shared recording.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: Rc<RefCell<RecorderSink>>,
}

impl TraceSink for Tee {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.pretty.on_frame_begin(e);
        self.recorder.borrow_mut().on_frame_begin(e);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.pretty.on_reconcile(e);
        self.recorder.borrow_mut().on_reconcile(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.borrow_mut().on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.borrow_mut().on_phase_end(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.borrow_mut().on_frame_summary(s);
    }
}

// -- rig --------------------------------------------------------------------

struct Rig {
    clock: Clock,
    host: Rc<SimHost>,
    listener: Rc<RefCell<Option<Listener>>>,
    momentum: Rc<Cell<u32>>,
}

impl Rig {
    fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            host: Rc::new(SimHost {
                clock: clock.clone(),
                pending: Cell::new(false),
                window: Rc::new(Cell::new(Size::new(800.0, 600.0))),
                resize: RefCell::new(None),
            }),
            listener: Rc::new(RefCell::new(None)),
            momentum: Rc::new(Cell::new(0)),
        }
    }

    fn stage(&self, recorder: &Rc<RefCell<RecorderSink>>) -> Scene3d {
        let displayed = self.host.window.get();
        let parts = StageParts {
            scene: Scene::default(),
            camera: PerspectiveCamera::new(&CameraParams::DEFAULT, displayed.height),
            renderer: Box::new(SimRenderer {
                clock: self.clock.clone(),
                displayed: Rc::clone(&self.host.window),
                backing: BackingSize::ZERO,
            }),
            overlay: Box::new(SimOverlay(self.clock.clone())),
            controls: Box::new(SimControls {
                clock: self.clock.clone(),
                listener: Rc::clone(&self.listener),
                momentum: Rc::clone(&self.momentum),
            }),
        };
        let clock = self.clock.clone();
        let recorder = Rc::clone(recorder);
        Stage::new(StageConfig::dev(), parts, move || {
            DebugContext::with_monitor(SimMonitor {
                clock,
                stats: FrameStats::default(),
            })
            .traced(Tee {
                pretty: PrettyPrintSink::stderr().with_phases(false),
                recorder,
            })
        })
    }

    fn host(&self) -> Rc<dyn Host> {
        Rc::clone(&self.host) as Rc<dyn Host>
    }

    /// Simulates a drag: one change now, then `momentum` more while damping.
    fn drag(&self, momentum: u32) {
        self.momentum.set(momentum);
        if let Some(listener) = self.listener.borrow_mut().as_mut() {
            listener();
        }
    }
}

/// Runs a self-re-arming driver for `CONTINUOUS_FRAMES` frames, resizing the
/// window halfway through.
fn run_paced(rig: &Rig, driver: &mut Driver<Scene, PerspectiveCamera>) {
    while rig.host.take_pending() && driver.frame_count() < CONTINUOUS_FRAMES {
        let now = rig.clock.next_vsync();
        driver.on_frame(now);
        if driver.frame_count() == CONTINUOUS_FRAMES / 2 {
            rig.host.resize_window(Size::new(1280.0, 720.0));
        }
    }
    driver.stop();
}

fn main() {
    let clock = Clock::default();
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));

    // -- continuous ----------------------------------------------------------
    let rig = Rig::new(&clock);
    let mut driver = Driver::start_continuous(
        rig.stage(&recorder),
        rig.host(),
        Some(Box::new(|stage: &mut Scene3d, secs: f64| {
            stage.scene.spin = secs * 0.5;
        })),
    );
    run_paced(&rig, &mut driver);
    let scene = &driver.stage().scene;
    println!(
        "continuous: {} frames, {} lights, spin {:.2} rad",
        driver.frame_count(),
        scene.lights,
        scene.spin
    );

    // -- bloom ---------------------------------------------------------------
    let rig = Rig::new(&clock);
    let mut driver = Driver::start_bloom(
        rig.stage(&recorder),
        rig.host(),
        Box::new(SimCompositor(clock.clone())),
        BloomParams::DEFAULT,
        None,
    );
    run_paced(&rig, &mut driver);
    println!("bloom: {} frames", driver.frame_count());

    // -- on-demand -----------------------------------------------------------
    let rig = Rig::new(&clock);
    let mut driver = Driver::start_on_demand(rig.stage(&recorder), rig.host(), None);
    let start = clock.now();
    let mut script = [
        (100.0, Action::Drag),
        (400.0, Action::Resize),
        (420.0, Action::Resize),
        (700.0, Action::Request),
        (850.0, Action::Skybox),
    ]
    .into_iter()
    .peekable();
    while clock.now() - start < ON_DEMAND_MS {
        let now = clock.next_vsync();
        while let Some(&(at, action)) = script.peek() {
            if now - start < at {
                break;
            }
            match action {
                Action::Drag => rig.drag(5),
                Action::Resize => rig.host.resize_window(Size::new(1024.0, 768.0)),
                Action::Request => {
                    driver.request_render();
                }
                Action::Skybox => {
                    driver.set_background(Background::Skybox("sky/nebula.jpg"));
                }
            }
            script.next();
        }
        if rig.host.take_pending() {
            driver.on_frame(now);
        }
    }
    let stats = driver.requests().stats();
    driver.stop();
    println!(
        "on-demand: {} frames in {ON_DEMAND_MS}ms ({} requests coalesced), background {}",
        driver.frame_count(),
        stats.coalesced,
        driver.stage().scene.background
    );

    // -- export Chrome trace -------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    limelight_debug::chrome::export(recorder.borrow().as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path}");
}
