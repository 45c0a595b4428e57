// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-production strategies.
//!
//! The driver runs the shared pre-frame step (resize reconciliation) and then
//! hands the rest of the frame to a [`FrameStrategy`]. Three are provided:
//!
//! | Strategy | Pacing | Per-frame order after reconciliation |
//! |---|---|---|
//! | [`Continuous`] | every refresh | overlay → scene → callback(secs) → monitor |
//! | [`Bloom`] | every refresh | overlay → compositor → callback(secs) → monitor |
//! | [`OnDemand`] | per request | damped input step → monitor → callback() → scene |

use alloc::boxed::Box;
use core::fmt;

use crate::backend::{Compositor, Host, InputTarget};
use crate::config::BloomParams;
use crate::request::FrameRequests;
use crate::stage::Stage;
use crate::surface::Reconciliation;
use crate::timing::FrameTick;
use crate::trace::{
    FrameBeginEvent, FrameSummary, FrameSummaryBuilder, PhaseBeginEvent, PhaseEndEvent,
    PhaseKind, ReconcileEvent, Tracer,
};

/// Callback for time-driven strategies, called with elapsed seconds.
pub type TimedCallback<S, C> = Box<dyn FnMut(&mut Stage<S, C>, f64)>;

/// Callback for the on-demand strategy.
pub type OnDemandCallback<S, C> = Box<dyn FnMut(&mut Stage<S, C>)>;

/// When frames are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pacing {
    /// The driver re-arms after every frame.
    Continuous,
    /// Frames run only for coalesced requests.
    OnDemand,
}

/// Identifies a built-in strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// See [`Continuous`].
    Continuous,
    /// See [`Bloom`].
    Bloom,
    /// See [`OnDemand`].
    OnDemand,
}

impl StrategyKind {
    /// Returns how frames are paced.
    #[must_use]
    pub const fn pacing(self) -> Pacing {
        match self {
            Self::Continuous | Self::Bloom => Pacing::Continuous,
            Self::OnDemand => Pacing::OnDemand,
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Bloom => "bloom",
            Self::OnDemand => "on-demand",
        }
    }
}

/// What a strategy can reach while starting or stopping.
#[derive(Clone, Copy)]
pub struct StrategyEnv<'a> {
    /// The host the driver runs on.
    pub host: &'a dyn Host,
    /// The driver's request handle. Clone it into listeners.
    pub requests: &'a FrameRequests,
}

impl fmt::Debug for StrategyEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyEnv")
            .field("requests", self.requests)
            .finish_non_exhaustive()
    }
}

/// Per-frame state handed to [`FrameStrategy::produce_frame`]: the tick,
/// phase timing, and the tracer.
pub struct FrameContext<'a> {
    tick: FrameTick,
    clock: &'a dyn Host,
    tracer: Tracer<'a>,
    summary: FrameSummaryBuilder,
}

impl fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("tick", &self.tick)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<'a> FrameContext<'a> {
    /// Starts a frame and emits its [`FrameBeginEvent`].
    pub fn new(
        tick: FrameTick,
        strategy: StrategyKind,
        clock: &'a dyn Host,
        mut tracer: Tracer<'a>,
    ) -> Self {
        let begin = FrameBeginEvent {
            frame_index: tick.frame_index,
            timestamp_ms: tick.timestamp_ms,
            strategy,
        };
        tracer.frame_begin(&begin);
        Self {
            tick,
            clock,
            tracer,
            summary: FrameSummaryBuilder::new(&begin),
        }
    }

    /// Returns the frame's tick.
    #[must_use]
    pub const fn tick(&self) -> FrameTick {
        self.tick
    }

    /// Marks the start of a phase.
    pub fn begin(&mut self, phase: PhaseKind) {
        let timestamp_ms = self.clock.now_ms();
        self.summary.phase_begin(phase, timestamp_ms);
        self.tracer.phase_begin(&PhaseBeginEvent {
            frame_index: self.tick.frame_index,
            phase,
            timestamp_ms,
        });
    }

    /// Marks the end of a phase.
    pub fn end(&mut self, phase: PhaseKind) {
        let timestamp_ms = self.clock.now_ms();
        self.summary.phase_end(phase, timestamp_ms);
        self.tracer.phase_end(&PhaseEndEvent {
            frame_index: self.tick.frame_index,
            phase,
            timestamp_ms,
        });
    }

    /// Runs `f` as one phase.
    pub fn phase<R>(&mut self, phase: PhaseKind, f: impl FnOnce() -> R) -> R {
        self.begin(phase);
        let out = f();
        self.end(phase);
        out
    }

    pub(crate) fn reconciled(&mut self, r: &Reconciliation) {
        self.summary.set_resized(r.resized);
        self.tracer.reconcile(&ReconcileEvent::new(self.tick.frame_index, r));
    }

    /// Emits and returns the frame summary.
    pub fn finish(mut self) -> FrameSummary {
        let summary = self.summary.finish();
        self.tracer.frame_summary(&summary);
        summary
    }
}

/// Produces the part of a frame that follows resize reconciliation.
pub trait FrameStrategy<S, C> {
    /// Returns which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Called once before the eager first frame.
    fn start(&mut self, stage: &mut Stage<S, C>, env: StrategyEnv<'_>) {
        _ = (stage, env);
    }

    /// Produces one frame.
    fn produce_frame(&mut self, stage: &mut Stage<S, C>, frame: &mut FrameContext<'_>);

    /// Called once when the driver stops. Must undo any subscriptions made in
    /// [`start`](Self::start).
    fn stop(&mut self, stage: &mut Stage<S, C>, env: StrategyEnv<'_>) {
        _ = (stage, env);
    }
}

/// Callback and monitor steps shared by the time-driven strategies.
fn finish_timed<S, C>(
    stage: &mut Stage<S, C>,
    frame: &mut FrameContext<'_>,
    callback: &mut Option<TimedCallback<S, C>>,
) {
    if let Some(callback) = callback {
        let secs = frame.tick().elapsed_secs();
        frame.phase(PhaseKind::Callback, || callback(stage, secs));
    }
    if stage.debug().is_some() {
        frame.phase(PhaseKind::Monitor, || stage.update_monitor());
    }
}

// ---------------------------------------------------------------------------
// Continuous
// ---------------------------------------------------------------------------

/// Renders overlay and scene at every display refresh.
pub struct Continuous<S, C> {
    callback: Option<TimedCallback<S, C>>,
}

impl<S, C> Continuous<S, C> {
    /// Creates the strategy with an optional per-frame callback receiving
    /// elapsed seconds.
    #[must_use]
    pub fn new(callback: Option<TimedCallback<S, C>>) -> Self {
        Self { callback }
    }
}

impl<S, C> fmt::Debug for Continuous<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuous")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl<S, C> FrameStrategy<S, C> for Continuous<S, C> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Continuous
    }

    fn produce_frame(&mut self, stage: &mut Stage<S, C>, frame: &mut FrameContext<'_>) {
        frame.phase(PhaseKind::Overlay, || {
            stage.overlay.render(&stage.scene, &stage.camera);
        });
        frame.phase(PhaseKind::Scene, || {
            stage.renderer.render(&stage.scene, &stage.camera);
        });
        finish_timed(stage, frame, &mut self.callback);
    }
}

// ---------------------------------------------------------------------------
// Bloom
// ---------------------------------------------------------------------------

/// As [`Continuous`], with the scene drawn through a post-processing
/// compositor carrying a bloom pass.
pub struct Bloom<S, C> {
    compositor: Box<dyn Compositor<S, C>>,
    params: BloomParams,
    callback: Option<TimedCallback<S, C>>,
}

impl<S, C> Bloom<S, C> {
    /// Creates the strategy around a freshly constructed compositor.
    ///
    /// The compositor is configured when the driver starts.
    #[must_use]
    pub fn new(
        compositor: Box<dyn Compositor<S, C>>,
        params: BloomParams,
        callback: Option<TimedCallback<S, C>>,
    ) -> Self {
        Self {
            compositor,
            params,
            callback,
        }
    }

    /// Returns the bloom parameters.
    #[must_use]
    pub const fn params(&self) -> BloomParams {
        self.params
    }
}

impl<S, C> fmt::Debug for Bloom<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bloom")
            .field("params", &self.params)
            .field("callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}

impl<S, C> FrameStrategy<S, C> for Bloom<S, C> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Bloom
    }

    fn start(&mut self, _stage: &mut Stage<S, C>, env: StrategyEnv<'_>) {
        self.compositor.add_render_pass();
        self.compositor.add_bloom_pass(self.params);
        self.compositor.set_size(env.host.window_size());
    }

    fn produce_frame(&mut self, stage: &mut Stage<S, C>, frame: &mut FrameContext<'_>) {
        frame.phase(PhaseKind::Overlay, || {
            stage.overlay.render(&stage.scene, &stage.camera);
        });
        let compositor = &mut self.compositor;
        frame.phase(PhaseKind::Composite, || {
            compositor.render(&stage.scene, &stage.camera);
        });
        finish_timed(stage, frame, &mut self.callback);
    }
}

// ---------------------------------------------------------------------------
// OnDemand
// ---------------------------------------------------------------------------

/// Renders only when the view changes or the window resizes.
///
/// At start the input controller moves from the overlay to the canvas, and
/// the driver's request operation is subscribed to the controller's change
/// notification and the host's resize notification.
pub struct OnDemand<S, C> {
    callback: Option<OnDemandCallback<S, C>>,
}

impl<S, C> OnDemand<S, C> {
    /// Creates the strategy with an optional per-frame callback.
    #[must_use]
    pub fn new(callback: Option<OnDemandCallback<S, C>>) -> Self {
        Self { callback }
    }
}

impl<S, C> fmt::Debug for OnDemand<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnDemand")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl<S, C> FrameStrategy<S, C> for OnDemand<S, C> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OnDemand
    }

    fn start(&mut self, stage: &mut Stage<S, C>, env: StrategyEnv<'_>) {
        stage.controls.attach(InputTarget::Canvas);

        let requests = env.requests.clone();
        stage.controls.set_change_listener(Some(Box::new(move || {
            requests.request();
        })));
        let requests = env.requests.clone();
        env.host.set_resize_listener(Some(Box::new(move || {
            requests.request();
        })));
    }

    fn produce_frame(&mut self, stage: &mut Stage<S, C>, frame: &mut FrameContext<'_>) {
        frame.phase(PhaseKind::Input, || {
            stage.controls.set_damping(true);
            stage.controls.update();
        });
        if stage.debug().is_some() {
            frame.phase(PhaseKind::Monitor, || stage.update_monitor());
        }
        if let Some(callback) = &mut self.callback {
            frame.phase(PhaseKind::Callback, || callback(stage));
        }
        frame.phase(PhaseKind::Scene, || {
            stage.renderer.render(&stage.scene, &stage.camera);
        });
    }

    fn stop(&mut self, stage: &mut Stage<S, C>, env: StrategyEnv<'_>) {
        stage.controls.set_change_listener(None);
        env.host.set_resize_listener(None);
    }
}
