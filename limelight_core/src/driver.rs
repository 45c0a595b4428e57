// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render-loop driver.
//!
//! A [`Driver`] owns a [`Stage`] and one [`FrameStrategy`]. The host calls
//! [`Driver::on_frame`] for every frame it was asked to schedule. Each frame:
//!
//! 1. Clears the pending-request flag, so requests made during the frame
//!    schedule the next one.
//! 2. Returns early if the driver was stopped.
//! 3. Reconciles the backing buffer, resizing overlay and camera if needed.
//! 4. Lets the strategy produce the rest of the frame.
//! 5. Re-arms the host if the strategy is continuously paced.
//!
//! Every `start_*` constructor produces one frame eagerly with timestamp
//! `0.0` before returning.
//!
//! # Example
//!
//! ```rust,ignore
//! let host: Rc<dyn Host> = Rc::new(RafHost::new());
//! let stage = Stage::new(StageConfig::dev(), parts, || DebugContext::with_monitor(stats));
//! let mut driver = Driver::start_continuous(stage, host, Some(Box::new(|stage, t| {
//!     stage.scene.spin(t);
//! })));
//! // Host frame callback:
//! driver.on_frame(timestamp_ms);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use crate::backend::{Background, Camera, Compositor, Host, SceneGraph};
use crate::config::BloomParams;
use crate::request::FrameRequests;
use crate::stage::Stage;
use crate::strategy::{
    Bloom, Continuous, FrameContext, FrameStrategy, OnDemand, OnDemandCallback, Pacing,
    StrategyEnv, StrategyKind, TimedCallback,
};
use crate::surface::Reconciliation;
use crate::timing::FrameTick;
use crate::trace::{FrameSummary, PhaseKind, Tracer};

/// One running render loop.
pub struct Driver<S, C> {
    stage: Stage<S, C>,
    strategy: Box<dyn FrameStrategy<S, C>>,
    host: Rc<dyn Host>,
    requests: FrameRequests,
    frame_count: u64,
    surface: Option<Reconciliation>,
    /// Set once the strategy has released its listeners.
    released: bool,
}

impl<S, C> fmt::Debug for Driver<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("strategy", &self.strategy.kind())
            .field("requests", &self.requests)
            .field("frame_count", &self.frame_count)
            .field("surface", &self.surface)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl<S: SceneGraph + 'static, C: Camera + 'static> Driver<S, C> {
    /// Renders at every display refresh, calling `callback` with elapsed
    /// seconds after the scene render.
    pub fn start_continuous(
        stage: Stage<S, C>,
        host: Rc<dyn Host>,
        callback: Option<TimedCallback<S, C>>,
    ) -> Self {
        Self::start(stage, host, Continuous::new(callback))
    }

    /// Renders at every display refresh through `compositor`, configured
    /// with a base render pass and a bloom pass using `params`.
    pub fn start_bloom(
        stage: Stage<S, C>,
        host: Rc<dyn Host>,
        compositor: Box<dyn Compositor<S, C>>,
        params: BloomParams,
        callback: Option<TimedCallback<S, C>>,
    ) -> Self {
        Self::start(stage, host, Bloom::new(compositor, params, callback))
    }

    /// Renders once now, then only when the view changes, the window
    /// resizes, or [`request_render`](Self::request_render) is called.
    pub fn start_on_demand(
        stage: Stage<S, C>,
        host: Rc<dyn Host>,
        callback: Option<OnDemandCallback<S, C>>,
    ) -> Self {
        Self::start(stage, host, OnDemand::new(callback))
    }

    /// Starts a driver with any strategy.
    pub fn start(
        mut stage: Stage<S, C>,
        host: Rc<dyn Host>,
        mut strategy: impl FrameStrategy<S, C> + 'static,
    ) -> Self {
        let requests = FrameRequests::new(Rc::clone(&host));
        strategy.start(
            &mut stage,
            StrategyEnv {
                host: &*host,
                requests: &requests,
            },
        );
        let mut driver = Self {
            stage,
            strategy: Box::new(strategy),
            host,
            requests,
            frame_count: 0,
            surface: None,
            released: false,
        };
        driver.on_frame(0.0);
        driver
    }

    /// Produces one frame. Called by the host for every scheduled frame.
    ///
    /// Returns `None` without touching any collaborator once the driver is
    /// stopped.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> Option<FrameSummary> {
        self.requests.begin_frame();
        if self.requests.is_stopped() {
            return None;
        }

        let tick = FrameTick::new(timestamp_ms, self.frame_count);
        self.frame_count += 1;

        let host = Rc::clone(&self.host);
        let mut sink = self.stage.take_trace_sink();
        let tracer = match sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        let mut frame = FrameContext::new(tick, self.strategy.kind(), &*host, tracer);

        let stage = &mut self.stage;
        let reconciliation = frame.phase(PhaseKind::Reconcile, || {
            stage.reconcile(host.device_pixel_ratio())
        });
        frame.reconciled(&reconciliation);
        self.surface = Some(reconciliation);

        self.strategy.produce_frame(&mut self.stage, &mut frame);

        if self.strategy.kind().pacing() == Pacing::Continuous {
            self.requests.request();
        }

        let summary = frame.finish();
        self.stage.restore_trace_sink(sink);
        Some(summary)
    }

    /// Replaces the scene background and requests a frame to show it.
    ///
    /// Returns whether a host frame was scheduled, as
    /// [`request_render`](Self::request_render).
    pub fn set_background(&mut self, background: Background<'_>) -> bool {
        self.stage.set_background(background);
        self.requests.request()
    }
}

impl<S, C> Driver<S, C> {
    /// Requests one frame.
    ///
    /// Returns `true` if a host frame was scheduled. Coalesces with a pending
    /// frame (which, for continuous strategies, is always armed).
    pub fn request_render(&self) -> bool {
        self.requests.request()
    }

    /// Stops the loop: cancels a pending frame, unsubscribes listeners and
    /// ignores frames already in flight. Idempotent and final.
    ///
    /// Also completes a stop begun through a [`FrameRequests`] handle, which
    /// halts scheduling but cannot reach the listeners.
    pub fn stop(&mut self) {
        self.requests.stop();
        if self.released {
            return;
        }
        self.released = true;
        self.strategy.stop(
            &mut self.stage,
            StrategyEnv {
                host: &*self.host,
                requests: &self.requests,
            },
        );
    }

    /// Returns `true` after [`stop`](Self::stop).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.requests.is_stopped()
    }

    /// Returns the active strategy.
    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Returns a clone of the request handle, for hosts that want to request
    /// frames without holding the driver.
    #[must_use]
    pub fn requests(&self) -> FrameRequests {
        self.requests.clone()
    }

    /// Returns the number of frames produced so far, eager frame included.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the outcome of the most recent reconciliation.
    #[must_use]
    pub const fn surface(&self) -> Option<&Reconciliation> {
        self.surface.as_ref()
    }

    /// Returns the stage.
    #[must_use]
    pub const fn stage(&self) -> &Stage<S, C> {
        &self.stage
    }

    /// Returns the stage mutably, e.g. to edit the scene before
    /// [`request_render`](Self::request_render).
    pub fn stage_mut(&mut self) -> &mut Stage<S, C> {
        &mut self.stage
    }
}
