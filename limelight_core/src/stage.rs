// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bundle of scene, camera and collaborators that a driver owns.
//!
//! [`Stage::new`] performs the one-shot setup every render loop starts from:
//!
//! 1. Adds the default directional and ambient lights to the scene.
//! 2. Sets the renderer clear color.
//! 3. Attaches the input controller to the overlay element, orbiting the
//!    origin.
//! 4. Renders the scene once.
//! 5. In [`Mode::Dev`] only, builds the [`DebugContext`].

use alloc::boxed::Box;
use core::fmt;

use crate::backend::{
    Background, Camera, InputController, InputTarget, OverlayRenderer, PerformanceMonitor, SceneGraph,
    SceneRenderer,
};
use crate::config::{Mode, StageConfig};
use crate::light::{AmbientLight, DirectionalLight, Light};
use crate::surface::{self, Reconciliation};
use crate::trace::TraceSink;

/// Point the input controller orbits around after setup.
pub const ORBIT_TARGET: [f64; 3] = [0.0, 0.0, 0.0];

/// Externally constructed collaborators handed to [`Stage::new`].
pub struct StageParts<S, C> {
    /// The library's scene.
    pub scene: S,
    /// The library's camera, usually built from
    /// [`CameraParams`](crate::camera::CameraParams).
    pub camera: C,
    /// Main canvas renderer.
    pub renderer: Box<dyn SceneRenderer<S, C>>,
    /// Label overlay renderer.
    pub overlay: Box<dyn OverlayRenderer<S, C>>,
    /// Orbit controls.
    pub controls: Box<dyn InputController>,
}

impl<S, C> fmt::Debug for StageParts<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageParts").finish_non_exhaustive()
    }
}

/// Dev-mode diagnostics, injected instead of living in process globals.
#[derive(Default)]
pub struct DebugContext {
    /// Frame-rate display updated once per produced frame.
    pub monitor: Option<Box<dyn PerformanceMonitor>>,
    /// Receiver of driver trace events.
    pub sink: Option<Box<dyn TraceSink>>,
}

impl DebugContext {
    /// Creates a context with a performance monitor and no trace sink.
    #[must_use]
    pub fn with_monitor(monitor: impl PerformanceMonitor + 'static) -> Self {
        Self {
            monitor: Some(Box::new(monitor)),
            sink: None,
        }
    }

    /// Installs a trace sink.
    #[must_use]
    pub fn traced(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }
}

impl fmt::Debug for DebugContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugContext")
            .field("monitor", &self.monitor.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Scene, camera, renderers and controls set up for a render loop.
///
/// Fields are public so frame callbacks can animate the scene and camera.
pub struct Stage<S, C> {
    /// The library's scene.
    pub scene: S,
    /// The library's camera.
    pub camera: C,
    /// Main canvas renderer.
    pub renderer: Box<dyn SceneRenderer<S, C>>,
    /// Label overlay renderer.
    pub overlay: Box<dyn OverlayRenderer<S, C>>,
    /// Orbit controls.
    pub controls: Box<dyn InputController>,
    config: StageConfig,
    debug: Option<DebugContext>,
}

impl<S, C> fmt::Debug for Stage<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("config", &self.config)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<S: SceneGraph, C: Camera> Stage<S, C> {
    /// Sets up a stage with the default lights.
    ///
    /// `dev` is called only when `config.mode` is [`Mode::Dev`].
    pub fn new(
        config: StageConfig,
        parts: StageParts<S, C>,
        dev: impl FnOnce() -> DebugContext,
    ) -> Self {
        Self::with_lights(
            config,
            parts,
            DirectionalLight::DEFAULT,
            AmbientLight::DEFAULT,
            dev,
        )
    }

    /// As [`new`](Self::new) with custom light color and intensity.
    pub fn with_lights(
        config: StageConfig,
        parts: StageParts<S, C>,
        directional: DirectionalLight,
        ambient: AmbientLight,
        dev: impl FnOnce() -> DebugContext,
    ) -> Self {
        let StageParts {
            mut scene,
            camera,
            mut renderer,
            overlay,
            mut controls,
        } = parts;

        scene.add_light(&Light::Directional(directional));
        scene.add_light(&Light::Ambient(ambient));
        renderer.set_clear_color(config.clear_color);
        controls.attach(InputTarget::Overlay);
        controls.set_target(ORBIT_TARGET);
        renderer.render(&scene, &camera);

        let debug = match config.mode {
            Mode::Dev => Some(dev()),
            Mode::Pro => None,
        };

        Self {
            scene,
            camera,
            renderer,
            overlay,
            controls,
            config,
            debug,
        }
    }

    /// Replaces the scene background, e.g. with a skybox.
    ///
    /// Takes effect at the next rendered frame.
    pub fn set_background(&mut self, background: Background<'_>) {
        self.scene.set_background(background);
    }

    /// Runs resize reconciliation and, if the backing buffer changed, resizes
    /// the overlay and refreshes the camera projection.
    ///
    /// The camera aspect is left untouched while the canvas has no height.
    pub fn reconcile(&mut self, device_pixel_ratio: f64) -> Reconciliation {
        let r = surface::reconcile(
            &mut *self.renderer,
            self.config.pixel_ratio,
            device_pixel_ratio,
        );
        if r.resized {
            self.overlay.set_size(r.displayed);
            if let Some(aspect) = r.aspect() {
                self.camera.set_aspect(aspect);
                self.camera.update_projection();
            }
        }
        r
    }
}

impl<S, C> Stage<S, C> {
    /// Returns the configuration the stage was built with.
    #[must_use]
    pub const fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Returns the operating mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Returns the debug context. Always `None` in [`Mode::Pro`].
    #[must_use]
    pub fn debug(&self) -> Option<&DebugContext> {
        self.debug.as_ref()
    }

    /// Returns the debug context mutably. Always `None` in [`Mode::Pro`].
    pub fn debug_mut(&mut self) -> Option<&mut DebugContext> {
        self.debug.as_mut()
    }

    /// Updates the performance monitor, if one exists.
    pub fn update_monitor(&mut self) {
        if let Some(monitor) = self.debug.as_mut().and_then(|d| d.monitor.as_mut()) {
            monitor.update();
        }
    }

    pub(crate) fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.debug.as_mut().and_then(|d| d.sink.take())
    }

    pub(crate) fn restore_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        if let (Some(debug), Some(sink)) = (self.debug.as_mut(), sink) {
            debug.sink = Some(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::testing::{Calls, FakeMonitor, parts};
    use kurbo::Size;

    use crate::surface::BackingSize;

    #[test]
    fn setup_order_and_defaults() {
        let calls = Calls::default();
        let stage = Stage::new(
            StageConfig::pro().with_clear_color(Color::from_hex(0x10_20_30)),
            parts(&calls, Size::new(800.0, 600.0), BackingSize::ZERO),
            || unreachable!("pro mode never builds diagnostics"),
        );

        assert_eq!(
            calls.take(),
            [
                "scene.add_light(directional #ffffff 1 @1000,1000,1000)",
                "scene.add_light(ambient #ffffff 0.3)",
                "renderer.set_clear_color(#102030)",
                "controls.attach(Overlay)",
                "controls.set_target(0,0,0)",
                "renderer.render",
            ]
        );
        assert!(stage.debug().is_none());
        assert_eq!(stage.mode(), Mode::Pro);
    }

    #[test]
    fn dev_mode_builds_debug_context_once() {
        let calls = Calls::default();
        let mut built = 0;
        let mut stage = Stage::new(
            StageConfig::dev(),
            parts(&calls, Size::new(800.0, 600.0), BackingSize::ZERO),
            || {
                built += 1;
                DebugContext::with_monitor(FakeMonitor::new(&calls))
            },
        );
        assert_eq!(built, 1);
        calls.take();

        stage.update_monitor();
        assert_eq!(calls.take(), ["monitor.update"]);
    }

    #[test]
    fn reconcile_updates_overlay_and_camera_only_when_resized() {
        let calls = Calls::default();
        let mut stage = Stage::new(
            StageConfig::pro(),
            parts(&calls, Size::new(800.0, 600.0), BackingSize::ZERO),
            DebugContext::default,
        );
        calls.take();

        let r = stage.reconcile(1.0);
        assert!(r.resized, "first reconcile from 0×0");
        assert_eq!(
            calls.take(),
            [
                "renderer.set_backing_size(800x600, style=false)",
                "overlay.set_size(800x600)",
                "camera.set_aspect(1.3333)",
                "camera.update_projection",
            ]
        );
        let aspect = stage.camera.aspect;
        assert!((aspect - 800.0 / 600.0).abs() < 1e-12, "got {aspect}");

        let r = stage.reconcile(1.0);
        assert!(!r.resized, "sizes already match");
        assert!(calls.take().is_empty(), "no overlay or camera update");
    }

    #[test]
    fn background_is_delegated_to_scene() {
        let calls = Calls::default();
        let mut stage = Stage::new(
            StageConfig::pro(),
            parts(&calls, Size::new(800.0, 600.0), BackingSize::ZERO),
            DebugContext::default,
        );
        calls.take();

        stage.set_background(Background::Skybox("sky/milkyway.jpg"));
        stage.set_background(Background::Color(Color::from_hex(0x00_00_20)));
        assert_eq!(
            calls.take(),
            [
                "scene.set_background(skybox sky/milkyway.jpg)",
                "scene.set_background(#000020)",
            ]
        );
    }

    #[test]
    fn zero_height_resizes_overlay_but_keeps_aspect() {
        let calls = Calls::default();
        let mut stage = Stage::new(
            StageConfig::pro(),
            parts(&calls, Size::new(300.0, 0.0), BackingSize::new(10, 10)),
            DebugContext::default,
        );
        calls.take();

        stage.reconcile(1.0);
        assert_eq!(
            calls.take(),
            [
                "renderer.set_backing_size(300x0, style=false)",
                "overlay.set_size(300x0)",
            ]
        );
    }
}
