// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contract for rendering libraries and hosts.
//!
//! Limelight never draws anything itself. A host application provides:
//!
//! - **Scene and camera**: Opaque values of the library's own types. The
//!   scene implements [`SceneGraph`] so default lights can be added; the
//!   camera implements [`Camera`] so resize reconciliation can refresh its
//!   projection.
//!
//! - **Renderers**: A [`SceneRenderer`] that draws `(scene, camera)` into
//!   the canvas and owns its backing buffer, and an [`OverlayRenderer`] that
//!   positions DOM labels over it.
//!
//! - **Input**: An [`InputController`] mapping pointer input to camera
//!   orbit/pan/zoom and reporting view changes.
//!
//! - **Post-processing**: A [`Compositor`] for the bloom strategy.
//!
//! - **Diagnostics**: An optional [`PerformanceMonitor`], present only in
//!   dev mode.
//!
//! - **Host**: A [`Host`] providing the one-shot "next frame" scheduling
//!   primitive, a clock, and window signals.
//!
//! All collaborator calls are infallible from the driver's point of view.
//! Failures inside the library propagate to the host's own error surfacing.

use alloc::boxed::Box;

use kurbo::Size;

use crate::config::{BloomParams, Color};
use crate::light::Light;
use crate::surface::BackingSize;

/// A listener invoked with no arguments (view changed, window resized).
pub type Listener = Box<dyn FnMut()>;

/// Draws a scene into the main canvas and owns the canvas backing buffer.
pub trait SceneRenderer<S, C> {
    /// Renders `scene` as seen from `camera`.
    fn render(&mut self, scene: &S, camera: &C);

    /// Returns the displayed (CSS layout) size of the canvas.
    fn displayed_size(&self) -> Size;

    /// Returns the current backing-buffer size in physical pixels.
    fn backing_size(&self) -> BackingSize;

    /// Resizes the backing buffer.
    ///
    /// When `update_style` is `false` only the drawing buffer changes; the
    /// canvas' CSS size is left to layout.
    fn set_backing_size(&mut self, size: BackingSize, update_style: bool);

    /// Sets the color the canvas is cleared to before each render.
    fn set_clear_color(&mut self, color: Color);
}

/// Renders DOM-anchored 2D labels aligned with 3D positions.
pub trait OverlayRenderer<S, C> {
    /// Repositions labels for `scene` as seen from `camera`.
    fn render(&mut self, scene: &S, camera: &C);

    /// Resizes the overlay to the given displayed (CSS) size.
    fn set_size(&mut self, size: Size);
}

/// Which element an [`InputController`] listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputTarget {
    /// The overlay's output element, stacked above the canvas.
    Overlay,
    /// The main rendering canvas.
    Canvas,
}

/// Orbit-style camera controls.
pub trait InputController {
    /// Starts reading input from `target`, detaching from any previous one.
    fn attach(&mut self, target: InputTarget);

    /// Sets the point the camera orbits around.
    fn set_target(&mut self, target: [f64; 3]);

    /// Enables or disables inertial damping.
    fn set_damping(&mut self, enabled: bool);

    /// Advances internal state by one step and applies it to the camera.
    ///
    /// With damping enabled this may report further view changes.
    fn update(&mut self);

    /// Installs (or with `None`, removes) the "view changed" listener.
    fn set_change_listener(&mut self, listener: Option<Listener>);
}

/// A chain of post-processing passes applied after the base scene render.
pub trait Compositor<S, C> {
    /// Appends a pass that renders the scene as-is.
    fn add_render_pass(&mut self);

    /// Appends a bloom pass with the given parameters.
    fn add_bloom_pass(&mut self, params: BloomParams);

    /// Resizes all intermediate targets.
    fn set_size(&mut self, size: Size);

    /// Runs every pass for `scene` as seen from `camera`.
    fn render(&mut self, scene: &S, camera: &C);
}

/// A frame-rate display, updated once per produced frame.
pub trait PerformanceMonitor {
    /// Records that a frame was produced.
    fn update(&mut self);
}

/// A camera whose projection depends on the canvas aspect ratio.
pub trait Camera {
    /// Sets width / height.
    fn set_aspect(&mut self, aspect: f64);

    /// Recomputes the projection matrix from current parameters.
    fn update_projection(&mut self);
}

/// What a scene shows behind its contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background<'a> {
    /// A flat color.
    Color(Color),
    /// A sky texture at `url`. Fetching and decoding it is up to the scene;
    /// the previous background stays until the texture is ready.
    Skybox(&'a str),
}

/// The part of the library's scene graph a stage drives.
pub trait SceneGraph {
    /// Adds a light to the scene.
    fn add_light(&mut self, light: &Light);

    /// Replaces the scene background.
    fn set_background(&mut self, background: Background<'_>);
}

/// The environment a driver runs in.
///
/// All methods take `&self`: a host is shared (`Rc<dyn Host>`) between the
/// driver and the frame-request handle held by listeners.
pub trait Host {
    /// Schedules exactly one call to the driver's frame entry point at the
    /// next display refresh.
    ///
    /// Returns `false` if no frame will be delivered, for example because the
    /// host has nowhere to deliver it yet. A host that already has a frame
    /// pending returns `true`.
    fn schedule_frame(&self) -> bool;

    /// Cancels a frame scheduled with [`schedule_frame`](Self::schedule_frame)
    /// that has not run yet.
    fn cancel_frame(&self);

    /// Returns the host clock in milliseconds, on the same timeline as frame
    /// timestamps.
    fn now_ms(&self) -> f64;

    /// Returns the ratio of physical to CSS pixels.
    fn device_pixel_ratio(&self) -> f64;

    /// Returns the window's inner size in CSS pixels.
    fn window_size(&self) -> Size;

    /// Installs (or with `None`, removes) the window "resized" listener.
    fn set_resize_listener(&self, listener: Option<Listener>);
}
