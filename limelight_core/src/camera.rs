// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perspective camera parameters and a ready-made [`Camera`] implementation.
//!
//! The default field of view is derived from the canvas height so that, at
//! the camera's distance from the origin, one world unit maps to one CSS
//! pixel:
//!
//! ```text
//! fov = 2 · atan((canvas_height / 2) / distance)
//! ```

use crate::backend::Camera;

/// Distance used when deriving the field of view.
pub const VIRTUAL_DISTANCE: f64 = 600.0;

/// Default camera position `[x, y, z]`. Its `z` equals [`VIRTUAL_DISTANCE`].
pub const DEFAULT_POSITION: [f64; 3] = [100.0, 100.0, VIRTUAL_DISTANCE];

/// Returns the vertical field of view, in degrees, at which a plane at
/// `distance` spans exactly `canvas_height` world units.
#[must_use]
pub fn derive_fov_degrees(canvas_height: f64, distance: f64) -> f64 {
    (2.0 * libm::atan(canvas_height / 2.0 / distance)).to_degrees()
}

/// Construction parameters for a perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    /// Vertical field of view in degrees. `None` derives it from the canvas
    /// height (see [`derive_fov_degrees`]).
    pub fov: Option<f64>,
    /// Initial aspect ratio. Replaced on the first resize reconciliation.
    pub aspect: f64,
    /// Near clip plane.
    pub near: f64,
    /// Far clip plane.
    pub far: f64,
}

impl CameraParams {
    /// Derived fov, aspect 2, near 0.1, far 2000.
    pub const DEFAULT: Self = Self {
        fov: None,
        aspect: 2.0,
        near: 0.1,
        far: 2000.0,
    };

    /// Overrides the derived field of view.
    #[must_use]
    pub const fn with_fov(mut self, degrees: f64) -> Self {
        self.fov = Some(degrees);
        self
    }

    /// Returns the field of view to use for a canvas of the given CSS height.
    #[must_use]
    pub fn resolve_fov(&self, canvas_height: f64) -> f64 {
        self.fov
            .unwrap_or_else(|| derive_fov_degrees(canvas_height, VIRTUAL_DISTANCE))
    }
}

impl Default for CameraParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A perspective camera holding its own column-major projection matrix.
///
/// Scene renderers that bring their own camera type implement [`Camera`]
/// directly; this type covers hosts that only need the matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Width / height.
    pub aspect: f64,
    /// Near clip plane.
    pub near: f64,
    /// Far clip plane.
    pub far: f64,
    /// World-space position.
    pub position: [f64; 3],
    projection: [[f64; 4]; 4],
}

impl PerspectiveCamera {
    /// Creates a camera for a canvas of the given CSS height.
    #[must_use]
    pub fn new(params: &CameraParams, canvas_height: f64) -> Self {
        let mut camera = Self {
            fov: params.resolve_fov(canvas_height),
            aspect: params.aspect,
            near: params.near,
            far: params.far,
            position: DEFAULT_POSITION,
            projection: [[0.0; 4]; 4],
        };
        camera.update_projection();
        camera
    }

    /// Returns the projection matrix as four columns.
    #[must_use]
    pub const fn projection(&self) -> [[f64; 4]; 4] {
        self.projection
    }
}

impl Camera for PerspectiveCamera {
    fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    fn update_projection(&mut self) {
        self.projection = perspective(self.fov, self.aspect, self.near, self.far);
    }
}

/// Builds a right-handed perspective matrix with clip-space z in `-1..1`.
fn perspective(fov_degrees: f64, aspect: f64, near: f64, far: f64) -> [[f64; 4]; 4] {
    let f = 1.0 / libm::tan(fov_degrees.to_radians() / 2.0);
    let depth = far - near;
    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, -(far + near) / depth, -1.0],
        [0.0, 0.0, -2.0 * far * near / depth, 0.0],
    ]
}
