// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default light descriptors.
//!
//! A [`Stage`](crate::stage::Stage) adds one directional and one ambient light
//! to the scene at construction. These types only describe them; the external
//! scene graph creates the actual light objects via
//! [`SceneGraph::add_light`](crate::backend::SceneGraph::add_light).

use crate::config::Color;

/// Color and intensity shared by all light kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    /// Light color.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// A directional light positioned in world space, shining toward the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Color and intensity.
    pub params: LightParams,
    /// World-space position `[x, y, z]`.
    pub position: [f64; 3],
}

impl DirectionalLight {
    /// Fixed world position of the default directional light.
    pub const DEFAULT_POSITION: [f64; 3] = [1000.0, 1000.0, 1000.0];

    /// White, intensity 1, at [`DEFAULT_POSITION`](Self::DEFAULT_POSITION).
    pub const DEFAULT: Self = Self::new(Color::WHITE, 1.0);

    /// Creates a directional light at the default position.
    #[must_use]
    pub const fn new(color: Color, intensity: f32) -> Self {
        Self {
            params: LightParams { color, intensity },
            position: Self::DEFAULT_POSITION,
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A uniform ambient light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    /// Color and intensity.
    pub params: LightParams,
}

impl AmbientLight {
    /// White, intensity 0.3.
    pub const DEFAULT: Self = Self::new(Color::WHITE, 0.3);

    /// Creates an ambient light.
    #[must_use]
    pub const fn new(color: Color, intensity: f32) -> Self {
        Self {
            params: LightParams { color, intensity },
        }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A light to add to the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// See [`DirectionalLight`].
    Directional(DirectionalLight),
    /// See [`AmbientLight`].
    Ambient(AmbientLight),
}

impl Light {
    /// Returns the color and intensity of either kind.
    #[must_use]
    pub const fn params(&self) -> LightParams {
        match self {
            Self::Directional(l) => l.params,
            Self::Ambient(l) => l.params,
        }
    }
}
