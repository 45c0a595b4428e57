// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage and strategy configuration.
//!
//! Plain-data structs with `const` constructors. Nothing here is validated:
//! values are handed to the external library unchanged.

use core::fmt;
use core::str::FromStr;

/// Operating mode of a stage.
///
/// `Dev` enables the [`DebugContext`](crate::stage::DebugContext)
/// (performance monitor, trace sink). `Pro` runs without any of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Development: performance monitor and diagnostics are constructed.
    #[default]
    Dev,
    /// Production: no diagnostics.
    Pro,
}

impl Mode {
    /// Returns the lowercase name used in configuration strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Pro => "pro",
        }
    }

    /// Returns `true` for [`Mode::Dev`].
    #[must_use]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Dev)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Mode`] from a string fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseModeError;

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected \"dev\" or \"pro\"")
    }
}

impl core::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "pro" => Ok(Self::Pro),
            _ => Err(ParseModeError),
        }
    }
}

/// An opaque RGB color, stored as `0xRRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Pure white, the default clear and light color.
    pub const WHITE: Self = Self(0xff_ff_ff);

    /// Creates a color from a `0xRRGGBB` value. Bits above 24 are dropped.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xff_ff_ff)
    }

    /// Returns the red, green and blue channels in `0.0..=1.0`.
    #[must_use]
    pub fn to_rgb_f32(self) -> [f32; 3] {
        let r = (self.0 >> 16) & 0xff;
        let g = (self.0 >> 8) & 0xff;
        let b = self.0 & 0xff;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:06x})", self.0)
    }
}

/// Whether reconciliation scales the displayed size by the device pixel
/// ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelRatioPolicy {
    /// Render at native sharpness: `backing = displayed × devicePixelRatio`.
    #[default]
    Device,
    /// Ignore the device ratio: `backing = displayed`.
    Unscaled,
}

impl PixelRatioPolicy {
    /// Returns the ratio to apply given the host's device pixel ratio.
    #[must_use]
    pub fn effective(self, device_pixel_ratio: f64) -> f64 {
        match self {
            Self::Device => device_pixel_ratio,
            Self::Unscaled => 1.0,
        }
    }
}

/// Construction parameters for a [`Stage`](crate::stage::Stage).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConfig {
    /// Operating mode.
    pub mode: Mode,
    /// Renderer clear color.
    pub clear_color: Color,
    /// Pixel-ratio handling for resize reconciliation.
    pub pixel_ratio: PixelRatioPolicy,
}

impl StageConfig {
    /// Development defaults: white clear color, device pixel ratio.
    #[must_use]
    pub const fn dev() -> Self {
        Self {
            mode: Mode::Dev,
            clear_color: Color::WHITE,
            pixel_ratio: PixelRatioPolicy::Device,
        }
    }

    /// Production defaults: as [`dev`](Self::dev) without diagnostics.
    #[must_use]
    pub const fn pro() -> Self {
        Self {
            mode: Mode::Pro,
            ..Self::dev()
        }
    }

    /// Returns the defaults for the given mode.
    #[must_use]
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Dev => Self::dev(),
            Mode::Pro => Self::pro(),
        }
    }

    /// Replaces the clear color.
    #[must_use]
    pub const fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::dev()
    }
}

/// Parameters of the bloom pass used by the bloom strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomParams {
    /// Glow intensity.
    pub strength: f32,
    /// Spread of the glow.
    pub radius: f32,
    /// Luminance above which pixels bloom.
    pub threshold: f32,
}

impl BloomParams {
    /// Strength 1.5, radius 0.5, threshold 0.2.
    pub const DEFAULT: Self = Self {
        strength: 1.5,
        radius: 0.5,
        threshold: 0.2,
    };
}

impl Default for BloomParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
