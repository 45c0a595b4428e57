// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backing-buffer sizing.
//!
//! A canvas has two sizes: the *displayed* size laid out in CSS pixels and
//! the *backing* size of its drawing buffer in physical pixels. Before every
//! frame the driver reconciles them:
//!
//! ```text
//! required = (trunc(displayed.width × ratio), trunc(displayed.height × ratio))
//! ```
//!
//! If `required` differs from the renderer's current backing size, the
//! buffer is resized (without touching CSS) and the frame is marked
//! *resized*. Otherwise nothing is called.

use kurbo::Size;

use crate::backend::SceneRenderer;
use crate::config::PixelRatioPolicy;

/// A drawing-buffer size in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BackingSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl BackingSize {
    /// A zero-sized buffer, the state of a canvas before first layout.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a backing size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Returns the backing size needed to show `displayed` at `pixel_ratio`.
///
/// Each dimension is truncated toward zero. Negative or NaN products clamp
/// to 0.
#[must_use]
pub fn required_backing_size(displayed: Size, pixel_ratio: f64) -> BackingSize {
    BackingSize::new(
        truncate_px(displayed.width * pixel_ratio),
        truncate_px(displayed.height * pixel_ratio),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float-to-int `as` saturates; truncation toward zero is the intent"
)]
fn truncate_px(v: f64) -> u32 {
    v as u32
}

/// The outcome of one reconciliation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconciliation {
    /// Whether the backing buffer was resized this frame.
    pub resized: bool,
    /// Backing size after reconciliation.
    pub backing: BackingSize,
    /// Displayed size the backing size was derived from.
    pub displayed: Size,
    /// Pixel ratio in effect.
    pub pixel_ratio: f64,
}

impl Reconciliation {
    /// Returns `displayed.width / displayed.height`, or `None` while the
    /// canvas has no height.
    #[must_use]
    pub fn aspect(&self) -> Option<f64> {
        (self.displayed.height > 0.0).then(|| self.displayed.width / self.displayed.height)
    }
}

/// Brings `renderer`'s backing buffer in line with its displayed size.
///
/// Calls [`SceneRenderer::set_backing_size`] (with `update_style = false`)
/// only when the required size differs from the current one.
pub fn reconcile<S, C>(
    renderer: &mut dyn SceneRenderer<S, C>,
    policy: PixelRatioPolicy,
    device_pixel_ratio: f64,
) -> Reconciliation {
    let pixel_ratio = policy.effective(device_pixel_ratio);
    let displayed = renderer.displayed_size();
    let required = required_backing_size(displayed, pixel_ratio);
    let resized = renderer.backing_size() != required;
    if resized {
        renderer.set_backing_size(required, false);
    }
    Reconciliation {
        resized,
        backing: required,
        displayed,
        pixel_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Calls, FakeRenderer, Scene, TestCamera};

    fn renderer(displayed: Size, backing: BackingSize) -> (FakeRenderer, Calls) {
        let calls = Calls::default();
        (FakeRenderer::new(&calls, displayed, backing), calls)
    }

    #[test]
    fn required_size_truncates() {
        assert_eq!(
            required_backing_size(Size::new(800.0, 600.0), 1.0),
            BackingSize::new(800, 600)
        );
        assert_eq!(
            required_backing_size(Size::new(333.0, 101.0), 1.5),
            BackingSize::new(499, 151),
            "499.5 and 151.5 truncate"
        );
        assert_eq!(
            required_backing_size(Size::new(100.7, 50.2), 2.0),
            BackingSize::new(201, 100)
        );
        assert_eq!(
            required_backing_size(Size::new(-4.0, f64::NAN), 1.0),
            BackingSize::ZERO,
            "negative and NaN clamp to zero"
        );
    }

    #[test]
    fn first_reconcile_resizes_from_zero() {
        let (mut r, calls) = renderer(Size::new(800.0, 600.0), BackingSize::ZERO);
        let out = reconcile::<Scene, TestCamera>(&mut r, PixelRatioPolicy::Device, 1.0);

        assert!(out.resized, "0×0 → 800×600 is a resize");
        assert_eq!(out.backing, BackingSize::new(800, 600));
        assert_eq!(r.backing, BackingSize::new(800, 600));
        assert_eq!(calls.take(), ["renderer.set_backing_size(800x600, style=false)"]);
        let aspect = out.aspect().unwrap();
        assert!((aspect - 800.0 / 600.0).abs() < 1e-12, "got {aspect}");
    }

    #[test]
    fn matching_backing_size_makes_no_call() {
        let (mut r, calls) = renderer(Size::new(400.0, 300.0), BackingSize::new(800, 600));
        let out = reconcile::<Scene, TestCamera>(&mut r, PixelRatioPolicy::Device, 2.0);

        assert!(!out.resized, "already at 2× size");
        assert!(calls.take().is_empty(), "no resize call");
    }

    #[test]
    fn unscaled_policy_ignores_device_ratio() {
        let (mut r, _calls) = renderer(Size::new(400.0, 300.0), BackingSize::new(800, 600));
        let out = reconcile::<Scene, TestCamera>(&mut r, PixelRatioPolicy::Unscaled, 2.0);

        assert!(out.resized, "shrinks back to 1×");
        assert_eq!(out.pixel_ratio, 1.0);
        assert_eq!(r.backing, BackingSize::new(400, 300));
    }

    #[test]
    fn aspect_is_none_without_height() {
        let (mut r, _calls) = renderer(Size::new(640.0, 0.0), BackingSize::new(1, 1));
        let out = reconcile::<Scene, TestCamera>(&mut r, PixelRatioPolicy::Device, 1.0);
        assert!(out.resized, "backing goes to 640×0");
        assert_eq!(out.aspect(), None);
    }
}
