// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas sizing.

use alloc::format;

use kurbo::Size;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlCanvasElement};

use limelight_core::camera::{CameraParams, PerspectiveCamera};
use limelight_core::surface::BackingSize;

/// A `<canvas>` seen as a drawing surface: CSS-pixel client size on one
/// side, backing-store size on the other.
///
/// Scene renderers delegate the size half of
/// [`SceneRenderer`](limelight_core::backend::SceneRenderer) to this.
#[derive(Clone, Debug)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    /// Wraps an existing canvas.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    /// Creates a block-level canvas that fills its container.
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
        let s = canvas.style();
        s.set_property("display", "block")?;
        s.set_property("width", "100%")?;
        s.set_property("height", "100%")?;
        Ok(Self { canvas })
    }

    /// Returns the canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Client size in CSS pixels.
    #[must_use]
    pub fn displayed_size(&self) -> Size {
        Size::new(
            f64::from(self.canvas.client_width()),
            f64::from(self.canvas.client_height()),
        )
    }

    /// Backing-store size in physical pixels.
    #[must_use]
    pub fn backing_size(&self) -> BackingSize {
        BackingSize::new(self.canvas.width(), self.canvas.height())
    }

    /// Resizes the backing store. With `update_style`, the CSS size is pinned
    /// to the same numbers, which stops the canvas from tracking its
    /// container.
    pub fn set_backing_size(&self, size: BackingSize, update_style: bool) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        if update_style {
            let s = self.canvas.style();
            let _ = s.set_property("width", &format!("{}px", size.width));
            let _ = s.set_property("height", &format!("{}px", size.height));
        }
    }

    /// Builds a camera whose field of view, unless `params` fixes one, makes
    /// one world unit at the virtual distance span one CSS pixel of this
    /// canvas.
    #[must_use]
    pub fn camera(&self, params: &CameraParams) -> PerspectiveCamera {
        PerspectiveCamera::new(params, self.displayed_size().height)
    }
}
