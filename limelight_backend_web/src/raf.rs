// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` host and render-loop wiring.
//!
//! [`RafHost`] implements [`Host`] on top of the browser's one-shot
//! `requestAnimationFrame` primitive, the `window` resize event, and
//! `devicePixelRatio`. [`WebRenderLoop`] owns a [`Driver`] and routes every
//! animation-frame callback into [`Driver::on_frame`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use kurbo::Size;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use limelight_core::backend::{Host, Listener};
use limelight_core::driver::Driver;
use limelight_core::request::FrameRequests;

// Direct global bindings instead of `web_sys::Window` methods, so the
// per-frame path never has to unwrap a `Result`.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;
type ResizeClosure = Closure<dyn FnMut()>;

/// Browser [`Host`]: one-shot animation frames plus window signals.
///
/// Install the frame callback with
/// [`set_frame_callback`](Self::set_frame_callback) before the first
/// [`schedule_frame`](Host::schedule_frame); [`WebRenderLoop`] does this for
/// you. Without a callback, `schedule_frame` refuses and requests stay
/// unarmed.
pub struct RafHost {
    window: Window,

    /// The JS closure handed to `requestAnimationFrame`.
    closure: RefCell<Option<RafClosure>>,

    /// ID of the pending animation frame, cleared when it fires.
    raf_id: Rc<Cell<Option<i32>>>,

    /// The JS closure currently registered for `resize`.
    resize: RefCell<Option<ResizeClosure>>,
}

impl core::fmt::Debug for RafHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafHost")
            .field("raf_id", &self.raf_id.get())
            .field("has_frame_callback", &self.closure.borrow().is_some())
            .field("has_resize_listener", &self.resize.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl RafHost {
    /// Creates a host bound to the global `window`.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        Ok(Self::with_window(window))
    }

    /// Creates a host bound to `window`.
    #[must_use]
    pub fn with_window(window: Window) -> Self {
        Self {
            window,
            closure: RefCell::new(None),
            raf_id: Rc::new(Cell::new(None)),
            resize: RefCell::new(None),
        }
    }

    /// Returns the window this host observes.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Installs the function invoked with the `DOMHighResTimeStamp` of every
    /// animation frame this host schedules.
    pub fn set_frame_callback(&self, mut callback: impl FnMut(f64) + 'static) {
        let raf_id = Rc::clone(&self.raf_id);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            raf_id.set(None);
            callback(timestamp_ms);
        }) as Box<dyn FnMut(f64)>);
        *self.closure.borrow_mut() = Some(closure);
    }

    /// Cancels any pending frame and drops the frame callback.
    pub fn clear_frame_callback(&self) {
        self.cancel_frame();
        self.closure.borrow_mut().take();
    }

    /// Returns `true` while an animation frame is pending.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.raf_id.get().is_some()
    }
}

impl Host for RafHost {
    /// Returns `false` until a frame callback is installed.
    fn schedule_frame(&self) -> bool {
        if self.raf_id.get().is_some() {
            return true;
        }
        let Some(ref closure) = *self.closure.borrow() else {
            return false;
        };
        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.raf_id.set(Some(id));
        true
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.raf_id.take() {
            cancel_animation_frame(id);
        }
    }

    fn now_ms(&self) -> f64 {
        performance_now()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn window_size(&self) -> Size {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(
            dim(self.window.inner_width()),
            dim(self.window.inner_height()),
        )
    }

    fn set_resize_listener(&self, listener: Option<Listener>) {
        if let Some(old) = self.resize.borrow_mut().take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", old.as_ref().unchecked_ref());
        }
        if let Some(listener) = listener {
            let closure: ResizeClosure = Closure::wrap(listener);
            let _ = self
                .window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            *self.resize.borrow_mut() = Some(closure);
        }
    }
}

impl Drop for RafHost {
    fn drop(&mut self) {
        self.clear_frame_callback();
        self.set_resize_listener(None);
    }
}

/// A [`Driver`] running on browser animation frames.
///
/// Dropping the loop stops the driver and releases the JS closures.
pub struct WebRenderLoop<S, C> {
    host: Rc<RafHost>,
    requests: FrameRequests,
    driver: Rc<RefCell<Option<Driver<S, C>>>>,
}

impl<S, C> core::fmt::Debug for WebRenderLoop<S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebRenderLoop")
            .field("host", &self.host)
            .field("requests", &self.requests)
            .field("driver", &self.driver.try_borrow().map(|d| d.is_some()).ok())
            .finish()
    }
}

impl<S: 'static, C: 'static> WebRenderLoop<S, C> {
    /// Wires `host` to a driver produced by `launch`.
    ///
    /// `launch` receives the host as an `Rc<dyn Host>` and typically calls one
    /// of the `Driver::start_*` constructors. The eager first frame those
    /// constructors render runs synchronously inside `launch`; every later
    /// frame arrives through `requestAnimationFrame`.
    pub fn start(host: Rc<RafHost>, launch: impl FnOnce(Rc<dyn Host>) -> Driver<S, C>) -> Self {
        let slot: Rc<RefCell<Option<Driver<S, C>>>> = Rc::new(RefCell::new(None));
        let weak = Rc::downgrade(&slot);
        host.set_frame_callback(move |timestamp_ms| {
            let Some(slot) = weak.upgrade() else {
                return;
            };
            if let Some(driver) = slot.borrow_mut().as_mut() {
                driver.on_frame(timestamp_ms);
                // Finishes a `WebRenderLoop::stop` made during the frame.
                if driver.is_stopped() {
                    driver.stop();
                }
            }
        });

        // The frame armed by the eager render cannot fire before this
        // returns, so the slot is filled in time.
        let driver = launch(Rc::clone(&host) as Rc<dyn Host>);
        let requests = driver.requests();
        *slot.borrow_mut() = Some(driver);

        Self {
            host,
            requests,
            driver: slot,
        }
    }
}

impl<S, C> WebRenderLoop<S, C> {
    /// Asks for one more frame. See [`Driver::request_render`].
    ///
    /// Safe to call from inside a frame callback.
    pub fn request_render(&self) -> bool {
        self.requests.request()
    }

    /// Stops the driver. Idempotent.
    ///
    /// From inside a frame callback the driver is already borrowed, so only
    /// the request handle is stopped there. That keeps the loop from
    /// re-arming, and the driver releases its listeners when the frame
    /// returns.
    pub fn stop(&self) {
        match self.driver.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(driver) = slot.as_mut() {
                    driver.stop();
                }
            }
            Err(_) => self.requests.stop(),
        }
    }

    /// Runs `f` with the driver, unless a frame is currently executing.
    pub fn with_driver<R>(&self, f: impl FnOnce(&mut Driver<S, C>) -> R) -> Option<R> {
        let mut slot = self.driver.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &Rc<RafHost> {
        &self.host
    }
}

impl<S, C> Drop for WebRenderLoop<S, C> {
    fn drop(&mut self) {
        self.stop();
        self.host.clear_frame_callback();
    }
}
