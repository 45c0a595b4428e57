// Copyright 2026 the Limelight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dev-mode handles on the global object.

use alloc::string::String;
use alloc::vec::Vec;

use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;

use limelight_core::config::Mode;

/// Publishes values as properties of the global object so browser dev tools
/// and extensions can find them.
///
/// Only constructed in [`Mode::Dev`]. Every property set through the bridge is
/// deleted again when it is dropped.
#[derive(Debug)]
pub struct DevtoolsBridge {
    global: Object,
    exposed: Vec<String>,
}

impl DevtoolsBridge {
    /// Returns a bridge in dev mode and `None` in production.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Option<Self> {
        mode.is_dev().then(|| Self {
            global: js_sys::global(),
            exposed: Vec::new(),
        })
    }

    /// Sets `globalThis[name] = value`.
    pub fn expose(&mut self, name: &str, value: &JsValue) -> Result<(), JsValue> {
        Reflect::set(&self.global, &JsValue::from_str(name), value)?;
        if !self.exposed.iter().any(|n| n == name) {
            self.exposed.push(name.into());
        }
        Ok(())
    }

    /// Names currently exposed.
    #[must_use]
    pub fn exposed(&self) -> &[String] {
        &self.exposed
    }
}

impl Drop for DevtoolsBridge {
    fn drop(&mut self) {
        for name in self.exposed.drain(..) {
            let _ = Reflect::delete_property(&self.global, &JsValue::from_str(&name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_gets_no_bridge() {
        assert!(DevtoolsBridge::for_mode(Mode::Pro).is_none());
    }
}
