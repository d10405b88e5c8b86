use js_sys::{Array, Reflect};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use super::{DataLayer, DataLayerObject, GlobalScope};

/// The browser `window`, holding queues as `window[name]` arrays.
#[derive(Clone, Debug)]
pub struct WindowScope {
    window: web_sys::Window,
}

impl WindowScope {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    /// Binds to the current global `window`, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

impl GlobalScope for WindowScope {
    fn data_layer(&self, name: &str) -> Option<DataLayer> {
        let value = Reflect::get(&self.window, &JsValue::from_str(name)).ok()?;
        if !value.is_truthy() {
            return None;
        }
        Some(DataLayer::from_js_array(value.unchecked_into()))
    }

    fn get_or_initialize_data_layer(&self, name: &str) -> DataLayer {
        if let Some(existing) = self.data_layer(name) {
            return existing;
        }
        let array = Array::new();
        if let Err(err) = Reflect::set(&self.window, &JsValue::from_str(name), &array) {
            log::warn!("failed to install window.{name}: {err:?}");
        }
        DataLayer::from_js_array(array)
    }
}

pub(super) fn push(array: &Array, record: &DataLayerObject) {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match record.serialize(&serializer) {
        Ok(value) => {
            array.push(&value);
        }
        Err(err) => log::warn!("failed to convert dataLayer record: {err}"),
    }
}

pub(super) fn snapshot(array: &Array) -> Vec<DataLayerObject> {
    array
        .iter()
        .filter_map(|value| serde_wasm_bindgen::from_value::<serde_json::Value>(value).ok())
        .filter_map(DataLayerObject::from_value)
        .collect()
}
