//! Browser `localStorage` backend (wasm32 only)

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::{Storage, StorageError};

/// Reads and writes `globalThis.localStorage`. The handle is looked up on
/// every call, so the backend holds no JS objects itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage() -> Result<JsValue, StorageError> {
        let storage = Reflect::get(&js_sys::global(), &JsValue::from_str("localStorage"))
            .map_err(js_error)?;
        if storage.is_undefined() || storage.is_null() {
            return Err(StorageError::Backend("localStorage is not available".to_string()));
        }
        Ok(storage)
    }

    fn call(method: &str, args: &[&str]) -> Result<JsValue, StorageError> {
        let storage = Self::local_storage()?;
        let function: Function = Reflect::get(&storage, &JsValue::from_str(method))
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        let result = match args {
            [key] => function.call1(&storage, &JsValue::from_str(key)),
            [key, value] => {
                function.call2(&storage, &JsValue::from_str(key), &JsValue::from_str(value))
            }
            _ => function.call0(&storage),
        };
        result.map_err(js_error)
    }
}

fn js_error(value: JsValue) -> StorageError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    StorageError::Backend(message)
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(Self::call("getItem", &[key])?.as_string())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::call("setItem", &[key, value]).map(|_| ())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::call("removeItem", &[key]).map(|_| ())
    }
}
