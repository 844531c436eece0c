//! `localStorage` backend for the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The two session entries live in the browser's `localStorage` so a reload
//! restores the session. Without the `csr` feature there is no browser and
//! reads see an empty store.

use medportal::{SessionStorage, StorageError};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Backend("no window".to_owned()))?;
    window
        .local_storage()
        .map_err(|e| js_error(&e))?
        .ok_or_else(|| StorageError::Backend("localStorage is disabled".to_owned()))
}

#[cfg(feature = "csr")]
fn js_error(value: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

#[cfg(feature = "csr")]
impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?.get_item(key).map_err(|e| js_error(&e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?.set_item(key, value).map_err(|e| js_error(&e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?.remove_item(key).map_err(|e| js_error(&e))
    }
}

#[cfg(not(feature = "csr"))]
impl SessionStorage for BrowserStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("localStorage is only available in the browser".to_owned()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
