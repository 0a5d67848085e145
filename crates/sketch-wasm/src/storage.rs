//! `KeyValueStore` over `window.localStorage`.

use sketch_editor::{KeyValueStore, PersistError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Browser local storage. When the page has no storage (private mode,
/// sandboxed iframe) every call fails with `PersistError::Storage` and the
/// canvas simply doesn't persist.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; drawings will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, PersistError> {
        self.storage
            .as_ref()
            .ok_or_else(|| PersistError::Storage("localStorage unavailable".to_string()))
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        // Throws QuotaExceededError when the data URL doesn't fit
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> PersistError {
    PersistError::Storage(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
