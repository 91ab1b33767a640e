//! `localStorage`-backed key-value store.
//!
//! Outside the browser (SSR, native tests) an in-memory map stands in so the
//! same state machines load with their defaults.

use mayfly::error::StorageError;
use mayfly::storage::KeyValueStore;
#[cfg(not(feature = "hydrate"))]
use mayfly::storage::MemoryStore;

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

#[derive(Default)]
pub struct BrowserStore {
    #[cfg(not(feature = "hydrate"))]
    fallback: MemoryStore,
}

impl BrowserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StorageError::Unavailable("localStorage is not available".into()))
}

#[cfg(feature = "hydrate")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{err:?}"))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            self.fallback.get(key)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.set_item(key, value).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            self.fallback.set(key, value)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.remove_item(key).map_err(js_error)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            self.fallback.remove(key)
        }
    }
}
