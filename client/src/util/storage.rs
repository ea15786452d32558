//! Tab-scoped session storage.
//!
//! Backs the session store with `window.sessionStorage`, so a signed-in
//! session ends with the tab. Without the `csr` feature every read misses and
//! every write is dropped.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use okr_portal::session::{SessionError, SessionStorage};

/// `window.sessionStorage` behind the [`SessionStorage`] seam.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

impl SessionStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            session_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        #[cfg(feature = "csr")]
        {
            let storage = session_storage().ok_or_else(|| SessionError::Storage("sessionStorage unavailable".to_owned()))?;
            storage
                .set_item(key, value)
                .map_err(|_| SessionError::Storage(format!("could not write {key}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove_item(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = session_storage() {
                if storage.remove_item(key).is_err() {
                    log::warn!("could not remove {key} from sessionStorage");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}
