use fx_core::SessionStore;
use web_sys as web;

/// `sessionStorage`-backed flags. Storage that is missing or throws reads as
/// unset and swallows writes.
pub struct BrowserSessionStore {
    storage: Option<web::Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("[session] sessionStorage unavailable; boot will replay on reload");
        }
        Self { storage }
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserSessionStore {
    fn get_flag(&self, key: &str) -> bool {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok().flatten())
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        let result = if value {
            storage.set_item(key, "true")
        } else {
            storage.remove_item(key)
        };
        if let Err(e) = result {
            log::warn!("[session] write {} failed: {:?}", key, e);
        }
    }
}
