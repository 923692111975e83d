//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Calendar date for daily stats
//! - Storage (LocalStorage on web)
//! - Vibration

/// Install the logger for the current target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // Tests and embedders may have installed one already
    let _ = env_logger::try_init();
}

/// Today's date as `YYYY-MM-DD` (UTC)
pub fn today_key() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read a value from LocalStorage
#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Write a value to LocalStorage. Returns whether it was stored.
#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) -> bool {
    local_storage().is_some_and(|s| s.set_item(key, value).is_ok())
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(_key: &str, _value: &str) -> bool {
    false
}

/// Run a vibration pattern (ms on, ms off, ...) where the device supports it
#[cfg(target_arch = "wasm32")]
pub fn vibrate(pattern: &[u32]) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let steps: js_sys::Array = pattern
        .iter()
        .map(|&ms| wasm_bindgen::JsValue::from(ms))
        .collect();
    window.navigator().vibrate_with_pattern(&steps);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn vibrate(pattern: &[u32]) {
    log::debug!("Vibrate {:?}", pattern);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_key_format() {
        let key = today_key();
        assert_eq!(key.len(), 10);
        assert_eq!(&key[4..5], "-");
        assert_eq!(&key[7..8], "-");
        assert!(chrono::NaiveDate::parse_from_str(&key, "%Y-%m-%d").is_ok());
    }
}
