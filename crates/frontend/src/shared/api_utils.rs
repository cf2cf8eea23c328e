//! API utilities for talking to the order-management backend.

/// Get the base URL for API requests.
///
/// Derived from the current window location; `localStorage["api_base_url"]`
/// overrides it, which is the single configuration value the client has.
///
/// # Returns
/// - API base URL like "https://orders.example.com"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };

    if let Ok(Some(storage)) = window.local_storage() {
        if let Ok(Some(base)) = storage.get_item("api_base_url") {
            if !base.trim().is_empty() {
                return base.trim_end_matches('/').to_string();
            }
        }
    }

    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}", protocol, hostname)
}

/// Build a full API URL from a path (should start with "/api/").
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
