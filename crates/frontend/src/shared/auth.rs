//! Credentials provider.
//!
//! The one place that knows where the bearer token lives. A missing token is
//! tolerated: requests go out without the Authorization header rather than
//! being blocked client-side.

use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "access_token";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Current access token, if any.
pub fn access_token() -> Option<String> {
    get_local_storage()?
        .get_item(ACCESS_TOKEN_KEY)
        .ok()?
        .filter(|t| !t.trim().is_empty())
}

/// Value for the Authorization header, when a token exists.
pub fn bearer() -> Option<String> {
    access_token().map(|t| format!("Bearer {}", t))
}
