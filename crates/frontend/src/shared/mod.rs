pub mod api_utils;
pub mod auth;
pub mod components;
pub mod date_utils;
pub mod modal;
