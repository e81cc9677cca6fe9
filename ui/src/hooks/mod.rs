//! Hooks that bind the client state machines to Dioxus signals.

pub mod use_dashboard_sync;
pub mod use_image_resilience;
pub mod use_origin_autocomplete;
pub mod use_sidebar_prefs;
