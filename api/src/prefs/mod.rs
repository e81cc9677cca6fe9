//! Client-side UI preferences.

pub mod sidebar_prefs;
pub mod store;

pub use sidebar_prefs::SidebarPrefs;
pub use sidebar_prefs::Viewport;
pub use store::KeyValueStore;
pub use store::PreferenceStore;
pub use store::StoreError;
