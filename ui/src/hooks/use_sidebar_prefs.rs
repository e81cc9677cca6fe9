use api::prefs::PreferenceStore;
use api::prefs::SidebarPrefs;
use api::prefs::Viewport;
use dioxus::prelude::*;

use crate::compat;

#[derive(Clone, Copy)]
pub struct SidebarState {
    prefs: Signal<SidebarPrefs>,
    store: Signal<PreferenceStore>,
}

impl SidebarState {
    pub fn is_collapsed(&self) -> bool {
        self.prefs.read().is_collapsed()
    }

    pub fn is_mobile_open(&self) -> bool {
        self.prefs.read().is_mobile_open()
    }

    /// Flips the preference for the current viewport and saves both.
    pub fn toggle(&mut self) {
        let viewport = compat::viewport_width()
            .map(Viewport::from_width)
            .unwrap_or_default();
        let mut prefs = self.prefs.write();
        prefs.toggle(viewport);
        prefs.save(&self.store.peek());
    }

    pub fn close_mobile(&mut self) {
        let mut prefs = self.prefs.write();
        prefs.close_mobile();
        prefs.save(&self.store.peek());
    }
}

/// Loads the sidebar preferences once, from the first usable browser store.
pub fn use_sidebar_prefs() -> SidebarState {
    let store = use_signal(compat::preference_store);
    let prefs = use_signal(|| SidebarPrefs::load(&store.peek()));
    SidebarState { prefs, store }
}
