use super::store::PreferenceStore;

pub const SIDEBAR_STATE_KEY: &str = "warehouse_sidebar_state";
pub const SIDEBAR_MOBILE_KEY: &str = "warehouse_sidebar_mobile";

/// Viewports at or below this width get the overlay sidebar.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, strum::EnumIs)]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

impl Viewport {
    pub fn from_width(width_px: f64) -> Self {
        if width_px <= MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// The two remembered sidebar preferences.
///
/// Defaults to expanded on desktop and closed on mobile.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SidebarPrefs {
    collapsed: bool,
    mobile_open: bool,
}

impl SidebarPrefs {
    pub fn load(store: &PreferenceStore) -> Self {
        Self {
            collapsed: store.get(SIDEBAR_STATE_KEY).as_deref() == Some("collapsed"),
            mobile_open: store.get(SIDEBAR_MOBILE_KEY).as_deref() == Some("open"),
        }
    }

    pub fn save(&self, store: &PreferenceStore) {
        store.set(
            SIDEBAR_STATE_KEY,
            if self.collapsed { "collapsed" } else { "expanded" },
        );
        store.set(
            SIDEBAR_MOBILE_KEY,
            if self.mobile_open { "open" } else { "closed" },
        );
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_mobile_open(&self) -> bool {
        self.mobile_open
    }

    /// Flips whichever preference applies to `viewport`.
    pub fn toggle(&mut self, viewport: Viewport) {
        match viewport {
            Viewport::Mobile => self.mobile_open = !self.mobile_open,
            Viewport::Desktop => self.collapsed = !self.collapsed,
        }
    }

    pub fn close_mobile(&mut self) {
        self.mobile_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::store::memory::MemoryStore;
    use crate::prefs::KeyValueStore;

    fn store_with(backend: &MemoryStore) -> PreferenceStore {
        PreferenceStore::select([Box::new(backend.clone()) as Box<dyn KeyValueStore>])
    }

    #[test]
    fn defaults_without_saved_state() {
        let prefs = SidebarPrefs::load(&PreferenceStore::unavailable());
        assert!(!prefs.is_collapsed());
        assert!(!prefs.is_mobile_open());
    }

    #[test]
    fn toggles_persist_independently() {
        let backend = MemoryStore::named("local");
        let store = store_with(&backend);

        let mut prefs = SidebarPrefs::load(&store);
        prefs.toggle(Viewport::Desktop);
        prefs.save(&store);
        assert_eq!(backend.value(SIDEBAR_STATE_KEY).as_deref(), Some("collapsed"));
        assert_eq!(backend.value(SIDEBAR_MOBILE_KEY).as_deref(), Some("closed"));

        prefs.toggle(Viewport::Mobile);
        prefs.save(&store);

        let reloaded = SidebarPrefs::load(&store);
        assert!(reloaded.is_collapsed());
        assert!(reloaded.is_mobile_open());

        let mut closed = reloaded;
        closed.close_mobile();
        assert!(closed.is_collapsed());
        assert!(!closed.is_mobile_open());
    }

    #[test]
    fn breakpoint_is_inclusive() {
        assert!(Viewport::from_width(768.0).is_mobile());
        assert!(Viewport::from_width(769.0).is_desktop());
    }
}
