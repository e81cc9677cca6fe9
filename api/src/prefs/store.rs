//! A key/value preference store with a backend chosen once, up front.

use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{backend} is unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },
    #[error("{backend} rejected a write to {key}: {reason}")]
    WriteRejected {
        backend: &'static str,
        key: String,
        reason: String,
    },
}

/// One concrete storage backend (browser local storage, session storage…).
pub trait KeyValueStore {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Whether the backend accepts writes right now. Some browsers expose a
    /// storage object that throws on every write.
    fn probe(&self) -> bool {
        const PROBE_KEY: &str = "__warehouse_pref_probe__";
        self.set(PROBE_KEY, "1")
            .and_then(|_| self.remove(PROBE_KEY))
            .is_ok()
    }
}

/// The preference store the UI reads and writes.
///
/// Holds the first capable backend, or nothing; without a backend every read
/// yields `None` and every write is dropped.
#[derive(Default)]
pub struct PreferenceStore {
    backend: Option<Box<dyn KeyValueStore>>,
}

impl PreferenceStore {
    /// Picks the first candidate that passes [`KeyValueStore::probe`].
    pub fn select(candidates: impl IntoIterator<Item = Box<dyn KeyValueStore>>) -> Self {
        let backend = candidates.into_iter().find(|c| {
            let ok = c.probe();
            if !ok {
                debug!("preference backend {} failed its probe", c.name());
            }
            ok
        });
        match &backend {
            Some(b) => debug!("using {} for UI preferences", b.name()),
            None => debug!("no preference backend available; preferences will not persist"),
        }
        Self { backend }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("reading preference {}: {}", key, e);
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Some(backend) = &self.backend {
            if let Err(e) = backend.set(key, value) {
                warn!("writing preference {}: {}", key, e);
            }
        }
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("backend", &self.backend_name())
            .finish()
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::KeyValueStore;
    use super::StoreError;

    /// In-memory backend. Clones share the same map.
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        name: &'static str,
        entries: Rc<RefCell<HashMap<String, String>>>,
        read_only: bool,
    }

    impl MemoryStore {
        pub fn named(name: &'static str) -> Self {
            Self {
                name,
                ..Self::default()
            }
        }

        /// A backend that exists but refuses every write.
        pub fn read_only(name: &'static str) -> Self {
            Self {
                name,
                read_only: true,
                ..Self::default()
            }
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn name(&self) -> &'static str {
            self.name
        }

        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.read_only {
                return Err(StoreError::WriteRejected {
                    backend: self.name,
                    key: key.to_string(),
                    reason: "quota exceeded".to_string(),
                });
            }
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }
}
