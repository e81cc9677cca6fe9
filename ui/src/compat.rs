// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

use web_time::SystemTime;
use web_time::UNIX_EPOCH;

/// Why the page became interesting again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum PageResume {
    /// The tab became visible.
    Visible,
    /// The page was restored from the back-forward cache.
    Restored,
}

/// Wall-clock milliseconds, used as the cache-busting token for image reloads.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use std::time::Duration;

    use api::prefs::KeyValueStore;
    use api::prefs::PreferenceStore;
    use api::prefs::StoreError;
    use dioxus_logger::tracing::debug;
    use dioxus_logger::tracing::warn;
    use tokio::sync::mpsc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::Document;
    use web_sys::HtmlImageElement;
    use web_sys::PageTransitionEvent;
    use web_sys::Storage;
    use web_sys::Window;

    use super::PageResume;
    use crate::image_resilience::ImageProbe;

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }

    pub fn navigate_to(url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(url) {
            warn!("navigation to {} failed: {}", url, js_reason(&e));
        }
    }

    /// Origin of the page, e.g. `https://erp.example.com`.
    pub fn location_origin() -> Option<String> {
        web_sys::window()?.location().origin().ok()
    }

    pub fn viewport_width() -> Option<f64> {
        web_sys::window()?.inner_width().ok()?.as_f64()
    }

    fn js_reason(value: &JsValue) -> String {
        value.as_string().unwrap_or_else(|| format!("{value:?}"))
    }

    struct BrowserStorage {
        name: &'static str,
        storage: Storage,
    }

    impl KeyValueStore for BrowserStorage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.storage
                .get_item(key)
                .map_err(|e| StoreError::Unavailable {
                    backend: self.name,
                    reason: js_reason(&e),
                })
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.storage
                .set_item(key, value)
                .map_err(|e| StoreError::WriteRejected {
                    backend: self.name,
                    key: key.to_string(),
                    reason: js_reason(&e),
                })
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.storage
                .remove_item(key)
                .map_err(|e| StoreError::WriteRejected {
                    backend: self.name,
                    key: key.to_string(),
                    reason: js_reason(&e),
                })
        }
    }

    /// Local storage if it accepts writes, else session storage, else none.
    pub fn preference_store() -> PreferenceStore {
        let mut candidates: Vec<Box<dyn KeyValueStore>> = Vec::new();
        if let Some(window) = web_sys::window() {
            for (name, storage) in [
                ("localStorage", window.local_storage()),
                ("sessionStorage", window.session_storage()),
            ] {
                match storage {
                    Ok(Some(storage)) => candidates.push(Box::new(BrowserStorage { name, storage })),
                    Ok(None) => debug!("{} is not exposed", name),
                    Err(e) => debug!("{} is blocked: {}", name, js_reason(&e)),
                }
            }
        }
        PreferenceStore::select(candidates)
    }

    pub async fn probe_managed_images() -> Vec<ImageProbe> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Vec::new();
        };
        let Ok(nodes) = document.query_selector_all("img[data-managed-icon]") else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
            .filter_map(|img| {
                Some(ImageProbe {
                    id: img.get_attribute("data-managed-icon")?,
                    complete: img.complete(),
                    natural_width: img.natural_width(),
                    natural_height: img.natural_height(),
                })
            })
            .collect()
    }

    /// Yields an event whenever the tab becomes visible or the page is
    /// restored from the back-forward cache. Listeners are removed on drop.
    pub struct PageResumeListener {
        rx: mpsc::UnboundedReceiver<PageResume>,
        window: Window,
        document: Document,
        on_visibility: Closure<dyn FnMut(web_sys::Event)>,
        on_pageshow: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl PageResumeListener {
        pub fn new() -> Option<Self> {
            let window = web_sys::window()?;
            let document = window.document()?;
            let (tx, rx) = mpsc::unbounded_channel();

            let visibility_doc = document.clone();
            let visibility_tx = tx.clone();
            let on_visibility = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if !visibility_doc.hidden() {
                    let _ = visibility_tx.send(PageResume::Visible);
                }
            });
            let on_pageshow = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
                let persisted = event
                    .dyn_ref::<PageTransitionEvent>()
                    .is_some_and(|e| e.persisted());
                if persisted {
                    let _ = tx.send(PageResume::Restored);
                }
            });

            document
                .add_event_listener_with_callback(
                    "visibilitychange",
                    on_visibility.as_ref().unchecked_ref(),
                )
                .ok()?;
            window
                .add_event_listener_with_callback("pageshow", on_pageshow.as_ref().unchecked_ref())
                .ok()?;

            Some(Self {
                rx,
                window,
                document,
                on_visibility,
                on_pageshow,
            })
        }

        pub async fn next(&mut self) -> Option<PageResume> {
            self.rx.recv().await
        }
    }

    impl Drop for PageResumeListener {
        fn drop(&mut self) {
            let _ = self.document.remove_event_listener_with_callback(
                "visibilitychange",
                self.on_visibility.as_ref().unchecked_ref(),
            );
            let _ = self.window.remove_event_listener_with_callback(
                "pageshow",
                self.on_pageshow.as_ref().unchecked_ref(),
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use std::time::Duration;

    use api::prefs::PreferenceStore;
    use dioxus::prelude::document;
    use dioxus_logger::tracing::debug;
    use serde_json::Value;

    use super::PageResume;
    use crate::image_resilience::ImageProbe;

    const PROBE_IMAGES_JS: &str = r#"
        return Array.from(document.querySelectorAll('img[data-managed-icon]')).map(img => ({
            id: img.dataset.managedIcon,
            complete: img.complete,
            natural_width: img.naturalWidth,
            natural_height: img.naturalHeight,
        }));
    "#;

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    pub fn navigate_to(url: &str) {
        let target = Value::String(url.to_string());
        let _ = document::eval(&format!("window.location.href = {target};"));
    }

    pub fn location_origin() -> Option<String> {
        None
    }

    pub fn viewport_width() -> Option<f64> {
        None
    }

    /// The webview keeps no storage we can rely on across launches.
    pub fn preference_store() -> PreferenceStore {
        PreferenceStore::unavailable()
    }

    pub async fn probe_managed_images() -> Vec<ImageProbe> {
        match document::eval(PROBE_IMAGES_JS).join::<Vec<ImageProbe>>().await {
            Ok(probes) => probes,
            Err(e) => {
                debug!("image probe failed: {}", e);
                Vec::new()
            }
        }
    }

    /// The webview never suspends the page, so there is nothing to listen for.
    pub struct PageResumeListener;

    impl PageResumeListener {
        pub fn new() -> Option<Self> {
            None
        }

        pub async fn next(&mut self) -> Option<PageResume> {
            None
        }
    }
}
