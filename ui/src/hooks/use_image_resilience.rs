use std::time::Duration;

use dioxus::prelude::*;
use dioxus_logger::tracing::debug;

use crate::compat;
use crate::image_resilience::ErrorAction;
use crate::image_resilience::ImageResilienceManager;
use crate::image_resilience::ImageStatus;

/// Handle to the page's [`ImageResilienceManager`], shared through context.
#[derive(Clone, Copy)]
pub struct ManagedImages {
    manager: Signal<ImageResilienceManager>,
}

impl ManagedImages {
    pub fn register(&mut self, id: &str, src: &str, fallback_src: Option<&str>) {
        self.manager.write().register(id, src, fallback_src);
    }

    /// Safe to call while the page is being torn down.
    pub fn unregister(&mut self, id: &str) {
        if let Ok(mut manager) = self.manager.try_write() {
            manager.unregister(id);
        }
    }

    /// The address the image should currently show.
    pub fn src(&self, id: &str) -> Option<String> {
        self.manager.read().current_src(id).map(str::to_string)
    }

    pub fn status(&self, id: &str) -> ImageStatus {
        self.manager.read().status(id).unwrap_or_default()
    }

    pub fn on_error(&mut self, id: &str) {
        let action = self.manager.write().load_failed(id, compat::now_millis());
        if action.is_unknown() {
            debug!("error event for unmanaged image {}", id);
        }
        if let ErrorAction::Retry { src, .. } = action {
            debug!("image {} now points at {}", id, src);
        }
    }

    pub fn on_load(&mut self, id: &str) {
        self.manager.write().load_succeeded(id);
    }

    /// Sweeps for silently broken images once `delay` has passed.
    pub fn schedule_sweep(&self, delay: Duration) {
        let mut images = *self;
        spawn(async move {
            compat::sleep(delay).await;
            images.sweep_now().await;
        });
    }

    pub async fn sweep_now(&mut self) {
        let probes = compat::probe_managed_images().await;
        let reloaded = self.manager.write().sweep(&probes, compat::now_millis());
        if !reloaded.is_empty() {
            debug!("sweep reloaded {} image(s): {:?}", reloaded.len(), reloaded);
        }
    }

    pub fn force_refresh_all(&mut self) -> usize {
        self.manager.write().force_refresh_all(compat::now_millis())
    }
}

/// Creates the page's image manager and provides it to descendants.
pub fn use_image_resilience_provider() -> ManagedImages {
    let mut manager = use_signal(ImageResilienceManager::new);

    use_drop(move || {
        if let Ok(mut manager) = manager.try_write() {
            manager.dispose();
        }
    });

    use_context_provider(|| ManagedImages { manager })
}

pub fn use_managed_images() -> ManagedImages {
    use_context::<ManagedImages>()
}
