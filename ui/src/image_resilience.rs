//! Keeps dashboard icons visible while the asset server misbehaves.
//!
//! Every failed load is retried with a fresh cache-busting query, at most
//! [`MAX_RETRIES`] times per asset. After that the image is given up on and
//! the view shows [`FALLBACK_GLYPH`] in its place. Images that load "fine"
//! but decode to nothing never fire an error event, so [`ImageResilienceManager::sweep`]
//! looks for them explicitly.

use std::collections::BTreeMap;
use std::collections::HashMap;

use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::error;
use dioxus_logger::tracing::info;
use serde::Deserialize;

pub const MAX_RETRIES: u8 = 3;

pub const FALLBACK_GLYPH: &str = "⚠️";

/// Strips the query string, so every cache-busted variant of an asset maps
/// to the same retry counter.
pub fn normalized_key(src: &str) -> &str {
    src.split('?').next().unwrap_or(src)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::EnumIs)]
pub enum ImageStatus {
    #[default]
    Pending,
    Loaded,
    /// Retries exhausted; the fallback glyph is showing.
    Failed,
}

/// Why an image needs another fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageFault {
    #[error("load error event")]
    Transport,
    #[error("complete with zero natural size")]
    Decode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagedImage {
    pub original_src: String,
    pub fallback_src: Option<String>,
    pub current_src: String,
    pub status: ImageStatus,
}

impl ManagedImage {
    fn new(src: String, fallback_src: Option<String>) -> Self {
        Self {
            current_src: src.clone(),
            original_src: src,
            fallback_src,
            status: ImageStatus::Pending,
        }
    }

    /// Address reloads are built from: the designated fallback, else the
    /// current address without its query.
    fn reload_base(&self) -> &str {
        self.fallback_src
            .as_deref()
            .unwrap_or_else(|| normalized_key(&self.current_src))
    }

    fn reload(&mut self, marker: &str, token: u64) -> String {
        self.current_src = format!("{}?v={}&{}", self.reload_base(), token, marker);
        self.status = ImageStatus::Pending;
        self.current_src.clone()
    }
}

/// What the view should do after an error event.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum ErrorAction {
    /// Point the image at `src`.
    Retry { src: String, attempt: u8 },
    /// Hide the image and show the fallback glyph.
    ShowFallback,
    /// The fallback is already showing.
    AlreadyFailed,
    /// The image was never registered.
    Unknown,
}

/// What the DOM reports about one managed image.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ImageProbe {
    pub id: String,
    pub complete: bool,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageProbe {
    pub fn is_silently_broken(&self) -> bool {
        self.complete && (self.natural_width == 0 || self.natural_height == 0)
    }
}

#[derive(Debug, Default)]
pub struct ImageResilienceManager {
    images: BTreeMap<String, ManagedImage>,
    retries: HashMap<String, u8>,
}

impl ImageResilienceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `id`. Registering again with the same source keeps
    /// the current state; a different source starts over.
    pub fn register(&mut self, id: &str, src: &str, fallback_src: Option<&str>) {
        if let Some(existing) = self.images.get(id) {
            if existing.original_src == src && existing.fallback_src.as_deref() == fallback_src {
                return;
            }
            self.retries.remove(normalized_key(src));
        }
        self.images.insert(
            id.to_string(),
            ManagedImage::new(src.to_string(), fallback_src.map(str::to_string)),
        );
    }

    pub fn unregister(&mut self, id: &str) {
        self.images.remove(id);
    }

    pub fn current_src(&self, id: &str) -> Option<&str> {
        self.images.get(id).map(|i| i.current_src.as_str())
    }

    pub fn status(&self, id: &str) -> Option<ImageStatus> {
        self.images.get(id).map(|i| i.status)
    }

    /// Attempts used so far for the asset at `src`, cache-busting ignored.
    pub fn retry_count(&self, src: &str) -> u8 {
        self.retries
            .get(normalized_key(src))
            .copied()
            .unwrap_or_default()
    }

    /// Handles an error event for `id`. `token` must differ between calls
    /// (wall-clock millis in practice) so each retry is a fresh URL.
    pub fn load_failed(&mut self, id: &str, token: u64) -> ErrorAction {
        let Some(image) = self.images.get_mut(id) else {
            return ErrorAction::Unknown;
        };
        if image.status.is_failed() {
            return ErrorAction::AlreadyFailed;
        }

        let key = normalized_key(&image.current_src).to_string();
        let attempts = self.retries.entry(key.clone()).or_default();
        if *attempts < MAX_RETRIES {
            *attempts += 1;
            let attempt = *attempts;
            info!(
                "Retrying image load after {} (attempt {}): {}",
                ImageFault::Transport,
                attempt,
                key
            );
            let src = image.reload(&format!("retry={attempt}"), token);
            ErrorAction::Retry { src, attempt }
        } else {
            error!(
                "Failed to load image after {} retries: {}",
                MAX_RETRIES, key
            );
            image.status = ImageStatus::Failed;
            ErrorAction::ShowFallback
        }
    }

    /// Handles a load event for `id`: retry state for the asset is dropped.
    pub fn load_succeeded(&mut self, id: &str) {
        let Some(image) = self.images.get_mut(id) else {
            return;
        };
        image.status = ImageStatus::Loaded;
        for src in [Some(&image.current_src), Some(&image.original_src)]
            .into_iter()
            .chain([image.fallback_src.as_ref()])
            .flatten()
        {
            self.retries.remove(normalized_key(src));
        }
    }

    /// Reloads every probed image that completed without decoding.
    ///
    /// Returns the ids that were pointed at a new address. Given-up images
    /// stay given up and retry counters are left alone, so a sweep reload
    /// never counts as an error attempt.
    pub fn sweep(&mut self, probes: &[ImageProbe], token: u64) -> Vec<String> {
        let mut reloaded = Vec::new();
        for probe in probes.iter().filter(|p| p.is_silently_broken()) {
            let Some(image) = self.images.get_mut(&probe.id) else {
                continue;
            };
            if image.status.is_failed() {
                continue;
            }
            debug!(
                "Detected broken image ({}), reloading: {}",
                ImageFault::Decode,
                image.current_src
            );
            image.reload("reload=1", token);
            reloaded.push(probe.id.clone());
        }
        reloaded
    }

    /// Operator-triggered reload of every image, including given-up ones.
    pub fn force_refresh_all(&mut self, token: u64) -> usize {
        info!("Manually refreshing all images...");
        self.retries.clear();
        for image in self.images.values_mut() {
            image.reload("manual=1", token);
        }
        self.images.len()
    }

    pub fn dispose(&mut self) {
        self.retries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = "/warehousing_system/static/src/img/icons/totalInStock.png";

    fn manager() -> ImageResilienceManager {
        let mut m = ImageResilienceManager::new();
        m.register("totalInStock", ICON, None);
        m
    }

    fn probe(id: &str, complete: bool, w: u32, h: u32) -> ImageProbe {
        ImageProbe {
            id: id.to_string(),
            complete,
            natural_width: w,
            natural_height: h,
        }
    }

    #[test]
    fn normalizes_cache_busting() {
        assert_eq!(normalized_key("/a.png?v=1&retry=2"), "/a.png");
        assert_eq!(normalized_key("/a.png"), "/a.png");
    }

    #[test]
    fn three_retries_then_fallback() {
        let mut m = manager();
        for attempt in 1..=MAX_RETRIES {
            let action = m.load_failed("totalInStock", 1000 + attempt as u64);
            assert_eq!(
                action,
                ErrorAction::Retry {
                    src: format!("{ICON}?v={}&retry={attempt}", 1000 + attempt as u64),
                    attempt,
                }
            );
            assert_eq!(m.retry_count(ICON), attempt);
        }

        assert_eq!(m.load_failed("totalInStock", 2000), ErrorAction::ShowFallback);
        assert!(m.status("totalInStock").unwrap().is_failed());
        assert_eq!(m.retry_count(ICON), MAX_RETRIES);

        assert_eq!(m.load_failed("totalInStock", 2001), ErrorAction::AlreadyFailed);
        assert_eq!(m.retry_count(ICON), MAX_RETRIES);
    }

    #[test]
    fn success_clears_retry_state() {
        let mut m = manager();
        m.load_failed("totalInStock", 1);
        m.load_failed("totalInStock", 2);
        m.load_succeeded("totalInStock");

        assert_eq!(m.retry_count(ICON), 0);
        assert!(m.status("totalInStock").unwrap().is_loaded());
        assert!(m.load_failed("totalInStock", 3).is_retry());
        assert_eq!(m.retry_count(ICON), 1);
    }

    #[test]
    fn retries_use_designated_fallback() {
        let mut m = ImageResilienceManager::new();
        m.register("dangerousGoods", "/cdn/dg.png", Some("/static/dg.png"));
        let ErrorAction::Retry { src, .. } = m.load_failed("dangerousGoods", 7) else {
            panic!("expected a retry");
        };
        assert_eq!(src, "/static/dg.png?v=7&retry=1");
        assert_eq!(m.current_src("dangerousGoods"), Some(src.as_str()));
    }

    #[test]
    fn sweep_reloads_silent_decode_failures_only() {
        let mut m = manager();
        m.register("expectedToday", "/icons/expectedToday.png", None);
        m.register("dangerousGoods", "/icons/dangerousGoods.png", None);

        let reloaded = m.sweep(
            &[
                probe("totalInStock", true, 0, 0),
                probe("expectedToday", true, 48, 48),
                probe("dangerousGoods", false, 0, 0),
                probe("unmanaged", true, 0, 0),
            ],
            99,
        );
        assert_eq!(reloaded, vec!["totalInStock".to_string()]);
        assert_eq!(m.current_src("totalInStock"), Some(format!("{ICON}?v=99&reload=1").as_str()));
        assert_eq!(m.retry_count(ICON), 0);
    }

    #[test]
    fn sweep_leaves_given_up_images_alone() {
        let mut m = manager();
        for t in 0..=MAX_RETRIES as u64 {
            m.load_failed("totalInStock", t);
        }
        let before = m.current_src("totalInStock").map(str::to_string);

        assert!(m.sweep(&[probe("totalInStock", true, 0, 0)], 50).is_empty());
        assert!(m.sweep(&[probe("totalInStock", true, 0, 0)], 51).is_empty());
        assert!(m.status("totalInStock").unwrap().is_failed());
        assert_eq!(m.current_src("totalInStock").map(str::to_string), before);
    }

    #[test]
    fn force_refresh_revives_given_up_images() {
        let mut m = manager();
        for t in 0..=MAX_RETRIES as u64 {
            m.load_failed("totalInStock", t);
        }
        assert_eq!(m.force_refresh_all(500), 1);
        assert!(m.status("totalInStock").unwrap().is_pending());
        assert_eq!(m.retry_count(ICON), 0);
        assert_eq!(m.current_src("totalInStock"), Some(format!("{ICON}?v=500&manual=1").as_str()));
    }

    #[test]
    fn reregistering_same_source_keeps_state() {
        let mut m = manager();
        m.load_failed("totalInStock", 1);
        m.register("totalInStock", ICON, None);
        assert!(m.current_src("totalInStock").unwrap().contains("retry=1"));

        m.register("totalInStock", "/other.png", None);
        assert_eq!(m.current_src("totalInStock"), Some("/other.png"));
    }

    #[test]
    fn changed_fallback_revives_a_failed_image() {
        let mut m = manager();
        for t in 0..=MAX_RETRIES as u64 {
            m.load_failed("totalInStock", t);
        }
        assert!(m.status("totalInStock").unwrap().is_failed());

        m.register("totalInStock", ICON, Some("/fallback.png"));
        assert!(m.status("totalInStock").unwrap().is_pending());
        assert_eq!(m.current_src("totalInStock"), Some(ICON));
        assert!(m.load_failed("totalInStock", 10).is_retry());
    }

    #[test]
    fn unknown_images_are_ignored() {
        let mut m = ImageResilienceManager::new();
        assert_eq!(m.load_failed("nope", 1), ErrorAction::Unknown);
        m.load_succeeded("nope");
        assert_eq!(m.status("nope"), None);
    }

    #[test]
    fn dispose_forgets_retries() {
        let mut m = manager();
        m.load_failed("totalInStock", 1);
        m.dispose();
        assert_eq!(m.retry_count(ICON), 0);
    }
}
