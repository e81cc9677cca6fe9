// ui/src/components/managed_icon.rs
#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::hooks::use_image_resilience::use_managed_images;
use crate::image_resilience::FALLBACK_GLYPH;

#[derive(Props, PartialEq, Clone)]
pub struct ManagedIconProps {
    /// Unique per page; also written to `data-managed-icon` so sweeps can
    /// find the element.
    pub id: String,
    pub src: String,
    #[props(optional)]
    pub fallback_src: Option<String>,
    #[props(default)]
    pub alt: String,
}

/// An icon image that retries failed loads and degrades to a glyph.
pub fn ManagedIcon(props: ManagedIconProps) -> Element {
    let mut images = use_managed_images();

    // Registered before the first render so an early error event is handled.
    use_hook(|| images.register(&props.id, &props.src, props.fallback_src.as_deref()));

    let register_id = props.id.clone();
    use_effect(use_reactive(
        (&props.src, &props.fallback_src),
        move |(src, fallback_src)| {
            images.register(&register_id, &src, fallback_src.as_deref());
        },
    ));

    let drop_id = props.id.clone();
    use_drop(move || images.unregister(&drop_id));

    let src = images.src(&props.id).unwrap_or_else(|| props.src.clone());
    let failed = images.status(&props.id).is_failed();
    let error_id = props.id.clone();
    let load_id = props.id.clone();

    rsx! {
        img {
            "data-managed-icon": "{props.id}",
            src: "{src}",
            alt: "{props.alt}",
            style: if failed { "display: none;" } else { "display: block;" },
            onerror: move |_| images.on_error(&error_id),
            onload: move |_| images.on_load(&load_id),
        }
        if failed {
            div {
                class: "icon-fallback",
                style: "font-size: 1.5rem; color: #c02c2c; text-align: center;",
                "{FALLBACK_GLYPH}"
            }
        }
    }
}
