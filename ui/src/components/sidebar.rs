// ui/src/components/sidebar.rs
#![allow(non_snake_case)]

use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::hooks::use_sidebar_prefs::use_sidebar_prefs;

/// Collapsible navigation sidebar; an overlay drawer on narrow screens.
///
/// Both the desktop collapse and the mobile drawer state are remembered
/// across page loads when the browser allows it.
#[component]
pub fn Sidebar(children: Element) -> Element {
    let mut sidebar = use_sidebar_prefs();

    let mut class = String::from("sidebar");
    if sidebar.is_collapsed() {
        class.push_str(" collapsed");
    }
    if sidebar.is_mobile_open() {
        class.push_str(" mobile-open");
    }

    rsx! {
        div {
            class: "sidebar-toggle",
            Button {
                button_type: ButtonType::Secondary,
                outline: true,
                title: "Toggle sidebar".to_string(),
                on_click: move |_| sidebar.toggle(),
                "≡"
            }
        }
        if sidebar.is_mobile_open() {
            div {
                class: "sidebar-overlay",
                onclick: move |_| sidebar.close_mobile(),
            }
        }
        aside {
            class: "{class}",
            tabindex: "-1",
            onkeydown: move |evt| {
                if evt.key() == Key::Escape && sidebar.is_mobile_open() {
                    sidebar.close_mobile();
                }
            },
            {children}
        }
    }
}
