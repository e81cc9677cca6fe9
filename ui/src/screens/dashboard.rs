//=============================================================================
// File: src/screens/dashboard.rs
//=============================================================================
use api::metrics::MetricKey;
use dioxus::prelude::*;
use strum::IntoEnumIterator;

use crate::components::error_banner::ErrorBanner;
use crate::components::filter_bar::FilterBar;
use crate::components::metric_card::MetricCard;
use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Card;
use crate::hooks::use_dashboard_sync::use_dashboard_sync;
use crate::hooks::use_image_resilience::use_image_resilience_provider;

#[component]
pub fn DashboardScreen() -> Element {
    let mut images = use_image_resilience_provider();
    let mut sync = use_dashboard_sync(images);

    let loading = sync.is_loading();
    let panel_style = if loading {
        "pointer-events: none; opacity: 0.6; transition: opacity 0.2s;"
    } else {
        "transition: opacity 0.2s;"
    };

    rsx! {
        Card {
            header {
                style: "display: flex; justify-content: space-between; align-items: center;",
                h3 { style: "margin: 0;", "Customer Dashboard" }
                Button {
                    button_type: ButtonType::Secondary,
                    outline: true,
                    title: "Reload every card icon".to_string(),
                    on_click: move |_| {
                        images.force_refresh_all();
                    },
                    "Refresh icons"
                }
            }
            FilterBar {}
            if let Some(message) = sync.error_message() {
                ErrorBanner {
                    message: message.to_string(),
                    on_retry: move |_| sync.refresh(),
                }
            }
            if loading {
                progress {}
            }
            div {
                class: "metrics-panel",
                style: "{panel_style}",
                "aria-busy": loading,
                div {
                    style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1rem; overflow-y: auto;",
                    for metric in MetricKey::iter() {
                        MetricCard {
                            key: "{metric.key()}",
                            metric,
                        }
                    }
                }
            }
        }
    }
}
