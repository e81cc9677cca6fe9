// ui/src/components/metric_card.rs
#![allow(non_snake_case)]

use api::metrics::MetricKey;
use dioxus::prelude::*;

use crate::components::managed_icon::ManagedIcon;
use crate::hooks::use_dashboard_sync::use_dashboard;

/// One counter on the dashboard. Clicking it opens the matching list view.
#[component]
pub fn MetricCard(metric: MetricKey) -> Element {
    let mut sync = use_dashboard();
    let loading = sync.is_loading();
    let value = sync.display(metric);
    let class = if sync.is_highlighted() {
        "metric-card updated"
    } else {
        "metric-card"
    };

    rsx! {
        article {
            class: "{class}",
            "data-card": metric.key(),
            style: if loading { "cursor: progress; opacity: 0.6;" } else { "cursor: pointer;" },
            "aria-busy": loading,
            onclick: move |_| sync.activate_card(metric),
            div {
                class: "card-icon",
                ManagedIcon {
                    id: metric.key().to_string(),
                    src: metric.icon_path(),
                    alt: metric.title().to_string(),
                }
            }
            h6 {
                style: "margin-bottom: 0.25rem;",
                "{metric.title()}"
            }
            p {
                class: "metric-value",
                style: "font-size: 1.75rem; font-weight: bold; margin: 0;",
                "{value}"
            }
        }
    }
}
