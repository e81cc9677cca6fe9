// ui/src/components/filter_bar.rs
#![allow(non_snake_case)]

use api::filters::FilterChange;
use dioxus::prelude::*;
use dioxus_logger::tracing::warn;

use crate::app_state::AppState;
use crate::hooks::use_dashboard_sync::use_dashboard;

/// Vessel, warehouse and client filters for the dashboard.
#[component]
pub fn FilterBar() -> Element {
    let mut sync = use_dashboard();
    let app_state = use_context::<AppState>();

    let locations = use_resource(move || {
        let app_state = app_state.clone();
        async move {
            let result = api::fetch_locations(&app_state.client).await;
            if let Err(e) = &result {
                warn!("Failed to fetch locations: {}", e);
            }
            result
        }
    });

    let filters = sync.filters();
    let selected_location = filters.location_param();

    let options = match &*locations.read() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };

    rsx! {
        div {
            class: "grid filter-bar",
            label {
                "Vessel"
                input {
                    r#type: "search",
                    placeholder: "Filter by vessel...",
                    value: "{filters.vessel}",
                    oninput: move |evt| sync.change_filter(FilterChange::Vessel(evt.value())),
                }
            }
            label {
                "Warehouse"
                select {
                    "aria-busy": locations.read().is_none(),
                    onchange: move |evt| sync.change_filter(FilterChange::location_from_select(&evt.value())),
                    option {
                        value: "",
                        selected: selected_location.is_empty(),
                        "All Warehouses"
                    }
                    for location in options {
                        option {
                            key: "{location.id}",
                            value: "{location.id}",
                            selected: selected_location == location.id.to_string(),
                            "{location.name}"
                        }
                    }
                }
            }
            label {
                "Client"
                input {
                    r#type: "search",
                    placeholder: "Filter by client...",
                    value: "{filters.client}",
                    oninput: move |evt| sync.change_filter(FilterChange::Client(evt.value())),
                }
            }
        }
    }
}
