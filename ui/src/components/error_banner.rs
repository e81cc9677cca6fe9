use dioxus::prelude::*;

/// The generic failure notice shown above the dashboard.
#[component]
pub fn ErrorBanner(message: String, on_retry: EventHandler<()>) -> Element {
    rsx! {
        article {
            role: "alert",
            style: "
                border-left: 4px solid var(--pico-del-color);
                background-color: var(--pico-card-sectioning-background-color);
                display: flex;
                align-items: center;
                justify-content: space-between;
                gap: 1rem;
            ",
            span { "{message}" }
            button {
                class: "secondary outline",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}
