// The client-side Dioxus application logic.

use dioxus::prelude::*;

mod app_state;
pub mod autocomplete;
pub mod compat;
mod components;
pub mod dashboard_sync;
pub mod debounce;
pub mod hooks;
pub mod image_resilience;
mod screens;

use app_state::AppState;
use components::pico::Container;
use components::sidebar::Sidebar;
use dioxus_logger::tracing::info;
use screens::dashboard::DashboardScreen;
use screens::receipt::ReceiptScreen;

const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.cyan.min.css";

/// Enum to represent the different screens in our application.
#[derive(Clone, Copy, PartialEq, Default)]
enum Screen {
    #[default]
    Dashboard,
    Receipt,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Receipt => "Receipt",
        }
    }
}

const ALL_SCREENS: [Screen; 2] = [Screen::Dashboard, Screen::Receipt];

/// Screen links, rendered inside the sidebar.
#[component]
fn Tabs(active_screen: Signal<Screen>) -> Element {
    rsx! {
        nav {
            class: "tab-menu",
            ul {
                for screen in ALL_SCREENS {
                    li {
                        a {
                            href: "#",
                            class: if active_screen() == screen { "active-tab" } else { "" },
                            "aria-current": if active_screen() == screen { "page" } else { "false" },
                            onclick: move |event| {
                                event.prevent_default();
                                active_screen.set(screen);
                            },
                            "{screen.name()}"
                        }
                    }
                }
            }
        }
    }
}

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[component]
pub fn App() -> Element {
    let responsive_css = r#"
    * { box-sizing: border-box; }

    html, body {
        height: 100%;
        margin: 0;
        padding: 0;
    }

    /* --- APP FRAME --- */
    .app-main-container {
        display: flex;
        min-height: 100vh;
    }
    .app-main-container .content {
        flex: 1;
        min-width: 0;
        padding: 1rem;
    }

    /* --- SIDEBAR --- */
    .sidebar {
        width: 14rem;
        flex-shrink: 0;
        padding: 1rem;
        border-right: 1px solid var(--pico-muted-border-color);
        transition: width 0.2s;
    }
    .sidebar.collapsed { width: 0; padding: 0; overflow: hidden; border: none; }
    .sidebar-toggle { position: fixed; top: 0.5rem; left: 0.5rem; z-index: 30; }
    .sidebar-overlay { display: none; }
    .tab-menu ul { display: flex; flex-direction: column; padding-top: 2.5rem; }
    .tab-menu a.active-tab { color: var(--pico-primary); font-weight: bold; }
    .tab-menu a:not(.active-tab) { color: var(--pico-muted-color); }

    @media (max-width: 768px) {
        .sidebar, .sidebar.collapsed {
            position: fixed;
            top: 0; bottom: 0; left: 0;
            width: 14rem;
            padding: 1rem;
            z-index: 25;
            background-color: var(--pico-background-color);
            transform: translateX(-100%);
            transition: transform 0.2s;
        }
        .sidebar.mobile-open { transform: translateX(0); }
        .sidebar-overlay {
            display: block;
            position: fixed;
            inset: 0;
            z-index: 20;
            background: rgba(0, 0, 0, 0.4);
        }
    }

    /* --- DASHBOARD --- */
    .metric-card { margin: 0; text-align: center; transition: background-color 0.3s, transform 0.3s; }
    .metric-card.updated {
        background-color: color-mix(in srgb, var(--pico-primary), transparent 90%);
        transform: scale(1.02);
    }
    .card-icon { display: flex; justify-content: center; min-height: 3rem; }
    .card-icon img { width: 3rem; height: 3rem; margin: 0 auto; }

    /* --- AUTOCOMPLETE --- */
    .dropdown-item.active, .dropdown-item:hover {
        background-color: var(--pico-primary-background);
        color: var(--pico-primary-inverse);
    }
"#;

    let app_state = use_hook(AppState::from_env);

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: PICO_CSS,
        }
        style {
            "{responsive_css}"
        }
        LoadedApp {
            app_state,
        }
    }
}

/// This component holds the main app logic.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    // Provide the stable, non-reactive AppState.
    use_context_provider(|| {
        info!("warehouse backend: {}", app_state.client.base_url());
        app_state.clone()
    });

    let active_screen = use_signal(Screen::default);

    rsx! {
        div {
            class: "app-main-container",
            Sidebar {
                Tabs {
                    active_screen,
                }
            }
            div {
                class: "content",
                Container {
                    match active_screen() {
                        Screen::Dashboard => rsx! {
                            DashboardScreen {}
                        },
                        Screen::Receipt => rsx! {
                            ReceiptScreen {}
                        },
                    }
                }
            }
        }
    }
}
