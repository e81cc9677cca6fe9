use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    dioxus_logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(WarehouseApp);
}

#[component]
fn WarehouseApp() -> Element {
    rsx! { ui::App {} }
}
