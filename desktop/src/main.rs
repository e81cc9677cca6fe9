use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

fn main() {
    dioxus_logger::init(Level::INFO).expect("failed to init logger");
    dioxus::launch(WarehouseApp);
}

#[component]
fn WarehouseApp() -> Element {
    rsx! { ui::App {} }
}
