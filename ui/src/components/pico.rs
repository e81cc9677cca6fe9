//! Lifetime-free Dioxus wrappers for the Pico.css primitives the dashboard uses.
//! The stylesheet itself is linked by `App`.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::prelude::*;

/// A centered container for your content.
/// Wraps content in a `<main class="container">` element.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

/// A responsive grid; children share the row equally.
#[component]
pub fn Grid(children: Element) -> Element {
    rsx! { div { class: "grid", {children} } }
}

/// A card for grouping related content.
/// Wraps content in an `<article>` element.
#[component]
pub fn Card(children: Element) -> Element {
    rsx! { article { {children} } }
}

#[derive(PartialEq, Clone, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
}

impl ButtonType {
    fn to_class(&self) -> &'static str {
        match self {
            ButtonType::Primary => "",
            ButtonType::Secondary => "secondary",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
    #[props(default = false)]
    disabled: bool,
    #[props(optional)]
    title: Option<String>,
}

pub fn Button(props: ButtonProps) -> Element {
    let class_str = match (props.outline, props.button_type.to_class()) {
        (true, "") => "outline".to_string(),
        (true, kind) => format!("{kind} outline"),
        (false, kind) => kind.to_string(),
    };
    rsx! {
        button {
            class: "{class_str}",
            disabled: props.disabled,
            title: props.title.clone(),
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}
