// ui/src/components/origin_autocomplete.rs
#![allow(non_snake_case)]

use api::record::LinkedField;
use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;
use serde_json::Value;

use crate::autocomplete::NavKey;
use crate::hooks::use_origin_autocomplete::use_origin_autocomplete;

fn nav_key(key: &Key) -> NavKey {
    match key {
        Key::ArrowDown => NavKey::ArrowDown,
        Key::ArrowUp => NavKey::ArrowUp,
        Key::Enter => NavKey::Enter,
        Key::Escape => NavKey::Escape,
        _ => NavKey::Other,
    }
}

/// Renders a many-to-one value (`[id, "name"]`) the way the backend names it.
fn describe_linked(value: &Value) -> String {
    match value {
        Value::Array(pair) => match pair.as_slice() {
            [_, Value::String(name)] => name.clone(),
            [id, ..] => id.to_string(),
            [] => "none".to_string(),
        },
        Value::Bool(false) | Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct OriginAutocompleteProps {
    #[props(default)]
    pub initial_value: String,
    /// Field that receives the identifier of a committed code.
    pub linked: Signal<Option<LinkedField>>,
    #[props(optional)]
    pub placeholder: Option<String>,
    /// Called with the visible value after every edit or commit.
    #[props(optional)]
    pub on_change: Option<EventHandler<String>>,
}

/// Text input suggesting origin codes as the user types.
pub fn OriginAutocomplete(props: OriginAutocompleteProps) -> Element {
    let mut autocomplete = use_origin_autocomplete(props.initial_value.clone(), props.linked);

    let value = autocomplete.value();
    let suggestions = autocomplete.suggestions();
    let selected = autocomplete.selected_index();
    let visible = autocomplete.is_dropdown_visible();
    let linked_value = autocomplete.linked_value();

    let mut last_reported = use_signal(String::new);
    let on_change = props.on_change;
    use_effect(move || {
        let current = autocomplete.value();
        if *last_reported.peek() != current {
            last_reported.set(current.clone());
            if let Some(handler) = &on_change {
                handler.call(current);
            }
        }
    });

    rsx! {
        div {
            style: "position: relative;",
            input {
                r#type: "text",
                autocomplete: "off",
                role: "combobox",
                "aria-expanded": visible,
                placeholder: "{props.placeholder.as_deref().unwrap_or(\"\")}",
                value: "{value}",
                oninput: move |evt| autocomplete.input(&evt.value()),
                onkeydown: move |evt| {
                    if autocomplete.key_pressed(nav_key(&evt.key())) {
                        evt.prevent_default();
                    }
                },
                onfocus: move |_| autocomplete.focus(),
                onblur: move |_| autocomplete.blur(),
            }
            if visible {
                ul {
                    role: "listbox",
                    class: "dropdown-menu",
                    style: "
                        position: absolute;
                        min-width: 100%;
                        z-index: 10;
                        list-style: none;
                        background-color: var(--pico-card-background-color);
                        border: 1px solid var(--pico-card-border-color);
                        border-radius: var(--pico-border-radius);
                        padding: 0.25rem 0;
                        margin-top: 0.25rem;
                    ",
                    for (index, suggestion) in suggestions.into_iter().enumerate() {
                        li {
                            key: "{suggestion.id}",
                            role: "option",
                            class: if index as isize == selected { "dropdown-item active" } else { "dropdown-item" },
                            "aria-selected": index as isize == selected,
                            style: "padding: 0.25rem 0.75rem; cursor: pointer;",
                            // Commit before the input's blur handler runs.
                            onmousedown: move |evt| {
                                evt.prevent_default();
                                autocomplete.click(index);
                            },
                            "{suggestion.label()}"
                        }
                    }
                }
            }
            if let Some(linked_value) = linked_value {
                small { "Linked: {describe_linked(&linked_value)}" }
            }
        }
    }
}
