//=============================================================================
// File: src/screens/receipt.rs
//=============================================================================
use api::record::LinkedField;
use api::record::RecordRef;
use api::RECEIPT_MODEL;
use dioxus::prelude::*;

use crate::components::origin_autocomplete::OriginAutocomplete;
use crate::components::pico::Card;
use crate::components::pico::Grid;

/// Field on the receipt that holds the financial record behind the origin code.
const FINANCIAL_FIELD: &str = "financial_id";

/// Receipt form: pick an origin code and link its financial record.
#[component]
pub fn ReceiptScreen() -> Element {
    let mut record_id = use_signal(String::new);
    let mut origin = use_signal(String::new);
    let mut linked = use_signal(|| None::<LinkedField>);

    rsx! {
        Card {
            h3 { "Receipt" }
            Grid {
                label {
                    "Receipt ID"
                    input {
                        r#type: "number",
                        min: "1",
                        placeholder: "Record to link",
                        value: "{record_id}",
                        oninput: move |evt| {
                            let text = evt.value();
                            let parsed = text.trim().parse::<i64>().ok().filter(|id| *id > 0);
                            linked.set(parsed.map(|id| {
                                LinkedField::new(RecordRef::new(RECEIPT_MODEL, id), FINANCIAL_FIELD)
                            }));
                            record_id.set(text);
                        },
                    }
                }
                label {
                    "Origin"
                    OriginAutocomplete {
                        linked,
                        placeholder: "Type at least 2 characters...".to_string(),
                        on_change: move |value: String| origin.set(value),
                    }
                }
            }
            LinkedFieldSummary { origin, linked }
        }
    }
}

#[component]
fn LinkedFieldSummary(origin: Signal<String>, linked: Signal<Option<LinkedField>>) -> Element {
    let record = linked
        .read()
        .as_ref()
        .map(|l| format!("{} #{}", l.record.model, l.record.id));

    rsx! {
        small {
            match record {
                Some(record) => rsx! { "Origin \"{origin}\" will be linked on {record}." },
                None => rsx! { "No receipt selected; the origin code is kept locally." },
            }
        }
    }
}
