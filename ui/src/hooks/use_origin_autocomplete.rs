use api::record::LinkedField;
use api::suggestion::Suggestion;
use dioxus::prelude::*;
use dioxus_logger::tracing::warn;
use serde_json::Value;

use crate::app_state::AppState;
use crate::autocomplete::persist_commit;
use crate::autocomplete::AutocompleteEngine;
use crate::autocomplete::CommitPlan;
use crate::autocomplete::InputOutcome;
use crate::autocomplete::KeyOutcome;
use crate::autocomplete::LookupRequest;
use crate::autocomplete::NavKey;
use crate::compat;

#[derive(Clone, Copy)]
pub struct OriginAutocomplete {
    engine: Signal<AutocompleteEngine>,
    app_state: Signal<AppState>,
    linked: Signal<Option<LinkedField>>,
    linked_value: Signal<Option<Value>>,
}

impl OriginAutocomplete {
    pub fn value(&self) -> String {
        self.engine.read().value().to_string()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.engine.read().suggestions().to_vec()
    }

    pub fn selected_index(&self) -> isize {
        self.engine.read().selected_index()
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.engine.read().is_dropdown_visible()
    }

    /// The linked field as last read back from the backend.
    pub fn linked_value(&self) -> Option<Value> {
        self.linked_value.read().clone()
    }

    pub fn input(&mut self, text: &str) {
        let outcome = self.engine.write().input(text);
        match outcome {
            InputOutcome::Cleared => {}
            InputOutcome::LookupNow(request) => self.lookup(request),
            InputOutcome::LookupAfter { delay, ticket } => {
                let mut this = *self;
                spawn(async move {
                    compat::sleep(delay).await;
                    let due = this.engine.write().lookup_due(ticket);
                    if let Some(request) = due {
                        this.lookup(request);
                    }
                });
            }
        }
    }

    /// Returns whether the browser default for the key must be suppressed.
    pub fn key_pressed(&mut self, key: NavKey) -> bool {
        let outcome = self.engine.write().key_pressed(key);
        match outcome {
            KeyOutcome::Ignored | KeyOutcome::Dismissed => false,
            KeyOutcome::Handled => true,
            KeyOutcome::Commit(plan) => {
                self.persist(plan);
                true
            }
        }
    }

    pub fn click(&mut self, index: usize) {
        let plan = self.engine.write().commit_index(index);
        if let Some(plan) = plan {
            self.persist(plan);
        }
    }

    pub fn focus(&mut self) {
        self.engine.write().focus();
    }

    pub fn blur(&mut self) {
        let (grace, ticket) = self.engine.write().blur();
        let mut engine = self.engine;
        spawn(async move {
            compat::sleep(grace).await;
            engine.write().blur_elapsed(ticket);
        });
    }

    fn lookup(&mut self, request: LookupRequest) {
        let mut engine = self.engine;
        let app_state = self.app_state.peek().clone();
        spawn(async move {
            let result = api::search_origin_codes(&app_state.client, &request.query).await;
            engine.write().lookup_settled(request.seq, result);
        });
    }

    fn persist(&mut self, plan: CommitPlan) {
        let mut this = *self;
        spawn(async move {
            let app_state = this.app_state.peek().clone();
            let linked = this.linked.peek().clone();
            match persist_commit(&app_state.client, linked.as_ref(), &plan).await {
                Ok(Some(row)) => {
                    let field = linked.as_ref().and_then(|l| row.get(&l.field)).cloned();
                    this.linked_value.set(field);
                }
                Ok(None) => {}
                Err(e) => warn!("Error updating fields for {}: {}", plan.code, e),
            }
            this.engine.write().commit_settled();
        });
    }
}

/// Autocomplete state for one origin input.
///
/// `linked` names the record field that receives the identifier of a
/// committed suggestion; `None` commits the code only.
pub fn use_origin_autocomplete(
    initial_value: String,
    linked: Signal<Option<LinkedField>>,
) -> OriginAutocomplete {
    let app_state = use_context::<AppState>();
    let config = app_state.autocomplete.clone();

    let mut engine = use_signal(|| AutocompleteEngine::new(config, initial_value));
    let app_state = use_signal(|| app_state);
    let linked_value = use_signal(|| None);

    use_drop(move || {
        if let Ok(mut engine) = engine.try_write() {
            engine.dispose();
        }
    });

    OriginAutocomplete {
        engine,
        app_state,
        linked,
        linked_value,
    }
}
