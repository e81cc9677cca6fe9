//! Origin-code autocomplete.
//!
//! The engine holds the typed text, the suggestions for it and the keyboard
//! cursor. Lookups are tagged with a sequence number so an answer for text
//! the user has since changed is dropped.

use std::time::Duration;

use api::record::LinkedField;
use api::rpc_client::RemoteDataClient;
use api::rpc_client::RemoteError;
use api::suggestion::Suggestion;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::warn;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;

use crate::debounce::DebounceTicket;
use crate::debounce::Debouncer;

#[derive(Clone, Debug, PartialEq)]
pub struct AutocompleteConfig {
    /// Shorter input never triggers a lookup.
    pub min_query_len: usize,
    /// Zero looks up on every keystroke.
    pub lookup_debounce: Duration,
    /// How long the dropdown survives a blur, so a click on a suggestion
    /// lands before it disappears.
    pub blur_grace: Duration,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            lookup_debounce: Duration::ZERO,
            blur_grace: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum AutocompletePhase {
    Empty,
    Querying,
    Suggesting,
    Committing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum InputOutcome {
    /// Too short to look up; suggestions were cleared.
    Cleared,
    LookupNow(LookupRequest),
    /// Sleep `delay`, then hand `ticket` to [`AutocompleteEngine::lookup_due`].
    LookupAfter {
        delay: Duration,
        ticket: DebounceTicket,
    },
}

/// The keys the dropdown reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum KeyOutcome {
    /// Dropdown hidden or key irrelevant; let the browser handle it.
    Ignored,
    /// Consumed; suppress the browser default.
    Handled,
    Commit(CommitPlan),
    /// Dropdown closed; typed text untouched.
    Dismissed,
}

/// What a commit writes: the visible code, and the identifier for the
/// linked field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitPlan {
    pub code: String,
    pub linked_id: i64,
}

#[derive(Debug)]
pub struct AutocompleteEngine {
    config: AutocompleteConfig,
    value: String,
    suggestions: Vec<Suggestion>,
    selected: Option<usize>,
    dropdown_visible: bool,
    latest_seq: u64,
    querying: Option<u64>,
    committing: bool,
    lookup_timer: Debouncer,
    blur_timer: Debouncer,
}

impl AutocompleteEngine {
    pub fn new(config: AutocompleteConfig, initial_value: impl Into<String>) -> Self {
        Self {
            config,
            value: initial_value.into(),
            suggestions: Vec::new(),
            selected: None,
            dropdown_visible: false,
            latest_seq: 0,
            querying: None,
            committing: false,
            lookup_timer: Debouncer::default(),
            blur_timer: Debouncer::default(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.dropdown_visible
    }

    /// Cursor position, `-1` when nothing is selected.
    pub fn selected_index(&self) -> isize {
        self.selected.map_or(-1, |i| i as isize)
    }

    pub fn phase(&self) -> AutocompletePhase {
        if self.committing {
            AutocompletePhase::Committing
        } else if self.querying.is_some() || self.lookup_timer.is_pending() {
            AutocompletePhase::Querying
        } else if !self.suggestions.is_empty() {
            AutocompletePhase::Suggesting
        } else {
            AutocompletePhase::Empty
        }
    }

    /// The text changed. The typed value always sticks, whatever happens to
    /// the lookup.
    pub fn input(&mut self, text: &str) -> InputOutcome {
        self.value = text.to_string();

        if text.chars().count() < self.config.min_query_len {
            self.lookup_timer.cancel();
            self.orphan_lookups();
            self.clear_suggestions();
            return InputOutcome::Cleared;
        }

        if self.config.lookup_debounce.is_zero() {
            self.lookup_timer.cancel();
            InputOutcome::LookupNow(self.begin_lookup())
        } else {
            InputOutcome::LookupAfter {
                delay: self.config.lookup_debounce,
                ticket: self.lookup_timer.schedule(),
            }
        }
    }

    /// A debounced lookup's quiet period ended.
    pub fn lookup_due(&mut self, ticket: DebounceTicket) -> Option<LookupRequest> {
        self.lookup_timer
            .fire(ticket)
            .then(|| self.begin_lookup())
    }

    /// Applies a lookup answer. Returns `false` for answers to outdated text.
    pub fn lookup_settled(
        &mut self,
        seq: u64,
        result: Result<Vec<Suggestion>, RemoteError>,
    ) -> bool {
        if seq != self.latest_seq {
            debug!("dropping suggestions for superseded lookup {}", seq);
            return false;
        }
        self.querying = None;

        match result {
            Ok(suggestions) => {
                self.dropdown_visible = !suggestions.is_empty();
                self.suggestions = suggestions;
                self.selected = None;
            }
            Err(e) => {
                warn!("Error fetching suggestions: {}", e);
                self.clear_suggestions();
            }
        }
        true
    }

    pub fn key_pressed(&mut self, key: NavKey) -> KeyOutcome {
        if !self.dropdown_visible || self.suggestions.is_empty() {
            return KeyOutcome::Ignored;
        }
        let last = self.suggestions.len() - 1;

        match key {
            NavKey::ArrowDown => {
                self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
                KeyOutcome::Handled
            }
            NavKey::ArrowUp => {
                self.selected = self.selected.and_then(|i| i.checked_sub(1));
                KeyOutcome::Handled
            }
            NavKey::Enter => match self.selected {
                Some(i) => self
                    .commit_index(i)
                    .map_or(KeyOutcome::Handled, KeyOutcome::Commit),
                None => KeyOutcome::Handled,
            },
            NavKey::Escape => {
                self.dropdown_visible = false;
                self.selected = None;
                KeyOutcome::Dismissed
            }
            NavKey::Other => KeyOutcome::Ignored,
        }
    }

    /// Focus cancels a pending blur and re-opens held suggestions.
    pub fn focus(&mut self) {
        self.blur_timer.cancel();
        if !self.suggestions.is_empty() {
            self.dropdown_visible = true;
        }
    }

    /// Returns how long to wait before calling [`Self::blur_elapsed`].
    pub fn blur(&mut self) -> (Duration, DebounceTicket) {
        (self.config.blur_grace, self.blur_timer.schedule())
    }

    pub fn blur_elapsed(&mut self, ticket: DebounceTicket) {
        if self.blur_timer.fire(ticket) {
            self.dropdown_visible = false;
            self.selected = None;
        }
    }

    /// Puts `suggestion` into the visible field and resets browsing state.
    /// The caller persists the returned plan and then calls
    /// [`Self::commit_settled`].
    pub fn commit(&mut self, suggestion: &Suggestion) -> CommitPlan {
        self.value = suggestion.code.clone();
        self.lookup_timer.cancel();
        self.blur_timer.cancel();
        self.orphan_lookups();
        self.clear_suggestions();
        self.committing = true;
        CommitPlan {
            code: suggestion.code.clone(),
            linked_id: suggestion.id,
        }
    }

    pub fn commit_index(&mut self, index: usize) -> Option<CommitPlan> {
        let suggestion = self.suggestions.get(index)?.clone();
        Some(self.commit(&suggestion))
    }

    pub fn commit_settled(&mut self) {
        self.committing = false;
    }

    pub fn dispose(&mut self) {
        self.lookup_timer.cancel();
        self.blur_timer.cancel();
        self.orphan_lookups();
    }

    fn begin_lookup(&mut self) -> LookupRequest {
        self.latest_seq += 1;
        self.querying = Some(self.latest_seq);
        LookupRequest {
            seq: self.latest_seq,
            query: self.value.clone(),
        }
    }

    fn orphan_lookups(&mut self) {
        self.latest_seq += 1;
        self.querying = None;
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.dropdown_visible = false;
        self.selected = None;
    }
}

/// Writes the linked identifier of a commit, then reloads the whole record
/// so computed fields that depend on the link are current.
///
/// The visible code is already committed by [`AutocompleteEngine::commit`];
/// a failure here leaves it standing. Returns `None` when there is no
/// linked field to write.
pub async fn persist_commit<C: RemoteDataClient>(
    client: &C,
    linked: Option<&LinkedField>,
    plan: &CommitPlan,
) -> Result<Option<Map<String, Value>>, RemoteError> {
    let Some(linked) = linked else {
        return Ok(None);
    };
    let mut fields = Map::new();
    fields.insert(linked.field.clone(), json!(plan.linked_id));
    api::write_record_fields(client, &linked.record, fields).await?;

    let row = api::read_record_fields(client, &linked.record, &[]).await?;
    Ok(Some(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::record::RecordRef;
    use api::testing::FakeClient;

    fn engine() -> AutocompleteEngine {
        AutocompleteEngine::new(AutocompleteConfig::default(), "")
    }

    fn ab_suggestions() -> Vec<Suggestion> {
        vec![Suggestion::new(10, "ABC-1"), Suggestion::new(11, "ABD-2")]
    }

    fn lookup(e: &mut AutocompleteEngine, text: &str) -> LookupRequest {
        match e.input(text) {
            InputOutcome::LookupNow(req) => req,
            other => panic!("expected an immediate lookup, got {other:?}"),
        }
    }

    #[test]
    fn short_input_clears_and_hides() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));
        assert!(e.is_dropdown_visible());

        assert_eq!(e.input("A"), InputOutcome::Cleared);
        assert!(e.suggestions().is_empty());
        assert!(!e.is_dropdown_visible());
        assert_eq!(e.value(), "A");
        assert!(e.phase().is_empty());

        assert_eq!(e.input(""), InputOutcome::Cleared);
    }

    #[test]
    fn lookup_is_immediate_by_default() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        assert_eq!(req.query, "AB");
        assert!(e.phase().is_querying());
    }

    #[test]
    fn configured_debounce_delays_lookup() {
        let mut e = AutocompleteEngine::new(
            AutocompleteConfig {
                lookup_debounce: Duration::from_millis(150),
                ..AutocompleteConfig::default()
            },
            "",
        );
        let InputOutcome::LookupAfter { ticket: first, .. } = e.input("AB") else {
            panic!("expected a debounced lookup");
        };
        let InputOutcome::LookupAfter { ticket: second, .. } = e.input("ABC") else {
            panic!("expected a debounced lookup");
        };
        assert_eq!(e.lookup_due(first), None);
        assert_eq!(e.lookup_due(second).map(|r| r.query), Some("ABC".to_string()));
    }

    #[test]
    fn superseded_answers_are_dropped() {
        let mut e = engine();
        let stale = lookup(&mut e, "AB");
        let fresh = lookup(&mut e, "ABD");

        assert!(!e.lookup_settled(stale.seq, Ok(ab_suggestions())));
        assert!(e.suggestions().is_empty());
        assert!(e.lookup_settled(fresh.seq, Ok(vec![Suggestion::new(11, "ABD-2")])));
        assert_eq!(e.suggestions().len(), 1);
    }

    #[test]
    fn answer_after_text_became_short_is_dropped() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.input("A");
        assert!(!e.lookup_settled(req.seq, Ok(ab_suggestions())));
        assert!(!e.is_dropdown_visible());
    }

    #[test]
    fn lookup_failure_hides_dropdown() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(
            req.seq,
            Err(RemoteError::Network {
                status: None,
                message: "offline".to_string(),
            }),
        );
        assert!(e.suggestions().is_empty());
        assert!(!e.is_dropdown_visible());
        assert_eq!(e.value(), "AB");
    }

    #[test]
    fn empty_answer_keeps_dropdown_hidden() {
        let mut e = engine();
        let req = lookup(&mut e, "ZZ");
        e.lookup_settled(req.seq, Ok(Vec::new()));
        assert!(!e.is_dropdown_visible());
    }

    #[test]
    fn cursor_is_clamped() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));
        assert_eq!(e.selected_index(), -1);

        e.key_pressed(NavKey::ArrowUp);
        assert_eq!(e.selected_index(), -1);
        for _ in 0..5 {
            e.key_pressed(NavKey::ArrowDown);
        }
        assert_eq!(e.selected_index(), 1);
        for _ in 0..5 {
            e.key_pressed(NavKey::ArrowUp);
        }
        assert_eq!(e.selected_index(), -1);
    }

    #[test]
    fn keys_are_ignored_while_hidden() {
        let mut e = engine();
        assert_eq!(e.key_pressed(NavKey::ArrowDown), KeyOutcome::Ignored);
        assert_eq!(e.key_pressed(NavKey::Enter), KeyOutcome::Ignored);
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));
        assert_eq!(e.key_pressed(NavKey::Enter), KeyOutcome::Handled);
        assert!(e.is_dropdown_visible());
        assert_eq!(e.value(), "AB");
    }

    #[test]
    fn escape_keeps_typed_text() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));
        e.key_pressed(NavKey::ArrowDown);

        assert_eq!(e.key_pressed(NavKey::Escape), KeyOutcome::Dismissed);
        assert!(!e.is_dropdown_visible());
        assert_eq!(e.selected_index(), -1);
        assert_eq!(e.value(), "AB");

        e.focus();
        assert!(e.is_dropdown_visible());
    }

    #[test]
    fn blur_hides_after_grace_unless_refocused() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));

        let (delay, ticket) = e.blur();
        assert_eq!(delay, Duration::from_millis(200));
        e.focus();
        e.blur_elapsed(ticket);
        assert!(e.is_dropdown_visible());

        let (_, ticket) = e.blur();
        e.blur_elapsed(ticket);
        assert!(!e.is_dropdown_visible());
    }

    #[test]
    fn click_during_blur_grace_commits() {
        let mut e = engine();
        let req = lookup(&mut e, "AB");
        e.lookup_settled(req.seq, Ok(ab_suggestions()));
        let (_, ticket) = e.blur();

        let plan = e.commit_index(1).unwrap();
        assert_eq!(plan.code, "ABD-2");
        e.blur_elapsed(ticket);
        assert_eq!(e.value(), "ABD-2");
    }

    #[tokio::test]
    async fn arrow_down_enter_commits_and_writes_linked_id() {
        let client = FakeClient::new();
        client.respond(
            "/web/dataset/call_kw/stock.picking/search_memo_codes",
            Ok(json!([{"code": "ABC-1", "id": 10}, {"code": "ABD-2", "id": 11}])),
        );
        client.respond("/web/dataset/call_kw/stock.picking/write", Ok(json!(true)));
        client.respond(
            "/web/dataset/call_kw/stock.picking/read",
            Ok(json!([{"id": 5, "financial_id": [10, "ABC-1"], "origin": "ABC-1"}])),
        );

        let mut e = engine();
        let req = lookup(&mut e, "AB");
        let result = api::search_origin_codes(&client, &req.query).await;
        e.lookup_settled(req.seq, result);
        assert_eq!(e.suggestions(), ab_suggestions().as_slice());

        e.key_pressed(NavKey::ArrowDown);
        let KeyOutcome::Commit(plan) = e.key_pressed(NavKey::Enter) else {
            panic!("expected a commit");
        };
        assert_eq!(
            plan,
            CommitPlan {
                code: "ABC-1".to_string(),
                linked_id: 10
            }
        );
        assert_eq!(e.value(), "ABC-1");
        assert!(e.suggestions().is_empty());
        assert!(e.phase().is_committing());

        let linked = LinkedField::new(RecordRef::new("stock.picking", 5), "financial_id");
        let row = persist_commit(&client, Some(&linked), &plan).await.unwrap();
        e.commit_settled();

        assert_eq!(
            client.calls_to("/web/dataset/call_kw/stock.picking/write")[0]["args"],
            json!([[5], {"financial_id": 10}])
        );
        let row = row.unwrap();
        assert_eq!(row["financial_id"], json!([10, "ABC-1"]));
        assert_eq!(row["origin"], json!("ABC-1"));
        assert!(e.phase().is_empty());
    }

    #[tokio::test]
    async fn failed_linked_write_leaves_code_committed() {
        let client = FakeClient::new();
        client.respond(
            "/web/dataset/call_kw/stock.picking/write",
            Err(RemoteError::Protocol {
                code: Some(200),
                message: "Access Denied".to_string(),
            }),
        );

        let mut e = engine();
        let plan = e.commit(&Suggestion::new(10, "ABC-1"));
        let linked = LinkedField::new(RecordRef::new("stock.picking", 5), "financial_id");
        assert!(persist_commit(&client, Some(&linked), &plan).await.is_err());
        e.commit_settled();

        assert_eq!(e.value(), "ABC-1");
        assert!(client.calls_to("/web/dataset/call_kw/stock.picking/read").is_empty());
    }

    #[tokio::test]
    async fn commit_reloads_the_whole_record() {
        let client = FakeClient::new();
        client.respond("/web/dataset/call_kw/stock.picking/write", Ok(json!(true)));
        client.respond(
            "/web/dataset/call_kw/stock.picking/read",
            Ok(json!([{"id": 5, "financial_id": [10, "ABC-1"], "partner_id": [3, "Acme"]}])),
        );

        let plan = CommitPlan {
            code: "ABC-1".to_string(),
            linked_id: 10,
        };
        let linked = LinkedField::new(RecordRef::new("stock.picking", 5), "financial_id");
        let row = persist_commit(&client, Some(&linked), &plan).await.unwrap().unwrap();

        let reads = client.calls_to("/web/dataset/call_kw/stock.picking/read");
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0]["args"], json!([[5], []]));
        assert_eq!(row["partner_id"], json!([3, "Acme"]));
    }

    #[tokio::test]
    async fn no_linked_field_means_no_write() {
        let client = FakeClient::new();
        let plan = CommitPlan {
            code: "ABC-1".to_string(),
            linked_id: 10,
        };
        assert_eq!(persist_commit(&client, None, &plan).await.unwrap(), None);
        assert!(client.calls().is_empty());
    }
}
