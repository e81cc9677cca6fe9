//! Filter-driven refresh of the dashboard counters.
//!
//! [`DashboardSyncController`] is a plain state machine: every method is one
//! event (a filter edit, a timer firing, a fetch settling, a card click) and
//! returns what the caller has to do next. It never sleeps and never talks to
//! the network itself; `hooks::use_dashboard_sync` does that.

use std::time::Duration;

use api::filters::FilterChange;
use api::filters::FilterState;
use api::metrics::DashboardMetrics;
use api::navigation::list_view_url;
use api::navigation::CardSelection;
use api::rpc_client::RemoteError;
use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::error;

use crate::debounce::DebounceTicket;
use crate::debounce::Debouncer;

/// The only failure text an operator ever sees.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load dashboard data. Please try again.";

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// Quiet period after typing in a free-text filter.
    pub text_debounce: Duration,
    /// Quiet period after a selector change. Zero refreshes immediately.
    pub selector_debounce: Duration,
    /// How long refreshed counters stay highlighted.
    pub pulse: Duration,
    /// Delay before the first broken-image sweep after start-up.
    pub initial_sweep_delay: Duration,
    /// Delay before a sweep after a refresh or a page resume.
    pub settle_sweep_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            text_debounce: Duration::from_millis(300),
            selector_debounce: Duration::ZERO,
            pulse: Duration::from_millis(300),
            initial_sweep_delay: Duration::from_millis(500),
            settle_sweep_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::EnumIs)]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// What to do after a filter edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshSchedule {
    /// Call [`DashboardSyncController::begin_refresh`] right away.
    Now,
    /// Sleep `delay`, then pass `ticket` to [`DashboardSyncController::timer_fired`].
    After {
        delay: Duration,
        ticket: DebounceTicket,
    },
}

/// One outgoing metrics fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshRequest {
    pub seq: u64,
    pub filters: FilterState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum RefreshOutcome {
    /// New metrics are showing. Clear the highlight with `pulse` later.
    Applied { pulse: DebounceTicket },
    /// The error banner is showing; previous metrics are untouched.
    Failed,
    /// A newer fetch was issued after this one; nothing changed.
    Stale,
}

#[derive(Debug)]
pub struct DashboardSyncController {
    config: DashboardConfig,
    filters: FilterState,
    metrics: DashboardMetrics,
    settled: SyncPhase,
    latest_seq: u64,
    in_flight: Option<u64>,
    navigating: bool,
    highlighted: bool,
    refresh_timer: Debouncer,
    pulse_timer: Debouncer,
}

impl DashboardSyncController {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            filters: FilterState::default(),
            metrics: DashboardMetrics::zeroed(),
            settled: SyncPhase::Idle,
            latest_seq: 0,
            in_flight: None,
            navigating: false,
            highlighted: false,
            refresh_timer: Debouncer::default(),
            pulse_timer: Debouncer::default(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        &self.metrics
    }

    pub fn phase(&self) -> SyncPhase {
        if self.is_loading() {
            SyncPhase::Loading
        } else {
            self.settled
        }
    }

    /// A fetch for the latest filters is outstanding, or the page is
    /// navigating away after a card click.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() || self.navigating
    }

    /// Banner text while in [`SyncPhase::Error`].
    pub fn error_message(&self) -> Option<&'static str> {
        self.phase().is_error().then_some(LOAD_FAILED_MESSAGE)
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn apply_filter_change(&mut self, change: FilterChange) -> RefreshSchedule {
        let delay = if change.is_free_text() {
            self.config.text_debounce
        } else {
            self.config.selector_debounce
        };
        self.filters.apply(change);

        if delay.is_zero() {
            self.refresh_timer.cancel();
            RefreshSchedule::Now
        } else {
            RefreshSchedule::After {
                delay,
                ticket: self.refresh_timer.schedule(),
            }
        }
    }

    /// `true` when `ticket` survived its quiet period and a refresh is due.
    pub fn timer_fired(&mut self, ticket: DebounceTicket) -> bool {
        self.refresh_timer.fire(ticket)
    }

    pub fn begin_refresh(&mut self) -> RefreshRequest {
        self.latest_seq += 1;
        self.in_flight = Some(self.latest_seq);
        if self.settled.is_error() {
            self.settled = SyncPhase::Idle;
        }
        RefreshRequest {
            seq: self.latest_seq,
            filters: self.filters.clone(),
        }
    }

    pub fn refresh_settled(
        &mut self,
        seq: u64,
        result: Result<DashboardMetrics, RemoteError>,
    ) -> RefreshOutcome {
        if seq != self.latest_seq {
            debug!(
                "discarding metrics response {} (latest is {})",
                seq, self.latest_seq
            );
            return RefreshOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(metrics) => {
                self.metrics = metrics;
                self.settled = SyncPhase::Ready;
                self.highlighted = true;
                RefreshOutcome::Applied {
                    pulse: self.pulse_timer.schedule(),
                }
            }
            Err(e) => {
                match &e {
                    RemoteError::Network { .. } => {
                        error!("Failed to fetch dashboard data (transport): {}", e)
                    }
                    RemoteError::Protocol { .. } => {
                        error!("Failed to fetch dashboard data (backend): {}", e)
                    }
                }
                self.settled = SyncPhase::Error;
                RefreshOutcome::Failed
            }
        }
    }

    pub fn pulse_elapsed(&mut self, ticket: DebounceTicket) {
        if self.pulse_timer.fire(ticket) {
            self.highlighted = false;
        }
    }

    /// Returns the list-view URL to navigate to, or `None` while loading.
    pub fn activate_card(&mut self, selection: &CardSelection) -> Option<String> {
        if self.is_loading() {
            return None;
        }
        self.navigating = true;
        Some(list_view_url(selection, &self.filters))
    }

    /// The page came back from the back-forward cache after a card click.
    pub fn page_restored(&mut self) {
        self.navigating = false;
    }

    /// Cancels timers and orphans any fetch still in flight.
    pub fn dispose(&mut self) {
        self.refresh_timer.cancel();
        self.pulse_timer.cancel();
        self.latest_seq += 1;
        self.in_flight = None;
        self.navigating = false;
        self.highlighted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::metrics::MetricKey;
    use serde_json::json;

    fn controller() -> DashboardSyncController {
        DashboardSyncController::new(DashboardConfig::default())
    }

    fn metrics(value: serde_json::Value) -> DashboardMetrics {
        DashboardMetrics::from_result(value)
    }

    fn http_500() -> RemoteError {
        RemoteError::Network {
            status: Some(500),
            message: "HTTP error! status: 500".to_string(),
        }
    }

    #[test]
    fn successful_refresh_shows_counters() {
        let mut c = controller();
        c.apply_filter_change(FilterChange::Vessel("MV Star".to_string()));
        c.apply_filter_change(FilterChange::Location(None));

        let req = c.begin_refresh();
        assert_eq!(req.filters.vessel, "MV Star");
        assert_eq!(req.filters.location_id, None);
        assert!(c.phase().is_loading());

        let outcome = c.refresh_settled(
            req.seq,
            Ok(metrics(json!({"totalInStock": 42, "expectedToday": 3}))),
        );
        assert!(outcome.is_applied());
        assert_eq!(c.metrics().display(MetricKey::TotalInStock), "42");
        assert_eq!(c.metrics().display(MetricKey::ExpectedToday), "3");
        assert!(!c.is_loading());
        assert_eq!(c.error_message(), None);
        assert!(c.phase().is_ready());
    }

    #[test]
    fn failure_keeps_previous_metrics() {
        let mut c = controller();
        let req = c.begin_refresh();
        c.refresh_settled(req.seq, Ok(metrics(json!({"totalInStock": 7}))));
        let before = c.metrics().clone();

        let req = c.begin_refresh();
        let outcome = c.refresh_settled(req.seq, Err(http_500()));

        assert!(outcome.is_failed());
        assert_eq!(c.metrics(), &before);
        assert_eq!(c.error_message(), Some(LOAD_FAILED_MESSAGE));
        assert!(!c.is_loading());
    }

    #[test]
    fn protocol_failure_is_handled_like_transport_failure() {
        let mut c = controller();
        let req = c.begin_refresh();
        c.refresh_settled(
            req.seq,
            Err(RemoteError::Protocol {
                code: Some(200),
                message: "Access Denied".to_string(),
            }),
        );
        assert_eq!(c.error_message(), Some(LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn refresh_clears_error_banner() {
        let mut c = controller();
        let req = c.begin_refresh();
        c.refresh_settled(req.seq, Err(http_500()));
        assert!(c.error_message().is_some());

        c.begin_refresh();
        assert!(c.phase().is_loading());
        assert_eq!(c.error_message(), None);
    }

    #[test]
    fn typed_filters_coalesce() {
        let mut c = controller();
        let tickets: Vec<_> = ["M", "MV", "MV S", "MV Star"]
            .into_iter()
            .map(|v| match c.apply_filter_change(FilterChange::Vessel(v.to_string())) {
                RefreshSchedule::After { delay, ticket } => {
                    assert_eq!(delay, Duration::from_millis(300));
                    ticket
                }
                RefreshSchedule::Now => panic!("free text must be debounced"),
            })
            .collect();

        let due = tickets.into_iter().filter(|t| c.timer_fired(*t)).count();
        assert_eq!(due, 1);
        assert_eq!(c.begin_refresh().filters.vessel, "MV Star");
    }

    #[test]
    fn selector_change_is_immediate_and_supersedes_typing() {
        let mut c = controller();
        let RefreshSchedule::After { ticket, .. } =
            c.apply_filter_change(FilterChange::Vessel("MV".to_string()))
        else {
            panic!("expected a debounced refresh");
        };
        assert_eq!(
            c.apply_filter_change(FilterChange::Location(Some(4))),
            RefreshSchedule::Now
        );
        assert!(!c.timer_fired(ticket));
        let req = c.begin_refresh();
        assert_eq!(req.filters.vessel, "MV");
        assert_eq!(req.filters.location_id, Some(4));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut c = controller();
        let first = c.begin_refresh();
        let second = c.begin_refresh();

        assert!(c
            .refresh_settled(first.seq, Ok(metrics(json!({"totalInStock": 1}))))
            .is_stale());
        assert!(c.is_loading());

        c.refresh_settled(second.seq, Ok(metrics(json!({"totalInStock": 2}))));
        assert_eq!(c.metrics().display(MetricKey::TotalInStock), "2");
        assert!(!c.is_loading());
    }

    #[test]
    fn late_stale_response_does_not_overwrite() {
        let mut c = controller();
        let first = c.begin_refresh();
        let second = c.begin_refresh();
        c.refresh_settled(second.seq, Ok(metrics(json!({"totalInStock": 2}))));
        c.refresh_settled(first.seq, Err(http_500()));

        assert_eq!(c.metrics().display(MetricKey::TotalInStock), "2");
        assert!(c.phase().is_ready());
    }

    #[test]
    fn loading_always_clears() {
        for result in [Ok(DashboardMetrics::zeroed()), Err(http_500())] {
            let mut c = controller();
            let req = c.begin_refresh();
            assert!(c.is_loading());
            c.refresh_settled(req.seq, result);
            assert!(!c.is_loading());
        }
    }

    #[test]
    fn pulse_reverts() {
        let mut c = controller();
        let req = c.begin_refresh();
        let RefreshOutcome::Applied { pulse } =
            c.refresh_settled(req.seq, Ok(DashboardMetrics::zeroed()))
        else {
            panic!("expected applied");
        };
        assert!(c.is_highlighted());
        c.pulse_elapsed(pulse);
        assert!(!c.is_highlighted());
    }

    #[test]
    fn overlapping_pulses_keep_highlight_until_last() {
        let mut c = controller();
        let req = c.begin_refresh();
        let RefreshOutcome::Applied { pulse: first } =
            c.refresh_settled(req.seq, Ok(DashboardMetrics::zeroed()))
        else {
            panic!("expected applied");
        };
        let req = c.begin_refresh();
        c.refresh_settled(req.seq, Ok(DashboardMetrics::zeroed()));

        c.pulse_elapsed(first);
        assert!(c.is_highlighted());
    }

    #[test]
    fn card_click_while_loading_is_ignored() {
        let mut c = controller();
        c.begin_refresh();
        assert_eq!(c.activate_card(&MetricKey::TotalInStock.into()), None);
    }

    #[test]
    fn card_click_navigates_with_filters() {
        let mut c = controller();
        c.apply_filter_change(FilterChange::Location(Some(3)));
        let url = c.activate_card(&MetricKey::DangerousGoods.into()).unwrap();
        assert_eq!(
            url,
            "/warehouse/customer/dashboard/list?cardSelected=dangerousGoods&title=Dangerous+Goods&vessel=&location_id=3"
        );
        assert!(c.phase().is_loading());
        assert_eq!(c.activate_card(&MetricKey::DangerousGoods.into()), None);

        c.page_restored();
        assert!(!c.is_loading());
    }

    #[test]
    fn dispose_orphans_in_flight_fetch() {
        let mut c = controller();
        let RefreshSchedule::After { ticket, .. } =
            c.apply_filter_change(FilterChange::Client("acme".to_string()))
        else {
            panic!("expected a debounced refresh");
        };
        let req = c.begin_refresh();
        c.dispose();

        assert!(!c.timer_fired(ticket));
        assert!(c
            .refresh_settled(req.seq, Ok(metrics(json!({"totalInStock": 9}))))
            .is_stale());
        assert!(!c.is_loading());
    }
}
