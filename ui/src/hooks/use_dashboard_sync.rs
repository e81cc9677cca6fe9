use api::filters::FilterChange;
use api::filters::FilterState;
use api::metrics::MetricKey;
use dioxus::prelude::*;
use dioxus_logger::tracing::info;

use super::use_image_resilience::ManagedImages;
use crate::app_state::AppState;
use crate::compat;
use crate::compat::PageResume;
use crate::dashboard_sync::DashboardSyncController;
use crate::dashboard_sync::RefreshOutcome;
use crate::dashboard_sync::RefreshSchedule;
use crate::dashboard_sync::SyncPhase;

/// Handle to the dashboard's [`DashboardSyncController`].
///
/// Event handlers call the methods here; the handle performs the sleeps and
/// fetches the controller asks for and feeds the results back in.
#[derive(Clone, Copy)]
pub struct DashboardSync {
    controller: Signal<DashboardSyncController>,
    app_state: Signal<AppState>,
    images: ManagedImages,
}

impl DashboardSync {
    pub fn filters(&self) -> FilterState {
        self.controller.read().filters().clone()
    }

    pub fn phase(&self) -> SyncPhase {
        self.controller.read().phase()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.read().is_loading()
    }

    pub fn is_highlighted(&self) -> bool {
        self.controller.read().is_highlighted()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.controller.read().error_message()
    }

    pub fn display(&self, key: MetricKey) -> String {
        self.controller.read().metrics().display(key)
    }

    pub fn change_filter(&mut self, change: FilterChange) {
        let schedule = self.controller.write().apply_filter_change(change);
        match schedule {
            RefreshSchedule::Now => self.refresh(),
            RefreshSchedule::After { delay, ticket } => {
                let mut sync = *self;
                spawn(async move {
                    compat::sleep(delay).await;
                    let due = sync.controller.write().timer_fired(ticket);
                    if due {
                        sync.refresh();
                    }
                });
            }
        }
    }

    /// Fetches metrics for the current filters right away.
    pub fn refresh(&mut self) {
        let request = self.controller.write().begin_refresh();
        let mut sync = *self;

        spawn(async move {
            let app_state = sync.app_state.peek().clone();
            let result = api::fetch_dashboard_metrics(&app_state.client, &request.filters).await;
            let outcome = sync.controller.write().refresh_settled(request.seq, result);

            if let RefreshOutcome::Applied { pulse } = outcome {
                sync.images
                    .schedule_sweep(app_state.dashboard.settle_sweep_delay);
                compat::sleep(app_state.dashboard.pulse).await;
                sync.controller.write().pulse_elapsed(pulse);
            }
        });
    }

    pub fn activate_card(&mut self, key: MetricKey) {
        let target = self.controller.write().activate_card(&key.into());
        match target {
            Some(url) => {
                info!("opening {} list", key);
                compat::navigate_to(&url);
            }
            None => info!("ignoring {} card while loading", key),
        }
    }

    pub fn page_resumed(&mut self, resume: PageResume) {
        if resume.is_restored() {
            self.controller.write().page_restored();
        }
        let delay = self.app_state.peek().dashboard.settle_sweep_delay;
        self.images.schedule_sweep(delay);
    }
}

/// Owns the dashboard controller for the lifetime of the calling component.
///
/// Starts the first refresh and the initial image sweep, listens for the
/// page being resumed, and disposes the controller on unmount.
pub fn use_dashboard_sync(images: ManagedImages) -> DashboardSync {
    let app_state = use_context::<AppState>();
    let config = app_state.dashboard.clone();
    let initial_sweep = config.initial_sweep_delay;

    let mut controller = use_signal(|| DashboardSyncController::new(config));
    let app_state = use_signal(|| app_state);

    let sync = use_context_provider(|| DashboardSync {
        controller,
        app_state,
        images,
    });

    use_effect(move || {
        let mut sync = sync;
        sync.refresh();
        images.schedule_sweep(initial_sweep);
    });

    use_coroutine(move |_rx: UnboundedReceiver<()>| {
        let mut sync = sync;
        async move {
            let Some(mut listener) = compat::PageResumeListener::new() else {
                return;
            };
            while let Some(resume) = listener.next().await {
                sync.page_resumed(resume);
            }
        }
    });

    use_drop(move || {
        if let Ok(mut controller) = controller.try_write() {
            controller.dispose();
        }
    });

    sync
}

pub fn use_dashboard() -> DashboardSync {
    use_context::<DashboardSync>()
}
