use std::ops::Deref;
use std::sync::Arc;

use api::config::ClientConfig;
use api::rpc_client::JsonRpcClient;

use crate::autocomplete::AutocompleteConfig;
use crate::compat;
use crate::dashboard_sync::DashboardConfig;

#[derive(Debug)]
pub struct AppStateData {
    pub client: JsonRpcClient,
    pub dashboard: DashboardConfig,
    pub autocomplete: AutocompleteConfig,
}

/// Immutable, shared application state, provided as a Dioxus context.
#[derive(Clone, Debug)]
pub struct AppState(Arc<AppStateData>);

impl Deref for AppState {
    type Target = AppStateData;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl AppState {
    pub fn new(client_config: &ClientConfig) -> Self {
        Self(Arc::new(AppStateData {
            client: JsonRpcClient::new(client_config),
            dashboard: DashboardConfig::default(),
            autocomplete: AutocompleteConfig::default(),
        }))
    }

    /// Served by the backend itself, the page origin is the backend.
    pub fn from_env() -> Self {
        let config = match compat::location_origin() {
            Some(origin) => ClientConfig::from_env_or(|| origin),
            None => ClientConfig::from_env(),
        };
        Self::new(&config)
    }
}
