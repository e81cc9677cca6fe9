//! Navigation targets produced by card activation.

use crate::filters::FilterState;
use crate::metrics::MetricKey;

/// Route that turns a card selection into a filtered list view.
pub const LIST_VIEW_PATH: &str = "/warehouse/customer/dashboard/list";

/// The card an operator clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSelection {
    pub card: String,
    pub title: String,
}

impl From<MetricKey> for CardSelection {
    fn from(key: MetricKey) -> Self {
        Self {
            card: key.key().to_string(),
            title: key.title().to_string(),
        }
    }
}

/// Builds the list-view URL for `selection` under the current `filters`.
pub fn list_view_url(selection: &CardSelection, filters: &FilterState) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("cardSelected", &selection.card)
        .append_pair("title", &selection.title)
        .append_pair("vessel", &filters.vessel)
        .append_pair("location_id", &filters.location_param());
    if !filters.client.is_empty() {
        query.append_pair("client", &filters.client);
    }
    format!("{}?{}", LIST_VIEW_PATH, query.finish())
}
