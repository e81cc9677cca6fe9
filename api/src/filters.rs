//! Dashboard filters.

use serde::Deserialize;
use serde::Serialize;

/// The filter values sent with every metrics fetch.
///
/// Lives only as long as the page; never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free text matched against vessel names.
    pub vessel: String,
    /// Selected warehouse location, `None` for all locations.
    pub location_id: Option<i64>,
    /// Free text matched against client names.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client: String,
}

/// A single user edit to the filters.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum FilterChange {
    Vessel(String),
    Client(String),
    Location(Option<i64>),
}

impl FilterChange {
    /// Builds a location change from a `<select>` value; empty or
    /// non-numeric values select all locations.
    pub fn location_from_select(value: &str) -> Self {
        Self::Location(value.trim().parse().ok())
    }

    /// Typed filters are debounced; discrete selector changes are not.
    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::Vessel(_) | Self::Client(_))
    }
}

impl FilterState {
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Vessel(v) => self.vessel = v,
            FilterChange::Client(c) => self.client = c,
            FilterChange::Location(l) => self.location_id = l,
        }
    }

    /// Location id as a query-string value, empty for none.
    pub fn location_param(&self) -> String {
        self.location_id.map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_null_location() {
        let filters = FilterState {
            vessel: "MV Star".to_string(),
            location_id: None,
            client: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"vessel": "MV Star", "location_id": null})
        );
    }

    #[test]
    fn select_value_parsing() {
        assert_eq!(
            FilterChange::location_from_select("12"),
            FilterChange::Location(Some(12))
        );
        assert_eq!(
            FilterChange::location_from_select(""),
            FilterChange::Location(None)
        );
    }

    #[test]
    fn only_text_filters_are_free_text() {
        assert!(FilterChange::Vessel("a".into()).is_free_text());
        assert!(FilterChange::Client("a".into()).is_free_text());
        assert!(!FilterChange::Location(Some(1)).is_free_text());
    }
}
