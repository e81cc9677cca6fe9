use serde::Deserialize;
use serde_json::Value;

use crate::rpc_client::RemoteError;

/// An internal stock location offered by the warehouse selector.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LocationOption {
    pub id: i64,
    pub name: String,
}

/// The location endpoint answers either with a list, or with
/// `{"error": "...", "locations": []}` when the lookup failed server-side.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocationsPayload {
    List(Vec<LocationOption>),
    Failed {
        error: String,
        #[serde(default)]
        locations: Vec<LocationOption>,
    },
}

pub(crate) fn decode_locations(result: Value) -> Result<Vec<LocationOption>, RemoteError> {
    if result.is_null() {
        return Ok(Vec::new());
    }
    match serde_json::from_value(result)
        .map_err(|e| RemoteError::unexpected_payload("locations", e))?
    {
        LocationsPayload::List(list) => Ok(list),
        LocationsPayload::Failed { error, locations } => {
            dioxus_logger::tracing::warn!("location lookup failed on the server: {}", error);
            Ok(locations)
        }
    }
}
