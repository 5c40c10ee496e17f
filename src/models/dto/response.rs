use serde::Deserialize;
use serde_json::Value;

use crate::{client::unwrap_data, errors::AppResult};

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpdatedIdsPayload {
    Ids(Vec<i64>),
    Records(Vec<IdOnly>),
    Object {
        #[serde(alias = "updated", alias = "ids")]
        updated_ids: Vec<i64>,
    },
}

/// Ids the backend reports as actually updated by a bulk status change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkStatusResponse {
    pub updated_ids: Vec<i64>,
}

impl BulkStatusResponse {
    pub fn from_value(value: Value) -> AppResult<Self> {
        let payload: UpdatedIdsPayload = serde_json::from_value(unwrap_data(value))?;
        let updated_ids = match payload {
            UpdatedIdsPayload::Ids(ids) => ids,
            UpdatedIdsPayload::Records(records) => records.into_iter().map(|r| r.id).collect(),
            UpdatedIdsPayload::Object { updated_ids } => updated_ids,
        };
        Ok(Self { updated_ids })
    }
}
