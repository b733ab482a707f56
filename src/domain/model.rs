use crate::utils::error::RelayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the decoded input array. Keys and values are carried
/// verbatim; anything that is not a JSON object fails decoding upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub data: Map<String, Value>,
}

/// The four-field shape delivered to the webhook. A key missing from the
/// source record becomes an explicit `null`; values are never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRecord {
    #[serde(default)]
    pub order_id: Value,
    #[serde(default)]
    pub customer_id: Value,
    #[serde(default)]
    pub total_amount: Value,
    #[serde(default)]
    pub status: Value,
}

impl ProjectedRecord {
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            order_id: raw.data.get("orderId").cloned().unwrap_or(Value::Null),
            customer_id: raw.data.get("customerId").cloned().unwrap_or(Value::Null),
            total_amount: raw.data.get("totalAmount").cloned().unwrap_or(Value::Null),
            status: raw.data.get("status").cloned().unwrap_or(Value::Null),
        }
    }
}

/// Terminal result of one pipeline invocation. There is no partial outcome:
/// either every step after "read" completed, or the invocation failed at the
/// first failing step and no later step ran.
#[derive(Debug)]
pub enum Outcome {
    Delivered {
        records: usize,
        cleanup: CleanupStatus,
    },
    Skipped,
    Failed(RelayError),
}

/// What happened to the source blob after a successful delivery. A failed or
/// skipped delete never demotes the invocation below `Delivered`.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupStatus {
    Deleted,
    AlreadyGone,
    Failed(String),
}
