//! Sync API commands and their outcomes.
//!
//! # Design
//! Each command carries a fresh v4 UUID that the provider uses as an
//! idempotency key. `CompleteCommand::item_complete` is the only constructor
//! that picks the UUID and timestamp itself; `with_parts` exists so tests can
//! pin both.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The `type` tag of a sync command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "item_complete")]
    ItemComplete,
}

/// Arguments of an `item_complete` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteArgs {
    pub id: String,
    pub date_completed: String,
}

/// A single `item_complete` command as sent in the `commands` form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteCommand {
    #[serde(rename = "type")]
    pub kind: CommandType,
    pub uuid: Uuid,
    pub args: CompleteArgs,
}

impl CompleteCommand {
    /// Build a command for `item_id` stamped with a new UUID and the
    /// current time.
    pub fn item_complete(item_id: &str) -> Self {
        Self::with_parts(item_id, Uuid::new_v4(), Utc::now())
    }

    pub fn with_parts(item_id: &str, uuid: Uuid, completed_at: DateTime<Utc>) -> Self {
        Self {
            kind: CommandType::ItemComplete,
            uuid,
            args: CompleteArgs {
                id: item_id.to_string(),
                date_completed: iso_timestamp(completed_at),
            },
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, the format JavaScript's `toISOString` emits.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// What the provider reported for one command in a 200 response.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// `sync_status[uuid]` was `"ok"`.
    Accepted,
    /// `sync_status[uuid]` held an error object.
    Rejected(Value),
    /// The response carried no status for this command.
    Unreported,
}

impl CommandOutcome {
    /// Look up `uuid` in a command response's `sync_status` map.
    pub fn from_response(body: &Value, uuid: &Uuid) -> Self {
        match body
            .get("sync_status")
            .and_then(|statuses| statuses.get(uuid.to_string()))
        {
            Some(Value::String(status)) if status == "ok" => CommandOutcome::Accepted,
            Some(detail) => CommandOutcome::Rejected(detail.clone()),
            None => CommandOutcome::Unreported,
        }
    }
}
