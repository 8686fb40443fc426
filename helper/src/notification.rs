//! Messages exchanged with the dashboard front-end.
//!
//! Both directions use the same envelope,
//! `{"notification": "<NAME>", "payload": {...}}`, one JSON object per line.

use serde::{Deserialize, Serialize};
use todoist_core::types::string_or_number;
use todoist_core::{ClientConfig, TaskSnapshot};

/// Notifications the front-end sends to the helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "notification", content = "payload")]
pub enum Inbound {
    /// Replace the held config and fetch a fresh snapshot.
    #[serde(rename = "FETCH_TODOIST")]
    FetchTodoist(ClientConfig),
    /// Complete one task, then refresh.
    #[serde(rename = "COMPLETE_TODO")]
    CompleteTodo(CompleteTodo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteTodo {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "itemId", deserialize_with = "string_or_number")]
    pub item_id: String,
}

/// Notifications the helper sends to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notification", content = "payload")]
pub enum Outbound {
    #[serde(rename = "TASKS")]
    Tasks(TaskSnapshot),
    #[serde(rename = "FETCH_ERROR")]
    FetchError(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    pub error: String,
}

impl FetchError {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
