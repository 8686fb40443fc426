//! Stateless request builder and response parser for the Todoist sync API.
//!
//! # Design
//! `TodoistClient` holds only the endpoint URL derived from a `ClientConfig`
//! and carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the actual HTTP round-trip,
//! keeping the core deterministic and free of I/O dependencies.

use serde_json::Value;

use crate::command::{CommandOutcome, CompleteCommand};
use crate::error::ApiError;
use crate::http::{encode_form, HttpRequest, HttpResponse};
use crate::types::{ClientConfig, ResourceTypes, TaskSnapshot};

/// Sync token requesting a full snapshot; incremental sync is not used.
pub const FULL_SYNC_TOKEN: &str = "*";

/// Synchronous, stateless client for the Todoist sync endpoint.
#[derive(Debug, Clone)]
pub struct TodoistClient {
    endpoint: String,
}

impl TodoistClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint_url(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build a full-resync request for `resource_types`.
    pub fn build_sync(&self, access_token: &str, resource_types: &ResourceTypes) -> HttpRequest {
        HttpRequest {
            url: self.endpoint.clone(),
            headers: form_headers(access_token),
            body: encode_form(&[
                ("sync_token", FULL_SYNC_TOKEN.to_string()),
                ("resource_types", resource_types.to_form_value()),
            ]),
        }
    }

    /// Parse a sync response into a snapshot with rendered task HTML.
    ///
    /// `access_token` is the token the request was sent with and is echoed on
    /// the snapshot for correlation.
    pub fn parse_sync(
        &self,
        response: HttpResponse,
        access_token: &str,
    ) -> Result<TaskSnapshot, ApiError> {
        check_status(&response)?;
        let mut snapshot: TaskSnapshot = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        for task in &mut snapshot.items {
            task.render_html();
        }
        snapshot.access_token = access_token.to_string();
        Ok(snapshot)
    }

    /// Build a request carrying `command` as a one-element `commands` array.
    pub fn build_complete(
        &self,
        access_token: &str,
        command: &CompleteCommand,
    ) -> Result<HttpRequest, ApiError> {
        let commands = serde_json::to_string(std::slice::from_ref(command))
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: form_headers(access_token),
            body: encode_form(&[("commands", commands)]),
        })
    }

    /// Parse the response to a command request sent by `build_complete`.
    pub fn parse_complete(
        &self,
        response: HttpResponse,
        command: &CompleteCommand,
    ) -> Result<CommandOutcome, ApiError> {
        check_status(&response)?;
        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(CommandOutcome::from_response(&body, &command.uuid))
    }
}

fn form_headers(access_token: &str) -> Vec<(String, String)> {
    vec![
        (
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        ),
        ("cache-control".to_string(), "no-cache".to_string()),
        ("authorization".to_string(), format!("Bearer {access_token}")),
    ]
}

/// Anything but 200 is a failure for the sync API.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn config() -> ClientConfig {
        let mut config = ClientConfig::new("tok123");
        config.api_base = "http://localhost:3000".to_string();
        config
    }

    fn client() -> TodoistClient {
        TodoistClient::new(&config())
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_sync_produces_correct_request() {
        let req = client().build_sync("tok123", &ResourceTypes::new(["items", "projects"]));
        assert_eq!(req.url, "http://localhost:3000/sync/v9/sync");
        assert_eq!(req.header("authorization"), Some("Bearer tok123"));
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(req.header("cache-control"), Some("no-cache"));
        assert_eq!(req.form_field("sync_token").as_deref(), Some("*"));
        assert_eq!(
            req.form_field("resource_types").as_deref(),
            Some(r#"["items","projects"]"#)
        );
        assert!(req.form_field("commands").is_none());
    }

    #[test]
    fn build_complete_produces_correct_request() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let command = CompleteCommand::with_parts("99", Uuid::nil(), at);
        let req = client().build_complete("other-token", &command).unwrap();
        assert_eq!(req.url, "http://localhost:3000/sync/v9/sync");
        assert_eq!(req.header("authorization"), Some("Bearer other-token"));

        let commands: Value =
            serde_json::from_str(&req.form_field("commands").unwrap()).unwrap();
        assert_eq!(
            commands,
            json!([{
                "type": "item_complete",
                "uuid": "00000000-0000-0000-0000-000000000000",
                "args": {"id": "99", "date_completed": "2024-01-02T03:04:05.000Z"}
            }])
        );
        assert!(req.form_field("sync_token").is_none());
    }

    #[test]
    fn parse_sync_renders_each_item() {
        let body = r#"{"full_sync":true,"sync_token":"abc","items":[
            {"id":"1","content":"**hi**"},
            {"id":"2","content":"plain"}
        ]}"#;
        let snapshot = client().parse_sync(response(200, body), "tok123").unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(
            snapshot.items[0].content_html.as_deref(),
            Some("<p><strong>hi</strong></p>")
        );
        assert_eq!(snapshot.items[1].content_html.as_deref(), Some("<p>plain</p>"));
        assert_eq!(snapshot.access_token, "tok123");
        assert_eq!(snapshot.extra["sync_token"], "abc");
    }

    #[test]
    fn parse_sync_overwrites_provider_token_field() {
        let body = r#"{"items":[],"accessToken":"spoofed"}"#;
        let snapshot = client().parse_sync(response(200, body), "real").unwrap();
        assert_eq!(snapshot.access_token, "real");
    }

    #[test]
    fn parse_sync_wrong_status() {
        let err = client()
            .parse_sync(response(401, "Unauthorized"), "tok123")
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn parse_sync_bad_json() {
        let err = client()
            .parse_sync(response(200, "not json"), "tok123")
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_sync_requires_items() {
        let err = client()
            .parse_sync(response(200, r#"{"projects":[]}"#), "tok123")
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_complete_reads_sync_status() {
        let command = CompleteCommand::item_complete("1");
        let body = json!({"sync_status": {command.uuid.to_string(): "ok"}}).to_string();
        let outcome = client().parse_complete(response(200, &body), &command).unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);
    }

    #[test]
    fn parse_complete_wrong_status_keeps_body() {
        let command = CompleteCommand::item_complete("1");
        let err = client()
            .parse_complete(response(500, "boom"), &command)
            .unwrap_err();
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_complete_bad_json() {
        let command = CompleteCommand::item_complete("1");
        let err = client()
            .parse_complete(response(200, "<html>"), &command)
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
