//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use chrono::{DateTime, Utc};
use serde_json::Value;
use todoist_core::{
    ApiError, ClientConfig, CommandOutcome, CompleteCommand, HttpRequest, HttpResponse,
    TodoistClient,
};
use uuid::Uuid;

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (
                arr[0].as_str().unwrap().to_string(),
                arr[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_common_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
    assert_eq!(req.headers, string_pairs(&expected["headers"]), "{name}: headers");
}

fn assert_expected_error(name: &str, err: ApiError, expected: &str) {
    match expected {
        "HttpError" => assert!(
            matches!(err, ApiError::HttpError { .. }),
            "{name}: expected HttpError"
        ),
        "DeserializationError" => assert!(
            matches!(err, ApiError::DeserializationError(_)),
            "{name}: expected DeserializationError"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

#[test]
fn sync_test_vectors() {
    let raw = include_str!("../../test-vectors/sync.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config: ClientConfig = serde_json::from_value(case["config"].clone()).unwrap();
        let client = TodoistClient::new(&config);
        let expected_req = &case["expected_request"];

        // Verify build
        let req = client.build_sync(&config.access_token, &config.resource_types);
        assert_common_request(name, &req, expected_req);
        assert_eq!(
            req.form_fields().unwrap(),
            string_pairs(&expected_req["form"]),
            "{name}: form"
        );

        // Verify parse
        let result = client.parse_sync(simulated(case), &config.access_token);
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let snapshot = serde_json::to_value(result.unwrap()).unwrap();
            assert_eq!(snapshot, case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

#[test]
fn complete_test_vectors() {
    let raw = include_str!("../../test-vectors/complete.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config: ClientConfig = serde_json::from_value(case["config"].clone()).unwrap();
        let client = TodoistClient::new(&config);
        let expected_req = &case["expected_request"];

        let uuid: Uuid = case["uuid"].as_str().unwrap().parse().unwrap();
        let completed_at: DateTime<Utc> =
            DateTime::parse_from_rfc3339(case["completed_at"].as_str().unwrap())
                .unwrap()
                .with_timezone(&Utc);
        let item_id = case["item_id"].as_str().unwrap();
        let command = CompleteCommand::with_parts(item_id, uuid, completed_at);

        // Verify build
        let req = client
            .build_complete(case["access_token"].as_str().unwrap(), &command)
            .unwrap();
        assert_common_request(name, &req, expected_req);
        let commands: Value = serde_json::from_str(&req.form_field("commands").unwrap()).unwrap();
        assert_eq!(commands, expected_req["commands"], "{name}: commands");

        // Verify parse
        let result = client.parse_complete(simulated(case), &command);
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let outcome = result.unwrap();
            match case["expected_outcome"].as_str().unwrap() {
                "Accepted" => assert_eq!(outcome, CommandOutcome::Accepted, "{name}"),
                "Rejected" => assert!(matches!(outcome, CommandOutcome::Rejected(_)), "{name}"),
                "Unreported" => assert_eq!(outcome, CommandOutcome::Unreported, "{name}"),
                other => panic!("{name}: unknown expected_outcome: {other}"),
            }
        }
    }
}
