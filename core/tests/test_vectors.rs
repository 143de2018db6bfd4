//! Verify request building and response decoding against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector file describes facade inputs, the expected request, a
//! simulated response and what decoding it must yield. Bodies are compared
//! as parsed JSON so field order does not matter.

use marketo_core::{
    ClientConfig, HttpMethod, HttpResponse, MarketoClient, MarketoError, Params, Record, SyncAction,
};
use serde_json::Value;

const BASE_URL: &str = "https://123-ABC-456.mktorest.com";

fn client() -> MarketoClient {
    MarketoClient::new(ClientConfig::new("id", "secret").with_munchkin_id("123-ABC-456")).unwrap()
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_action(s: &str) -> SyncAction {
    match s {
        "createOnly" => SyncAction::CreateOnly,
        "updateOnly" => SyncAction::UpdateOnly,
        "createOrUpdate" => SyncAction::CreateOrUpdate,
        "createDuplicate" => SyncAction::CreateDuplicate,
        other => panic!("unknown action: {other}"),
    }
}

fn records(value: &Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_object().unwrap().clone())
        .collect()
}

fn ok(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Lead sync
// ---------------------------------------------------------------------------

#[test]
fn sync_leads_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/sync_leads.json")) {
        let name = case["name"].as_str().unwrap();
        let action = parse_action(case["action"].as_str().unwrap());
        let command = c.sync_leads(action, records(&case["input"]), case["lookup_field"].as_str(), Params::new());
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.prepare(&command, Some("tok")).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: Value = serde_json::from_str(req.body_str().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let response = HttpResponse {
            status: case["response"]["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["response"]["body"].as_str().unwrap().to_string(),
        };
        if case.get("expected_error").is_some() {
            let err = command.parse(response).unwrap_err();
            assert!(matches!(err, MarketoError::Http { status: 503, .. }), "{name}: {err:?}");
            continue;
        }
        let parsed = command.parse(response).unwrap();
        let statuses: Vec<&str> = parsed.result.iter().map(|r| r.status.as_str()).collect();
        let expected: Vec<&str> = case["expected_statuses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap())
            .collect();
        assert_eq!(statuses, expected, "{name}: statuses");
        if expected.is_empty() {
            assert!(!parsed.is_success(), "{name}: success");
            assert!(!parsed.errors.is_empty(), "{name}: errors");
        }
    }
}

// ---------------------------------------------------------------------------
// List membership
// ---------------------------------------------------------------------------

#[test]
fn list_membership_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_membership.json")) {
        let name = case["name"].as_str().unwrap();
        let list_id = case["list_id"].as_i64().unwrap();
        let lead_ids: Vec<i64> = case["lead_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_i64().unwrap())
            .collect();
        let command = match case["call"].as_str().unwrap() {
            "is_member_of_list" => c.is_member_of_list(list_id, &lead_ids, Params::new()),
            "add_leads_to_list" => c.add_leads_to_list(list_id, &lead_ids, Params::new()),
            "remove_leads_from_list" => c.remove_leads_from_list(list_id, &lead_ids, Params::new()),
            other => panic!("unknown call: {other}"),
        };
        let expected_req = &case["expected_request"];

        let req = c.prepare(&command, None).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body");
        assert!(req.header("authorization").is_none(), "{name}: no token given");

        let parsed = command.parse(ok(case["response"].as_str().unwrap())).unwrap();
        assert!(parsed.is_success(), "{name}: success");
        for id in &lead_ids {
            let expected = case["expected_members"]
                .as_array()
                .unwrap()
                .iter()
                .any(|m| m.as_i64() == Some(*id));
            assert_eq!(parsed.is_member(*id), expected, "{name}: member {id}");
        }
    }
}

// ---------------------------------------------------------------------------
// Custom activities
// ---------------------------------------------------------------------------

#[test]
fn custom_activities_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/custom_activities.json")) {
        let name = case["name"].as_str().unwrap();
        let result = c.add_custom_activities(records(&case["input"]), Params::new());

        if let Some(expected) = case["expected_error"].as_str() {
            match result {
                Err(MarketoError::InvalidArgument(msg)) => assert!(msg.contains(expected), "{name}: {msg}"),
                other => panic!("{name}: expected InvalidArgument, got {other:?}"),
            }
            continue;
        }

        let command = result.unwrap();
        let req = c.prepare(&command, None).unwrap();
        assert_eq!(req.url, format!("{BASE_URL}/rest/v1/activities/external.json"), "{name}: url");
        let req_body: Value = serde_json::from_str(req.body_str().unwrap()).unwrap();
        assert_eq!(req_body, case["expected_body"], "{name}: body");
    }
}
