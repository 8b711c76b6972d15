//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected decode results or error kinds. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use std::fmt::Debug;

use foo_client::{
    ClientConfig, ErrorKind, FooAttrs, FooClient, FooCreateAttrs, FooUpdateAttrs, HttpMethod, HttpRequest,
    HttpResponse, RespBody, SdkInfo,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> FooClient {
    FooClient::new(ClientConfig::new(BASE_URL, &SdkInfo::resolve()))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn error_name(err: &ErrorKind) -> &'static str {
    match err {
        ErrorKind::IdRequired => "IdRequired",
        ErrorKind::Encode(_) => "Encode",
        ErrorKind::Transport(_) => "Transport",
        ErrorKind::Cancelled => "Cancelled",
        ErrorKind::DeadlineExceeded => "DeadlineExceeded",
        ErrorKind::BodyRead(_) => "BodyRead",
        ErrorKind::ContentType { .. } => "ContentType",
        ErrorKind::Decode(_) => "Decode",
    }
}

/// Run one vector case: check the built request, then decode the simulated
/// response and compare against the expected envelope or error.
fn check_case<R>(
    case: &Value,
    build: impl FnOnce() -> Result<HttpRequest, ErrorKind>,
    parse: impl FnOnce(&HttpResponse) -> Result<R, ErrorKind>,
) where
    R: DeserializeOwned + PartialEq + Debug,
{
    let name = case["name"].as_str().unwrap();
    let expected_error = case.get("expected_error").and_then(Value::as_str);

    let req = match build() {
        Ok(req) => req,
        Err(err) => {
            assert_eq!(Some(error_name(&err)), expected_error, "{name}: build error");
            return;
        }
    };

    // Verify build
    let expected_req = &case["expected_request"];
    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(
        req.header("content-type"),
        expected_req.get("content_type").and_then(Value::as_str),
        "{name}: content type"
    );
    assert!(req.header("user-agent").is_some(), "{name}: user agent");
    assert_eq!(req.header("origin"), Some(BASE_URL), "{name}: origin");
    match expected_req.get("body") {
        Some(expected_body) => {
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }

    // Verify parse
    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: vec![(
            "Content-Type".to_string(),
            sim["content_type"].as_str().unwrap().to_string(),
        )],
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        truncated: false,
    };
    let result = parse(&response);

    if let Some(expected_error) = expected_error {
        let err = result.unwrap_err();
        assert_eq!(error_name(&err), expected_error, "{name}: error kind");
    } else {
        let decoded = result.unwrap();
        let expected: R = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(decoded, expected, "{name}: parsed result");
    }
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let input: FooCreateAttrs = serde_json::from_value(case["input"].clone()).unwrap();
        check_case::<RespBody<FooAttrs>>(&case, || c.build_create_foo(input), |r| c.parse_foo(r));
    }
}

#[test]
fn read_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/read.json")) {
        let id = case["input_id"].as_str().unwrap().to_string();
        check_case::<RespBody<FooAttrs>>(&case, || c.build_read_foo(&id), |r| c.parse_foo(r));
    }
}

#[test]
fn update_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/update.json")) {
        let id = case["input_id"].as_str().unwrap().to_string();
        let input: FooUpdateAttrs = serde_json::from_value(case["input"].clone()).unwrap();
        check_case::<RespBody<FooAttrs>>(&case, || c.build_update_foo(&id, input), |r| c.parse_foo(r));
    }
}

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/delete.json")) {
        let id = case["input_id"].as_str().unwrap().to_string();
        check_case::<RespBody<Value>>(&case, || c.build_delete_foo(&id), |r| c.parse_deleted(r));
    }
}
