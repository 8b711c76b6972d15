//! Request construction and response decoding.
//!
//! # Design
//! Everything here is pure: the functions turn typed intent into an
//! `HttpRequest` and an `HttpResponse` into a `RespBody`. HTTP status codes
//! are not interpreted; the decoder stops at "valid JSON envelope decoded"
//! and callers inspect `errs` themselves.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::envelope::{Data, ReqBody, RespBody};
use crate::error::ErrorKind;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Upper bound on buffered response bytes (1 MiB).
pub const MAX_RESPONSE_BYTES: usize = 1 << 20;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Build a request carrying `data` wrapped in a `ReqBody`.
///
/// Taking `Data` rather than `ReqBody` means callers cannot wrap the
/// document twice by accident.
pub fn json_request<A: Serialize>(
    config: &ClientConfig,
    method: HttpMethod,
    url: String,
    data: Data<A>,
) -> Result<HttpRequest, ErrorKind> {
    let body = serde_json::to_string(&ReqBody { data }).map_err(ErrorKind::Encode)?;
    let mut headers = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
    headers.extend(common_headers(config));
    Ok(HttpRequest {
        method,
        url,
        headers,
        body: Some(body),
    })
}

/// Build a request without a body. No `Content-Type` is set.
pub fn bodyless_request(config: &ClientConfig, method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: common_headers(config),
        body: None,
    }
}

fn common_headers(config: &ClientConfig) -> Vec<(String, String)> {
    vec![
        ("Origin".to_string(), config.origin().to_string()),
        ("User-Agent".to_string(), config.user_agent().to_string()),
    ]
}

/// Decode a bounded response into an envelope.
///
/// The content type must be exactly `application/json`, whatever the status.
/// On mismatch the body is returned as diagnostic context.
pub fn decode_response<A: DeserializeOwned>(response: &HttpResponse) -> Result<RespBody<A>, ErrorKind> {
    let content_type = response.header("Content-Type").unwrap_or_default();
    if content_type != JSON_CONTENT_TYPE {
        return Err(ErrorKind::ContentType {
            content_type: content_type.to_string(),
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }
    serde_json::from_slice(&response.body).map_err(ErrorKind::Decode)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::config::SdkInfo;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Attrs {
        name: String,
    }

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:3000", &SdkInfo::resolve()).with_origin("http://app")
    }

    fn json_response(content_type: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.as_bytes().to_vec(),
            truncated: false,
        }
    }

    #[test]
    fn json_request_sets_content_type_and_wraps_data() {
        let data = Data::new("foo", "", Attrs { name: "a".to_string() });
        let req = json_request(&config(), HttpMethod::Post, "http://x/v1/foos".to_string(), data).unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("origin"), Some("http://app"));
        assert_eq!(req.header("user-agent"), Some(config().user_agent()));

        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"data": {"type": "foo", "id": "", "attributes": {"name": "a"}}})
        );
    }

    #[test]
    fn bodyless_request_has_no_content_type() {
        let req = bodyless_request(&config(), HttpMethod::Get, "http://x/v1/foos/1".to_string());
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
        assert_eq!(req.header("origin"), Some("http://app"));
        assert!(req.header("user-agent").is_some());
    }

    #[test]
    fn decode_valid_envelope() {
        let resp = json_response(
            "application/json",
            r#"{"meta":{"took_ms":1,"trace_id":"t"},"data":{"type":"foo","id":"1","attributes":{"name":"a"}}}"#,
        );
        let body: RespBody<Attrs> = decode_response(&resp).unwrap();
        assert_eq!(body.data.unwrap().attrs, Attrs { name: "a".to_string() });
    }

    #[test]
    fn text_plain_is_rejected_even_with_valid_json() {
        let raw = r#"{"meta":{"took_ms":1,"trace_id":"t"}}"#;
        let err = decode_response::<Attrs>(&json_response("text/plain", raw)).unwrap_err();
        match err {
            ErrorKind::ContentType { content_type, body } => {
                assert_eq!(content_type, "text/plain");
                assert_eq!(body, raw);
            }
            other => panic!("expected content type error, got {other:?}"),
        }
    }

    #[test]
    fn content_type_with_parameters_is_rejected() {
        let resp = json_response("application/json; charset=utf-8", "{}");
        let err = decode_response::<Attrs>(&resp).unwrap_err();
        assert!(matches!(err, ErrorKind::ContentType { .. }));
    }

    #[test]
    fn missing_content_type_is_rejected() {
        let resp = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"{}".to_vec(),
            truncated: false,
        };
        let err = decode_response::<Attrs>(&resp).unwrap_err();
        assert!(matches!(err, ErrorKind::ContentType { ref content_type, .. } if content_type.is_empty()));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_response::<Attrs>(&json_response("application/json", "not json")).unwrap_err();
        assert!(matches!(err, ErrorKind::Decode(_)));
    }

    #[test]
    fn status_code_is_not_interpreted() {
        let mut resp = json_response(
            "application/json",
            r#"{"meta":{"took_ms":0,"trace_id":"t"},"errors":[{"status":"404","code":1,"message":"foo not found"}]}"#,
        );
        resp.status = 404;
        let body: RespBody<Attrs> = decode_response(&resp).unwrap();
        assert_eq!(body.errs[0].status, 404);
        assert!(body.data.is_none());
    }
}
