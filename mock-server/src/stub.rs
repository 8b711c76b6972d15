//! Fixed-response routers for exercising client edge cases.
//!
//! Unlike `app()`, these ignore the request path and always answer the same
//! way, so tests can pin down exactly what the client receives.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    body::{to_bytes, Bytes},
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

/// A request as seen by a `recording` stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Answer every request with `status`, `content_type` and `body`.
pub fn fixed(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Router {
    let body = body.into();
    Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, [(CONTENT_TYPE, content_type)], body).into_response() }
    })
}

/// Like `fixed` with `application/json`, recording every request received.
pub fn recording(status: StatusCode, body: &'static str) -> (Router, Recorded) {
    let recorded: Recorded = Arc::default();
    let sink = recorded.clone();
    let router = Router::new().fallback(move |req: Request| {
        let sink = sink.clone();
        async move {
            let (parts, body_stream) = req.into_parts();
            let bytes = to_bytes(body_stream, usize::MAX).await.unwrap_or_default();
            let headers = parts
                .headers
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            let entry = RecordedRequest {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            };
            if let Ok(mut log) = sink.lock() {
                log.push(entry);
            }
            (status, [(CONTENT_TYPE, "application/json")], body).into_response()
        }
    });
    (router, recorded)
}

/// Accept every request and never answer.
pub fn stalled() -> Router {
    Router::new().fallback(|| async {
        std::future::pending::<()>().await;
        StatusCode::OK
    })
}

/// Serve `router` on an ephemeral localhost port in the background.
pub async fn spawn(router: Router) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "stub server stopped");
        }
    });
    Ok(addr)
}
