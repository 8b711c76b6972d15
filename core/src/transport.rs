//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `ReqwestTransport` performs
//! a single attempt per call, races it against the caller's `CallContext`,
//! buffers at most `MAX_RESPONSE_BYTES` of the body and drains the rest.
//! When the context fires first the in-flight future is dropped, which
//! releases the connection.

use std::future::Future;

use tokio::time::Instant;

use crate::codec::MAX_RESPONSE_BYTES;
use crate::context::CallContext;
use crate::error::ErrorKind;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
        ctx: &CallContext,
    ) -> impl Future<Output = Result<HttpResponse, ErrorKind>> + Send;
}

/// `Transport` backed by a `reqwest::Client`.
///
/// Connection pooling belongs to the wrapped client; pass a shared one via
/// `with_client` to reuse it across SDK instances.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ErrorKind> {
        let mut builder = self.client.request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut response = builder
            .send()
            .await
            .map_err(|e| ErrorKind::Transport(Box::new(e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let (body, truncated) = read_bounded(&mut response, MAX_RESPONSE_BYTES).await?;
        if truncated {
            tracing::warn!(
                url = %request.url,
                limit = MAX_RESPONSE_BYTES,
                "response body exceeded limit and was truncated",
            );
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
            truncated,
        })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest, ctx: &CallContext) -> Result<HttpResponse, ErrorKind> {
        let deadline = ctx.timeout().map(|t| Instant::now() + t);
        let expired = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancellation_token().cancelled() => Err(ErrorKind::Cancelled),
            _ = expired => Err(ErrorKind::DeadlineExceeded),
            result = self.round_trip(request) => result,
        }
    }
}

/// Buffer up to `limit` body bytes, then read and discard whatever is left.
///
/// Errors while draining past the limit are ignored; the buffered prefix is
/// all the caller will ever see.
async fn read_bounded(response: &mut reqwest::Response, limit: usize) -> Result<(Vec<u8>, bool), ErrorKind> {
    let mut body = Vec::new();
    let mut truncated = false;

    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => return Err(ErrorKind::BodyRead(Box::new(e))),
        };
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        body.extend_from_slice(&chunk);
    }

    if truncated {
        while let Ok(Some(_)) = response.chunk().await {}
    }
    Ok((body, truncated))
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
