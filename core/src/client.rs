//! Typed CRUD client for the foo resource.
//!
//! # Design
//! Each operation is split into a pure `build_*` method that produces an
//! `HttpRequest`, a `Transport` round trip, and a `parse_*` step that decodes
//! the bounded response. The client holds only immutable configuration and
//! the transport, so concurrent calls share nothing mutable.

use serde::de::DeserializeOwned;

use crate::codec::{bodyless_request, decode_response, json_request};
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::envelope::{Data, RespBody};
use crate::error::{ClientError, ErrorKind, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{FooAttrs, FooCreateAttrs, FooUpdateAttrs, RESOURCE_TYPE_FOO};

const FOOS_PATH: &str = "/v1/foos";

/// Client for the `/v1/foos` collection.
#[derive(Debug, Clone)]
pub struct FooClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl FooClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> FooClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a foo. The server assigns the id.
    pub async fn create_foo(
        &self,
        ctx: &CallContext,
        attrs: FooCreateAttrs,
    ) -> Result<RespBody<FooAttrs>, ClientError> {
        let op = Operation::Create;
        let req = self.build_create_foo(attrs).map_err(|e| ClientError::new(op, e))?;
        self.send(op, ctx, req).await
    }

    pub async fn read_foo(&self, ctx: &CallContext, id: &str) -> Result<RespBody<FooAttrs>, ClientError> {
        let op = Operation::Read;
        let req = self.build_read_foo(id).map_err(|e| ClientError::new(op, e))?;
        self.send(op, ctx, req).await
    }

    /// Apply a partial update; only fields set in `attrs` are sent.
    pub async fn update_foo(
        &self,
        ctx: &CallContext,
        id: &str,
        attrs: FooUpdateAttrs,
    ) -> Result<RespBody<FooAttrs>, ClientError> {
        let op = Operation::Update;
        let req = self.build_update_foo(id, attrs).map_err(|e| ClientError::new(op, e))?;
        self.send(op, ctx, req).await
    }

    /// Delete a foo. Successful responses carry no `data`.
    pub async fn delete_foo(
        &self,
        ctx: &CallContext,
        id: &str,
    ) -> Result<RespBody<serde_json::Value>, ClientError> {
        let op = Operation::Delete;
        let req = self.build_delete_foo(id).map_err(|e| ClientError::new(op, e))?;
        self.send(op, ctx, req).await
    }

    async fn send<A: DeserializeOwned>(
        &self,
        op: Operation,
        ctx: &CallContext,
        req: HttpRequest,
    ) -> Result<RespBody<A>, ClientError> {
        tracing::debug!(%op, method = req.method.as_str(), url = %req.url, "sending request");
        let resp = self
            .transport
            .execute(req, ctx)
            .await
            .map_err(|e| ClientError::new(op, e))?;
        tracing::debug!(%op, status = resp.status, bytes = resp.body.len(), "received response");
        decode_response(&resp).map_err(|e| ClientError::new(op, e))
    }

    pub fn build_create_foo(&self, attrs: FooCreateAttrs) -> Result<HttpRequest, ErrorKind> {
        json_request(&self.config, HttpMethod::Post, self.foo_path(""), foo_data("", attrs))
    }

    pub fn build_read_foo(&self, id: &str) -> Result<HttpRequest, ErrorKind> {
        require_id(id)?;
        Ok(bodyless_request(&self.config, HttpMethod::Get, self.foo_path(id)))
    }

    pub fn build_update_foo(&self, id: &str, attrs: FooUpdateAttrs) -> Result<HttpRequest, ErrorKind> {
        require_id(id)?;
        json_request(&self.config, HttpMethod::Patch, self.foo_path(id), foo_data(id, attrs))
    }

    pub fn build_delete_foo(&self, id: &str) -> Result<HttpRequest, ErrorKind> {
        require_id(id)?;
        Ok(bodyless_request(&self.config, HttpMethod::Delete, self.foo_path(id)))
    }

    /// Decode a create, read or update response.
    pub fn parse_foo(&self, response: &HttpResponse) -> Result<RespBody<FooAttrs>, ErrorKind> {
        decode_response(response)
    }

    /// Decode a delete response.
    pub fn parse_deleted(&self, response: &HttpResponse) -> Result<RespBody<serde_json::Value>, ErrorKind> {
        decode_response(response)
    }

    fn foo_path(&self, id: &str) -> String {
        if id.is_empty() {
            format!("{}{FOOS_PATH}", self.config.base_url())
        } else {
            format!("{}{FOOS_PATH}/{id}", self.config.base_url())
        }
    }
}

fn require_id(id: &str) -> Result<(), ErrorKind> {
    if id.is_empty() {
        return Err(ErrorKind::IdRequired);
    }
    Ok(())
}

fn foo_data<A>(id: &str, attrs: A) -> Data<A> {
    Data::new(RESOURCE_TYPE_FOO, id, attrs)
}
