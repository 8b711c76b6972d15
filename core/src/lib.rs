//! Typed client SDK for the JSON:API foo service.
//!
//! # Overview
//! `FooClient` exposes create/read/update/delete for `/v1/foos`. Requests and
//! responses pass through a generic JSON:API envelope (`RespBody<A>`), where
//! `A` is the attribute shape of a single resource or a `Vec` of them.
//!
//! # Design
//! - Request building and response decoding are pure (`codec`); the only
//!   network I/O happens behind the `Transport` trait.
//! - Responses are read up to 1 MiB, must declare `application/json`, and
//!   are decoded without interpreting the HTTP status. Server-reported
//!   errors stay in `RespBody::errs`.
//! - Every call takes a `CallContext` for cancellation and timeouts. There
//!   are no retries.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod codec;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::FooClient;
pub use codec::MAX_RESPONSE_BYTES;
pub use config::{ClientConfig, SdkInfo};
pub use context::CallContext;
pub use envelope::{Data, ReqBody, RespBody, RespErr, RespErrSource, RespMeta};
pub use error::{ClientError, ErrorKind, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{FooAttrs, FooCreateAttrs, FooUpdateAttrs, RESOURCE_TYPE_FOO};
