//! Error types for the foo client.
//!
//! # Design
//! `ErrorKind` is the failure taxonomy and `ClientError` attaches the
//! operation that failed. Application errors reported by the server inside
//! the envelope's `errors` list are not client errors; they come back as a
//! successfully decoded `RespBody`.

use std::fmt;

/// Boxed source error from the transport layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The client operation a `ClientError` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create foo",
            Operation::Read => "read foo",
            Operation::Update => "update foo",
            Operation::Delete => "delete foo",
        };
        f.write_str(name)
    }
}

/// What went wrong, independent of which operation was running.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A required resource id was empty. Raised before any network I/O.
    #[error("id is required")]
    IdRequired,

    /// The request payload could not be encoded as JSON.
    #[error("failed to json encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection, DNS, TLS or other transport failure.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The caller's cancellation token fired before the call finished.
    #[error("request cancelled")]
    Cancelled,

    /// The caller's timeout elapsed before the call finished.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] BoxError),

    /// The response did not declare `Content-Type: application/json`.
    #[error("invalid content type received ({content_type}): {body}")]
    ContentType { content_type: String, body: String },

    /// The response body is not a valid envelope.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Error returned by every `FooClient` operation.
#[derive(Debug, thiserror::Error)]
#[error("{op}: {kind}")]
pub struct ClientError {
    op: Operation,
    kind: ErrorKind,
}

impl ClientError {
    pub fn new(op: Operation, kind: ErrorKind) -> Self {
        Self { op, kind }
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    pub fn is_id_required(&self) -> bool {
        matches!(self.kind, ErrorKind::IdRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation_and_cause() {
        let err = ClientError::new(Operation::Read, ErrorKind::IdRequired);
        assert_eq!(err.to_string(), "read foo: id is required");
        assert!(err.is_id_required());
    }

    #[test]
    fn content_type_error_carries_body() {
        let err = ClientError::new(
            Operation::Create,
            ErrorKind::ContentType {
                content_type: "text/plain".to_string(),
                body: "oops".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "create foo: invalid content type received (text/plain): oops"
        );
    }
}
