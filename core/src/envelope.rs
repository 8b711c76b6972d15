//! JSON:API document types shared by every resource kind.
//!
//! # Design
//! The attribute payload is a type parameter. A single resource uses the
//! attribute struct directly and a collection uses `Vec` of it, so one set
//! of envelope types and one decode path serve both shapes.
//!
//! Decoding is permissive: a document carrying both `data` and a non-empty
//! `errors` list is accepted as sent, and missing or `null` scalar fields
//! decode to their zero value. Callers decide what that means.

use serde::{Deserialize, Serialize};

/// Top-level response document.
///
/// <https://jsonapi.org/format/#document-top-level>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespBody<A> {
    #[serde(default)]
    pub meta: RespMeta,
    #[serde(
        rename = "errors",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errs: Vec<RespErr>,
    // `default` would add an `A: Default` bound; a missing `Option` is `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Data<A>>,
}

impl<A> RespBody<A> {
    /// True when the server reported at least one application error.
    pub fn has_errors(&self) -> bool {
        !self.errs.is_empty()
    }
}

/// A resource object: type discriminator, id and attributes.
///
/// Relationships and links are not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data<A> {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "attributes")]
    pub attrs: A,
}

impl<A> Data<A> {
    pub fn new(kind: impl Into<String>, id: impl Into<String>, attrs: A) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attrs,
        }
    }
}

/// Server-side metadata attached to every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespMeta {
    #[serde(rename = "took_ms")]
    pub took_milli: u64,
    pub trace_id: String,
}

/// A JSON:API error object, reduced to status, code, message and source.
///
/// <https://jsonapi.org/format/#error-objects>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespErr {
    #[serde(with = "quoted_status")]
    pub status: u16,
    #[serde(default)]
    pub code: i64,
    #[serde(rename = "message", default)]
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RespErrSource>,
}

impl RespErr {
    pub fn new(status: u16, code: i64, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: RespErrSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// Locates the part of the request that caused an error.
///
/// The constructors populate exactly one field. Decoded values are taken as
/// the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespErrSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl RespErrSource {
    /// A JSON pointer into the request document, e.g. `/data/attributes/name`.
    pub fn pointer(pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..Self::default()
        }
    }

    pub fn parameter(parameter: impl Into<String>) -> Self {
        Self {
            parameter: Some(parameter.into()),
            ..Self::default()
        }
    }

    pub fn header(header: impl Into<String>) -> Self {
        Self {
            header: Some(header.into()),
            ..Self::default()
        }
    }
}

/// Request document wrapping a single resource object.
///
/// <https://jsonapi.org/format/#crud-creating>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReqBody<A> {
    pub data: Data<A>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `status` travels as a numeric string (`"404"`), never a bare number.
mod quoted_status {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    pub fn serialize<S: Serializer>(status: &u16, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(status)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a quoted HTTP status code"))
    }
}
