//! Attribute shapes for the foo resource.
//!
//! # Design
//! These mirror the mock server's schema but are defined independently;
//! integration tests catch drift between the two crates.

use serde::{Deserialize, Serialize};

/// Resource type discriminator for foos.
pub const RESOURCE_TYPE_FOO: &str = "foo";

/// Attributes sent when creating a foo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooCreateAttrs {
    pub name: String,
    pub note: String,
}

/// Attributes of a stored foo as returned by the server. Fields the server
/// leaves out decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooAttrs {
    pub name: String,
    pub note: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update. `None` fields are left off the wire so the server can
/// tell "not provided" apart from "set to empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooUpdateAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FooUpdateAttrs {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
