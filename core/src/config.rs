//! Client configuration.
//!
//! `SdkInfo::resolve` is the single place the SDK version is read. Call it
//! once at startup and hand the result to `ClientConfig::new`; the config
//! never changes after the client is built.

use std::env;

/// Environment variable holding the service base address.
pub const ADDR_ENV: &str = "FOO_CLIENT_ADDR";
/// Environment variable overriding the `Origin` header.
pub const ORIGIN_ENV: &str = "FOO_CLIENT_ORIGIN";

const DEFAULT_ADDR: &str = "http://localhost:3000";

/// Identity of this SDK as reported in the `User-Agent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInfo {
    pub name: String,
    pub repository: String,
    pub version: String,
}

impl SdkInfo {
    /// Resolve the SDK identity from build metadata. Missing values become
    /// empty strings.
    pub fn resolve() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            repository: option_env!("CARGO_PKG_REPOSITORY").unwrap_or_default().to_string(),
            version: option_env!("CARGO_PKG_VERSION").unwrap_or_default().to_string(),
        }
    }

    /// `<name> (<repository>) / <version>`
    pub fn user_agent(&self) -> String {
        format!("{} ({}) / {}", self.name, self.repository, self.version)
    }
}

/// Immutable settings shared by every call a `FooClient` makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    origin: String,
    user_agent: String,
}

impl ClientConfig {
    /// Build a config for `base_url` identifying as `sdk`. `Origin` defaults
    /// to the base URL.
    pub fn new(base_url: &str, sdk: &SdkInfo) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            origin: base_url.clone(),
            base_url,
            user_agent: sdk.user_agent(),
        }
    }

    /// Read `FOO_CLIENT_ADDR` and `FOO_CLIENT_ORIGIN`, falling back to
    /// `http://localhost:3000` and the base URL respectively. An empty
    /// origin counts as unset.
    pub fn from_env(sdk: &SdkInfo) -> Self {
        let addr = env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let config = Self::new(&addr, sdk);
        match env::var(ORIGIN_ENV) {
            Ok(origin) if !origin.is_empty() => config.with_origin(origin),
            _ => config,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
