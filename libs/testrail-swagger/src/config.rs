// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Generator configuration
//!
//! Everything the generator reads from its environment is collected into a
//! [`GeneratorConfig`] once, at the process boundary, and passed down by
//! parameter.

use std::fmt;
use std::time::Duration;

use testrail_client::{ClientError, TestRailClient};
use thiserror::Error;
use tracing::warn;

/// Account name used for HTTP basic auth
pub const USER_ENV: &str = "TESTRAIL_API_USER";

/// API key (or password) used for HTTP basic auth
pub const API_KEY_ENV: &str = "TESTRAIL_API_KEY";

/// Default HTTP timeout for each metadata request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors in the operator-supplied configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("base URL {0:?} has no host")]
    MissingHost(String),
}

/// Connection coordinates of the target service, as they appear in the
/// generated document (`host`, `schemes`, `basePath`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCoordinates {
    /// Host name, with the port when one is given explicitly
    pub host: String,
    /// `http` or `https`
    pub scheme: String,
    /// URL path, followed by `?query` when the URL carries one
    pub base_path: String,
}

impl ServiceCoordinates {
    /// Parse the coordinates out of the API root URL.
    ///
    /// TestRail puts the API version in the query string
    /// (`/index.php?/api/v2`), so the query is kept as part of the base path.
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let url = url::Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost(base_url.to_string()))?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let base_path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Ok(Self {
            host,
            scheme: scheme.to_string(),
            base_path,
        })
    }
}

/// HTTP basic auth credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            api_key: api_key.into(),
        }
    }

    /// Load credentials from `TESTRAIL_API_USER` / `TESTRAIL_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through `lookup`.
    ///
    /// Missing values are not an error here: TestRail answers 401 and the
    /// run fails at the first fetch.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = lookup(USER_ENV).unwrap_or_default();
        let api_key = lookup(API_KEY_ENV).unwrap_or_default();

        if user.is_empty() {
            warn!("{} is not set; requests will be unauthenticated", USER_ENV);
        }
        if api_key.is_empty() {
            warn!("{} is not set; requests will be unauthenticated", API_KEY_ENV);
        }

        Self { user, api_key }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Generator configuration
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// API root URL as supplied by the operator
    pub base_url: String,
    /// Coordinates parsed from `base_url`
    pub coordinates: ServiceCoordinates,
    pub credentials: Credentials,
    /// HTTP timeout for each metadata request
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let coordinates = ServiceCoordinates::parse(&base_url)?;
        Ok(Self {
            base_url,
            coordinates,
            credentials,
            timeout,
        })
    }

    /// Build the metadata client for this configuration.
    pub fn client(&self) -> Result<TestRailClient, ClientError> {
        TestRailClient::new(
            &self.base_url,
            &self.credentials.user,
            &self.credentials.api_key,
            self.timeout,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_coordinates_keep_query_routed_path() {
        let c = ServiceCoordinates::parse("https://example.testrail.net/index.php?/api/v2").unwrap();
        assert_eq!(c.host, "example.testrail.net");
        assert_eq!(c.scheme, "https");
        assert_eq!(c.base_path, "/index.php?/api/v2");
    }

    #[test]
    fn test_coordinates_without_query() {
        let c = ServiceCoordinates::parse("http://testrail.internal/api").unwrap();
        assert_eq!(c.scheme, "http");
        assert_eq!(c.base_path, "/api");
    }

    #[test]
    fn test_coordinates_keep_explicit_port() {
        let c = ServiceCoordinates::parse("http://127.0.0.1:8080/index.php?/api/v2").unwrap();
        assert_eq!(c.host, "127.0.0.1:8080");

        // The default port is not explicit once parsed.
        let c = ServiceCoordinates::parse("https://example.testrail.net:443/index.php?/api/v2")
            .unwrap();
        assert_eq!(c.host, "example.testrail.net");
    }

    #[test]
    fn test_coordinates_reject_bad_urls() {
        assert!(matches!(
            ServiceCoordinates::parse("example.testrail.net/index.php"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ServiceCoordinates::parse("ftp://example.testrail.net/api"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env: HashMap<&str, &str> =
            HashMap::from([(USER_ENV, "qa@example.com"), (API_KEY_ENV, "s3cret")]);
        let creds = Credentials::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(creds, Credentials::new("qa@example.com", "s3cret"));
    }

    #[test]
    fn test_missing_credentials_are_tolerated() {
        let creds = Credentials::from_lookup(|_| None);
        assert_eq!(creds, Credentials::default());
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("qa@example.com", "s3cret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("qa@example.com"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_generator_config_parses_coordinates_once() {
        let config = GeneratorConfig::new(
            "https://example.testrail.net/index.php?/api/v2",
            Credentials::default(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
        .unwrap();
        assert_eq!(config.coordinates.host, "example.testrail.net");
        assert!(config.client().is_ok());
    }
}
