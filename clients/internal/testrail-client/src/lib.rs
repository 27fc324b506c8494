// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! TestRail custom field metadata client
//!
//! A thin reqwest wrapper that performs one authenticated GET per metadata
//! collection and decodes the response into [`FieldDefinition`]s. There is
//! no retry and no pagination; any failure is returned to the caller, which
//! aborts the run.
//!
//! TestRail routes API calls through the query string
//! (`https://example.testrail.net/index.php?/api/v2/get_case_fields`), so the
//! endpoint URL is the operator's base URL with the method name appended,
//! not a URL join.

use async_trait::async_trait;
use std::time::Duration;
use testrail_api::{FieldCollection, FieldDefinition};
use thiserror::Error;
use tracing::{debug, info};

pub use reqwest::StatusCode;

/// Longest response body excerpt carried in a [`ClientError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

const USER_AGENT: &str = concat!("testrail-swagger/", env!("CARGO_PKG_VERSION"));

/// Errors returned while fetching field metadata
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL supplied by the operator does not parse
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The credentials cannot be carried in an HTTP header
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, TLS or timeout failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The response body is not a JSON array of valid field definitions
    #[error("failed to decode {collection} response: {source}")]
    Decode {
        collection: FieldCollection,
        source: serde_json::Error,
    },
}

/// Source of custom field metadata.
///
/// The generator only depends on this trait so tests can supply fields
/// without a TestRail instance.
#[async_trait]
pub trait FieldSource: Send + Sync {
    async fn fetch_fields(
        &self,
        collection: FieldCollection,
    ) -> Result<Vec<FieldDefinition>, ClientError>;
}

/// TestRail API client authenticated with HTTP basic auth.
#[derive(Clone, Debug)]
pub struct TestRailClient {
    base_url: String,
    http: reqwest::Client,
}

impl TestRailClient {
    /// Create a new client for the API root `base_url`
    /// (e.g. `https://example.testrail.net/index.php?/api/v2`).
    ///
    /// Empty credentials are accepted; TestRail rejects them with a 401.
    pub fn new(
        base_url: &str,
        username: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;
        use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

        url::Url::parse(base_url).map_err(|source| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        // reqwest is built without a default rustls provider. A second
        // install attempt returns Err, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut headers = HeaderMap::new();
        let encoded = STANDARD.encode(format!("{}:{}", username, api_key).as_bytes());
        let mut auth_value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|e| ClientError::Credentials(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full URL of the endpoint serving `collection`.
    pub fn endpoint(&self, collection: FieldCollection) -> String {
        format!("{}/{}", self.base_url, collection.method())
    }
}

#[async_trait]
impl FieldSource for TestRailClient {
    async fn fetch_fields(
        &self,
        collection: FieldCollection,
    ) -> Result<Vec<FieldDefinition>, ClientError> {
        let url = self.endpoint(collection);
        debug!(%url, "fetching custom field metadata");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let fields: Vec<FieldDefinition> = serde_json::from_str(&body)
            .map_err(|source| ClientError::Decode { collection, source })?;

        info!(
            collection = collection.method(),
            count = fields.len(),
            "fetched custom field metadata"
        );
        Ok(fields)
    }
}
