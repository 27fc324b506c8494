// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Test helpers for generate-testrail-swagger integration tests

// Allow unused code - not every test file uses every helper
// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Base64 of `qa@example.com:s3cret`
pub const BASIC_AUTH: &str = "Basic cWFAZXhhbXBsZS5jb206czNjcmV0";

/// Get a Command for the generator binary with a clean environment
pub fn generator_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("generate-testrail-swagger").expect("Failed to find binary");
    cmd.env_remove("TESTRAIL_API_USER")
        .env_remove("TESTRAIL_API_KEY")
        .env_remove("TESTRAIL_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

/// API root of a mock server, in TestRail's query-routed form
pub fn api_root(server: &MockServer) -> String {
    format!("{}/index.php?/api/v2", server.uri())
}

/// Matches TestRail's query-routed API calls (`index.php?/api/v2/<method>`)
pub struct ApiMethod(&'static str);

impl Match for ApiMethod {
    fn matches(&self, request: &Request) -> bool {
        request.url.query() == Some(&format!("/api/v2/{}", self.0)[..])
    }
}

pub fn api_method(name: &'static str) -> ApiMethod {
    ApiMethod(name)
}

/// Mount both metadata endpoints, each expected exactly once
pub async fn mount_fields(
    server: &MockServer,
    case_fields: serde_json::Value,
    result_fields: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(api_method("get_case_fields"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(case_fields))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(api_method("get_result_fields"))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_fields))
        .expect(1)
        .mount(server)
        .await;
}

pub fn sample_case_fields() -> serde_json::Value {
    json!([
        {
            "id": 2,
            "system_name": "custom_steps_separated",
            "label": "Steps",
            "description": null,
            "type_id": 10
        },
        {
            "id": 1,
            "system_name": "custom_preconds",
            "label": "Preconditions",
            "description": "The preconditions of this test case.",
            "type_id": 3
        }
    ])
}

pub fn sample_result_fields() -> serde_json::Value {
    json!([
        {
            "id": 6,
            "system_name": "custom_step_results",
            "description": "",
            "type_id": 11
        }
    ])
}
