// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Swagger document assembly
//!
//! The static part of the document (info block, path operations, fixed
//! definitions) lives in `templates/testrail.yaml`. Assembly fills in the
//! service coordinates and the two custom field property blocks:
//!
//! - `CustomCaseFields`, referenced by `Case` and `Test`
//! - `CustomResultFields`, referenced by `Testresult`
//!
//! The output depends only on its inputs; no timestamps are written into the
//! document body.

use askama::Template;

use crate::config::ServiceCoordinates;
use crate::render::{PropertyBlock, yaml_scalar};

#[derive(Template)]
#[template(path = "testrail.yaml", escape = "none")]
struct SwaggerTemplate<'a> {
    host: &'a str,
    scheme: &'a str,
    base_path: &'a str,
    custom_case_fields: &'a str,
    custom_result_fields: &'a str,
}

/// A fully assembled Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Render the document for `coordinates` with the given custom field
    /// blocks. The text always ends with a single newline.
    pub fn assemble(
        coordinates: &ServiceCoordinates,
        case_fields: &PropertyBlock,
        result_fields: &PropertyBlock,
    ) -> Result<Self, askama::Error> {
        let host = yaml_scalar(&coordinates.host);
        let base_path = yaml_scalar(&coordinates.base_path);
        let custom_case_fields = case_fields.render();
        let custom_result_fields = result_fields.render();

        let template = SwaggerTemplate {
            host: &host,
            scheme: &coordinates.scheme,
            base_path: &base_path,
            custom_case_fields: &custom_case_fields,
            custom_result_fields: &custom_result_fields,
        };

        let mut text = template.render()?;
        let trimmed = text.trim_end_matches('\n').len();
        text.truncate(trimmed);
        text.push('\n');

        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
