// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! TestRail Swagger Generator
//!
//! Turns a TestRail instance's custom field configuration into a static
//! Swagger 2.0 document describing its REST API. Most of the document is
//! fixed text; the dynamic part is the two custom field definitions:
//!
//! 1. Fetch `get_case_fields` and `get_result_fields` (one after the other)
//! 2. Map each field's `type_id` to a schema type ([`schema`])
//! 3. Sort and render each collection into a property block ([`render`])
//! 4. Splice both blocks into the document template ([`document`])
//! 5. Stamp the result with its date and content digest ([`stamp`])
//!
//! Given the same metadata and base URL the document is byte-for-byte
//! identical, whatever order TestRail returns fields in.
//!
//! # Example
//!
//! ```ignore
//! use testrail_swagger::{Credentials, GeneratorConfig, generate};
//! use testrail_swagger::stamp::{DigestAlgorithm, Stamp};
//!
//! let config = GeneratorConfig::new(
//!     "https://example.testrail.net/index.php?/api/v2",
//!     Credentials::from_env(),
//!     std::time::Duration::from_secs(30),
//! )?;
//! let client = config.client()?;
//! let document = generate(&client, &config.coordinates).await?;
//! let stamp = Stamp::new(&document, DigestAlgorithm::Sha256, chrono::Local::now().date_naive());
//! print!("{}", stamp.apply(&document));
//! ```

pub mod config;
pub mod document;
pub mod render;
pub mod schema;
pub mod stamp;

pub use config::{ConfigError, Credentials, GeneratorConfig, ServiceCoordinates};
pub use document::Document;
pub use render::{PropertyBlock, SchemaProperty};
pub use schema::PropertySchema;

use testrail_api::FieldCollection;
use testrail_client::{ClientError, FieldSource};
use thiserror::Error;
use tracing::info;

/// Errors that abort a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to fetch custom fields: {0}")]
    Fetch(#[from] ClientError),

    #[error("failed to render document: {0}")]
    Render(#[from] askama::Error),
}

/// Fetch both custom field collections from `source` and assemble the
/// document. Nothing is produced unless every step succeeds.
pub async fn generate(
    source: &dyn FieldSource,
    coordinates: &ServiceCoordinates,
) -> Result<Document, GenerateError> {
    let case_block = fetch_block(source, FieldCollection::CaseFields).await?;
    let result_block = fetch_block(source, FieldCollection::ResultFields).await?;

    let document = Document::assemble(coordinates, &case_block, &result_block)?;
    info!(
        case_fields = case_block.len(),
        result_fields = result_block.len(),
        bytes = document.as_bytes().len(),
        "assembled swagger document"
    );
    Ok(document)
}

async fn fetch_block(
    source: &dyn FieldSource,
    collection: FieldCollection,
) -> Result<PropertyBlock, GenerateError> {
    let fields = source.fetch_fields(collection).await?;
    let block = PropertyBlock::from_fields(&fields);
    info!(
        definition = collection.definition_name(),
        properties = block.len(),
        "rendered custom field properties"
    );
    Ok(block)
}
