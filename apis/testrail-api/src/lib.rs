// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! TestRail custom field metadata types
//!
//! **IMPORTANT**: These types describe a *subset* of the TestRail API v2.
//! Only the two custom field metadata endpoints are modelled, and only the
//! keys the swagger generator consumes are decoded:
//!
//! - `get_case_fields`: custom fields attached to test cases
//! - `get_result_fields`: custom fields attached to test results
//!
//! Decoding is strict. A record without `system_name` or `type_id`, or with
//! a `type_id` outside the documented set, fails the whole collection
//! instead of producing a partial schema later on.
//!
//! Reference: https://support.testrail.com/hc/en-us/articles/7077825066516-Case-Fields

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Type codes
// ============================================================================

/// Declared data kind of a custom field (`type_id` in the API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TypeCode {
    String,
    Integer,
    Text,
    Url,
    Checkbox,
    Dropdown,
    User,
    Date,
    Milestone,
    Step,
    StepResult,
    MultiSelect,
}

/// A `type_id` that does not correspond to any documented field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown custom field type_id {0} (expected 1-12)")]
pub struct UnknownTypeCode(pub u8);

impl TypeCode {
    /// Every documented type code, in `type_id` order.
    pub const ALL: [TypeCode; 12] = [
        TypeCode::String,
        TypeCode::Integer,
        TypeCode::Text,
        TypeCode::Url,
        TypeCode::Checkbox,
        TypeCode::Dropdown,
        TypeCode::User,
        TypeCode::Date,
        TypeCode::Milestone,
        TypeCode::Step,
        TypeCode::StepResult,
        TypeCode::MultiSelect,
    ];

    /// The numeric `type_id` used on the wire.
    pub fn code(self) -> u8 {
        match self {
            TypeCode::String => 1,
            TypeCode::Integer => 2,
            TypeCode::Text => 3,
            TypeCode::Url => 4,
            TypeCode::Checkbox => 5,
            TypeCode::Dropdown => 6,
            TypeCode::User => 7,
            TypeCode::Date => 8,
            TypeCode::Milestone => 9,
            TypeCode::Step => 10,
            TypeCode::StepResult => 11,
            TypeCode::MultiSelect => 12,
        }
    }

    /// Name of the field kind as shown in the TestRail administration UI.
    pub fn label(self) -> &'static str {
        match self {
            TypeCode::String => "String",
            TypeCode::Integer => "Integer",
            TypeCode::Text => "Text",
            TypeCode::Url => "URL",
            TypeCode::Checkbox => "Checkbox",
            TypeCode::Dropdown => "Dropdown",
            TypeCode::User => "User",
            TypeCode::Date => "Date",
            TypeCode::Milestone => "Milestone",
            TypeCode::Step => "Steps",
            TypeCode::StepResult => "Step Results",
            TypeCode::MultiSelect => "Multi-select",
        }
    }
}

impl TryFrom<u8> for TypeCode {
    type Error = UnknownTypeCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TypeCode::ALL
            .into_iter()
            .find(|t| t.code() == value)
            .ok_or(UnknownTypeCode(value))
    }
}

impl From<TypeCode> for u8 {
    fn from(t: TypeCode) -> Self {
        t.code()
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

// ============================================================================
// Field definitions
// ============================================================================

/// One custom field as returned by `get_case_fields` / `get_result_fields`.
///
/// The API returns many more keys (`id`, `label`, `configs`, ...); they are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Stable identifier, e.g. `custom_preconds`. Used as the schema property key.
    pub system_name: String,
    /// Free-form description; TestRail sends `null` when unset.
    #[serde(default)]
    pub description: Option<String>,
    pub type_id: TypeCode,
}

impl FieldDefinition {
    pub fn new(system_name: impl Into<String>, type_id: TypeCode) -> Self {
        Self {
            system_name: system_name.into(),
            description: None,
            type_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The description, if present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

// ============================================================================
// Collections
// ============================================================================

/// The two custom field metadata collections the generator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCollection {
    CaseFields,
    ResultFields,
}

impl FieldCollection {
    /// API method name, appended to the base URL.
    pub fn method(self) -> &'static str {
        match self {
            FieldCollection::CaseFields => "get_case_fields",
            FieldCollection::ResultFields => "get_result_fields",
        }
    }

    /// Name of the schema definition this collection populates.
    pub fn definition_name(self) -> &'static str {
        match self {
            FieldCollection::CaseFields => "CustomCaseFields",
            FieldCollection::ResultFields => "CustomResultFields",
        }
    }
}

impl fmt::Display for FieldCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}
