// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Custom field type to schema type mapping

use testrail_api::TypeCode;

/// Items reference to the shared definition describing one separated step.
pub const STEP_ITEMS_REF: &str = "  $ref: '#/definitions/Step'";

/// Schema type of a custom field property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertySchema {
    String,
    Boolean,
    Int32,
    /// Array of `#/definitions/Step`
    StepArray,
    Int32Array,
}

impl PropertySchema {
    /// Schema type for a field type code.
    ///
    /// URL and date fields are strings on the wire; dropdown, user and
    /// milestone fields carry an integer ID; step results and multi-selects
    /// carry arrays of IDs.
    pub fn for_type(type_id: TypeCode) -> Self {
        match type_id {
            TypeCode::String | TypeCode::Text | TypeCode::Url | TypeCode::Date => {
                PropertySchema::String
            }
            TypeCode::Checkbox => PropertySchema::Boolean,
            TypeCode::Integer | TypeCode::Dropdown | TypeCode::User | TypeCode::Milestone => {
                PropertySchema::Int32
            }
            TypeCode::Step => PropertySchema::StepArray,
            TypeCode::StepResult | TypeCode::MultiSelect => PropertySchema::Int32Array,
        }
    }

    /// Lines of the type declaration, indented relative to the property's
    /// members.
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            PropertySchema::String => &["type: string"],
            PropertySchema::Boolean => &["type: boolean"],
            PropertySchema::Int32 => &["type: integer", "format: int32"],
            PropertySchema::StepArray => &["type: array", "items:", STEP_ITEMS_REF],
            PropertySchema::Int32Array => &[
                "type: array",
                "items:",
                "  type: integer",
                "  format: int32",
            ],
        }
    }
}

impl From<TypeCode> for PropertySchema {
    fn from(type_id: TypeCode) -> Self {
        PropertySchema::for_type(type_id)
    }
}
