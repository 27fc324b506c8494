// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Custom field property blocks
//!
//! A [`PropertyBlock`] is the ordered list of schema properties derived from
//! one metadata collection. It stays plain data until [`PropertyBlock::render`]
//! turns it into the `properties:` member of the enclosing definition.
//!
//! Properties are ordered by `system_name` (byte-wise, case-sensitive) so the
//! output does not depend on the order TestRail returns fields in.

use std::borrow::Cow;
use std::fmt::{self, Write};

use testrail_api::FieldDefinition;
use tracing::warn;

use crate::schema::PropertySchema;

/// Indentation of the `properties:` key inside a definition.
const PROPERTIES_INDENT: &str = "    ";
/// Indentation of a property name.
const NAME_INDENT: &str = "      ";
/// Indentation of a property's members.
const MEMBER_INDENT: &str = "        ";

/// One rendered custom field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    pub name: String,
    /// Present only for a non-empty description
    pub description: Option<String>,
    pub schema: PropertySchema,
}

impl From<&FieldDefinition> for SchemaProperty {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            name: field.system_name.clone(),
            description: field.description().map(str::to_string),
            schema: PropertySchema::for_type(field.type_id),
        }
    }
}

impl SchemaProperty {
    fn write_to(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "{}{}:", NAME_INDENT, yaml_scalar(&self.name))?;
        if let Some(description) = &self.description {
            writeln!(out, "{}description: {}", MEMBER_INDENT, yaml_scalar(description))?;
        }
        for line in self.schema.lines() {
            writeln!(out, "{}{}", MEMBER_INDENT, line)?;
        }
        Ok(())
    }
}

/// Sorted custom field properties of one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBlock {
    properties: Vec<SchemaProperty>,
}

impl PropertyBlock {
    /// Build the block for `fields`, sorted by `system_name`.
    ///
    /// Every field produces exactly one property, duplicates included.
    /// Duplicates are ordered by schema, then description, so the result
    /// never depends on input order.
    pub fn from_fields(fields: &[FieldDefinition]) -> Self {
        let mut properties: Vec<SchemaProperty> = fields.iter().map(SchemaProperty::from).collect();
        properties.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.schema.cmp(&b.schema))
                .then(a.description.cmp(&b.description))
        });

        for pair in properties.windows(2) {
            if pair[0].name == pair[1].name {
                warn!(
                    system_name = %pair[0].name,
                    "duplicate custom field; the document will repeat the property key"
                );
            }
        }

        Self { properties }
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render the `properties:` member, without a trailing newline.
    ///
    /// An empty block renders as `properties: {}` so the definition stays an
    /// object schema.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PropertyBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return write!(f, "{}properties: {{}}", PROPERTIES_INDENT);
        }

        let mut out = format!("{}properties:\n", PROPERTIES_INDENT);
        for property in &self.properties {
            property.write_to(&mut out)?;
        }
        f.write_str(out.trim_end_matches('\n'))
    }
}

/// Render `s` as a YAML scalar: plain when that reads back as the same
/// string, double-quoted otherwise.
pub(crate) fn yaml_scalar(s: &str) -> Cow<'_, str> {
    if is_plain_safe(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(double_quoted(s))
    }
}

fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };

    if first.is_whitespace() || s.ends_with(char::is_whitespace) {
        return false;
    }
    // Indicators, and anything a resolver could read as a number.
    if "-?:,[]{}#&*!|>'\"%@`+.".contains(first) || first.is_ascii_digit() {
        return false;
    }
    if s.ends_with(':') || s.contains(": ") || s.contains(" #") {
        return false;
    }
    // Line breaks and tabs are legal in a stream but not as plain content.
    if s.chars().any(|c| {
        !is_printable(c)
            || matches!(c, '\t' | '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}')
    }) {
        return false;
    }

    const RESERVED: [&str; 11] = [
        "~", "null", "true", "false", "yes", "no", "on", "off", "y", "n", "nan",
    ];
    let lower = s.to_ascii_lowercase();
    !RESERVED.contains(&lower.as_str()) && !matches!(lower.as_str(), "inf" | "infinity")
}

/// YAML 1.2 `c-printable`: the only characters a stream may carry raw.
fn is_printable(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{7e}'
            | '\u{85}'
            | '\u{a0}'..='\u{d7ff}'
            | '\u{e000}'..='\u{fffd}'
            | '\u{10000}'..='\u{10ffff}'
    )
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if !is_printable(c) || matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}') => {
                // write! to a String cannot fail
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testrail_api::TypeCode;

    #[test]
    fn test_empty_block_renders_empty_object() {
        let block = PropertyBlock::from_fields(&[]);
        assert!(block.is_empty());
        assert_eq!(block.render(), "    properties: {}");
    }

    #[test]
    fn test_single_dropdown_field_without_description() {
        let fields = vec![FieldDefinition::new("priority", TypeCode::Dropdown).with_description("")];
        let block = PropertyBlock::from_fields(&fields);

        assert_eq!(
            block.render(),
            "    properties:\n      priority:\n        type: integer\n        format: int32"
        );
    }

    #[test]
    fn test_step_field_references_step_definition() {
        let fields = vec![
            FieldDefinition::new("custom_steps_separated", TypeCode::Step)
                .with_description("Steps"),
        ];
        let block = PropertyBlock::from_fields(&fields);

        assert_eq!(
            block.render(),
            concat!(
                "    properties:\n",
                "      custom_steps_separated:\n",
                "        description: Steps\n",
                "        type: array\n",
                "        items:\n",
                "          $ref: '#/definitions/Step'",
            )
        );
    }

    #[test]
    fn test_fields_sorted_by_system_name() {
        let fields = vec![
            FieldDefinition::new("custom_zeta", TypeCode::String),
            FieldDefinition::new("Custom_upper", TypeCode::String),
            FieldDefinition::new("custom_alpha", TypeCode::Checkbox),
            FieldDefinition::new("custom_Beta", TypeCode::User),
        ];
        let block = PropertyBlock::from_fields(&fields);
        let names: Vec<&str> = block.properties().iter().map(|p| p.name.as_str()).collect();

        // Case-sensitive: uppercase sorts before lowercase.
        assert_eq!(
            names,
            vec!["Custom_upper", "custom_Beta", "custom_alpha", "custom_zeta"]
        );
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let mut fields = vec![
            FieldDefinition::new("custom_b", TypeCode::Integer).with_description("B"),
            FieldDefinition::new("custom_a", TypeCode::Url),
            FieldDefinition::new("custom_c", TypeCode::MultiSelect),
        ];
        let forward = PropertyBlock::from_fields(&fields).render();
        fields.reverse();
        let reversed = PropertyBlock::from_fields(&fields).render();
        fields.swap(0, 1);
        let shuffled = PropertyBlock::from_fields(&fields).render();

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_description_line_only_when_non_empty() {
        let fields = vec![
            FieldDefinition::new("custom_a", TypeCode::String).with_description("Has one"),
            FieldDefinition::new("custom_b", TypeCode::String).with_description(""),
            FieldDefinition::new("custom_c", TypeCode::String),
        ];
        let rendered = PropertyBlock::from_fields(&fields).render();

        assert_eq!(rendered.matches("description:").count(), 1);
        assert!(rendered.contains("        description: Has one\n"));
    }

    #[test]
    fn test_duplicate_names_rendered_once_each() {
        let fields = vec![
            FieldDefinition::new("custom_dup", TypeCode::String),
            FieldDefinition::new("custom_dup", TypeCode::Checkbox),
        ];
        let block = PropertyBlock::from_fields(&fields);
        assert_eq!(block.len(), 2);
        assert_eq!(block.render().matches("custom_dup:").count(), 2);

        let swapped = vec![
            FieldDefinition::new("custom_dup", TypeCode::Checkbox),
            FieldDefinition::new("custom_dup", TypeCode::String),
        ];
        assert_eq!(PropertyBlock::from_fields(&swapped).render(), block.render());

        let described = vec![
            FieldDefinition::new("custom_dup", TypeCode::String).with_description("second"),
            FieldDefinition::new("custom_dup", TypeCode::String).with_description("first"),
        ];
        let mut reversed = described.clone();
        reversed.reverse();
        assert_eq!(
            PropertyBlock::from_fields(&described).render(),
            PropertyBlock::from_fields(&reversed).render()
        );
    }

    #[test]
    fn test_plain_scalars_stay_plain() {
        for s in [
            "The preconditions of this test case.",
            "Expected result (e.g. \"passed\")",
            "custom_steps_separated",
            "Time estimate, in minutes",
        ] {
            assert_eq!(yaml_scalar(s), s);
        }
    }

    #[test]
    fn test_unsafe_scalars_are_quoted() {
        assert_eq!(yaml_scalar("Note: optional"), "\"Note: optional\"");
        assert_eq!(yaml_scalar("# of retries"), "\"# of retries\"");
        assert_eq!(yaml_scalar("see above #1"), "\"see above #1\"");
        assert_eq!(yaml_scalar("yes"), "\"yes\"");
        assert_eq!(yaml_scalar("42"), "\"42\"");
        assert_eq!(yaml_scalar("- bullet"), "\"- bullet\"");
        assert_eq!(yaml_scalar(" padded"), "\" padded\"");
        assert_eq!(yaml_scalar("line one\nline \"two\""), "\"line one\\nline \\\"two\\\"\"");
        assert_eq!(yaml_scalar("bell\u{7}"), "\"bell\\u0007\"");
        assert_eq!(yaml_scalar("a\u{fffe}b"), "\"a\\ufffeb\"");
        assert_eq!(yaml_scalar("next\u{85}line"), "\"next\\u0085line\"");
        assert_eq!(yaml_scalar(""), "\"\"");
    }

    #[test]
    fn test_quoted_scalars_read_back_verbatim() {
        for s in [
            "Note: optional",
            "# of retries",
            "tab\tand\r\nbreaks",
            "back\\slash",
            "'single' \"double\"",
            "true",
            "~",
            "1.5",
            "{braces}",
            "a\u{fffe}b",
            "non\u{ffff}char",
            "del\u{7f}ete",
            "next\u{85}line",
        ] {
            let yaml = format!("value: {}\n", yaml_scalar(s));
            let parsed: std::collections::BTreeMap<String, String> =
                serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(parsed["value"], s, "round trip of {:?} via {}", s, yaml);
        }
    }
}
