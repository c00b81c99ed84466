//! Markdown context reference rendering
//!
//! Produces the `<available_record_types>` document consumed by expression
//! authoring tools. Output is a pure function of the record type and title.

use crate::model::RecordType;
use crate::normalize::slug;
use crate::reference::ReferenceBuilder;

const INTRO: &str =
    "This document provides the specific record type definitions for use when creating SAIL expressions.";
const NOT_PROVIDED: &str = "Not provided.";
const NOT_AVAILABLE: &str = "Not available";
const RELATIONSHIP_NOTE: &str = "**Note**: Access any field from related records using: `[relationshipReference].fields.{fieldUuid}fieldName`";

const FIELDS_HEADER: &str = "| **Field Name** | **Data Type** | **Field Reference** |";
const FIELDS_SEPARATOR: &str = "|----------------|---------------|---------------------|";
const RELATIONSHIPS_HEADER: &str =
    "| **Relationship Name** | **Type** | **Relationship Reference** |";
const RELATIONSHIPS_SEPARATOR: &str =
    "|----------------------|----------|---------------------------|";
const ACTIONS_HEADER: &str = "| **Action Name** | **Action Reference** |";
const ACTIONS_SEPARATOR: &str = "|----------------|---------------------|";

/// Render the markdown context reference for one record type
pub fn render_markdown(record_type: &RecordType, title: &str) -> String {
    let tag = slug(&record_type.name);
    let refs = ReferenceBuilder::for_record_type(record_type);
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", title));
    output.push_str(INTRO);
    output.push_str("\n\n");
    output.push_str("<available_record_types>\n");
    output.push_str("## Available Record Types\n\n");

    output.push_str(&format!("<{}>\n", tag));
    output.push_str(&format!("### {}\n", record_type.name));
    output.push_str(&format!("**Record Type**: `{}`\n\n", refs.record_type()));

    let description = if record_type.description.is_empty() {
        NOT_PROVIDED
    } else {
        record_type.description.as_str()
    };
    output.push_str(&format!("**Description**: {}\n\n", description));

    output.push_str("**Fields**:\n\n");
    output.push_str(&table(
        FIELDS_HEADER,
        FIELDS_SEPARATOR,
        record_type.fields.iter().map(|field| {
            format!(
                "| {} | {} | `{}` |",
                field.name,
                field.data_type,
                refs.field(&field.uuid, &field.name)
            )
        }),
    ));
    output.push('\n');

    output.push_str("**Relationships**:\n\n");
    if record_type.relationships.is_empty() {
        output.push_str(NOT_AVAILABLE);
        output.push_str("\n\n");
    } else {
        output.push_str(&table(
            RELATIONSHIPS_HEADER,
            RELATIONSHIPS_SEPARATOR,
            record_type.relationships.iter().map(|relationship| {
                format!(
                    "| {} | {} | `{}` |",
                    relationship.name,
                    relationship.kind,
                    refs.relationship(&relationship.uuid, &relationship.name)
                )
            }),
        ));
        output.push('\n');
        output.push_str(RELATIONSHIP_NOTE);
        output.push_str("\n\n");
    }

    // User filters are not part of the export model
    output.push_str("**User Filters**:\n\n");
    output.push_str(NOT_AVAILABLE);
    output.push_str("\n\n");

    // Two blank lines under this heading only
    output.push_str("**Record Actions**:\n\n\n");
    if record_type.actions.is_empty() {
        output.push_str(NOT_AVAILABLE);
        output.push('\n');
    } else {
        output.push_str(&table(
            ACTIONS_HEADER,
            ACTIONS_SEPARATOR,
            record_type.actions.iter().map(|action| {
                format!(
                    "| {} | `{}` |",
                    action.name,
                    refs.action(&action.uuid, &action.reference_key)
                )
            }),
        ));
    }
    output.push('\n');

    output.push_str(&format!("</{}>\n\n", tag));
    output.push_str("</available_record_types>\n");

    output
}

/// Pipe table with a header, separator, and one line per row
fn table(header: &str, separator: &str, rows: impl Iterator<Item = String>) -> String {
    let mut output = String::new();
    output.push_str(header);
    output.push('\n');
    output.push_str(separator);
    output.push('\n');
    for row in rows {
        output.push_str(&row);
        output.push('\n');
    }
    output
}
