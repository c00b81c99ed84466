//! Canonical record type model
//!
//! One [`RecordType`] is built per export document and handed to the renderer.

use serde::{Deserialize, Serialize};

/// A record type extracted from one export document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordType {
    /// Unique identifier of the record type (may be empty)
    pub uuid: String,
    /// Display name of the record type (may be empty)
    pub name: String,
    /// Free-text description, empty when the export has none
    pub description: String,
    /// Fields in document order
    pub fields: Vec<Field>,
    /// Relationships in document order
    pub relationships: Vec<Relationship>,
    /// Record list actions followed by related actions
    pub actions: Vec<Action>,
}

impl RecordType {
    /// Create a record type with identity only
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// A typed attribute of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub uuid: String,
    /// Normalized display type, e.g. `Integer`
    pub data_type: String,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            data_type: data_type.into(),
        }
    }
}

/// A link from the record type to another record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub uuid: String,
    /// Normalized kind, e.g. `one-to-many`
    pub kind: String,
}

impl Relationship {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            kind: kind.into(),
        }
    }
}

/// A named operation on the record type, referenced by its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Display title, or the reference key when the export has no title
    pub name: String,
    pub uuid: String,
    pub reference_key: String,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        reference_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            reference_key: reference_key.into(),
        }
    }
}
