//! Reference strings for record types and their children
//!
//! Downstream expression tooling resolves references of the form
//! `'recordType!{UUID}Name.category.{CHILD_UUID}ChildName'`. Names and
//! identifiers are inserted verbatim.

use std::fmt;

use crate::model::RecordType;

/// Child category inside a record type reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Fields,
    Relationships,
    Actions,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fields => "fields",
            Category::Relationships => "relationships",
            Category::Actions => "actions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds references rooted at one record type
#[derive(Debug, Clone, Copy)]
pub struct ReferenceBuilder<'a> {
    uuid: &'a str,
    name: &'a str,
}

impl<'a> ReferenceBuilder<'a> {
    pub fn new(uuid: &'a str, name: &'a str) -> Self {
        Self { uuid, name }
    }

    pub fn for_record_type(record_type: &'a RecordType) -> Self {
        Self::new(&record_type.uuid, &record_type.name)
    }

    /// `'recordType!{UUID}Name'`
    pub fn record_type(&self) -> String {
        format!("'recordType!{{{}}}{}'", self.uuid, self.name)
    }

    /// `'recordType!{UUID}Name.category.{CHILD_UUID}ChildName'`
    pub fn child(&self, category: Category, child_uuid: &str, child_name: &str) -> String {
        format!(
            "'recordType!{{{}}}{}.{}.{{{}}}{}'",
            self.uuid, self.name, category, child_uuid, child_name
        )
    }

    pub fn field(&self, uuid: &str, name: &str) -> String {
        self.child(Category::Fields, uuid, name)
    }

    pub fn relationship(&self, uuid: &str, name: &str) -> String {
        self.child(Category::Relationships, uuid, name)
    }

    /// Actions are addressed by reference key, not display name
    pub fn action(&self, uuid: &str, reference_key: &str) -> String {
        self.child(Category::Actions, uuid, reference_key)
    }
}
