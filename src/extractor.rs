//! Record type extraction from recordTypeHaul XML exports
//!
//! The export wraps a single `<recordType>` element. Identity, description and
//! action metadata live in the Appian types namespace; field and relationship
//! properties are unqualified elements. Children are collected with a
//! recursive descendant search because exports nest them at varying depths.

use roxmltree::{Document, Node};
use std::path::Path;

use crate::error::{ConversionError, Result};
use crate::model::{Action, Field, RecordType, Relationship};
use crate::normalize::{normalize_relationship_kind, normalize_type};

/// Namespace of the Appian type system used by record type exports
pub const APPIAN_NS: &str = "http://www.appian.com/ae/types/2009";

/// An element name qualified by an optional namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementName<'a> {
    pub namespace: Option<&'a str>,
    pub local: &'a str,
}

impl<'a> ElementName<'a> {
    pub const fn plain(local: &'a str) -> Self {
        Self {
            namespace: None,
            local,
        }
    }

    pub const fn appian(local: &'a str) -> Self {
        Self {
            namespace: Some(APPIAN_NS),
            local,
        }
    }

    fn matches(&self, node: &Node<'_, '_>) -> bool {
        node.is_element()
            && node.tag_name().name() == self.local
            && node.tag_name().namespace() == self.namespace
    }
}

const RECORD_TYPE: ElementName<'static> = ElementName::plain("recordType");
const DESCRIPTION: ElementName<'static> = ElementName::appian("description");

const FIELD: ElementName<'static> = ElementName::plain("field");
const FIELD_NAME: ElementName<'static> = ElementName::plain("fieldName");
const FIELD_TYPE: ElementName<'static> = ElementName::plain("type");
const UUID: ElementName<'static> = ElementName::plain("uuid");

const RELATIONSHIP_CFG: ElementName<'static> = ElementName::appian("recordRelationshipCfg");
const RELATIONSHIP_NAME: ElementName<'static> = ElementName::plain("relationshipName");
const RELATIONSHIP_TYPE: ElementName<'static> = ElementName::plain("relationshipType");

const RECORD_LIST_ACTION_CFG: ElementName<'static> = ElementName::appian("recordListActionCfg");
const RELATED_ACTION_CFG: ElementName<'static> = ElementName::appian("relatedActionCfg");
const REFERENCE_KEY: ElementName<'static> = ElementName::appian("referenceKey");
const STATIC_TITLE: ElementName<'static> = ElementName::appian("staticTitle");
const STATIC_TITLE_STRING: ElementName<'static> = ElementName::appian("staticTitleString");

/// All descendant elements of `node` (excluding `node`) with the given name, in document order
pub fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: ElementName<'a>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().skip(1).filter(move |n| name.matches(n))
}

/// First direct child element of `node` with the given name
pub fn child_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: ElementName<'_>,
) -> Option<Node<'a, 'input>> {
    node.children().find(|n| name.matches(n))
}

/// Untrimmed text of the first direct child with the given name, empty when absent
fn raw_child_text<'a>(node: Node<'a, '_>, name: ElementName<'_>) -> &'a str {
    child_named(node, name)
        .and_then(|child| child.text())
        .unwrap_or_default()
}

/// Trimmed text of the first direct child with the given name, empty when absent
fn child_text(node: Node<'_, '_>, name: ElementName<'_>) -> String {
    raw_child_text(node, name).trim().to_string()
}

/// Read and extract the record type from an export file
pub fn extract_file(path: &Path) -> Result<RecordType> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => ConversionError::MalformedDocument {
            file: path.to_path_buf(),
            details: "document is not valid UTF-8".to_string(),
        },
        _ => ConversionError::Io(e),
    })?;
    extract_str(&content, path)
}

/// Extract the record type from export text; `source` labels errors
pub fn extract_str(xml: &str, source: &Path) -> Result<RecordType> {
    let document = Document::parse(xml).map_err(|e| ConversionError::MalformedDocument {
        file: source.to_path_buf(),
        details: e.to_string(),
    })?;

    let record_type = child_named(document.root_element(), RECORD_TYPE).ok_or_else(|| {
        ConversionError::MissingEntityElement {
            file: source.to_path_buf(),
        }
    })?;

    let uuid = record_type
        .attribute((APPIAN_NS, "uuid"))
        .filter(|uuid| !uuid.is_empty())
        .or_else(|| record_type.attribute("uuid"))
        .unwrap_or_default()
        .to_string();
    let name = record_type.attribute("name").unwrap_or_default().to_string();

    Ok(RecordType {
        uuid,
        name,
        description: child_text(record_type, DESCRIPTION),
        fields: extract_fields(record_type),
        relationships: extract_relationships(record_type),
        actions: extract_actions(record_type),
    })
}

fn extract_fields(record_type: Node<'_, '_>) -> Vec<Field> {
    descendants_named(record_type, FIELD)
        .filter_map(|field| {
            let name = child_text(field, FIELD_NAME);
            let uuid = child_text(field, UUID);
            if name.is_empty() || uuid.is_empty() {
                return None;
            }
            let data_type = child_named(field, FIELD_TYPE)
                .and_then(|t| t.text())
                .map(normalize_type)
                .unwrap_or_default();
            Some(Field::new(name, uuid, data_type))
        })
        .collect()
}

fn extract_relationships(record_type: Node<'_, '_>) -> Vec<Relationship> {
    descendants_named(record_type, RELATIONSHIP_CFG)
        .filter_map(|cfg| {
            let uuid = child_text(cfg, UUID);
            let name = child_text(cfg, RELATIONSHIP_NAME);
            if uuid.is_empty() || name.is_empty() {
                return None;
            }
            let kind = normalize_relationship_kind(&child_text(cfg, RELATIONSHIP_TYPE));
            Some(Relationship::new(name, uuid, kind))
        })
        .collect()
}

fn extract_actions(record_type: Node<'_, '_>) -> Vec<Action> {
    // Record list actions first, then related actions; not interleaved
    descendants_named(record_type, RECORD_LIST_ACTION_CFG)
        .chain(descendants_named(record_type, RELATED_ACTION_CFG))
        .filter_map(|cfg| {
            let uuid = cfg.attribute((APPIAN_NS, "uuid")).unwrap_or_default();
            let key = child_text(cfg, REFERENCE_KEY);
            if uuid.is_empty() || key.is_empty() {
                return None;
            }
            // The first title with any text wins, even when it trims to nothing
            let title = [STATIC_TITLE, STATIC_TITLE_STRING]
                .into_iter()
                .map(|name| raw_child_text(cfg, name))
                .find(|title| !title.is_empty())
                .unwrap_or_default()
                .trim();
            let display_name = if title.is_empty() {
                key.clone()
            } else {
                title.to_string()
            };
            Some(Action::new(display_name, uuid, key))
        })
        .collect()
}
