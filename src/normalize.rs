//! Text normalization for record type exports
//!
//! Maps raw schema type tokens and relationship kinds onto the display labels
//! used in the markdown reference, and derives tag-safe slugs from names.

use regex::Regex;
use std::sync::OnceLock;

/// Tag used when a name has no ASCII alphanumeric characters
pub const FALLBACK_SLUG: &str = "record_type";

/// Cached regex matching runs of non-alphanumeric characters
static NON_ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_non_alnum_regex() -> &'static Regex {
    NON_ALNUM_REGEX
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("Failed to compile slug regex"))
}

/// Normalize a raw field type token into its display name.
///
/// A qualified token such as `{http://www.appian.com/ae/types/2009}Int` loses
/// its brace-delimited namespace before lookup. Unknown types pass through.
pub fn normalize_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let local = match trimmed.strip_prefix('{') {
        Some(rest) => match rest.split_once('}') {
            Some((_, suffix)) => suffix,
            None => trimmed,
        },
        None => trimmed,
    };

    match local {
        "Int" | "Integer" | "Long" => "Integer",
        "Text" | "Guid" => "Text",
        "Boolean" => "Boolean",
        "Date" => "Date",
        "Datetime" => "Datetime",
        "User" => "User",
        "CollaborationDocument" => "CollaborationDocument",
        "Document" => "Document",
        other => other,
    }
    .to_string()
}

/// Normalize a relationship kind such as `ONE_TO_MANY` into `one-to-many`.
pub fn normalize_relationship_kind(raw: &str) -> String {
    match raw {
        "ONE_TO_MANY" => "one-to-many".to_string(),
        "MANY_TO_ONE" => "many-to-one".to_string(),
        "ONE_TO_ONE" => "one-to-one".to_string(),
        "MANY_TO_MANY" => "many-to-many".to_string(),
        other => other.to_lowercase().replace('_', "-"),
    }
}

/// Derive a lowercase tag from a display name.
///
/// Every run of characters outside `[A-Za-z0-9]` collapses to a single `_`,
/// leading and trailing separators are dropped. Names with nothing left
/// yield [`FALLBACK_SLUG`].
pub fn slug(name: &str) -> String {
    let replaced = get_non_alnum_regex().replace_all(name, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}
