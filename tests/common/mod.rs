#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Checked-in export fixtures
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.fixtures_dir.join("exports")
    }

    /// Minimal record type: one field, nothing else
    pub fn invoice(&self) -> PathBuf {
        self.exports_dir().join("Invoice.xml")
    }

    /// Record type with description, nested fields, relationships, and actions
    pub fn purchase_order(&self) -> PathBuf {
        self.exports_dir().join("PurchaseOrder.xml")
    }

    /// Document cut off mid-element
    pub fn truncated(&self) -> PathBuf {
        self.exports_dir().join("Truncated.xml")
    }

    /// Well-formed export of a different object kind
    pub fn process_model(&self) -> PathBuf {
        self.exports_dir().join("ProcessModel.xml")
    }

    /// Copy every fixture export into a fresh temporary directory
    pub fn copy_exports(&self) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for entry in std::fs::read_dir(self.exports_dir()).unwrap() {
            let path = entry.unwrap().path();
            std::fs::copy(&path, temp_dir.path().join(path.file_name().unwrap())).unwrap();
        }
        temp_dir
    }
}

/// Copy a single fixture into `dir`, returning the new path
pub fn copy_into(fixture: &Path, dir: &Path) -> PathBuf {
    let target = dir.join(fixture.file_name().unwrap());
    std::fs::copy(fixture, &target).unwrap();
    target
}

/// Exact markdown for the Invoice fixture with the default title
pub const INVOICE_MARKDOWN: &str = "\
# Invoice Record Type Context Reference

This document provides the specific record type definitions for use when creating SAIL expressions.

<available_record_types>
## Available Record Types

<invoice>
### Invoice
**Record Type**: `'recordType!{123}Invoice'`

**Description**: Not provided.

**Fields**:

| **Field Name** | **Data Type** | **Field Reference** |
|----------------|---------------|---------------------|
| Total | Integer | `'recordType!{123}Invoice.fields.{f1}Total'` |

**Relationships**:

Not available

**User Filters**:

Not available

**Record Actions**:


Not available

</invoice>

</available_record_types>
";
