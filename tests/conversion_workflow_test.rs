mod common;

use common::{INVOICE_MARKDOWN, TestFixtures, copy_into};
use recordtype_md::{
    Action, ConversionConfig, ConversionEngine, ConversionStatus, Field, FileDiscovery, Naming,
    Relationship, convert_file, extract_file, render_markdown,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn engine(naming: Naming, output: Option<PathBuf>) -> ConversionEngine {
    ConversionEngine::new(ConversionConfig {
        max_concurrent_conversions: 4,
        naming,
        output,
        ..ConversionConfig::default()
    })
}

#[test]
fn test_minimal_export_renders_exact_document() {
    let fixtures = TestFixtures::new();
    let temp_dir = TempDir::new().unwrap();
    let input = copy_into(&fixtures.invoice(), temp_dir.path());

    let (_, output) = convert_file(&input, &ConversionConfig::default(), true).unwrap();

    assert_eq!(output, temp_dir.path().join("Invoice.md"));
    assert_eq!(std::fs::read_to_string(output).unwrap(), INVOICE_MARKDOWN);
}

#[test]
fn test_full_export_extraction() {
    let fixtures = TestFixtures::new();
    let record_type = extract_file(&fixtures.purchase_order()).unwrap();

    assert_eq!(record_type.uuid, "po-77");
    assert_eq!(record_type.name, "Purchase Order");
    assert_eq!(record_type.description, "Orders placed with approved suppliers");
    assert_eq!(
        record_type.fields,
        vec![
            Field::new("id", "f-id", "Integer"),
            Field::new("orderedOn", "f-date", "dateTime"),
            Field::new("approved", "f-ok", "boolean"),
        ]
    );
    assert_eq!(
        record_type.relationships,
        vec![
            Relationship::new("lines", "r-lines", "one-to-many"),
            Relationship::new("supplier", "r-supplier", "many-to-one"),
        ]
    );
    assert_eq!(
        record_type.actions,
        vec![
            Action::new("New Order", "a-new", "newOrder"),
            Action::new("viewDetails", "a-view", "viewDetails"),
        ]
    );
}

#[test]
fn test_full_export_markdown_sections() {
    let fixtures = TestFixtures::new();
    let record_type = extract_file(&fixtures.purchase_order()).unwrap();
    let markdown = render_markdown(&record_type, "Orders");

    assert!(markdown.starts_with("# Orders\n"));
    assert!(markdown.contains("<purchase_order>\n### Purchase Order\n"));
    assert!(markdown.contains("**Description**: Orders placed with approved suppliers\n"));
    assert!(markdown.contains(
        "| supplier | many-to-one | `'recordType!{po-77}Purchase Order.relationships.{r-supplier}supplier'` |"
    ));
    assert!(markdown.contains("**Note**: Access any field from related records"));
    assert!(markdown.contains(
        "| New Order | `'recordType!{po-77}Purchase Order.actions.{a-new}newOrder'` |"
    ));
    assert!(markdown.ends_with("</purchase_order>\n\n</available_record_types>\n"));
}

#[tokio::test]
async fn test_directory_batch_uses_entity_names() {
    let fixtures = TestFixtures::new();
    let exports = fixtures.copy_exports();
    let out_dir = TempDir::new().unwrap();
    let docs = out_dir.path().join("docs");

    let results = engine(Naming::Auto, Some(docs.clone()))
        .convert_path(exports.path(), &FileDiscovery::new())
        .await
        .unwrap();

    assert_eq!(results.total_files, 4);
    assert_eq!(results.converted_files, 2);
    assert_eq!(results.failed_files, 2);

    assert_eq!(
        std::fs::read_to_string(docs.join("data-model-context-invoice.md")).unwrap(),
        INVOICE_MARKDOWN
    );
    assert!(docs.join("data-model-context-purchase_order.md").exists());

    let mut written: Vec<_> = std::fs::read_dir(&docs)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            "data-model-context-invoice.md",
            "data-model-context-purchase_order.md"
        ]
    );
}

#[tokio::test]
async fn test_batch_reports_each_failure_in_order() {
    let fixtures = TestFixtures::new();
    let exports = fixtures.copy_exports();

    let results = engine(Naming::Mirror, None)
        .convert_path(exports.path(), &FileDiscovery::new())
        .await
        .unwrap();

    let summary: Vec<_> = results
        .file_results
        .iter()
        .map(|r| {
            (
                r.input.file_name().unwrap().to_string_lossy().to_string(),
                r.status.is_converted(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Invoice.xml".to_string(), true),
            ("ProcessModel.xml".to_string(), false),
            ("PurchaseOrder.xml".to_string(), true),
            ("Truncated.xml".to_string(), false),
        ]
    );

    match &results.file_results[1].status {
        ConversionStatus::Failed { message } => {
            assert!(message.starts_with("No <recordType> element found in"))
        }
        other => panic!("Expected failure, got {:?}", other),
    }
    match &results.file_results[3].status {
        ConversionStatus::Failed { message } => assert!(message.contains("Malformed document")),
        other => panic!("Expected failure, got {:?}", other),
    }

    // Mirror naming writes beside each input
    assert!(exports.path().join("Invoice.md").exists());
    assert!(exports.path().join("PurchaseOrder.md").exists());
    assert!(!exports.path().join("Truncated.md").exists());
}

#[tokio::test]
async fn test_single_file_with_explicit_output_and_title() {
    let fixtures = TestFixtures::new();
    let out_dir = TempDir::new().unwrap();
    let target = out_dir.path().join("nested/reference.md");

    let engine = ConversionEngine::new(ConversionConfig {
        title_template: "{name} Reference".to_string(),
        output: Some(target.clone()),
        ..ConversionConfig::default()
    });
    let results = engine
        .convert_path(&fixtures.invoice(), &FileDiscovery::new())
        .await
        .unwrap();

    assert!(results.all_converted());
    assert_eq!(results.file_results[0].output(), Some(target.as_path()));
    let markdown = std::fs::read_to_string(&target).unwrap();
    assert!(markdown.starts_with("# Invoice Reference\n\n"));
}

#[tokio::test]
async fn test_unwritable_output_is_a_per_file_failure() {
    let fixtures = TestFixtures::new();
    let out_dir = TempDir::new().unwrap();
    // A regular file where the output directory should be
    let blocker = out_dir.path().join("docs");
    std::fs::write(&blocker, "not a directory").unwrap();

    let results = engine(Naming::Entity, Some(blocker))
        .convert_path(&fixtures.invoice(), &FileDiscovery::new())
        .await
        .unwrap();

    assert_eq!(results.failed_files, 1);
    match &results.file_results[0].status {
        ConversionStatus::Failed { message } => assert!(message.contains("Failed to write output")),
        other => panic!("Expected failure, got {:?}", other),
    }
}
