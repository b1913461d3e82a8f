//! Local Backend Integration Tests
//!
//! Data-file behavior of the JSON backend: empty-hub semantics, CRUD
//! round trips, and survival across backend instances (a new process
//! opening the same home sees the same data).

use shutterdesk::adapters::{ContentStore, DocumentPatch, StoreError, TutorialPatch};
use shutterdesk::{ContentHub, ContentKind, Document, DocumentSource, LocalBackend, Tutorial};
use tempfile::TempDir;

#[tokio::test]
async fn test_fresh_home_is_an_empty_hub() {
    let temp = TempDir::new().unwrap();
    let backend = LocalBackend::open(temp.path());

    assert!(backend.list_documents("weddings").await.unwrap().is_empty());
    assert!(backend.list_tutorials("basics").await.unwrap().is_empty());
    assert!(backend.list_featured().await.unwrap().is_empty());
    // No data file is created by reads
    assert!(!backend.data_path().exists());
}

#[tokio::test]
async fn test_data_survives_across_instances() {
    let temp = TempDir::new().unwrap();

    {
        let hub = ContentHub::new(LocalBackend::open(temp.path()));
        hub.add_document(Document::new(
            "Wedding contract",
            "weddings",
            DocumentSource::Link,
            "https://example.com/wedding.pdf",
        ))
        .await
        .unwrap();
        hub.set_order("weddings", ContentKind::Document, vec!["x".into()])
            .await
            .unwrap();
    }

    // A second backend over the same home sees everything
    let hub = ContentHub::new(LocalBackend::open(temp.path()));
    assert_eq!(hub.documents("weddings").await.unwrap().len(), 1);
    assert_eq!(
        hub.stored_order("weddings", ContentKind::Document)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_update_missing_document_is_no_such_record() {
    let temp = TempDir::new().unwrap();
    let backend = LocalBackend::open(temp.path());

    let patch = DocumentPatch {
        title: Some("New title".to_string()),
        ..Default::default()
    };
    let result = backend.update_document(&"missing".into(), patch).await;

    assert!(matches!(result, Err(StoreError::NoSuchRecord(_))));
}

#[tokio::test]
async fn test_tutorial_patch_only_touches_given_fields() {
    let temp = TempDir::new().unwrap();
    let backend = LocalBackend::open(temp.path());

    let tutorial = Tutorial::new(
        "Three-point lighting",
        "lighting-techniques",
        "https://youtube.com/watch?v=abcdefghijk",
    )
    .with_description("Key, fill, back");
    let id = tutorial.id.clone();
    backend.insert_tutorial(tutorial).await.unwrap();

    let patch = TutorialPatch {
        views: Some(120),
        ..Default::default()
    };
    let updated = backend.update_tutorial(&id, patch).await.unwrap();

    assert_eq!(updated.views, 120);
    assert_eq!(updated.title, "Three-point lighting");
    assert_eq!(updated.description, "Key, fill, back");
    assert_eq!(updated.category, "lighting-techniques");
}

#[tokio::test]
async fn test_reinserting_same_link_replaces_record() {
    let temp = TempDir::new().unwrap();
    let backend = LocalBackend::open(temp.path());

    let first = Document::new(
        "Old title",
        "weddings",
        DocumentSource::Link,
        "https://example.com/contract.pdf",
    );
    let second = Document::new(
        "New title",
        "weddings",
        DocumentSource::Link,
        "https://example.com/contract.pdf",
    );

    backend.insert_document(first).await.unwrap();
    backend.insert_document(second).await.unwrap();

    let listed = backend.list_documents("weddings").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "New title");
}

#[tokio::test]
async fn test_find_by_id() {
    let temp = TempDir::new().unwrap();
    let backend = LocalBackend::open(temp.path());

    let document = Document::new(
        "Model release",
        "portraits",
        DocumentSource::Link,
        "https://example.com/release.pdf",
    );
    let id = document.id.clone();
    backend.insert_document(document).await.unwrap();

    assert!(backend.find_document(&id).await.unwrap().is_some());
    assert!(backend.find_document(&"missing".into()).await.unwrap().is_none());
}
