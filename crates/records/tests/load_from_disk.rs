use listview_records::{load_collection, source_for, CollectionKind, RecordCollection, RecordId};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn wrapped_members_document_loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.json");
    fs::write(
        &path,
        r#"{"members": [
            {"id": 7, "name": "Ada Obi", "address": "12 Zik Avenue, Awka", "membershipLevel": "Gold"},
            {"name": "Chike Eze", "membershipLevel": "Silver"}
        ]}"#,
    )
    .unwrap();

    let source = source_for(path.to_str().unwrap());
    let outcome = load_collection(source.as_ref(), CollectionKind::Members, None).await;

    assert!(!outcome.is_degraded());
    let records = outcome.collection.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId::Number(7));
    assert_eq!(records[0].title, "Ada Obi");
    assert_eq!(records[0].category, "Gold");
    assert_eq!(records[0].location, "12 Zik Avenue, Awka");
    assert_eq!(records[1].title, "Chike Eze");
}

#[tokio::test]
async fn invalid_json_keeps_the_fallback() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let fallback = RecordCollection::from_document(
        &serde_json::json!([{"id": 1, "title": "Cached"}]),
        CollectionKind::Opportunities,
    )
    .unwrap();
    let source = source_for(path.to_str().unwrap());
    let outcome =
        load_collection(source.as_ref(), CollectionKind::Opportunities, Some(fallback)).await;

    assert!(outcome.is_degraded());
    assert_eq!(outcome.collection.len(), 1);
    assert_eq!(outcome.collection.records()[0].title, "Cached");
}
