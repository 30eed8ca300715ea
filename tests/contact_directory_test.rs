//! Integration tests for the contact directory
//!
//! These tests exercise the store and handlers together:
//! 1. Pagination over a fixed set of contacts
//! 2. Substring search across name, email and phone
//! 3. Lifecycle of a single contact through delete

use axum::extract::{Path, Query, State};
use axum::Json;
use contact_directory::api::contacts::{
    create_contact, delete_contact, get_contact, list_contacts, search_contacts, update_contact,
};
use contact_directory::contacts::{ContactDb, ContactUpdate, ListParams, NewContact};
use contact_directory::error::AppError;
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to open a fresh database in a temp directory
async fn create_test_db() -> (Arc<ContactDb>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("integration.db");
    let db = ContactDb::new(db_path.to_str().unwrap(), 4)
        .await
        .expect("Failed to create test database");
    (Arc::new(db), temp_dir)
}

fn contact(name: &str, email: &str, phone: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        avatar: None,
    }
}

fn page(skip: i64, limit: i64) -> ListParams {
    ListParams {
        skip: Some(skip),
        limit: Some(limit),
        search: None,
    }
}

#[tokio::test]
async fn test_pagination_walks_every_contact_once() {
    let (db, _temp_dir) = create_test_db().await;
    let a = db.create(contact("A", "a@x.com", "1")).await.unwrap();
    let b = db.create(contact("B", "b@x.com", "2")).await.unwrap();

    let first = list_contacts(State(db.clone()), Query(page(0, 1)))
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, a.id);

    let second = list_contacts(State(db.clone()), Query(page(1, 1)))
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, b.id);

    let third = list_contacts(State(db), Query(page(2, 1))).await.unwrap();
    assert!(third.is_empty());
}

#[tokio::test]
async fn test_pagination_out_of_range_values_are_clamped() {
    let (db, _temp_dir) = create_test_db().await;
    db.create(contact("A", "a@x.com", "1")).await.unwrap();
    db.create(contact("B", "b@x.com", "2")).await.unwrap();

    let all = db.list(&page(-10, 100)).await.unwrap();
    assert_eq!(all.len(), 2);

    let none = db.list(&page(0, 0)).await.unwrap();
    assert!(none.is_empty());

    let negative_limit = db.list(&page(0, -1)).await.unwrap();
    assert!(negative_limit.is_empty());
}

#[tokio::test]
async fn test_search_across_fields() {
    let (db, _temp_dir) = create_test_db().await;
    db.create(contact("John Doe", "jd@x.com", "111")).await.unwrap();
    db.create(contact("Mike", "mike.johnson@x.com", "222"))
        .await
        .unwrap();
    db.create(contact("Ann", "ann@x.com", "john-333"))
        .await
        .unwrap();
    db.create(contact("Zed", "zed@x.com", "444")).await.unwrap();

    let params = ListParams {
        search: Some("john".to_string()),
        ..Default::default()
    };
    let listed = list_contacts(State(db.clone()), Query(params))
        .await
        .unwrap();
    let mut names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    // LIKE is ASCII case-insensitive in SQLite, so "John" matches too
    assert_eq!(names, vec!["Ann", "John Doe", "Mike"]);

    let searched = search_contacts(State(db), Path("john".to_string()))
        .await
        .unwrap();
    assert_eq!(searched.0, listed.0);
}

#[tokio::test]
async fn test_search_no_match_is_empty() {
    let (db, _temp_dir) = create_test_db().await;
    db.create(contact("A", "a@x.com", "1")).await.unwrap();
    let found = db.search("nobody").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_contact_lifecycle() {
    let (db, _temp_dir) = create_test_db().await;

    let (_, created) = create_contact(
        State(db.clone()),
        Json(contact("Sarah Wilson", "sarah@x.com", "555")),
    )
    .await
    .unwrap();
    assert_eq!(created.created_at, created.updated_at);
    assert!(created
        .avatar
        .as_deref()
        .unwrap()
        .contains("name=Sarah+Wilson"));

    let update = ContactUpdate {
        name: Some("Sarah W.".to_string()),
        ..Default::default()
    };
    let updated = update_contact(State(db.clone()), Path(created.id), Json(update))
        .await
        .unwrap();
    assert_eq!(updated.name, "Sarah W.");
    assert!(updated.updated_at >= updated.created_at);

    delete_contact(State(db.clone()), Path(created.id))
        .await
        .unwrap();

    let result = get_contact(State(db.clone()), Path(created.id)).await;
    assert!(matches!(result, Err(AppError::ContactNotFound(_))));

    let update = ContactUpdate {
        name: Some("X".to_string()),
        ..Default::default()
    };
    let result = update_contact(State(db), Path(created.id), Json(update)).await;
    assert!(matches!(result, Err(AppError::ContactNotFound(_))));
}

#[tokio::test]
async fn test_update_without_changes_refreshes_timestamp() {
    let (db, _temp_dir) = create_test_db().await;
    let created = db.create(contact("A", "a@x.com", "1")).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let updated = db.update(created.id, ContactUpdate::default()).await.unwrap();
    assert_eq!(updated.name, created.name);
    assert!(updated.updated_at > created.updated_at);

    let stored = db.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.updated_at, updated.updated_at);
}

#[tokio::test]
async fn test_update_can_clear_avatar() {
    let (db, _temp_dir) = create_test_db().await;
    let created = db.create(contact("A", "a@x.com", "1")).await.unwrap();
    assert!(created.avatar.is_some());

    let update: ContactUpdate = serde_json::from_str(r#"{"avatar": null}"#).unwrap();
    let updated = db.update(created.id, update).await.unwrap();
    assert!(updated.avatar.is_none());
    assert_eq!(db.get(created.id).await.unwrap().unwrap().avatar, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_email() {
    let (db, _temp_dir) = create_test_db().await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                db.create(contact(&format!("C{}", i), "same@x.com", "1"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::EmailConflict(email)) => assert_eq!(email, "same@x.com"),
            Err(other) => panic!("Expected EmailConflict error, got: {:?}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(db.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_to_different_rows_all_succeed() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("concurrent.db");
    let db = Arc::new(ContactDb::new(db_path.to_str().unwrap(), 5).await.unwrap());

    let creates: Vec<_> = (0..40)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                db.create(contact(&format!("C{}", i), &format!("e{}@x.com", i), "1"))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in creates {
        match handle.await.unwrap() {
            Ok(created) => ids.push(created.id),
            Err(e) => panic!("Create failed under concurrency: {:?}", e),
        }
    }
    assert_eq!(db.count().await.unwrap(), 40);

    let updates: Vec<_> = ids
        .iter()
        .map(|&id| {
            let db = db.clone();
            tokio::spawn(async move {
                let update = ContactUpdate {
                    phone: Some(format!("555-{}", id)),
                    ..Default::default()
                };
                db.update(id, update).await
            })
        })
        .collect();

    for handle in updates {
        let updated = handle
            .await
            .unwrap()
            .unwrap_or_else(|e| panic!("Update failed under concurrency: {:?}", e));
        assert_eq!(updated.phone, format!("555-{}", updated.id));
    }
}
