//! Shared contract checks run against every backend.

#![allow(dead_code)]

use serde_json::json;

use jobstore_common::{Category, Error, JobId, StorageAddress, StorageLocation};
use jobstore_storage::{Document, StorageProvider};

/// Path prefix marking disposable test data.
pub const TEST_PREFIX: &str = "dummy";

pub fn document(value: serde_json::Value) -> Document {
    value.as_object().cloned().expect("test document must be an object")
}

pub fn location(category: Category, path: &str) -> StorageLocation {
    StorageLocation::parse(category, &format!("{}/{}", TEST_PREFIX, path)).unwrap()
}

/// Upload, get, move, get, delete, get.
pub async fn upload_move_delete(provider: &dyn StorageProvider) {
    let content = document(json!({"experiment_0": "Nothing happened here."}));
    let job_id = JobId::generate();
    let first = location(Category::Queued, "test/subcollection");
    let second = location(Category::Queued, "test/subcollection_2");

    let address = first.address(job_id.clone());
    provider.upload(&content, &address).await.unwrap();
    assert_eq!(provider.get(&address).await.unwrap(), content);

    provider
        .move_document(&first, &second, &job_id)
        .await
        .unwrap();
    let moved = second.address(job_id.clone());
    assert_eq!(provider.get(&moved).await.unwrap(), content);
    assert!(matches!(
        provider.get(&address).await,
        Err(Error::NotFound(_))
    ));

    provider.delete(&moved).await.unwrap();
    assert!(matches!(
        provider.get(&moved).await,
        Err(Error::NotFound(_))
    ));
}

/// Upload twice with the same content; the stored state is unchanged.
pub async fn upload_is_idempotent(provider: &dyn StorageProvider) {
    let content = document(json!({"job_id": "x", "status": "INITIALIZING", "detail": ""}));
    let address = location(Category::Status, "idempotent").address(JobId::generate());

    provider.upload(&content, &address).await.unwrap();
    provider.upload(&content, &address).await.unwrap();
    assert_eq!(provider.get(&address).await.unwrap(), content);

    provider.delete(&address).await.unwrap();
}

/// Delete twice: no error the second time, nothing left behind.
pub async fn delete_is_idempotent(provider: &dyn StorageProvider) {
    let address = location(Category::Results, "deleted").address(JobId::generate());
    provider
        .upload(&document(json!({"shots": 10})), &address)
        .await
        .unwrap();

    provider.delete(&address).await.unwrap();
    provider.delete(&address).await.unwrap();
    assert!(matches!(
        provider.get(&address).await,
        Err(Error::NotFound(_))
    ));
}

/// Moving a document that does not exist fails without creating anything.
pub async fn move_missing_source(provider: &dyn StorageProvider) {
    let job_id = JobId::generate();
    let from = location(Category::Queued, "missing");
    let to = location(Category::Queued, "elsewhere");

    assert!(matches!(
        provider.move_document(&from, &to, &job_id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        provider.get(&to.address(job_id)).await,
        Err(Error::NotFound(_))
    ));
}

/// Moving a document onto its own location keeps it; a missing one is
/// still reported.
pub async fn move_onto_itself(provider: &dyn StorageProvider) {
    let content = document(json!({"experiment_0": "Nothing happened here."}));
    let job_id = JobId::generate();
    let here = location(Category::Queued, "test/subcollection");
    let address = here.address(job_id.clone());

    provider.upload(&content, &address).await.unwrap();
    provider
        .move_document(&here, &here, &job_id)
        .await
        .unwrap();
    assert_eq!(provider.get(&address).await.unwrap(), content);

    provider.delete(&address).await.unwrap();
    assert!(matches!(
        provider.move_document(&here, &here, &job_id).await,
        Err(Error::NotFound(_))
    ));
}

/// Content carrying the reserved `_id` key is refused by every backend.
pub async fn reserved_field_is_rejected(provider: &dyn StorageProvider) {
    let address = location(Category::Results, "reserved").address(JobId::generate());
    let content = document(json!({"_id": "mine", "shots": 1}));

    assert!(matches!(
        provider.upload(&content, &address).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        provider.get(&address).await,
        Err(Error::NotFound(_))
    ));
}

/// Every operation on `inactive` is rejected; `active` shares its backing
/// store and shows nothing was touched.
pub async fn inactive_rejects_everything(
    inactive: &dyn StorageProvider,
    active: &dyn StorageProvider,
) {
    let content = document(json!({"experiment_0": "Nothing happened here."}));
    let job_id = JobId::generate();
    let first = location(Category::Queued, "test/subcollection");
    let second = location(Category::Queued, "test/subcollection_2");
    let address = first.address(job_id.clone());
    let moved = second.address(job_id.clone());

    assert!(!inactive.is_active());
    assert!(matches!(
        inactive.upload(&content, &address).await,
        Err(Error::Inactive(_))
    ));
    assert!(matches!(
        active.get(&address).await,
        Err(Error::NotFound(_))
    ));

    active.upload(&content, &address).await.unwrap();

    assert!(matches!(
        inactive.get(&address).await,
        Err(Error::Inactive(_))
    ));
    assert!(matches!(
        inactive.move_document(&first, &second, &job_id).await,
        Err(Error::Inactive(_))
    ));
    assert!(matches!(
        inactive.delete(&address).await,
        Err(Error::Inactive(_))
    ));

    assert_eq!(active.get(&address).await.unwrap(), content);
    assert!(matches!(
        active.get(&moved).await,
        Err(Error::NotFound(_))
    ));

    active.delete(&address).await.unwrap();
}

/// Same path and job id under different categories are different documents.
pub async fn categories_are_disjoint(provider: &dyn StorageProvider) {
    let job_id = JobId::generate();
    let addresses: Vec<StorageAddress> = Category::ALL
        .iter()
        .map(|c| location(*c, "shared").address(job_id.clone()))
        .collect();

    for (i, address) in addresses.iter().enumerate() {
        provider
            .upload(&document(json!({ "index": i })), address)
            .await
            .unwrap();
    }
    for (i, address) in addresses.iter().enumerate() {
        assert_eq!(provider.get(address).await.unwrap()["index"], json!(i));
        provider.delete(address).await.unwrap();
    }
}
