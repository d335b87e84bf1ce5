//! In-memory storage provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use jobstore_common::{Error, Result, StorageAddress};

use crate::namespace::Namespace;
use crate::provider::{check_content, Document, StorageProvider};
use crate::schemes::{BackendType, MemoryLoginInformation};

type Collections = HashMap<Namespace, HashMap<String, Document>>;

/// In-memory storage provider.
///
/// Documents are grouped by the same namespaces a document database would
/// use. All data is lost once the last handle is dropped.
pub struct MemoryProvider {
    name: String,
    active: bool,
    storage: Arc<RwLock<Collections>>,
}

impl MemoryProvider {
    /// Create a new empty memory provider.
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Construct from validated login information.
    ///
    /// Never fails; the signature matches the other backends.
    pub fn connect(
        _login: MemoryLoginInformation,
        name: impl Into<String>,
        active: bool,
    ) -> Result<Self> {
        Ok(Self::new(name, active))
    }

    /// Another provider over the same documents, with its own name and flag.
    pub fn handle(&self, name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
            storage: Arc::clone(&self.storage),
        }
    }

    /// Total number of stored documents across all namespaces.
    pub async fn len(&self) -> usize {
        self.storage.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new("memory", true)
    }
}

#[async_trait]
impl StorageProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> BackendType {
        BackendType::Memory
    }

    fn is_active(&self) -> bool {
        self.active
    }

    async fn upload(&self, content: &Document, address: &StorageAddress) -> Result<()> {
        self.ensure_active()?;
        check_content(content)?;
        let ns = Namespace::from_location(&address.location);
        debug!(namespace = %ns, job_id = %address.job_id, "memory upload");

        self.storage
            .write()
            .await
            .entry(ns)
            .or_default()
            .insert(address.job_id.to_string(), content.clone());
        Ok(())
    }

    async fn get(&self, address: &StorageAddress) -> Result<Document> {
        self.ensure_active()?;
        let ns = Namespace::from_location(&address.location);
        debug!(namespace = %ns, job_id = %address.job_id, "memory get");

        self.storage
            .read()
            .await
            .get(&ns)
            .and_then(|collection| collection.get(address.job_id.as_str()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Document not found: {}", address)))
    }

    async fn delete(&self, address: &StorageAddress) -> Result<()> {
        self.ensure_active()?;
        let ns = Namespace::from_location(&address.location);
        debug!(namespace = %ns, job_id = %address.job_id, "memory delete");

        let mut storage = self.storage.write().await;
        if let Some(collection) = storage.get_mut(&ns) {
            collection.remove(address.job_id.as_str());
            if collection.is_empty() {
                storage.remove(&ns);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobstore_common::{Category, JobId, StorageLocation};
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_upload_get() {
        let provider = MemoryProvider::default();
        let address =
            StorageAddress::parse(Category::Queued, "test/subcollection", "abc123").unwrap();
        let content = document(json!({"experiment_0": "Nothing happened here."}));

        provider.upload(&content, &address).await.unwrap();
        assert_eq!(provider.get(&address).await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_upload_is_upsert() {
        let provider = MemoryProvider::default();
        let address = StorageAddress::parse(Category::Status, "dummy", "abc").unwrap();

        provider
            .upload(&document(json!({"status": "INITIALIZING"})), &address)
            .await
            .unwrap();
        provider
            .upload(&document(json!({"status": "DONE"})), &address)
            .await
            .unwrap();

        assert_eq!(provider.len().await, 1);
        assert_eq!(provider.get(&address).await.unwrap()["status"], "DONE");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let provider = MemoryProvider::default();
        let address = StorageAddress::parse(Category::Results, "dummy", "missing").unwrap();
        assert!(matches!(
            provider.get(&address).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_categories_are_isolated() {
        let provider = MemoryProvider::default();
        let job_id = JobId::generate();
        let queued = StorageLocation::parse(Category::Queued, "dummy").unwrap();
        let results = StorageLocation::parse(Category::Results, "dummy").unwrap();

        provider
            .upload(&document(json!({"a": 1})), &queued.address(job_id.clone()))
            .await
            .unwrap();
        assert!(provider.get(&results.address(job_id)).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let provider = MemoryProvider::default();
        let address = StorageAddress::parse(Category::Queued, "dummy", "abc").unwrap();

        provider
            .upload(&document(json!({"a": 1})), &address)
            .await
            .unwrap();
        provider.delete(&address).await.unwrap();
        provider.delete(&address).await.unwrap();
        assert!(provider.is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_shares_documents() {
        let provider = MemoryProvider::default();
        let inactive = provider.handle("disabled", false);
        let address = StorageAddress::parse(Category::Queued, "dummy", "abc").unwrap();

        provider
            .upload(&document(json!({"a": 1})), &address)
            .await
            .unwrap();
        assert!(matches!(
            inactive.get(&address).await,
            Err(Error::Inactive(_))
        ));
        assert_eq!(inactive.name(), "disabled");
        assert_eq!(inactive.len().await, 1);
    }
}
