//! Storage provider trait definition.

use async_trait::async_trait;
use serde_json::{Map, Value};

use jobstore_common::{Error, JobId, Result, StorageAddress, StorageLocation};

use crate::schemes::BackendType;

/// Content stored at one address: a JSON object.
pub type Document = Map<String, Value>;

/// Top-level key no document may carry; document databases use it as the
/// primary key.
pub const RESERVED_FIELD: &str = "_id";

/// Reject content that carries the reserved primary key field.
pub fn check_content(content: &Document) -> Result<()> {
    if content.contains_key(RESERVED_FIELD) {
        return Err(Error::InvalidInput(format!(
            "Content may not carry its own '{}' field",
            RESERVED_FIELD
        )));
    }
    Ok(())
}

/// Storage provider trait for different backends.
///
/// A provider is bound to one backend, one set of credentials and one
/// `active` flag snapshotted at construction. Every operation checks that
/// flag before touching the backend, so an inactive provider never performs
/// partial work.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Human-assigned provider name.
    fn name(&self) -> &str;

    /// Backend type this provider talks to.
    fn backend(&self) -> BackendType;

    /// Activity flag cached at construction time.
    fn is_active(&self) -> bool;

    /// Upsert `content` as the document at `address`.
    ///
    /// # Postconditions
    /// - A later `get` at `address` returns `content` exactly
    /// - Repeating the call with the same arguments yields the same state
    ///
    /// # Errors
    /// - Provider inactive
    /// - `content` has a top-level `_id` key (every backend)
    /// - Backend I/O errors
    async fn upload(&self, content: &Document, address: &StorageAddress) -> Result<()>;

    /// Fetch the document at `address`.
    ///
    /// # Errors
    /// - Provider inactive
    /// - Document not found
    /// - Backend I/O errors
    async fn get(&self, address: &StorageAddress) -> Result<Document>;

    /// Re-key the document `job_id` from `from` to `to`.
    ///
    /// Performed as get, upload at destination, delete at source. Not
    /// atomic: if the delete fails or the process dies in between, the
    /// document exists at both locations. Callers needing exactly-once
    /// semantics retry the move, which is safe since `delete` is idempotent.
    /// Moving a document onto its own location leaves it untouched.
    ///
    /// # Errors
    /// - Provider inactive
    /// - Source not found
    /// - Backend I/O errors
    async fn move_document(
        &self,
        from: &StorageLocation,
        to: &StorageLocation,
        job_id: &JobId,
    ) -> Result<()> {
        self.ensure_active()?;
        let source = from.address(job_id.clone());
        let destination = to.address(job_id.clone());

        if from == to {
            self.get(&source).await?;
            return Ok(());
        }

        let content = self.get(&source).await?;
        self.upload(&content, &destination).await?;
        self.delete(&source).await.map_err(|err| {
            tracing::warn!(
                provider = self.name(),
                source = %source,
                destination = %destination,
                "Move left the source copy in place: {}",
                err
            );
            err
        })
    }

    /// Remove the document at `address`. Missing documents are a no-op.
    ///
    /// # Errors
    /// - Provider inactive
    /// - Backend I/O errors
    async fn delete(&self, address: &StorageAddress) -> Result<()>;

    /// Fail with [`Error::Inactive`] unless the provider is active.
    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::Inactive(format!(
                "The storage provider '{}' is not active",
                self.name()
            )))
        }
    }
}
