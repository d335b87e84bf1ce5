//! Local filesystem storage provider.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use jobstore_common::{Error, Result, StorageAddress};

use crate::namespace::Namespace;
use crate::provider::{check_content, Document, StorageProvider};
use crate::schemes::{BackendType, LocalLoginInformation};

/// File extension of stored documents.
const DOCUMENT_EXTENSION: &str = "json";

/// Local filesystem storage provider.
///
/// Stores each document as a JSON file at
/// `<base_path>/<database>/<collection>/<job_id>.json`.
pub struct LocalProvider {
    name: String,
    active: bool,
    root: PathBuf,
}

impl LocalProvider {
    /// Create a new local provider rooted at the configured base path.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Root cannot be created or is not a directory
    pub fn connect(
        login: LocalLoginInformation,
        name: impl Into<String>,
        active: bool,
    ) -> Result<Self> {
        let root = login.base_path;

        // Sync for constructor
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::Configuration(format!(
                "Cannot use '{}' as local storage root: {}",
                root.display(),
                e
            ))
        })?;
        if !root.is_dir() {
            return Err(Error::Configuration(format!(
                "Local storage root '{}' is not a directory",
                root.display()
            )));
        }

        let name = name.into();
        info!(provider = %name, root = %root.display(), active, "Local storage provider ready");
        Ok(Self { name, active, root })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert an address to the path of its document file.
    fn document_path(&self, address: &StorageAddress) -> PathBuf {
        let ns = Namespace::from_location(&address.location);
        let mut path = self.root.join(&ns.database).join(&ns.collection);
        path.push(format!("{}.{}", address.job_id, DOCUMENT_EXTENSION));
        path
    }
}

#[async_trait]
impl StorageProvider for LocalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> BackendType {
        BackendType::Local
    }

    fn is_active(&self) -> bool {
        self.active
    }

    async fn upload(&self, content: &Document, address: &StorageAddress) -> Result<()> {
        self.ensure_active()?;
        check_content(content)?;
        let fs_path = self.document_path(address);
        debug!(path = %fs_path.display(), "local upload");

        let data = serde_json::to_vec(content)?;
        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers only ever see a complete file.
        let tmp_path = fs_path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp_path, &data).await?;
        if let Err(e) = fs::rename(&tmp_path, &fs_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn get(&self, address: &StorageAddress) -> Result<Document> {
        self.ensure_active()?;
        let fs_path = self.document_path(address);
        debug!(path = %fs_path.display(), "local get");

        let data = match fs::read(&fs_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("Document not found: {}", address)));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    async fn delete(&self, address: &StorageAddress) -> Result<()> {
        self.ensure_active()?;
        let fs_path = self.document_path(address);
        debug!(path = %fs_path.display(), "local delete");

        match fs::remove_file(&fs_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
