//! Credential schemas and provider configuration records.
//!
//! Each backend type has exactly one strictly-typed login structure. The
//! structure is chosen by the backend type tag of the configuration record,
//! never by inspecting the shape of the raw credential mapping.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use jobstore_common::{Error, Result};

/// Supported storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// MongoDB document database.
    Mongodb,
    /// JSON files on a local or mounted filesystem.
    Local,
    /// In-process store, for tests and dry runs.
    Memory,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Mongodb => "mongodb",
            BackendType::Local => "local",
            BackendType::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mongodb" => Ok(BackendType::Mongodb),
            "local" => Ok(BackendType::Local),
            "memory" => Ok(BackendType::Memory),
            other => Err(Error::InvalidInput(format!(
                "Unknown backend type '{}'",
                other
            ))),
        }
    }
}

/// Login information for a MongoDB deployment.
///
/// The `mongodb_`-prefixed key names of older configuration records are
/// accepted as aliases.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct MongodbLoginInformation {
    #[serde(alias = "mongodb_username")]
    pub username: String,
    #[serde(alias = "mongodb_password")]
    pub password: String,
    /// Host part of the connection string, e.g. `cluster0.example.net`.
    #[serde(alias = "mongodb_database_url")]
    pub database_url: String,
}

impl fmt::Debug for MongodbLoginInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongodbLoginInformation")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database_url", &self.database_url)
            .finish()
    }
}

/// Login information for the local file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalLoginInformation {
    /// Directory under which all documents are stored.
    pub base_path: PathBuf,
}

/// The memory backend takes no credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryLoginInformation {}

/// Validated login information, one variant per backend type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginInformation {
    Mongodb(MongodbLoginInformation),
    Local(LocalLoginInformation),
    Memory(MemoryLoginInformation),
}

impl LoginInformation {
    /// Validate a raw credential mapping against the schema of `backend`.
    ///
    /// # Errors
    /// - `raw` is not an object
    /// - A required field is missing
    /// - An unrecognized field is present
    /// - A field has the wrong type
    pub fn validate(backend: BackendType, raw: &serde_json::Value) -> Result<Self> {
        match backend {
            BackendType::Mongodb => parse_schema(backend, raw).map(LoginInformation::Mongodb),
            BackendType::Local => parse_schema(backend, raw).map(LoginInformation::Local),
            BackendType::Memory => parse_schema(backend, raw).map(LoginInformation::Memory),
        }
    }

    /// Backend type this login information belongs to.
    pub fn backend(&self) -> BackendType {
        match self {
            LoginInformation::Mongodb(_) => BackendType::Mongodb,
            LoginInformation::Local(_) => BackendType::Local,
            LoginInformation::Memory(_) => BackendType::Memory,
        }
    }
}

fn parse_schema<T: DeserializeOwned>(backend: BackendType, raw: &serde_json::Value) -> Result<T> {
    if !raw.is_object() {
        return Err(Error::Validation(format!(
            "Login information for the {} backend must be an object",
            backend
        )));
    }
    T::deserialize(raw).map_err(|e| {
        Error::Validation(format!(
            "Invalid login information for the {} backend: {}",
            backend, e
        ))
    })
}

fn default_active() -> bool {
    true
}

/// Provider configuration record as stored by the configuration layer.
///
/// The `storage_type` and `is_active` key names are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(alias = "storage_type")]
    pub backend_type: BackendType,
    /// Unique (per owner) provider name.
    pub name: String,
    /// Raw credential mapping, validated at resolution time.
    pub login: serde_json::Value,
    #[serde(default = "default_active", alias = "is_active")]
    pub active: bool,
}

impl ProviderConfig {
    pub fn new(
        backend_type: BackendType,
        name: impl Into<String>,
        login: serde_json::Value,
        active: bool,
    ) -> Self {
        Self {
            backend_type,
            name: name.into(),
            login,
            active,
        }
    }

    /// Load a configuration record from a JSON file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Validate the login mapping against this record's backend schema.
    pub fn login_information(&self) -> Result<LoginInformation> {
        LoginInformation::validate(self.backend_type, &self.login)
    }
}
