//! Provider registry for resolving configuration records into providers.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use jobstore_common::{Error, Result};

use crate::local::LocalProvider;
use crate::memory::MemoryProvider;
use crate::mongo::MongodbProvider;
use crate::provider::StorageProvider;
use crate::schemes::{BackendType, LoginInformation, ProviderConfig};

/// Factory function type for creating providers.
///
/// Receives validated login information, the provider name and the
/// activity flag.
pub type ProviderFactory = Box<
    dyn Fn(LoginInformation, String, bool) -> BoxFuture<'static, Result<Arc<dyn StorageProvider>>>
        + Send
        + Sync,
>;

/// Registry of provider factories keyed by backend type.
pub struct ProviderRegistry {
    factories: HashMap<BackendType, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a provider factory.
    ///
    /// # Errors
    /// - Returns error if the backend type is already registered
    pub fn register(&mut self, backend: BackendType, factory: ProviderFactory) -> Result<()> {
        if self.factories.contains_key(&backend) {
            return Err(Error::AlreadyExists(format!(
                "Provider for backend '{}' is already registered",
                backend
            )));
        }
        self.factories.insert(backend, factory);
        Ok(())
    }

    /// Build the provider described by a configuration record.
    ///
    /// Validates the login mapping against the schema selected by the
    /// record's backend type, then constructs the provider with the
    /// record's name and activity flag. Schema and constructor errors are
    /// returned unchanged.
    ///
    /// # Errors
    /// - Backend type not registered
    /// - Login information invalid (`Validation`)
    /// - Backend unreachable or credentials rejected (`Configuration`)
    pub async fn resolve(&self, config: &ProviderConfig) -> Result<Arc<dyn StorageProvider>> {
        let factory = self.factories.get(&config.backend_type).ok_or_else(|| {
            Error::InvalidInput(format!(
                "Provider for backend '{}' is not registered",
                config.backend_type
            ))
        })?;
        let login = config.login_information()?;

        debug!(
            backend = %config.backend_type,
            provider = %config.name,
            active = config.active,
            "Resolving storage provider"
        );
        factory(login, config.name.clone(), config.active).await
    }

    /// Get list of registered backend types.
    pub fn providers(&self) -> Vec<BackendType> {
        self.factories.keys().copied().collect()
    }

    /// Check if a backend type is registered.
    pub fn has_provider(&self, backend: BackendType) -> bool {
        self.factories.contains_key(&backend)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn login_mismatch(expected: BackendType, login: &LoginInformation) -> Error {
    Error::Validation(format!(
        "Login information for the {} backend handed to the {} factory",
        login.backend(),
        expected
    ))
}

/// Create a registry with all built-in backends.
pub fn create_default_registry() -> ProviderRegistry {
    let mut factories: HashMap<BackendType, ProviderFactory> = HashMap::new();

    factories.insert(
        BackendType::Mongodb,
        Box::new(|login, name, active| {
            Box::pin(async move {
                match login {
                    LoginInformation::Mongodb(login) => {
                        let provider = MongodbProvider::connect(login, name, active).await?;
                        Ok(Arc::new(provider) as Arc<dyn StorageProvider>)
                    }
                    other => Err(login_mismatch(BackendType::Mongodb, &other)),
                }
            })
        }),
    );

    factories.insert(
        BackendType::Local,
        Box::new(|login, name, active| {
            Box::pin(async move {
                match login {
                    LoginInformation::Local(login) => {
                        let provider = LocalProvider::connect(login, name, active)?;
                        Ok(Arc::new(provider) as Arc<dyn StorageProvider>)
                    }
                    other => Err(login_mismatch(BackendType::Local, &other)),
                }
            })
        }),
    );

    factories.insert(
        BackendType::Memory,
        Box::new(|login, name, active| {
            Box::pin(async move {
                match login {
                    LoginInformation::Memory(login) => {
                        let provider = MemoryProvider::connect(login, name, active)?;
                        Ok(Arc::new(provider) as Arc<dyn StorageProvider>)
                    }
                    other => Err(login_mismatch(BackendType::Memory, &other)),
                }
            })
        }),
    );

    ProviderRegistry { factories }
}
