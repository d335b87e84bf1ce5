//! Storage provider abstraction for jobstore.
//!
//! Job payloads, results and status records are addressed by a
//! `(category, path, job id)` triple. Every backend (MongoDB, local files,
//! memory) implements the same [`StorageProvider`] contract over that
//! address space, and the [`ProviderRegistry`] turns a configuration record
//! into a ready provider.
//!
//! # Design Principles
//! - Credentials are validated against a per-backend schema before any
//!   connection attempt
//! - Construction is the only place connectivity and auth failures surface
//! - Every operation is rejected up front on an inactive provider
//! - `move_document` is get, upload, delete; it is not atomic

pub mod local;
pub mod memory;
pub mod mongo;
pub mod namespace;
pub mod naming;
pub mod provider;
pub mod registry;
pub mod schemes;

pub use local::LocalProvider;
pub use memory::MemoryProvider;
pub use mongo::MongodbProvider;
pub use namespace::Namespace;
pub use naming::{is_routable, short_backend_name};
pub use provider::{Document, StorageProvider};
pub use registry::{create_default_registry, ProviderFactory, ProviderRegistry};
pub use schemes::{
    BackendType, LocalLoginInformation, LoginInformation, MemoryLoginInformation,
    MongodbLoginInformation, ProviderConfig,
};
