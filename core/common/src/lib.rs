//! Common types shared across jobstore crates.
//!
//! Provides the error taxonomy and the virtual address model
//! (category, path, job id) that every storage backend understands.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Category, JobId, StorageAddress, StorageLocation, StoragePath, JOB_ID_LEN};
