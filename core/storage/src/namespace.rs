//! Mapping of virtual locations onto backend-native namespaces.

use std::fmt;

use jobstore_common::StorageLocation;

/// Separator used to join path segments into a collection name.
///
/// `/` is not usable in collection names of document databases.
pub const COLLECTION_SEPARATOR: &str = ".";

/// Backend-native coordinates of a [`StorageLocation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Logical database, selected by the category.
    pub database: String,
    /// Collection within the database, derived from the path.
    pub collection: String,
}

impl Namespace {
    /// Derive the namespace for a location.
    ///
    /// `queued:test/sub` maps to database `jobs`, collection `queued.test.sub`;
    /// `results:test/sub` maps to database `results`, collection `test.sub`.
    pub fn from_location(location: &StorageLocation) -> Self {
        let joined = location.path.join(COLLECTION_SEPARATOR);
        let collection = match location.category.collection_prefix() {
            Some(prefix) => format!("{}{}{}", prefix, COLLECTION_SEPARATOR, joined),
            None => joined,
        };

        Self {
            database: location.category.database_name().to_string(),
            collection,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
