//! Address types shared by every storage backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of a generated job identifier, matching native document ids.
pub const JOB_ID_LEN: usize = 24;

/// First path segment that would map onto reserved `system.*` collections.
const RESERVED_ROOT_SEGMENT: &str = "system";

/// Top-level namespace a stored document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Payloads of jobs waiting to be executed.
    Queued,
    /// Computation results.
    Results,
    /// Job status records.
    Status,
}

impl Category {
    /// All recognized categories.
    pub const ALL: [Category; 3] = [Category::Queued, Category::Results, Category::Status];

    /// Name of the logical database backing this category.
    pub fn database_name(&self) -> &'static str {
        match self {
            Category::Queued => "jobs",
            Category::Results => "results",
            Category::Status => "status",
        }
    }

    /// Prefix prepended to every collection name in this category, if any.
    ///
    /// Queued payloads share the `jobs` database with other job stages, so
    /// their collections are namespaced.
    pub fn collection_prefix(&self) -> Option<&'static str> {
        match self {
            Category::Queued => Some("queued"),
            Category::Results | Category::Status => None,
        }
    }

    /// Lowercase identifier used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Queued => "queued",
            Category::Results => "results",
            Category::Status => "status",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "queued" => Ok(Category::Queued),
            "results" => Ok(Category::Results),
            "status" => Ok(Category::Status),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown category '{}', expected one of queued, results, status",
                other
            ))),
        }
    }
}

/// A slash-delimited hierarchical path inside a category.
///
/// Always holds at least one segment. Segments never contain `/`, `.`,
/// `\`, `$` or NUL, so they can be joined with `.` by document stores and
/// used as directory names by file stores. The first segment may not be
/// `system`, a collection prefix reserved by document databases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoragePath {
    segments: Vec<String>,
}

impl StoragePath {
    /// Build a path from individual segments.
    ///
    /// # Errors
    /// - No segments given
    /// - A segment is empty or contains a reserved character
    /// - The first segment is `system`
    pub fn from_segments(segments: Vec<String>) -> crate::Result<Self> {
        if segments.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Storage path cannot be empty".to_string(),
            ));
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        if segments[0] == RESERVED_ROOT_SEGMENT {
            return Err(crate::Error::InvalidInput(format!(
                "Storage path may not start with '{}'",
                RESERVED_ROOT_SEGMENT
            )));
        }
        Ok(Self { segments })
    }

    /// Parse a `/`-separated path such as `"test/subcollection"`.
    ///
    /// Leading and trailing separators are ignored.
    pub fn parse(path: &str) -> crate::Result<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Storage path cannot be empty".to_string(),
            ));
        }
        Self::from_segments(trimmed.split('/').map(String::from).collect())
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Join the segments with a custom separator.
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

fn validate_segment(segment: &str) -> crate::Result<()> {
    if segment.is_empty() {
        return Err(crate::Error::InvalidInput(
            "Path segment cannot be empty".to_string(),
        ));
    }
    if let Some(c) = segment
        .chars()
        .find(|c| matches!(c, '/' | '.' | '\\' | '$' | '\0'))
    {
        return Err(crate::Error::InvalidInput(format!(
            "Path segment '{}' contains reserved character {:?}",
            segment, c
        )));
    }
    Ok(())
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("/"))
    }
}

impl FromStr for StoragePath {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoragePath {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<StoragePath> for String {
    fn from(path: StoragePath) -> Self {
        path.to_string()
    }
}

/// Opaque identifier of a job, used as the document key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Create a JobId from a string.
    ///
    /// # Errors
    /// - Returns error if the id is empty, is `.` or `..`, or contains
    ///   `/`, `\` or NUL
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "JobId cannot be empty".to_string(),
            ));
        }
        if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(crate::Error::InvalidInput(format!(
                "JobId '{}' is not a valid document key",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Generate a fresh 24 character lowercase hex identifier.
    pub fn generate() -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(JOB_ID_LEN);
        Self(hex)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JobId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for JobId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// Where a document lives, without its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageLocation {
    pub category: Category,
    pub path: StoragePath,
}

impl StorageLocation {
    pub fn new(category: Category, path: StoragePath) -> Self {
        Self { category, path }
    }

    /// Parse the path part and pair it with a category.
    pub fn parse(category: Category, path: &str) -> crate::Result<Self> {
        Ok(Self::new(category, StoragePath::parse(path)?))
    }

    /// Address the document with the given job id at this location.
    pub fn address(&self, job_id: JobId) -> StorageAddress {
        StorageAddress {
            location: self.clone(),
            job_id,
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.path)
    }
}

/// Full virtual address of one stored document.
///
/// The job id is always the leaf key and never part of the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageAddress {
    pub location: StorageLocation,
    pub job_id: JobId,
}

impl StorageAddress {
    pub fn new(category: Category, path: StoragePath, job_id: JobId) -> Self {
        Self {
            location: StorageLocation::new(category, path),
            job_id,
        }
    }

    /// Build an address from its literal parts.
    pub fn parse(category: Category, path: &str, job_id: &str) -> crate::Result<Self> {
        Ok(Self::new(
            category,
            StoragePath::parse(path)?,
            JobId::new(job_id)?,
        ))
    }

    pub fn category(&self) -> Category {
        self.location.category
    }

    pub fn path(&self) -> &StoragePath {
        &self.location.path
    }
}

impl fmt::Display for StorageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.location, self.job_id)
    }
}
