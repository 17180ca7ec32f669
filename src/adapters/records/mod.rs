use crate::domain::submission::Submission;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

pub mod dynamodb;

pub use dynamodb::DynamoRecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySchemaEntry {
    pub attribute_name: String,
    pub key_type: String,
}

/// Result of the describe/health probe against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub name: String,
    pub status: String,
    pub item_count: i64,
    pub key_schema: Vec<KeySchemaEntry>,
}

#[async_trait]
pub trait RecordStore: Debug + Send + Sync + 'static {
    /// Target table, or a configuration error when none is set.
    ///
    /// # Errors
    /// Returns `AppError::Configuration` if no table is configured.
    fn table_name(&self) -> Result<&str>;

    /// Writes the submission keyed by its id.
    ///
    /// # Errors
    /// Returns `AppError::Authentication`, `AppError::NotFound` or `AppError::Persistence`.
    async fn put(&self, submission: &Submission) -> Result<()>;

    /// Describes the target table.
    ///
    /// # Errors
    /// Same classification as [`RecordStore::put`].
    async fn describe(&self) -> Result<TableSummary>;
}
