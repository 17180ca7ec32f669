//! DynamoDB record store.
//!
//! Item layout: the configured partition key and `id` both hold the submission
//! id; `name`, `email`, `message`, `fileUrl`, `timestamp` and `status` are strings.

use crate::adapters::provider_error::store_error;
use crate::adapters::records::{KeySchemaEntry, RecordStore, TableSummary};
use crate::domain::submission::Submission;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

pub(crate) const TABLE_SETTING: &str = "AWS_DYNAMODB_TABLE_NAME";

#[derive(Clone, Debug)]
pub struct DynamoRecordStore {
    client: Client,
    table_name: Option<String>,
    partition_key: String,
}

impl DynamoRecordStore {
    #[must_use]
    pub const fn new(client: Client, table_name: Option<String>, partition_key: String) -> Self {
        Self { client, table_name, partition_key }
    }

    fn resource(table: &str) -> String {
        format!("DynamoDB table \"{table}\"")
    }

    pub(crate) fn item(&self, submission: &Submission) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert(self.partition_key.clone(), AttributeValue::S(submission.id.clone()));
        item.insert("id".to_string(), AttributeValue::S(submission.id.clone()));
        item.insert("name".to_string(), AttributeValue::S(submission.name.clone()));
        item.insert("email".to_string(), AttributeValue::S(submission.email.clone()));
        item.insert("message".to_string(), AttributeValue::S(submission.message.clone()));
        item.insert("fileUrl".to_string(), AttributeValue::S(submission.file_url.clone().unwrap_or_default()));
        item.insert("timestamp".to_string(), AttributeValue::S(submission.timestamp()));
        item.insert("status".to_string(), AttributeValue::S(submission.status.as_str().to_string()));
        item
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    fn table_name(&self) -> Result<&str> {
        self.table_name.as_deref().ok_or(AppError::Configuration { setting: TABLE_SETTING })
    }

    async fn put(&self, submission: &Submission) -> Result<()> {
        let table = self.table_name()?;

        self.client.put_item().table_name(table).set_item(Some(self.item(submission))).send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), table = %table, "DynamoDB put_item failed");
            store_error(&e, &Self::resource(table))
        })?;

        tracing::debug!(table = %table, submission_id = %submission.id, "Stored submission in DynamoDB");
        Ok(())
    }

    async fn describe(&self) -> Result<TableSummary> {
        let table = self.table_name()?;

        let output = self.client.describe_table().table_name(table).send().await.map_err(|e| {
            tracing::warn!(error = %DisplayErrorContext(&e), table = %table, "DynamoDB describe_table failed");
            store_error(&e, &Self::resource(table))
        })?;

        let description = output.table().ok_or_else(|| AppError::NotFound {
            resource: Self::resource(table),
            details: "DescribeTable returned no table description".to_string(),
        })?;

        Ok(TableSummary {
            name: description.table_name().unwrap_or(table).to_string(),
            status: description.table_status().map_or_else(|| "UNKNOWN".to_string(), |s| s.as_str().to_string()),
            item_count: description.item_count().unwrap_or(0),
            key_schema: description
                .key_schema()
                .iter()
                .map(|k| KeySchemaEntry {
                    attribute_name: k.attribute_name().to_string(),
                    key_type: k.key_type().as_str().to_string(),
                })
                .collect(),
        })
    }
}
