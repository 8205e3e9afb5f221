//! DynamoDB item store implementation.
//!
//! Implements `ItemStore` from `dynamap_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use dynamap_core::mapping::{Document, PrimaryKey};
use dynamap_core::storage::{ItemStore, Result, TableDescription, WriteCondition, WriteOutcome};

use super::conversions::{document_to_item, item_to_document, key_to_item, table_description};
use super::error::{
    is_conditional_check_failed, map_delete_item_error, map_describe_table_error,
    map_get_item_error, map_put_item_error,
};
use crate::storage::check_item_key;

/// Condition expression for a write condition, over the `#pk` placeholder.
fn condition_expression(condition: WriteCondition) -> Option<&'static str> {
    match condition {
        WriteCondition::Always => None,
        WriteCondition::KeyAbsent => Some("attribute_not_exists(#pk)"),
        WriteCondition::KeyPresent => Some("attribute_exists(#pk)"),
    }
}

/// DynamoDB-based item store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let result = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table))?;

        table_description(table, result.table())
    }

    async fn put_item(
        &self,
        table: &str,
        key: &PrimaryKey,
        item: Document,
        condition: WriteCondition,
    ) -> Result<WriteOutcome> {
        check_item_key(key, &item)?;

        let mut request = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(document_to_item(&item)?));

        if let Some(expression) = condition_expression(condition) {
            request = request
                .condition_expression(expression)
                .expression_attribute_names("#pk", key.hash.name.clone());
        }

        match request.send().await {
            Ok(_) => Ok(WriteOutcome::Written),
            Err(e) if is_conditional_check_failed(&e) => {
                tracing::debug!(table = %table, key = %key, "Put condition did not hold");
                Ok(WriteOutcome::ConditionFailed)
            }
            Err(e) => Err(map_put_item_error(e, table)),
        }
    }

    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_item(key)?))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        match result.item {
            Some(item) => Ok(Some(item_to_document(&item))),
            None => Ok(None),
        }
    }

    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>> {
        let result = self
            .client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_item(key)?))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table))?;

        match result.attributes {
            Some(item) if !item.is_empty() => Ok(Some(item_to_document(&item))),
            _ => Ok(None),
        }
    }
}
