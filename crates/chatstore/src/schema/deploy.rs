//! Table lifecycle operations.

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use super::client::get_table_state;
use super::config::{self, TableConfig};
use super::error::{Result, SchemaError};

const WAIT_MAX_ATTEMPTS: u32 = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// Creates a table from the given configuration.
///
/// Returns `true` if the table was created, `false` if it already existed
/// (logged, treated as success). Any other failure is fatal.
pub async fn create_table(client: &Client, config: &TableConfig) -> Result<bool> {
    let mut key_schema = vec![KeySchemaElement::builder()
        .attribute_name(&config.partition_key.name)
        .key_type(KeyType::Hash)
        .build()
        .map_err(|e| SchemaError::AwsSdk(e.to_string()))?];

    let mut attribute_definitions = vec![AttributeDefinition::builder()
        .attribute_name(&config.partition_key.name)
        .attribute_type(to_scalar_type(&config.partition_key.attribute_type))
        .build()
        .map_err(|e| SchemaError::AwsSdk(e.to_string()))?];

    if let Some(sk) = &config.sort_key {
        key_schema.push(
            KeySchemaElement::builder()
                .attribute_name(&sk.name)
                .key_type(KeyType::Range)
                .build()
                .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
        );
        attribute_definitions.push(
            AttributeDefinition::builder()
                .attribute_name(&sk.name)
                .attribute_type(to_scalar_type(&sk.attribute_type))
                .build()
                .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
        );
    }

    // GSI key attributes not already covered by the table keys.
    for gsi in &config.gsis {
        for key in [Some(&gsi.partition_key), gsi.sort_key.as_ref()]
            .into_iter()
            .flatten()
        {
            if !attribute_definitions
                .iter()
                .any(|a| a.attribute_name() == key.name)
            {
                attribute_definitions.push(
                    AttributeDefinition::builder()
                        .attribute_name(&key.name)
                        .attribute_type(to_scalar_type(&key.attribute_type))
                        .build()
                        .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
                );
            }
        }
    }

    let mut request = client
        .create_table()
        .table_name(&config.table_name)
        .set_key_schema(Some(key_schema))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest);

    for gsi in &config.gsis {
        let mut gsi_key_schema = vec![KeySchemaElement::builder()
            .attribute_name(&gsi.partition_key.name)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| SchemaError::AwsSdk(e.to_string()))?];

        if let Some(sk) = &gsi.sort_key {
            gsi_key_schema.push(
                KeySchemaElement::builder()
                    .attribute_name(&sk.name)
                    .key_type(KeyType::Range)
                    .build()
                    .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
            );
        }

        request = request.global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(&gsi.name)
                .set_key_schema(Some(gsi_key_schema))
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()
                .map_err(|e| SchemaError::AwsSdk(e.to_string()))?,
        );
    }

    match request.send().await {
        Ok(_) => Ok(true),
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_resource_in_use_exception() {
                tracing::warn!(table = %config.table_name, "table already exists");
                Ok(false)
            } else {
                Err(SchemaError::AwsSdk(service_err.to_string()))
            }
        }
    }
}

/// Deletes a table by name.
///
/// Returns `true` if the table was deleted, `false` if it did not exist
/// (logged, treated as success). Any other failure is fatal.
pub async fn delete_table(client: &Client, table_name: &str) -> Result<bool> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_) => Ok(true),
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_resource_not_found_exception() {
                tracing::warn!(table = %table_name, "table does not exist");
                Ok(false)
            } else {
                Err(SchemaError::AwsSdk(service_err.to_string()))
            }
        }
    }
}

/// Returns all table names known to the store.
pub async fn list_tables(client: &Client) -> Result<Vec<String>> {
    let result = client
        .list_tables()
        .send()
        .await
        .map_err(|e| SchemaError::AwsSdk(e.to_string()))?;
    Ok(result.table_names.unwrap_or_default())
}

/// Polls DescribeTable until the table and all of its GSIs are active.
pub async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..WAIT_MAX_ATTEMPTS {
        if let Some(state) = get_table_state(client, table_name).await? {
            if state.is_ready() {
                return Ok(());
            }
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(SchemaError::TableActivationTimeout {
        table_name: table_name.to_string(),
    })
}

/// Polls DescribeTable until the table no longer exists.
pub async fn wait_for_table_deleted(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..WAIT_MAX_ATTEMPTS {
        if get_table_state(client, table_name).await?.is_none() {
            return Ok(());
        }
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(SchemaError::TableDeletionTimeout {
        table_name: table_name.to_string(),
    })
}

fn to_scalar_type(attr_type: &config::AttributeType) -> ScalarAttributeType {
    match attr_type {
        config::AttributeType::String => ScalarAttributeType::S,
        config::AttributeType::Number => ScalarAttributeType::N,
    }
}
