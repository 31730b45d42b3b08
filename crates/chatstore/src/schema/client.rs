//! AWS SDK client setup and table-state inspection.

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

use super::error::{Result, SchemaError};

/// Connection settings for the store.
///
/// Defaults target a local DynamoDB instance; both values can be overridden
/// through the environment (`AWS_ENDPOINT_URL`, `AWS_REGION`) or constructed
/// explicitly by the caller.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Custom endpoint URL, `None` to target AWS directly.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint_url: Some(
                std::env::var("AWS_ENDPOINT_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "ap-northeast-1".to_string()),
        }
    }
}

impl StoreConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Creates a DynamoDB client with the given configuration.
///
/// When a custom endpoint is set and no AWS credentials are configured in
/// the environment, placeholder credentials are installed; DynamoDB Local
/// accepts any.
pub async fn create_client(config: &StoreConfig) -> Result<Client> {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() {
            sdk_config_loader = sdk_config_loader
                .credentials_provider(Credentials::new("local", "local", None, None, "chatstore"));
        }
    }

    let sdk_config = sdk_config_loader.load().await;
    Ok(Client::new(&sdk_config))
}

/// Current status of a table as reported by DescribeTable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// Table state: overall status plus the status of each GSI.
#[derive(Debug, Clone)]
pub struct TableState {
    pub status: TableStatus,
    pub index_statuses: Vec<TableStatus>,
}

impl TableState {
    /// The table is usable once it and all of its GSIs are active.
    pub fn is_ready(&self) -> bool {
        self.status == TableStatus::Active
            && self.index_statuses.iter().all(|s| *s == TableStatus::Active)
    }
}

/// Fetches current table state, returns None if the table doesn't exist.
pub async fn get_table_state(client: &Client, table_name: &str) -> Result<Option<TableState>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => {
            let table = response.table().ok_or_else(|| {
                SchemaError::AwsSdk("DescribeTable returned no table description".to_string())
            })?;

            let index_statuses = table
                .global_secondary_indexes()
                .iter()
                .map(|gsi| match gsi.index_status() {
                    Some(aws_sdk_dynamodb::types::IndexStatus::Active) => TableStatus::Active,
                    Some(aws_sdk_dynamodb::types::IndexStatus::Creating) => TableStatus::Creating,
                    Some(aws_sdk_dynamodb::types::IndexStatus::Updating) => TableStatus::Updating,
                    Some(aws_sdk_dynamodb::types::IndexStatus::Deleting) => TableStatus::Deleting,
                    _ => TableStatus::Active,
                })
                .collect();

            let status = match table.table_status() {
                Some(aws_sdk_dynamodb::types::TableStatus::Active) => TableStatus::Active,
                Some(aws_sdk_dynamodb::types::TableStatus::Creating) => TableStatus::Creating,
                Some(aws_sdk_dynamodb::types::TableStatus::Updating) => TableStatus::Updating,
                Some(aws_sdk_dynamodb::types::TableStatus::Deleting) => TableStatus::Deleting,
                _ => TableStatus::Active,
            };

            Ok(Some(TableState {
                status,
                index_statuses,
            }))
        }
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_resource_not_found_exception() {
                Ok(None)
            } else {
                Err(SchemaError::AwsSdk(service_err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let local = StoreConfig {
            endpoint_url: Some("http://localhost:8000".to_string()),
            region: "ap-northeast-1".to_string(),
        };
        assert_eq!(
            local.target_display(),
            "Local DynamoDB (http://localhost:8000)"
        );

        let aws = StoreConfig {
            endpoint_url: None,
            region: "us-east-1".to_string(),
        };
        assert_eq!(aws.target_display(), "AWS DynamoDB (region: us-east-1)");
    }

    #[test]
    fn test_table_state_readiness() {
        let ready = TableState {
            status: TableStatus::Active,
            index_statuses: vec![TableStatus::Active],
        };
        assert!(ready.is_ready());

        let index_building = TableState {
            status: TableStatus::Active,
            index_statuses: vec![TableStatus::Creating],
        };
        assert!(!index_building.is_ready());

        let creating = TableState {
            status: TableStatus::Creating,
            index_statuses: vec![],
        };
        assert!(!creating.is_ready());
    }
}
