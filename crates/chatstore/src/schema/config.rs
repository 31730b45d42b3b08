//! Table configuration types (pure data, no I/O).

/// Names of the two tables the store operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub chat_history: String,
    pub user_sessions: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            chat_history: std::env::var("CHAT_HISTORY_TABLE")
                .unwrap_or_else(|_| "ChatHistory".to_string()),
            user_sessions: std::env::var("USER_SESSIONS_TABLE")
                .unwrap_or_else(|_| "UserSessions".to_string()),
        }
    }
}

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub gsis: Vec<GsiConfig>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl KeyAttribute {
    fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::String,
        }
    }

    fn number(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute_type: AttributeType::Number,
        }
    }
}

/// DynamoDB attribute types used in key schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

/// Global Secondary Index configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub projection: ProjectionType,
}

/// GSI projection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    All,
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

/// Returns the canonical configuration of the `ChatHistory` table.
///
/// Partition `userId`, sort `sessionId` (the composite message sort key),
/// plus a `TimestampIndex` GSI keyed by timestamp then user.
pub fn chat_history_table(name: &str) -> TableConfig {
    TableConfig {
        table_name: name.to_string(),
        partition_key: KeyAttribute::string("userId"),
        sort_key: Some(KeyAttribute::string("sessionId")),
        gsis: vec![GsiConfig {
            name: "TimestampIndex".to_string(),
            partition_key: KeyAttribute::number("timestamp"),
            sort_key: Some(KeyAttribute::string("userId")),
            projection: ProjectionType::All,
        }],
        billing_mode: BillingMode::PayPerRequest,
    }
}

/// Returns the canonical configuration of the `UserSessions` table.
///
/// Partition `userId`, sort `sessionId`, plus a `LastActivityIndex` GSI
/// keyed by last activity then user.
pub fn user_sessions_table(name: &str) -> TableConfig {
    TableConfig {
        table_name: name.to_string(),
        partition_key: KeyAttribute::string("userId"),
        sort_key: Some(KeyAttribute::string("sessionId")),
        gsis: vec![GsiConfig {
            name: "LastActivityIndex".to_string(),
            partition_key: KeyAttribute::number("lastActivity"),
            sort_key: Some(KeyAttribute::string("userId")),
            projection: ProjectionType::All,
        }],
        billing_mode: BillingMode::PayPerRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_history_table_shape() {
        let config = chat_history_table("ChatHistory");

        assert_eq!(config.table_name, "ChatHistory");
        assert_eq!(config.partition_key, KeyAttribute::string("userId"));
        assert_eq!(config.sort_key, Some(KeyAttribute::string("sessionId")));
        assert_eq!(config.billing_mode, BillingMode::PayPerRequest);

        assert_eq!(config.gsis.len(), 1);
        let gsi = &config.gsis[0];
        assert_eq!(gsi.name, "TimestampIndex");
        assert_eq!(gsi.partition_key, KeyAttribute::number("timestamp"));
        assert_eq!(gsi.sort_key, Some(KeyAttribute::string("userId")));
        assert_eq!(gsi.projection, ProjectionType::All);
    }

    #[test]
    fn test_user_sessions_table_shape() {
        let config = user_sessions_table("UserSessions");

        assert_eq!(config.table_name, "UserSessions");
        assert_eq!(config.partition_key, KeyAttribute::string("userId"));
        assert_eq!(config.sort_key, Some(KeyAttribute::string("sessionId")));

        assert_eq!(config.gsis.len(), 1);
        let gsi = &config.gsis[0];
        assert_eq!(gsi.name, "LastActivityIndex");
        assert_eq!(gsi.partition_key, KeyAttribute::number("lastActivity"));
        assert_eq!(gsi.sort_key, Some(KeyAttribute::string("userId")));
    }

    #[test]
    fn test_table_names_have_defaults() {
        // Only meaningful when the env overrides are unset, which is the
        // common case in CI.
        if std::env::var("CHAT_HISTORY_TABLE").is_err()
            && std::env::var("USER_SESSIONS_TABLE").is_err()
        {
            let names = TableNames::default();
            assert_eq!(names.chat_history, "ChatHistory");
            assert_eq!(names.user_sessions, "UserSessions");
        }
    }
}
