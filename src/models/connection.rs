//! Database connection model.

use serde::{Deserialize, Serialize};

use crate::traits::Resource;

/// A database connection, keyed by name.
///
/// The password is write-only: Looker never returns it, and `Debug` hides it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConnection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dialect name, e.g. `snowflake` or `postgres`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmp_db_name: Option<String>,
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConnection")
            .field("name", &self.name)
            .field("dialect_name", &self.dialect_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Resource for DbConnection {
    type Id = String;
    const NAME: &'static str = "DbConnection";
    const PATH: &'static str = "connections";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let conn = DbConnection {
            name: Some("warehouse".to_string()),
            password: Some("hunter2".to_string()),
            ..DbConnection::default()
        };
        let debug = format!("{conn:?}");
        assert!(debug.contains("warehouse"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_path_uses_name() {
        assert_eq!(
            DbConnection::member_path(&"my warehouse".to_string()),
            "4.0/connections/my%20warehouse"
        );
    }
}
