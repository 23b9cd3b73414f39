//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Resource;

/// A Looker user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Read-only; derived from the first and last name.
    #[serde(default, skip_serializing)]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<String>>,

    /// Read-only; group membership is managed through the group.
    #[serde(default, skip_serializing)]
    pub group_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// A new, unsaved user.
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            email: Some(email.to_string()),
            ..Self::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled.unwrap_or(false)
    }
}

impl Resource for User {
    type Id = String;
    const NAME: &'static str = "User";
    const PATH: &'static str = "users";
}
