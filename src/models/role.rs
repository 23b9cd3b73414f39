//! Role model and role membership.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Group, ModelSet, PermissionSet, User};
use crate::ops::ResourceOps;
use crate::response::Response;
use crate::traits::Resource;

/// A role: a permission set applied to a model set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_set_id: Option<String>,

    /// Expanded permission set, returned on reads only.
    #[serde(default, skip_serializing)]
    pub permission_set: Option<PermissionSet>,

    /// Expanded model set, returned on reads only.
    #[serde(default, skip_serializing)]
    pub model_set: Option<ModelSet>,

    #[serde(default, skip_serializing)]
    pub user_count: Option<u64>,
}

impl Role {
    pub fn new(name: &str, permission_set_id: &str, model_set_id: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            permission_set_id: Some(permission_set_id.to_string()),
            model_set_id: Some(model_set_id.to_string()),
            ..Self::default()
        }
    }
}

impl Resource for Role {
    type Id = String;
    const NAME: &'static str = "Role";
    const PATH: &'static str = "roles";
}

fn member_path(role_id: &str, kind: &str) -> String {
    format!("{}/{kind}", Role::member_path(&role_id.to_string()))
}

impl ResourceOps<'_, Role> {
    /// Groups holding a role.
    pub async fn groups(&self, role_id: &str) -> Result<(Vec<Group>, Response)> {
        self.client()
            .request_json(Method::GET, &member_path(role_id, "groups"), None)
            .await
    }

    /// Replace the set of groups holding a role.
    #[tracing::instrument(skip(self, group_ids), fields(count = group_ids.len()))]
    pub async fn set_groups(&self, role_id: &str, group_ids: &[String]) -> Result<(Vec<Group>, Response)> {
        let body = serde_json::json!(group_ids);
        self.client()
            .request_json(Method::PUT, &member_path(role_id, "groups"), Some(&body))
            .await
    }

    /// Users holding a role directly.
    pub async fn users(&self, role_id: &str) -> Result<(Vec<User>, Response)> {
        self.client()
            .request_json(Method::GET, &member_path(role_id, "users"), None)
            .await
    }

    /// Replace the set of users holding a role directly.
    #[tracing::instrument(skip(self, user_ids), fields(count = user_ids.len()))]
    pub async fn set_users(&self, role_id: &str, user_ids: &[String]) -> Result<(Vec<User>, Response)> {
        let body = serde_json::json!(user_ids);
        self.client()
            .request_json(Method::PUT, &member_path(role_id, "users"), Some(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_expansions_are_read_only() {
        let json = serde_json::json!({
            "id": "3",
            "name": "Viewer",
            "permission_set_id": "1",
            "model_set_id": "2",
            "permission_set": {"id": "1", "name": "View", "permissions": ["see_looks"]},
            "model_set": {"id": "2", "name": "All", "all_access": true}
        });
        let role: Role = serde_json::from_value(json).unwrap();
        assert_eq!(
            role.model_set.as_ref().and_then(|m| m.all_access),
            Some(true)
        );

        let sent = serde_json::to_value(&role).unwrap();
        assert!(sent.get("permission_set").is_none());
        assert!(sent.get("model_set").is_none());
        assert_eq!(sent["model_set_id"], "2");
    }

    #[test]
    fn test_member_path() {
        assert_eq!(member_path("3", "users"), "4.0/roles/3/users");
    }
}
