//! Group model and membership sub-resource.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::User;
use crate::ops::ResourceOps;
use crate::pagination::{ListParams, Paginator};
use crate::response::Response;
use crate::traits::Resource;

/// A group of users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_add_to_content_metadata: Option<bool>,
    #[serde(default, skip_serializing)]
    pub externally_managed: Option<bool>,
    #[serde(default, skip_serializing)]
    pub user_count: Option<u64>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl Resource for Group {
    type Id = String;
    const NAME: &'static str = "Group";
    const PATH: &'static str = "groups";
}

/// Body of `POST groups/{id}/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupIdForGroupUserInclusion {
    pub user_id: String,
}

fn users_path(group_id: &str) -> String {
    format!("{}/users", Group::member_path(&group_id.to_string()))
}

impl<'a> ResourceOps<'a, Group> {
    /// Members of a group, across all pages.
    pub async fn list_users(&self, group_id: &str) -> Result<(Vec<User>, Response)> {
        self.user_pages(group_id, &ListParams::default())?
            .collect_all()
            .await
    }

    /// Members of a group, page by page.
    pub fn user_pages(&self, group_id: &str, params: &ListParams) -> Result<Paginator<'a, User>> {
        Paginator::new(self.client(), &users_path(group_id), params)
    }

    /// Add a user to a group.
    #[tracing::instrument(skip(self))]
    pub async fn add_user(&self, group_id: &str, user_id: &str) -> Result<(User, Response)> {
        let body = GroupIdForGroupUserInclusion {
            user_id: user_id.to_string(),
        };
        let response = self.client().post(&users_path(group_id), &body).await?;
        let user = response.json()?;
        Ok((user, response))
    }

    /// Remove a user from a group.
    #[tracing::instrument(skip(self))]
    pub async fn remove_user(&self, group_id: &str, user_id: &str) -> Result<Response> {
        let path = format!("{}/{}", users_path(group_id), urlencoding::encode(user_id));
        self.client().delete(&path).await
    }
}
