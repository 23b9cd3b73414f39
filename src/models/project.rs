//! LookML project model and git deploy key.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ops::ResourceOps;
use crate::response::Response;
use crate::traits::{Capabilities, Resource};

/// A LookML project.
///
/// Projects cannot be deleted through the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_git: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_remote_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_production_branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_warnings: Option<bool>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

impl Resource for Project {
    type Id = String;
    const NAME: &'static str = "Project";
    const PATH: &'static str = "projects";
    const CAPABILITIES: Capabilities = Capabilities {
        delete: false,
        ..Capabilities::ALL
    };
}

fn deploy_key_path(project_id: &str) -> String {
    format!(
        "{}/git/deploy_key",
        Project::member_path(&project_id.to_string())
    )
}

impl ResourceOps<'_, Project> {
    /// The project's public git deploy key (OpenSSH format).
    ///
    /// Only available in the `dev` workspace.
    pub async fn deploy_key(&self, project_id: &str) -> Result<(String, Response)> {
        let response = self.client().get(&deploy_key_path(project_id)).await?;
        Ok((response.text(), response))
    }

    /// Generate a new deploy key, replacing any existing one.
    #[tracing::instrument(skip(self))]
    pub async fn create_deploy_key(&self, project_id: &str) -> Result<(String, Response)> {
        let response = self.client().post_empty(&deploy_key_path(project_id)).await?;
        Ok((response.text(), response))
    }
}
