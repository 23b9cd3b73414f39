//! Workspace descriptors.

use serde::{Deserialize, Serialize};

use crate::traits::{Capabilities, Resource};

/// A workspace as listed by `4.0/workspaces`.
///
/// Workspaces are fixed by the server: they can be listed and read, never
/// created, changed or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDetail {
    /// `production` or `dev`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<WorkspaceProject>>,
}

/// The state of one project within a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch_name: Option<String>,
}

impl Resource for WorkspaceDetail {
    type Id = String;
    const NAME: &'static str = "Workspace";
    const PATH: &'static str = "workspaces";
    const CAPABILITIES: Capabilities = Capabilities::READ_ONLY;
}
