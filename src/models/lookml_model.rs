//! LookML model configuration.

use serde::{Deserialize, Serialize};

use crate::traits::Resource;

/// Configuration of a LookML model, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookmlModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Connections the model may use when `unlimited_db_connections` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_db_connection_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlimited_db_connections: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_content: Option<bool>,
}

impl Resource for LookmlModel {
    type Id = String;
    const NAME: &'static str = "LookmlModel";
    const PATH: &'static str = "lookml_models";
}
