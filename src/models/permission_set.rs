//! Permission set model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::traits::Resource;

/// A named set of permissions that roles grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_in: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<String>>,
}

impl Resource for PermissionSet {
    type Id = String;
    const NAME: &'static str = "PermissionSet";
    const PATH: &'static str = "permission_sets";
}
