//! Model set model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::traits::Resource;

/// A named set of LookML models that roles grant access to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSet {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Built-in sets cannot be modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_in: Option<bool>,

    /// Whether the set grants access to every model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_access: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<BTreeSet<String>>,
}

impl ModelSet {
    /// A new, unsaved model set.
    pub fn new<I, S>(name: &str, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.to_string()),
            models: Some(models.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in.unwrap_or(false)
    }
}

impl Resource for ModelSet {
    type Id = String;
    const NAME: &'static str = "ModelSet";
    const PATH: &'static str = "model_sets";
}
