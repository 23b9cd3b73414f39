//! The resource contract every typed entity implements.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::API_VERSION;
use crate::error::{LookerError, Result};

/// One CRUD operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operations a resource's endpoints actually support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const ALL: Self = Self {
        list: true,
        get: true,
        create: true,
        update: true,
        delete: true,
    };

    pub const READ_ONLY: Self = Self {
        list: true,
        get: true,
        create: false,
        update: false,
        delete: false,
    };

    pub const NONE: Self = Self {
        list: false,
        get: false,
        create: false,
        update: false,
        delete: false,
    };

    pub const fn supports(self, op: Operation) -> bool {
        match op {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// A Looker entity reachable under `4.0/{PATH}`.
///
/// Implementing this trait is all a model needs to get [`List`](super::List),
/// [`Get`](super::Get), [`Create`](super::Create), [`Update`](super::Update)
/// and [`Delete`](super::Delete). Operations missing from
/// [`CAPABILITIES`](Self::CAPABILITIES) fail with
/// [`LookerError::Unimplemented`] without touching the network.
///
/// # Example
///
/// ```
/// use lookerapi::{Capabilities, Resource};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Theme {
///     id: Option<String>,
///     name: String,
/// }
///
/// impl Resource for Theme {
///     type Id = String;
///     const NAME: &'static str = "Theme";
///     const PATH: &'static str = "themes";
///     const CAPABILITIES: Capabilities = Capabilities::READ_ONLY;
/// }
///
/// assert_eq!(Theme::collection_path(), "4.0/themes");
/// assert_eq!(Theme::member_path(&"a b".to_string()), "4.0/themes/a%20b");
/// ```
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier used in member paths.
    type Id: fmt::Display + Send + Sync;

    /// Human-readable entity name used in errors.
    const NAME: &'static str;

    /// Collection path below the version segment, e.g. `model_sets`.
    const PATH: &'static str;

    /// Operations backed by a real endpoint.
    const CAPABILITIES: Capabilities = Capabilities::ALL;

    /// `4.0/{PATH}`
    fn collection_path() -> String {
        format!("{API_VERSION}/{}", Self::PATH)
    }

    /// `4.0/{PATH}/{id}` with the id percent-encoded.
    fn member_path(id: &Self::Id) -> String {
        format!(
            "{}/{}",
            Self::collection_path(),
            urlencoding::encode(&id.to_string())
        )
    }
}

/// Fail fast for operations the resource does not support.
pub(crate) fn ensure_supported<T: Resource>(op: Operation) -> Result<()> {
    if T::CAPABILITIES.supports(op) {
        Ok(())
    } else {
        Err(LookerError::Unimplemented {
            entity_type: T::NAME,
            operation: op.as_str(),
        })
    }
}

/// Turn a 404 on a member path into a typed not-found.
pub(crate) fn not_found<T: Resource>(id: &T::Id) -> impl FnOnce(LookerError) -> LookerError + '_ {
    move |err| match err {
        LookerError::Api {
            status_code: 404, ..
        } => LookerError::NotFound {
            entity_type: T::NAME,
            id: id.to_string(),
        },
        other => other,
    }
}
