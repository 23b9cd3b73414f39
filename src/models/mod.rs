//! Looker API model types.

mod connection;
mod group;
mod lookml_model;
mod model_set;
mod permission_set;
mod project;
mod role;
mod user;
mod workspace;

pub use connection::*;
pub use group::*;
pub use lookml_model::*;
pub use model_set::*;
pub use permission_set::*;
pub use project::*;
pub use role::*;
pub use user::*;
pub use workspace::*;
