//! Trait definitions for Looker CRUD operations.
//!
//! A model implements [`Resource`]; the operation traits are implemented
//! once, for every resource, on top of the client's request engine.

mod create;
mod delete;
mod get;
mod list;
mod resource;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use resource::{Capabilities, Operation, Resource};
pub use update::Update;
