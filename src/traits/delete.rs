//! Delete trait for removing entities.

use async_trait::async_trait;

use super::resource::{ensure_supported, not_found, Operation, Resource};
use crate::client::LookerClient;
use crate::error::Result;
use crate::response::Response;

/// Delete an entity.
///
/// A second delete of the same id fails with
/// [`LookerError::NotFound`](crate::LookerError::NotFound); callers that only
/// care about the entity being gone can treat that as success.
#[async_trait]
pub trait Delete {
    /// The ID type for this entity.
    type Id;

    async fn delete(client: &LookerClient, id: Self::Id) -> Result<Response>;
}

#[async_trait]
impl<T: Resource> Delete for T {
    type Id = T::Id;

    #[tracing::instrument(skip(client, id), fields(entity = T::NAME, id = %id))]
    async fn delete(client: &LookerClient, id: T::Id) -> Result<Response> {
        ensure_supported::<T>(Operation::Delete)?;

        client
            .delete(&T::member_path(&id))
            .await
            .map_err(not_found::<T>(&id))
    }
}
