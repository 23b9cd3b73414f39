//! Get trait for fetching single entities.

use async_trait::async_trait;

use super::resource::{ensure_supported, not_found, Operation, Resource};
use crate::client::LookerClient;
use crate::error::Result;
use crate::response::Response;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use lookerapi::{Get, LookerClient, ModelSet};
///
/// let (model_set, _) = ModelSet::get(&client, "3".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::NotFound`](crate::LookerError::NotFound) if the
    /// API answers 404, or `Unimplemented` if the resource has no get endpoint.
    async fn get(client: &LookerClient, id: Self::Id) -> Result<(Self, Response)>;
}

#[async_trait]
impl<T: Resource> Get for T {
    type Id = T::Id;

    #[tracing::instrument(skip(client, id), fields(entity = T::NAME, id = %id))]
    async fn get(client: &LookerClient, id: T::Id) -> Result<(T, Response)> {
        ensure_supported::<T>(Operation::Get)?;

        let response = client
            .get(&T::member_path(&id))
            .await
            .map_err(not_found::<T>(&id))?;
        let entity = response.json()?;
        Ok((entity, response))
    }
}
