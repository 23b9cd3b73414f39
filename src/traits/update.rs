//! Update trait for modifying entities.

use async_trait::async_trait;

use super::resource::{ensure_supported, not_found, Operation, Resource};
use crate::client::LookerClient;
use crate::error::Result;
use crate::response::Response;

/// Update an existing entity.
///
/// Looker applies PATCH semantics: fields left `None` are not sent and keep
/// their current value.
///
/// # Example
///
/// ```ignore
/// use lookerapi::{ModelSet, Update};
///
/// let patch = ModelSet {
///     name: Some("analysts".to_string()),
///     ..Default::default()
/// };
/// let (updated, _) = ModelSet::update(&client, "3".to_string(), &patch).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id;

    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &LookerClient, id: Self::Id, entity: &Self) -> Result<(Self, Response)>;
}

#[async_trait]
impl<T: Resource> Update for T {
    type Id = T::Id;

    #[tracing::instrument(skip(client, id, entity), fields(entity = T::NAME, id = %id))]
    async fn update(client: &LookerClient, id: T::Id, entity: &T) -> Result<(T, Response)> {
        ensure_supported::<T>(Operation::Update)?;

        let response = client
            .patch(&T::member_path(&id), entity)
            .await
            .map_err(not_found::<T>(&id))?;
        let updated = response.json()?;
        Ok((updated, response))
    }
}
