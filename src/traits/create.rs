//! Create trait for new entities.

use async_trait::async_trait;

use super::resource::{ensure_supported, Operation, Resource};
use crate::client::LookerClient;
use crate::error::Result;
use crate::response::Response;

/// Create an entity.
#[async_trait]
pub trait Create: Sized {
    /// POST the entity and return the server's representation, including the
    /// assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Validation`](crate::LookerError::Validation)
    /// when the API rejects fields of the payload.
    async fn create(client: &LookerClient, entity: &Self) -> Result<(Self, Response)>;
}

#[async_trait]
impl<T: Resource> Create for T {
    #[tracing::instrument(skip_all, fields(entity = T::NAME))]
    async fn create(client: &LookerClient, entity: &T) -> Result<(T, Response)> {
        ensure_supported::<T>(Operation::Create)?;

        let response = client.post(&T::collection_path(), entity).await?;
        let created = response.json()?;
        Ok((created, response))
    }
}
