//! Per-resource operation sets handed out by the client facade.

use std::marker::PhantomData;

use crate::client::LookerClient;
use crate::error::Result;
use crate::pagination::{ListParams, Paginator};
use crate::response::Response;
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// CRUD operations for resource `T`, bound to a client.
///
/// Obtained from accessors such as [`LookerClient::model_sets`].
///
/// ```no_run
/// # async fn example(client: lookerapi::LookerClient) -> lookerapi::Result<()> {
/// let (model_set, _) = client.model_sets().get("3").await?;
/// client.model_sets().delete("3").await?;
/// # Ok(())
/// # }
/// ```
pub struct ResourceOps<'a, T> {
    client: &'a LookerClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceOps<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceOps<'_, T> {}

impl<T> std::fmt::Debug for ResourceOps<'_, T>
where
    T: Resource,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceOps")
            .field("resource", &T::NAME)
            .field("path", &T::PATH)
            .finish()
    }
}

impl<'a, T: Resource> ResourceOps<'a, T> {
    pub(crate) fn new(client: &'a LookerClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub(crate) fn client(&self) -> &'a LookerClient {
        self.client
    }

    /// Every entity, across all pages.
    pub async fn list(&self) -> Result<(Vec<T>, Response)> {
        T::list(self.client).await
    }

    /// Entities matching `params`, across all pages.
    pub async fn list_with(&self, params: &ListParams) -> Result<(Vec<T>, Response)> {
        T::list_with(self.client, params).await
    }

    /// A lazy page-by-page walk.
    pub fn pages(&self, params: &ListParams) -> Result<Paginator<'a, T>> {
        T::paginate(self.client, params)
    }

    pub async fn get(&self, id: impl Into<T::Id>) -> Result<(T, Response)> {
        <T as Get>::get(self.client, id.into()).await
    }

    pub async fn create(&self, entity: &T) -> Result<(T, Response)> {
        T::create(self.client, entity).await
    }

    pub async fn update(&self, id: impl Into<T::Id>, entity: &T) -> Result<(T, Response)> {
        <T as Update>::update(self.client, id.into(), entity).await
    }

    pub async fn delete(&self, id: impl Into<T::Id>) -> Result<Response> {
        <T as Delete>::delete(self.client, id.into()).await
    }
}
