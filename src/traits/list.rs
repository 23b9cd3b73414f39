//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::resource::{ensure_supported, Operation, Resource};
use crate::client::LookerClient;
use crate::error::Result;
use crate::pagination::{ListParams, Paginator};
use crate::response::Response;

/// List entities, following pagination links.
///
/// # Example
///
/// ```ignore
/// use lookerapi::{List, ListParams, User};
///
/// // Everything, however many pages it takes
/// let (users, _) = User::list(&client).await?;
///
/// // Page by page, 50 at a time
/// let mut pages = User::paginate(&client, &ListParams::with_limit(50))?;
/// while let Some(page) = pages.next_page().await? {
///     println!("{} users", page.len());
/// }
/// ```
#[async_trait]
pub trait List: DeserializeOwned + Sized + Send {
    /// A lazy paginator over the collection.
    ///
    /// # Errors
    ///
    /// Returns `Unimplemented` if the resource has no list endpoint.
    fn paginate<'a>(client: &'a LookerClient, params: &ListParams) -> Result<Paginator<'a, Self>>;

    /// All entities matching `params`, in server page order.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or pagination loops.
    async fn list_with(client: &LookerClient, params: &ListParams) -> Result<(Vec<Self>, Response)> {
        Self::paginate(client, params)?.collect_all().await
    }

    /// All entities, in server page order.
    async fn list(client: &LookerClient) -> Result<(Vec<Self>, Response)> {
        Self::list_with(client, &ListParams::default()).await
    }
}

#[async_trait]
impl<T: Resource> List for T {
    fn paginate<'a>(client: &'a LookerClient, params: &ListParams) -> Result<Paginator<'a, T>> {
        ensure_supported::<T>(Operation::List)?;
        Paginator::new(client, &T::collection_path(), params)
    }
}
