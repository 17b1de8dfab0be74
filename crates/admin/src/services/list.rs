//! Paged list fetching through the list cache.
//!
//! Listing is what opens a list view: the page is always fetched from the API
//! and stored as a fresh slot. Mutations then patch that slot, and the patched
//! page is handed back with the mutation's result so the view can re-render
//! without another fetch.

use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;
use yumbox_core::Actor;

use crate::api::ApiClient;
use crate::cache::{CachedList, ListCache, ListPatch, ListQueryKey};
use crate::scope::{self, ListEntity, ListParams};

use super::ServiceError;

/// One rendered list page.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// Slot the page is cached under. The caller remembers it as the
    /// session's active key so later mutations patch this page.
    #[serde(skip)]
    pub key: ListQueryKey,
}

/// The active list page after a mutation was applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchedList<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Shared list plumbing for one entity type.
pub struct Lister<'a, E: ListEntity> {
    api: &'a ApiClient,
    cache: &'a ListCache<E>,
    page_size: u32,
}

impl<'a, E: ListEntity> Lister<'a, E> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, cache: &'a ListCache<E>, page_size: u32) -> Self {
        Self {
            api,
            cache,
            page_size,
        }
    }

    /// Fetch one page for `actor` and store it under its derived key.
    ///
    /// The page and its total are fetched together and replace whatever was
    /// cached for the same variables. `previous` is the page the caller was
    /// viewing before; when the variables changed (another page, another
    /// search) that slot is discarded.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if either query fails. Nothing is stored
    /// or discarded in that case.
    #[instrument(skip(self, token, previous), fields(entity = E::LIST_QUERY))]
    pub async fn page(
        &self,
        actor: &Actor,
        token: &SecretString,
        params: &ListParams,
        previous: Option<&ListQueryKey>,
    ) -> Result<ListPage<E>, ServiceError> {
        let args = scope::list_args::<E>(actor, params, self.page_size);
        let key = scope::list_key::<E>(&args).map_err(ServiceError::CacheKey)?;
        let count_args = scope::count_args::<E>(&args);

        let (records, total) = tokio::try_join!(
            self.api.execute::<E::List>(args, Some(token)),
            self.api.execute::<E::Count>(count_args, Some(token)),
        )?;

        let list = CachedList::new(records.into_inner(), total.into_inner());
        self.cache.put(key.clone(), list.clone()).await;

        if let Some(previous) = previous.filter(|previous| **previous != key) {
            tracing::debug!(key = %previous, "Discarding previous list page");
            self.cache.invalidate(previous).await;
        }

        Ok(ListPage {
            items: list.records,
            total: list.total,
            page: params.page(),
            page_size: self.page_size,
            key,
        })
    }

    /// Patch the session's active page, if there is one.
    pub async fn patch(&self, active_key: Option<&ListQueryKey>, patch: ListPatch<E>) {
        match active_key {
            Some(key) => {
                self.cache.patch(key, patch).await;
            }
            None => tracing::debug!("No active list page to patch"),
        }
    }

    /// The session's active page as it stands now, if it is still cached.
    pub async fn current(&self, active_key: Option<&ListQueryKey>) -> Option<PatchedList<E>> {
        let list = self.cache.get(active_key?).await?;
        Some(PatchedList {
            items: list.records.clone(),
            total: list.total,
        })
    }
}
