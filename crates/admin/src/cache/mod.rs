//! Cached list pages and the patches applied to them after mutations.
//!
//! A list page fetched from the API is stored under a [`ListQueryKey`] derived
//! from the exact variables it was fetched with. When a create, update or
//! delete succeeds, the server's returned record is used to patch the cached
//! page in place instead of refetching it.
//!
//! - [`key`] - canonical cache keys
//! - [`sync`] - pure list transforms and [`ListPatch`]
//! - [`store`] - the `moka`-backed [`ListCache`]

pub mod key;
pub mod store;
pub mod sync;

pub use key::ListQueryKey;
pub use store::{CachedList, ListCache};
pub use sync::ListPatch;

/// An entity record identified by its `id` field.
pub trait Record: Clone + Send + Sync + 'static {
    type Id: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}
