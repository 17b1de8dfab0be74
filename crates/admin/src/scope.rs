//! Role-scoped list query construction.
//!
//! [`list_args`] is the only place list variables are derived. Its output is
//! used both to fetch a page and to build the [`ListQueryKey`] the page is
//! cached under, so the synchronizer always addresses the slot the list view
//! actually rendered.

use graphql_client::GraphQLQuery;
use serde::{Deserialize, Serialize};
use yumbox_core::{Actor, RestaurantId};

use crate::api::inputs::{
    BoolFilter, FindManyArgs, IdFilter, OrderBy, ProductWhereInput, PromocodeWhereInput,
    ScopedFilter, StringFilter, WhereArgs,
};
use crate::api::operations::{
    FindManyProduct, FindManyProductCount, FindManyPromocode, FindManyPromocodeCount,
};
use crate::api::{Product, Promocode, Root};
use crate::cache::{ListQueryKey, Record};

/// An entity that can be listed with a scoped `where` input.
pub trait ListEntity: Record + Serialize {
    /// Root field of the list query; also names the cache slot.
    const LIST_QUERY: &'static str;

    type Where: Serialize + From<ScopedFilter> + Clone + Send + Sync;

    /// Page query.
    type List: GraphQLQuery<Variables = FindManyArgs<Self::Where>, ResponseData = Root<Vec<Self>>>;

    /// Total count for the same `where`.
    type Count: GraphQLQuery<Variables = WhereArgs<Self::Where>, ResponseData = Root<u64>>;
}

impl ListEntity for Promocode {
    const LIST_QUERY: &'static str = "findManyPromocode";

    type Where = PromocodeWhereInput;
    type List = FindManyPromocode;
    type Count = FindManyPromocodeCount;
}

impl ListEntity for Product {
    const LIST_QUERY: &'static str = "findManyProduct";

    type Where = ProductWhereInput;
    type List = FindManyProduct;
    type Count = FindManyProductCount;
}

/// User-controlled list parameters (query string of a list page).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub publish: Option<bool>,
    /// Admin-only restaurant filter. Ignored for moderators.
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

impl ListParams {
    /// Page number, with anything below 1 treated as the first page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Build the scoped filter for `actor`.
#[must_use]
pub fn scoped_filter(actor: &Actor, params: &ListParams) -> ScopedFilter {
    let restaurant_id = match actor {
        Actor::Moderator { restaurant_id } => Some(*restaurant_id),
        Actor::Admin => params.restaurant_id,
    }
    .map(|id| IdFilter { equals: id });

    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(StringFilter::contains_insensitive);

    ScopedFilter {
        restaurant_id,
        delete: BoolFilter::not_deleted(),
        search,
        publish: params.publish.map(|equals| BoolFilter { equals }),
    }
}

/// Variables of one list page for `actor`.
#[must_use]
pub fn list_args<E: ListEntity>(
    actor: &Actor,
    params: &ListParams,
    page_size: u32,
) -> FindManyArgs<E::Where> {
    FindManyArgs {
        filter: scoped_filter(actor, params).into(),
        order_by: vec![OrderBy::newest_first()],
        take: Some(page_size),
        skip: Some(page_size.saturating_mul(params.page() - 1)),
    }
}

/// Variables of the count query matching a list page.
#[must_use]
pub fn count_args<E: ListEntity>(args: &FindManyArgs<E::Where>) -> WhereArgs<E::Where> {
    WhereArgs {
        filter: args.filter.clone(),
    }
}

/// Cache key of a list page.
///
/// # Errors
///
/// Returns an error if the variables cannot be serialized.
pub fn list_key<E: ListEntity>(
    args: &FindManyArgs<E::Where>,
) -> Result<ListQueryKey, serde_json::Error> {
    ListQueryKey::new(E::LIST_QUERY, args)
}
