//! Typed GraphQL input objects and operation variables.
//!
//! These mirror the API's Prisma-style inputs (`where`, `data`, `{set: ..}`,
//! `{connect: ..}`). Optional filters are omitted from the serialized
//! variables rather than sent as `null`, so two argument values that mean the
//! same thing also serialize the same way.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use yumbox_core::RestaurantId;

use super::types::ProductType;

// =============================================================================
// Filters
// =============================================================================

/// `{equals: <id>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFilter<Id> {
    pub equals: Id,
}

/// `{equals: <bool>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolFilter {
    pub equals: bool,
}

impl BoolFilter {
    /// Filter that hides soft-deleted rows.
    #[must_use]
    pub const fn not_deleted() -> Self {
        Self { equals: false }
    }
}

/// String matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Default,
    Insensitive,
}

/// `{contains: <text>, mode: "insensitive"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringFilter {
    pub contains: String,
    pub mode: QueryMode,
}

impl StringFilter {
    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains_insensitive(text: impl Into<String>) -> Self {
        Self {
            contains: text.into(),
            mode: QueryMode::Insensitive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One `orderBy` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub created_at: SortOrder,
}

impl OrderBy {
    /// Most recent first.
    #[must_use]
    pub const fn newest_first() -> Self {
        Self {
            created_at: SortOrder::Desc,
        }
    }
}

/// The filter parts shared by every list query, already scoped to an actor.
///
/// Entity-specific `where` inputs are built from this (see
/// [`crate::scope::ListEntity`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedFilter {
    pub restaurant_id: Option<IdFilter<RestaurantId>>,
    pub delete: BoolFilter,
    pub search: Option<StringFilter>,
    pub publish: Option<BoolFilter>,
}

/// `where` input for promocode lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromocodeWhereInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<IdFilter<RestaurantId>>,
    pub delete: BoolFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<BoolFilter>,
}

impl From<ScopedFilter> for PromocodeWhereInput {
    fn from(filter: ScopedFilter) -> Self {
        Self {
            restaurant_id: filter.restaurant_id,
            delete: filter.delete,
            code: filter.search,
            publish: filter.publish,
        }
    }
}

/// `where` input for product lists and category lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWhereInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<IdFilter<RestaurantId>>,
    pub delete: BoolFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<StringFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<BoolFilter>,
}

impl From<ScopedFilter> for ProductWhereInput {
    fn from(filter: ScopedFilter) -> Self {
        Self {
            restaurant_id: filter.restaurant_id,
            delete: filter.delete,
            name: filter.search,
            publish: filter.publish,
        }
    }
}

impl ProductWhereInput {
    /// Every live product of one restaurant.
    #[must_use]
    pub const fn restaurant(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id: Some(IdFilter {
                equals: restaurant_id,
            }),
            delete: BoolFilter::not_deleted(),
            name: None,
            publish: None,
        }
    }
}

/// `where` input for restaurant lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantWhereInput {
    pub delete: BoolFilter,
}

// =============================================================================
// Operation variables
// =============================================================================

/// Variables of a `findMany*` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyArgs<W> {
    #[serde(rename = "where")]
    pub filter: W,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub order_by: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

/// Variables holding only a `where` input (counts, lookups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereArgs<W> {
    #[serde(rename = "where")]
    pub filter: W,
}

/// `{id: <id>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereUnique<Id> {
    pub id: Id,
}

/// Variables addressing one record by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueArgs<Id> {
    #[serde(rename = "where")]
    pub filter: WhereUnique<Id>,
}

impl<Id> UniqueArgs<Id> {
    #[must_use]
    pub const fn new(id: Id) -> Self {
        Self {
            filter: WhereUnique { id },
        }
    }
}

/// Variables of a `createOne*` mutation or any mutation taking only `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataArgs<D> {
    pub data: D,
}

/// Variables of an `updateOne*` mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateArgs<D, Id> {
    pub data: D,
    #[serde(rename = "where")]
    pub filter: WhereUnique<Id>,
}

impl<D, Id> UpdateArgs<D, Id> {
    #[must_use]
    pub const fn new(id: Id, data: D) -> Self {
        Self {
            data,
            filter: WhereUnique { id },
        }
    }
}

// =============================================================================
// Mutation data
// =============================================================================

/// `{set: <value>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Set<T> {
    pub set: T,
}

impl<T> Set<T> {
    pub const fn new(value: T) -> Self {
        Self { set: value }
    }
}

/// `{set: <number>}` for decimal amounts, sent as JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecimalSet {
    #[serde(with = "rust_decimal::serde::float")]
    pub set: Decimal,
}

/// Relation to the owning restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestaurantRelation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<WhereUnique<RestaurantId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnect: Option<bool>,
}

impl RestaurantRelation {
    #[must_use]
    pub const fn connect(id: RestaurantId) -> Self {
        Self {
            connect: Some(WhereUnique { id }),
            disconnect: None,
        }
    }

    #[must_use]
    pub const fn disconnect() -> Self {
        Self {
            connect: None,
            disconnect: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromocodeCreateInput {
    pub code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub publish: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRelation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PromocodeUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Set<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DecimalSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<Set<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRelation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCreateInput {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub categories: Vec<String>,
    pub types: Vec<ProductType>,
    pub publish: bool,
    pub restaurant: RestaurantRelation,
}

/// Product update. Scalars are wrapped in `{set: ..}`; categories are sent
/// as a plain list and replace the previous ones.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ProductUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Set<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Set<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Set<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<DecimalSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Set<Vec<ProductType>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<Set<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Restaurant update carrying the restaurant's product category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantUpdateInput {
    /// Wire name is the API's (misspelt) field name.
    #[serde(rename = "productsCategoriers")]
    pub products_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInInput {
    pub login: String,
    pub password: String,
}
