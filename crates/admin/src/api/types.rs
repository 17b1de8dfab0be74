//! Records returned by the platform API.

use std::fmt;
use std::marker::PhantomData;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use yumbox_core::{ProductId, PromocodeId, RestaurantId, Role, UserId};

use crate::cache::Record;

// =============================================================================
// Response envelope
// =============================================================================

/// The value of an operation's single root field.
///
/// Every dashboard operation selects exactly one root field
/// (`findManyPromocode`, `createOneProduct`, ...), so response data is decoded
/// as "the one field, whatever its name" and the field's value is checked
/// against `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root<T>(pub T);

impl<T> Root<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Root<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RootVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for RootVisitor<T> {
            type Value = Root<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with exactly one root field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let Some((_, value)) = map.next_entry::<IgnoredAny, T>()? else {
                    return Err(de::Error::invalid_length(0, &self));
                };
                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom("expected exactly one root field"));
                }
                Ok(Root(value))
            }
        }

        deserializer.deserialize_map(RootVisitor(PhantomData))
    }
}

// =============================================================================
// Records
// =============================================================================

/// Denormalized projection of a restaurant: only its id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: RestaurantId,
    pub name: String,
}

/// A promocode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promocode {
    pub id: PromocodeId,
    pub code: String,
    /// Discount in whole currency units.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    pub publish: bool,
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
}

impl Record for Promocode {
    type Id = PromocodeId;

    fn id(&self) -> PromocodeId {
        self.id
    }
}

/// One priced option inside a product type (e.g. "Large" for "Size").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A named group of product options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub name: String,
    #[serde(default)]
    pub list: Vec<ProductOption>,
}

/// A product on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Uploaded image reference.
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub types: Vec<ProductType>,
    pub publish: bool,
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
}

impl Record for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// The dashboard user returned by sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInPayload {
    pub token: String,
    pub user: SignedInUser,
}
