//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `auth` - Sign-in against the platform API
//! - `list` - Paged, cached list fetching shared by every entity
//! - `products` - Product management, including restaurant categories
//! - `promocodes` - Promocode management
//! - `restaurants` - Restaurant selector (admins only)
//!
//! Every mutation patches the caller's active list page with the record the
//! API returned, and only after the API call succeeded.

pub mod auth;
mod error;
pub mod list;
pub mod products;
pub mod promocodes;
pub mod restaurants;

pub use auth::{AuthService, SignedIn};
pub use error::ServiceError;
pub use list::{ListPage, Lister, PatchedList};
pub use products::{ProductForm, ProductService, merge_categories, new_categories};
pub use promocodes::{PromocodeForm, PromocodeService};
pub use restaurants::RestaurantService;

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// A money amount as typed into a form.
///
/// Accepts a JSON string (`"1 500"`, `"99,90"`) or a JSON number. Parsing to
/// a decimal happens in the service so errors surface as validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AmountInput(String);

impl AmountInput {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AmountInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = AmountInput;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an amount as a string or a number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(AmountInput(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(AmountInput(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AmountInput(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(AmountInput(v.to_string()))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
