//! Service error types.

use thiserror::Error;
use yumbox_core::AmountError;

use crate::api::ApiError;

/// Errors that can occur in dashboard services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Platform API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A form amount could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// A required form field is missing or malformed.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    /// The record does not exist or is outside the actor's scope.
    #[error("record not found")]
    NotFound,

    /// The operation is reserved for admins.
    #[error("only admins can do this")]
    AdminOnly,

    /// Sign-in was refused.
    #[error("invalid login or password")]
    InvalidCredentials,

    /// A moderator account is not attached to any restaurant.
    #[error("moderator account has no restaurant")]
    NoRestaurant,

    /// List variables could not be turned into a cache key.
    #[error("cache key error: {0}")]
    CacheKey(#[source] serde_json::Error),
}

impl ServiceError {
    /// A required field was left empty.
    #[must_use]
    pub const fn required(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: "required field",
        }
    }
}
