//! The signed-in actor and its role.
//!
//! Every list and detail query is scoped by the actor: admins see the whole
//! platform, moderators only ever see their own restaurant.

use serde::{Deserialize, Serialize};

use super::id::RestaurantId;

/// Dashboard role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator. Sees and edits every restaurant's records.
    Admin,
    /// Restaurant moderator. Restricted to one restaurant.
    Moderator,
}

impl Role {
    /// Role name as used in URLs and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor on whose behalf queries are built.
///
/// A moderator always owns exactly one restaurant, so the restaurant id is
/// part of the variant rather than an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Actor {
    Admin,
    Moderator { restaurant_id: RestaurantId },
}

impl Actor {
    /// The actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Moderator { .. } => Role::Moderator,
        }
    }

    /// The restaurant this actor is confined to, if any.
    #[must_use]
    pub const fn restaurant_id(&self) -> Option<RestaurantId> {
        match self {
            Self::Admin => None,
            Self::Moderator { restaurant_id } => Some(*restaurant_id),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this actor may see a record owned by `owner`.
    ///
    /// Admins see everything. Moderators only see records of their own
    /// restaurant; unowned records are hidden from them.
    #[must_use]
    pub fn can_access(&self, owner: Option<RestaurantId>) -> bool {
        match self {
            Self::Admin => true,
            Self::Moderator { restaurant_id } => owner == Some(*restaurant_id),
        }
    }
}
