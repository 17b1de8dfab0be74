//! Session-related types for dashboard authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use yumbox_core::{Actor, Role, UserId};

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role, with the moderator's restaurant.
    pub actor: Actor,
}

impl CurrentUser {
    #[must_use]
    pub const fn role(&self) -> Role {
        self.actor.role()
    }
}

/// Session keys for authentication and list state.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the platform API token issued at sign-in.
    pub const API_TOKEN: &str = "api_token";

    /// Key of the promocode list page this session last rendered.
    pub const ACTIVE_PROMOCODE_LIST: &str = "active_promocode_list";

    /// Key of the product list page this session last rendered.
    pub const ACTIVE_PRODUCT_LIST: &str = "active_product_list";
}
