//! Restaurant selector for admins.

use secrecy::SecretString;
use tracing::instrument;
use yumbox_core::Actor;

use crate::api::inputs::{BoolFilter, RestaurantWhereInput, WhereArgs};
use crate::api::operations::FindManyRestaurant;
use crate::api::{ApiClient, RestaurantRef};

use super::ServiceError;

pub struct RestaurantService<'a> {
    api: &'a ApiClient,
}

impl<'a> RestaurantService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Every live restaurant, for the admin restaurant filter and selector.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AdminOnly` for moderators, or
    /// `ServiceError::Api` if the query fails.
    #[instrument(skip(self, token))]
    pub async fn list(
        &self,
        actor: &Actor,
        token: &SecretString,
    ) -> Result<Vec<RestaurantRef>, ServiceError> {
        if !actor.is_admin() {
            return Err(ServiceError::AdminOnly);
        }

        let restaurants = self
            .api
            .execute::<FindManyRestaurant>(
                WhereArgs {
                    filter: RestaurantWhereInput {
                        delete: BoolFilter::not_deleted(),
                    },
                },
                Some(token),
            )
            .await?
            .into_inner();

        Ok(restaurants)
    }
}
