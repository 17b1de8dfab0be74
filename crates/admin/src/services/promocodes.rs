//! Promocode management.

use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;
use yumbox_core::{Actor, PromocodeId, RestaurantId, parse_whole_amount};

use crate::api::inputs::{
    DataArgs, DecimalSet, PromocodeCreateInput, PromocodeUpdateInput, RestaurantRelation, Set,
    UniqueArgs, UpdateArgs,
};
use crate::api::operations::{
    CreateOnePromocode, DeleteOnePromocode, FindUniquePromocode, UpdateOnePromocode,
};
use crate::api::{ApiClient, Promocode};
use crate::cache::{ListCache, ListPatch, ListQueryKey};
use crate::scope::ListParams;

use super::{AmountInput, ListPage, Lister, PatchedList, ServiceError};

/// Promocode create/edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct PromocodeForm {
    pub code: String,
    /// Whole currency units.
    pub discount: AmountInput,
    #[serde(default)]
    pub publish: bool,
    /// Owning restaurant. Only admins choose it.
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

impl PromocodeForm {
    fn code(&self) -> Result<String, ServiceError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ServiceError::required("code"));
        }
        Ok(code.to_uppercase())
    }
}

/// Promocode service.
pub struct PromocodeService<'a> {
    api: &'a ApiClient,
    lister: Lister<'a, Promocode>,
}

impl<'a> PromocodeService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, cache: &'a ListCache<Promocode>, page_size: u32) -> Self {
        Self {
            api,
            lister: Lister::new(api, cache, page_size),
        }
    }

    /// List promocodes visible to `actor`, discarding the `previous` page when
    /// the variables changed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Api` if the API call fails.
    pub async fn list(
        &self,
        actor: &Actor,
        token: &SecretString,
        params: &ListParams,
        previous: Option<&ListQueryKey>,
    ) -> Result<ListPage<Promocode>, ServiceError> {
        self.lister.page(actor, token, params, previous).await
    }

    /// The active page after the latest patch, if it is still cached.
    pub async fn active_list(
        &self,
        active_key: Option<&ListQueryKey>,
    ) -> Option<PatchedList<Promocode>> {
        self.lister.current(active_key).await
    }

    /// Load one promocode.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if it does not exist or belongs to
    /// another restaurant than the moderator's.
    #[instrument(skip(self, token))]
    pub async fn find(
        &self,
        actor: &Actor,
        token: &SecretString,
        id: PromocodeId,
    ) -> Result<Promocode, ServiceError> {
        let promocode = self
            .api
            .execute::<FindUniquePromocode>(UniqueArgs::new(id), Some(token))
            .await?
            .into_inner()
            .ok_or(ServiceError::NotFound)?;

        if !actor.can_access(promocode.restaurant.as_ref().map(|r| r.id)) {
            tracing::warn!(%id, "Promocode outside actor scope");
            return Err(ServiceError::NotFound);
        }

        Ok(promocode)
    }

    /// Create a promocode and prepend it to the active list page.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank code or a bad discount, or
    /// `ServiceError::Api` if the mutation fails. The cache is untouched on
    /// error.
    #[instrument(skip(self, token, form), fields(code = %form.code))]
    pub async fn create(
        &self,
        actor: &Actor,
        token: &SecretString,
        form: &PromocodeForm,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Promocode, ServiceError> {
        let data = PromocodeCreateInput {
            code: form.code()?,
            discount: parse_whole_amount(form.discount.as_str())?,
            publish: form.publish,
            restaurant: owner(actor, form.restaurant_id).map(RestaurantRelation::connect),
        };

        let created = self
            .api
            .execute::<CreateOnePromocode>(DataArgs { data }, Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %created.id, "Promocode created");
        self.lister
            .patch(active_key, ListPatch::Created(created.clone()))
            .await;
        Ok(created)
    }

    /// Overwrite a promocode with the form's values.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for a record outside the actor's
    /// scope, a validation error for bad input, or `ServiceError::Api`.
    #[instrument(skip(self, token, form))]
    pub async fn update(
        &self,
        actor: &Actor,
        token: &SecretString,
        id: PromocodeId,
        form: &PromocodeForm,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Promocode, ServiceError> {
        let data = PromocodeUpdateInput {
            code: Some(Set::new(form.code()?)),
            discount: Some(DecimalSet {
                set: parse_whole_amount(form.discount.as_str())?,
            }),
            publish: Some(Set::new(form.publish)),
            restaurant: Some(owner(actor, form.restaurant_id).map_or_else(
                RestaurantRelation::disconnect,
                RestaurantRelation::connect,
            )),
        };

        self.find(actor, token, id).await?;
        self.apply_update(token, id, data, active_key).await
    }

    /// Publish or unpublish a promocode.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for a record outside the actor's
    /// scope, or `ServiceError::Api`.
    #[instrument(skip(self, token))]
    pub async fn set_published(
        &self,
        actor: &Actor,
        token: &SecretString,
        id: PromocodeId,
        publish: bool,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Promocode, ServiceError> {
        let data = PromocodeUpdateInput {
            publish: Some(Set::new(publish)),
            ..PromocodeUpdateInput::default()
        };

        self.find(actor, token, id).await?;
        self.apply_update(token, id, data, active_key).await
    }

    /// Delete a promocode and drop it from the active list page.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for a record outside the actor's
    /// scope, or `ServiceError::Api`.
    #[instrument(skip(self, token))]
    pub async fn delete(
        &self,
        actor: &Actor,
        token: &SecretString,
        id: PromocodeId,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Promocode, ServiceError> {
        self.find(actor, token, id).await?;

        let deleted = self
            .api
            .execute::<DeleteOnePromocode>(UniqueArgs::new(id), Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %deleted.id, "Promocode deleted");
        self.lister
            .patch(active_key, ListPatch::Deleted(deleted.id))
            .await;
        Ok(deleted)
    }

    async fn apply_update(
        &self,
        token: &SecretString,
        id: PromocodeId,
        data: PromocodeUpdateInput,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Promocode, ServiceError> {
        let updated = self
            .api
            .execute::<UpdateOnePromocode>(UpdateArgs::new(id, data), Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %updated.id, "Promocode updated");
        self.lister
            .patch(active_key, ListPatch::Updated(updated.clone()))
            .await;
        Ok(updated)
    }
}

/// Restaurant a promocode is attached to: the moderator's own, or the one an
/// admin picked.
const fn owner(actor: &Actor, chosen: Option<RestaurantId>) -> Option<RestaurantId> {
    match actor {
        Actor::Moderator { restaurant_id } => Some(*restaurant_id),
        Actor::Admin => chosen,
    }
}
