//! Product management.
//!
//! Besides the usual list/detail/mutation flow, products carry free-form
//! categories. A restaurant keeps the list of categories its products use;
//! creating a product with a category the restaurant has not seen yet first
//! appends it to that list.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;
use yumbox_core::{Actor, ProductId, RestaurantId, parse_amount};

use crate::api::inputs::{
    DataArgs, DecimalSet, ProductCreateInput, ProductUpdateInput, ProductWhereInput,
    RestaurantRelation, RestaurantUpdateInput, Set, UniqueArgs, UpdateArgs, WhereArgs,
};
use crate::api::operations::{
    CreateOneProduct, DeleteOneProduct, FindManyCategoryByProduct, FindUniqueProduct,
    UpdateOneProduct, UpdateOneRestaurant,
};
use crate::api::{ApiClient, Product, ProductType};
use crate::cache::{ListCache, ListPatch, ListQueryKey};
use crate::scope::ListParams;

use super::{AmountInput, ListPage, Lister, PatchedList, ServiceError};

/// Product create/edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    /// Uploaded image reference.
    pub image: String,
    pub price: AmountInput,
    pub categories: Vec<String>,
    #[serde(default)]
    pub types: Vec<ProductType>,
    #[serde(default)]
    pub publish: bool,
    /// Owning restaurant. Required from admins, ignored for moderators.
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

/// Form values after validation.
#[derive(Debug)]
struct ValidProduct {
    name: String,
    description: String,
    image: String,
    price: Decimal,
    categories: Vec<String>,
}

impl ProductForm {
    fn validate(&self) -> Result<ValidProduct, ServiceError> {
        let name = required(&self.name, "name")?;
        let description = required(&self.description, "description")?;
        let image = required(&self.image, "image")?;
        let price = parse_amount(self.price.as_str())?;

        let categories = new_categories(&self.categories, &[]);
        if categories.is_empty() {
            return Err(ServiceError::required("categories"));
        }

        Ok(ValidProduct {
            name,
            description,
            image,
            price,
            categories,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::required(field));
    }
    Ok(value.to_string())
}

/// Categories in `chosen` that are not in `used`.
///
/// Keeps the order in which they were chosen, drops blanks and repeats.
#[must_use]
pub fn new_categories(chosen: &[String], used: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for category in chosen.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if !used.iter().any(|u| u == category) && !out.iter().any(|o| o == category) {
            out.push(category.to_string());
        }
    }
    out
}

/// The restaurant's category list after adding `new`: `used ++ new`.
#[must_use]
pub fn merge_categories(used: &[String], new: &[String]) -> Vec<String> {
    used.iter().chain(new).cloned().collect()
}

/// Product service.
pub struct ProductService<'a> {
    api: &'a ApiClient,
    lister: Lister<'a, Product>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient, cache: &'a ListCache<Product>, page_size: u32) -> Self {
        Self {
            api,
            lister: Lister::new(api, cache, page_size),
        }
    }

    /// List products visible to `actor`, discarding the `previous` page when
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
    ) -> Result<ListPage<Product>, ServiceError> {
        self.lister.page(actor, token, params, previous).await
    }

    /// The active page after the latest patch, if it is still cached.
    pub async fn active_list(
        &self,
        active_key: Option<&ListQueryKey>,
    ) -> Option<PatchedList<Product>> {
        self.lister.current(active_key).await
    }

    /// Load one product.
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
        id: ProductId,
    ) -> Result<Product, ServiceError> {
        let product = self
            .api
            .execute::<FindUniqueProduct>(UniqueArgs::new(id), Some(token))
            .await?
            .into_inner()
            .ok_or(ServiceError::NotFound)?;

        if !actor.can_access(product.restaurant.as_ref().map(|r| r.id)) {
            tracing::warn!(%id, "Product outside actor scope");
            return Err(ServiceError::NotFound);
        }

        Ok(product)
    }

    /// Categories already used by a restaurant's products.
    ///
    /// Moderators always get their own restaurant's. Admins must name one.
    ///
    /// # Errors
    ///
    /// Returns a validation error if an admin names no restaurant, or
    /// `ServiceError::Api`.
    #[instrument(skip(self, token))]
    pub async fn categories(
        &self,
        actor: &Actor,
        token: &SecretString,
        restaurant_id: Option<RestaurantId>,
    ) -> Result<Vec<String>, ServiceError> {
        let restaurant_id = owner(actor, restaurant_id)?;
        self.used_categories(token, restaurant_id).await
    }

    /// Create a product and prepend it to the active list page.
    ///
    /// Categories the restaurant has not used before are registered on the
    /// restaurant first.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or `ServiceError::Api` if
    /// any call fails. The cache is untouched on error.
    #[instrument(skip(self, token, form), fields(name = %form.name))]
    pub async fn create(
        &self,
        actor: &Actor,
        token: &SecretString,
        form: &ProductForm,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Product, ServiceError> {
        let valid = form.validate()?;
        let restaurant_id = owner(actor, form.restaurant_id)?;

        let used = self.used_categories(token, restaurant_id).await?;
        let new = new_categories(&valid.categories, &used);
        tracing::debug!(used = used.len(), new = new.len(), "Registering categories");

        self.api
            .execute::<UpdateOneRestaurant>(
                UpdateArgs::new(
                    restaurant_id,
                    RestaurantUpdateInput {
                        products_categories: merge_categories(&used, &new),
                    },
                ),
                Some(token),
            )
            .await?;

        let data = ProductCreateInput {
            name: valid.name,
            description: valid.description,
            image: valid.image,
            price: valid.price,
            categories: valid.categories,
            types: form.types.clone(),
            publish: form.publish,
            restaurant: RestaurantRelation::connect(restaurant_id),
        };

        let created = self
            .api
            .execute::<CreateOneProduct>(DataArgs { data }, Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %created.id, "Product created");
        self.lister
            .patch(active_key, ListPatch::Created(created.clone()))
            .await;
        Ok(created)
    }

    /// Overwrite a product with the form's values.
    ///
    /// Categories and types replace the previous ones.
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
        id: ProductId,
        form: &ProductForm,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Product, ServiceError> {
        let valid = form.validate()?;
        let data = ProductUpdateInput {
            name: Some(Set::new(valid.name)),
            description: Some(Set::new(valid.description)),
            image: Some(Set::new(valid.image)),
            price: Some(DecimalSet { set: valid.price }),
            types: Some(Set::new(form.types.clone())),
            publish: Some(Set::new(form.publish)),
            categories: Some(valid.categories),
        };

        self.find(actor, token, id).await?;
        self.apply_update(token, id, data, active_key).await
    }

    /// Publish or unpublish a product.
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
        id: ProductId,
        publish: bool,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Product, ServiceError> {
        let data = ProductUpdateInput {
            publish: Some(Set::new(publish)),
            ..ProductUpdateInput::default()
        };

        self.find(actor, token, id).await?;
        self.apply_update(token, id, data, active_key).await
    }

    /// Delete a product and drop it from the active list page.
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
        id: ProductId,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Product, ServiceError> {
        self.find(actor, token, id).await?;

        let deleted = self
            .api
            .execute::<DeleteOneProduct>(UniqueArgs::new(id), Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %deleted.id, "Product deleted");
        self.lister
            .patch(active_key, ListPatch::Deleted(deleted.id))
            .await;
        Ok(deleted)
    }

    async fn used_categories(
        &self,
        token: &SecretString,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .api
            .execute::<FindManyCategoryByProduct>(
                WhereArgs {
                    filter: ProductWhereInput::restaurant(restaurant_id),
                },
                Some(token),
            )
            .await?
            .into_inner())
    }

    async fn apply_update(
        &self,
        token: &SecretString,
        id: ProductId,
        data: ProductUpdateInput,
        active_key: Option<&ListQueryKey>,
    ) -> Result<Product, ServiceError> {
        let updated = self
            .api
            .execute::<UpdateOneProduct>(UpdateArgs::new(id, data), Some(token))
            .await?
            .into_inner();

        tracing::info!(id = %updated.id, "Product updated");
        self.lister
            .patch(active_key, ListPatch::Updated(updated.clone()))
            .await;
        Ok(updated)
    }
}

/// Restaurant a product belongs to: the moderator's own, or the admin's
/// required choice.
fn owner(actor: &Actor, chosen: Option<RestaurantId>) -> Result<RestaurantId, ServiceError> {
    match actor {
        Actor::Moderator { restaurant_id } => Ok(*restaurant_id),
        Actor::Admin => chosen.ok_or_else(|| ServiceError::required("restaurant_id")),
    }
}
