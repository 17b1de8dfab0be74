//! GraphQL operation definitions for the platform API.
//!
//! Each operation implements `graphql_client::GraphQLQuery` by hand: the
//! document comes from `crates/admin/graphql/*.graphql` (one file per entity,
//! operations selected by name) and the variables/response types are the typed
//! structs from [`super::inputs`] and [`super::types`].

use graphql_client::{GraphQLQuery, QueryBody};
use yumbox_core::{ProductId, PromocodeId, RestaurantId};

use super::inputs::{
    DataArgs, FindManyArgs, ProductCreateInput, ProductUpdateInput, ProductWhereInput,
    PromocodeCreateInput, PromocodeUpdateInput, PromocodeWhereInput, RestaurantUpdateInput,
    RestaurantWhereInput, SignInInput, UniqueArgs, UpdateArgs, WhereArgs,
};
use super::types::{Product, Promocode, RestaurantRef, Root, SignInPayload};

const PROMOCODES: &str = include_str!("../../graphql/promocodes.graphql");
const PRODUCTS: &str = include_str!("../../graphql/products.graphql");
const RESTAURANTS: &str = include_str!("../../graphql/restaurants.graphql");
const AUTH: &str = include_str!("../../graphql/auth.graphql");

/// Declare an operation: unit struct + `GraphQLQuery` impl.
macro_rules! operation {
    ($(#[$meta:meta])* $name:ident in $document:ident: $vars:ty => $data:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $vars;
            type ResponseData = Root<$data>;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Promocodes
// =============================================================================

operation!(FindManyPromocode in PROMOCODES: FindManyArgs<PromocodeWhereInput> => Vec<Promocode>);
operation!(FindManyPromocodeCount in PROMOCODES: WhereArgs<PromocodeWhereInput> => u64);
operation!(FindUniquePromocode in PROMOCODES: UniqueArgs<PromocodeId> => Option<Promocode>);
operation!(CreateOnePromocode in PROMOCODES: DataArgs<PromocodeCreateInput> => Promocode);
operation!(
    UpdateOnePromocode in PROMOCODES: UpdateArgs<PromocodeUpdateInput, PromocodeId> => Promocode
);
operation!(DeleteOnePromocode in PROMOCODES: UniqueArgs<PromocodeId> => Promocode);

// =============================================================================
// Products
// =============================================================================

operation!(FindManyProduct in PRODUCTS: FindManyArgs<ProductWhereInput> => Vec<Product>);
operation!(FindManyProductCount in PRODUCTS: WhereArgs<ProductWhereInput> => u64);
operation!(FindUniqueProduct in PRODUCTS: UniqueArgs<ProductId> => Option<Product>);
operation!(
    /// Categories already used by the products matching the filter.
    FindManyCategoryByProduct in PRODUCTS: WhereArgs<ProductWhereInput> => Vec<String>
);
operation!(CreateOneProduct in PRODUCTS: DataArgs<ProductCreateInput> => Product);
operation!(
    UpdateOneProduct in PRODUCTS: UpdateArgs<ProductUpdateInput, ProductId> => Product
);
operation!(DeleteOneProduct in PRODUCTS: UniqueArgs<ProductId> => Product);

// =============================================================================
// Restaurants
// =============================================================================

operation!(
    FindManyRestaurant in RESTAURANTS: WhereArgs<RestaurantWhereInput> => Vec<RestaurantRef>
);
operation!(
    UpdateOneRestaurant in RESTAURANTS: UpdateArgs<RestaurantUpdateInput, RestaurantId> => RestaurantRef
);

// =============================================================================
// Auth
// =============================================================================

operation!(SignIn in AUTH: DataArgs<SignInInput> => SignInPayload);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::inputs::BoolFilter;

    /// Every operation name must be defined in the document it is sent with,
    /// otherwise the API rejects the request.
    fn assert_defined<Q: GraphQLQuery>(variables: Q::Variables) {
        let body = Q::build_query(variables);
        let needle_query = format!("query {}(", body.operation_name);
        let needle_mutation = format!("mutation {}(", body.operation_name);
        assert!(
            body.query.contains(&needle_query) || body.query.contains(&needle_mutation),
            "{} is not defined in its document",
            body.operation_name
        );
    }

    #[test]
    fn test_promocode_operations_are_defined() {
        assert_defined::<FindUniquePromocode>(UniqueArgs::new(PromocodeId::new(1)));
        assert_defined::<DeleteOnePromocode>(UniqueArgs::new(PromocodeId::new(1)));
        assert_defined::<FindManyPromocodeCount>(WhereArgs {
            filter: PromocodeWhereInput {
                restaurant_id: None,
                delete: BoolFilter::not_deleted(),
                code: None,
                publish: None,
            },
        });
    }

    #[test]
    fn test_product_operations_are_defined() {
        assert_defined::<FindUniqueProduct>(UniqueArgs::new(ProductId::new(1)));
        assert_defined::<DeleteOneProduct>(UniqueArgs::new(ProductId::new(1)));
        assert_defined::<FindManyCategoryByProduct>(WhereArgs {
            filter: ProductWhereInput::restaurant(RestaurantId::new(1)),
        });
    }

    #[test]
    fn test_sign_in_is_defined() {
        assert_defined::<SignIn>(DataArgs {
            data: SignInInput {
                login: "moderator".to_string(),
                password: "hunter2".to_string(),
            },
        });
    }

    #[test]
    fn test_documents_cover_every_entity_operation() {
        for op in [
            "FindManyPromocode(",
            "CreateOnePromocode(",
            "UpdateOnePromocode(",
        ] {
            assert!(PROMOCODES.contains(op), "{op}");
        }
        for op in [
            "FindManyProduct(",
            "FindManyProductCount(",
            "CreateOneProduct(",
            "UpdateOneProduct(",
        ] {
            assert!(PRODUCTS.contains(op), "{op}");
        }
        assert!(RESTAURANTS.contains("FindManyRestaurant("));
        assert!(RESTAURANTS.contains("UpdateOneRestaurant("));
    }
}
