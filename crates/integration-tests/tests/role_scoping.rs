//! Integration tests for role-based query scoping.
//!
//! Moderators only ever query their own restaurant. Admins see the whole
//! platform and may narrow lists to one restaurant.

use serde_json::json;
use yumbox_admin::scope::ListParams;
use yumbox_admin::services::{AmountInput, PromocodeForm, ServiceError};
use yumbox_core::{Actor, PromocodeId, RestaurantId};
use yumbox_integration_tests::{
    ScriptedTransport, TEST_TOKEN, moderator, promocode, script_promocode_list, state_with, token,
};

#[tokio::test]
async fn test_moderator_list_is_scoped_to_own_restaurant() {
    let transport = ScriptedTransport::new();
    script_promocode_list(&transport, &[promocode(1, "A", 10, Some(7))]);
    let state = state_with(transport.clone());

    let params = ListParams {
        search: Some("sale".to_string()),
        // A moderator cannot widen the scope by naming another restaurant
        restaurant_id: Some(RestaurantId::new(8)),
        ..ListParams::default()
    };
    state
        .promocodes()
        .list(&moderator(7), &token(), &params, None)
        .await
        .unwrap();

    assert_eq!(
        transport.last_variables("FindManyPromocode").unwrap(),
        json!({
            "where": {
                "restaurantId": {"equals": 7},
                "delete": {"equals": false},
                "code": {"contains": "sale", "mode": "insensitive"}
            },
            "orderBy": [{"createdAt": "desc"}],
            "take": 20,
            "skip": 0
        })
    );
    assert_eq!(
        transport.last_variables("FindManyPromocodeCount").unwrap(),
        json!({
            "where": {
                "restaurantId": {"equals": 7},
                "delete": {"equals": false},
                "code": {"contains": "sale", "mode": "insensitive"}
            }
        })
    );
}

#[tokio::test]
async fn test_admin_list_spans_all_restaurants() {
    let transport = ScriptedTransport::new();
    script_promocode_list(&transport, &[]);
    let state = state_with(transport.clone());

    let page = state
        .promocodes()
        .list(
            &Actor::Admin,
            &token(),
            &ListParams {
                page: Some(2),
                ..ListParams::default()
            },
            None,
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.page, 2);
    assert_eq!(
        transport.last_variables("FindManyPromocode").unwrap(),
        json!({
            "where": {"delete": {"equals": false}},
            "orderBy": [{"createdAt": "desc"}],
            "take": 20,
            "skip": 20
        })
    );
}

#[tokio::test]
async fn test_admin_can_narrow_to_one_restaurant() {
    let transport = ScriptedTransport::new();
    script_promocode_list(&transport, &[]);
    let state = state_with(transport.clone());

    state
        .promocodes()
        .list(
            &Actor::Admin,
            &token(),
            &ListParams {
                restaurant_id: Some(RestaurantId::new(3)),
                publish: Some(true),
                ..ListParams::default()
            },
            None,
        )
        .await
        .unwrap();

    let variables = transport.last_variables("FindManyPromocode").unwrap();
    assert_eq!(variables["where"]["restaurantId"], json!({"equals": 3}));
    assert_eq!(variables["where"]["publish"], json!({"equals": true}));
}

#[tokio::test]
async fn test_every_call_carries_the_session_token() {
    let transport = ScriptedTransport::new();
    script_promocode_list(&transport, &[]);
    let state = state_with(transport.clone());

    state
        .promocodes()
        .list(&moderator(7), &token(), &ListParams::default(), None)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| r.token.as_deref() == Some(TEST_TOKEN))
    );
}

#[tokio::test]
async fn test_moderator_cannot_see_other_restaurant_record() {
    let transport = ScriptedTransport::new();
    transport.reply(
        "FindUniquePromocode",
        json!({"findUniquePromocode": promocode(4, "OTHER", 10, Some(8))}),
    );
    let state = state_with(transport.clone());

    let err = state
        .promocodes()
        .find(&moderator(7), &token(), PromocodeId::new(4))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_moderator_cannot_change_other_restaurant_record() {
    let transport = ScriptedTransport::new();
    transport.reply(
        "FindUniquePromocode",
        json!({"findUniquePromocode": promocode(4, "OTHER", 10, Some(8))}),
    );
    let state = state_with(transport.clone());
    let service = state.promocodes();
    let actor = moderator(7);
    let token = token();

    let form = PromocodeForm {
        code: "MINE".to_string(),
        discount: AmountInput::from("10"),
        publish: true,
        restaurant_id: None,
    };
    let update = service
        .update(&actor, &token, PromocodeId::new(4), &form, None)
        .await;
    let publish = service
        .set_published(&actor, &token, PromocodeId::new(4), false, None)
        .await;
    let delete = service
        .delete(&actor, &token, PromocodeId::new(4), None)
        .await;

    assert!(matches!(update, Err(ServiceError::NotFound)));
    assert!(matches!(publish, Err(ServiceError::NotFound)));
    assert!(matches!(delete, Err(ServiceError::NotFound)));
    assert_eq!(transport.count("UpdateOnePromocode"), 0);
    assert_eq!(transport.count("DeleteOnePromocode"), 0);
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let transport = ScriptedTransport::new();
    transport.reply("FindUniquePromocode", json!({"findUniquePromocode": null}));
    let state = state_with(transport.clone());

    let err = state
        .promocodes()
        .find(&Actor::Admin, &token(), PromocodeId::new(99))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_restaurant_selector_is_admin_only() {
    let transport = ScriptedTransport::new();
    transport.reply(
        "FindManyRestaurant",
        json!({"findManyRestaurant": [
            {"id": 7, "name": "Pelmeni"},
            {"id": 8, "name": "Khinkali"}
        ]}),
    );
    let state = state_with(transport.clone());

    let err = state
        .restaurants()
        .list(&moderator(7), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AdminOnly));
    assert!(transport.requests().is_empty());

    let restaurants = state
        .restaurants()
        .list(&Actor::Admin, &token())
        .await
        .unwrap();
    let names: Vec<&str> = restaurants.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Pelmeni", "Khinkali"]);
    assert_eq!(
        transport.last_variables("FindManyRestaurant").unwrap(),
        json!({"where": {"delete": {"equals": false}}})
    );
}
