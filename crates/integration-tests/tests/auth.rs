//! Integration tests for dashboard sign-in.

use secrecy::ExposeSecret;
use serde_json::json;
use yumbox_admin::services::ServiceError;
use yumbox_core::{Actor, RestaurantId, Role, UserId};
use yumbox_integration_tests::{ScriptedTransport, state_with};

fn signed_in(role: &str, restaurant: Option<i32>) -> serde_json::Value {
    json!({
        "signIn": {
            "token": "tok_issued_71Hq",
            "user": {
                "id": 5,
                "name": "Aigerim",
                "role": role,
                "restaurant": restaurant.map(|id| json!({"id": id, "name": "Pelmeni"})),
            }
        }
    })
}

#[tokio::test]
async fn test_moderator_sign_in() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", signed_in("moderator", Some(7)));
    let state = state_with(transport.clone());

    let Ok(signed) = state.auth().sign_in(" aigerim ", "hunter2").await else {
        panic!("sign-in refused");
    };

    assert_eq!(signed.user.id, UserId::new(5));
    assert_eq!(signed.user.role(), Role::Moderator);
    assert_eq!(
        signed.user.actor,
        Actor::Moderator {
            restaurant_id: RestaurantId::new(7)
        }
    );
    assert_eq!(signed.token.expose_secret(), "tok_issued_71Hq");

    let request = transport.requests().pop().unwrap();
    assert_eq!(request.operation, "SignIn");
    assert_eq!(
        request.variables,
        json!({"data": {"login": "aigerim", "password": "hunter2"}})
    );
    assert_eq!(request.token, None);
}

#[tokio::test]
async fn test_admin_sign_in_has_no_restaurant() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", signed_in("admin", None));
    let state = state_with(transport);

    let Ok(signed) = state.auth().sign_in("root", "hunter2").await else {
        panic!("sign-in refused");
    };
    assert_eq!(signed.user.actor, Actor::Admin);
}

#[tokio::test]
async fn test_refused_credentials() {
    let transport = ScriptedTransport::new();
    transport.refuse("SignIn", "Invalid login or password");
    let state = state_with(transport);

    let result = state.auth().sign_in("aigerim", "wrong").await;
    assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_api_outage_is_not_a_refusal() {
    let transport = ScriptedTransport::new();
    transport.fail("SignIn", "HTTP 500 Internal Server Error: db down");
    let state = state_with(transport);

    let result = state.auth().sign_in("aigerim", "hunter2").await;
    assert!(matches!(result, Err(ServiceError::Api(_))));
}

#[tokio::test]
async fn test_moderator_without_restaurant_is_refused() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", signed_in("moderator", None));
    let state = state_with(transport);

    let result = state.auth().sign_in("aigerim", "hunter2").await;
    assert!(matches!(result, Err(ServiceError::NoRestaurant)));
}

#[tokio::test]
async fn test_blank_credentials_are_not_sent() {
    let transport = ScriptedTransport::new();
    let state = state_with(transport.clone());

    let login = state.auth().sign_in("  ", "hunter2").await;
    let password = state.auth().sign_in("aigerim", "").await;

    assert!(matches!(
        login,
        Err(ServiceError::Validation { field: "login", .. })
    ));
    assert!(matches!(
        password,
        Err(ServiceError::Validation {
            field: "password",
            ..
        })
    ));
    assert!(transport.requests().is_empty());
}
