//! Integration test support for Yumbox Admin.
//!
//! The dashboard talks to nothing but the platform GraphQL API, so tests drive
//! it through a [`ScriptedTransport`]: every operation gets a canned response
//! and every request is recorded for inspection.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yumbox-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use yumbox_admin::api::{ApiClient, ApiError, GraphQLError, GraphQLTransport};
use yumbox_admin::config::AdminConfig;
use yumbox_admin::state::AppState;
use yumbox_core::{Actor, RestaurantId};

/// Token used for every signed-in call in tests.
pub const TEST_TOKEN: &str = "tok_test_9fK2xQ7p";

/// A request seen by the [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation: String,
    pub variables: Value,
    pub token: Option<String>,
}

/// Transport that answers each operation with a scripted envelope.
///
/// A scripted reply is reused for every call of that operation until it is
/// replaced. Unscripted operations fail with a GraphQL error.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `operation` with `data`.
    pub fn reply(&self, operation: &str, data: Value) {
        self.script(operation, json!({ "data": data }));
    }

    /// Answer `operation` with a GraphQL error.
    pub fn fail(&self, operation: &str, message: &str) {
        self.script(
            operation,
            json!({ "data": null, "errors": [{ "message": message }] }),
        );
    }

    /// Answer `operation` with a GraphQL error marked as an authentication
    /// failure.
    pub fn refuse(&self, operation: &str, message: &str) {
        self.script(
            operation,
            json!({
                "data": null,
                "errors": [{ "message": message, "extensions": { "code": "UNAUTHENTICATED" } }]
            }),
        );
    }

    fn script(&self, operation: &str, envelope: Value) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation.to_string(), envelope);
    }

    /// Every request so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Operation names of every request so far, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.operation).collect()
    }

    /// How many times `operation` was sent.
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// Variables of the latest `operation` request.
    #[must_use]
    pub fn last_variables(&self, operation: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.operation == operation)
            .map(|r| r.variables)
    }
}

#[async_trait]
impl GraphQLTransport for ScriptedTransport {
    async fn send(&self, body: &Value, token: Option<&SecretString>) -> Result<Value, ApiError> {
        let operation = body["operationName"].as_str().unwrap_or_default().to_string();

        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                operation: operation.clone(),
                variables: body["variables"].clone(),
                token: token.map(|t| t.expose_secret().to_string()),
            });

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .cloned()
            .ok_or_else(|| {
                ApiError::GraphQL(vec![GraphQLError::message(format!(
                    "unscripted operation {operation}"
                ))])
            })
    }
}

/// Configuration with defaults and a dummy endpoint.
///
/// # Panics
///
/// Panics if the defaults stop parsing.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig::from_lookup(&|key| {
        (key == "API_URL").then(|| "http://localhost:4000/graphql".to_string())
    })
    .expect("test configuration")
}

/// Application state over `transport`.
#[must_use]
pub fn state_with(transport: Arc<ScriptedTransport>) -> AppState {
    AppState::with_client(test_config(), ApiClient::new(transport))
}

#[must_use]
pub fn token() -> SecretString {
    SecretString::from(TEST_TOKEN)
}

#[must_use]
pub const fn moderator(restaurant_id: i32) -> Actor {
    Actor::Moderator {
        restaurant_id: RestaurantId::new(restaurant_id),
    }
}

/// Promocode record as the API returns it.
#[must_use]
pub fn promocode(id: i32, code: &str, discount: u32, restaurant: Option<i32>) -> Value {
    json!({
        "id": id,
        "code": code,
        "discount": discount,
        "publish": true,
        "restaurant": restaurant.map(|id| json!({"id": id, "name": format!("Restaurant {id}")})),
    })
}

/// Product record as the API returns it.
#[must_use]
pub fn product(id: i32, name: &str, restaurant: Option<i32>) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "image": format!("{id}.jpg"),
        "price": 350,
        "categories": ["Soups"],
        "types": [],
        "publish": true,
        "restaurant": restaurant.map(|id| json!({"id": id, "name": format!("Restaurant {id}")})),
    })
}

/// Script a promocode list page and its total.
pub fn script_promocode_list(transport: &ScriptedTransport, rows: &[Value]) {
    transport.reply("FindManyPromocode", json!({ "findManyPromocode": rows }));
    transport.reply(
        "FindManyPromocodeCount",
        json!({ "findManyPromocodeCount": rows.len() }),
    );
}

/// Script a product list page and its total.
pub fn script_product_list(transport: &ScriptedTransport, rows: &[Value]) {
    transport.reply("FindManyProduct", json!({ "findManyProduct": rows }));
    transport.reply(
        "FindManyProductCount",
        json!({ "findManyProductCount": rows.len() }),
    );
}
