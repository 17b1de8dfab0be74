//! End-to-end tests of the HTTP surface: sessions, JSON bodies and status
//! codes, driven through the router without a network listener.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use yumbox_admin::error::GENERIC_FAILURE;
use yumbox_integration_tests::{ScriptedTransport, promocode, script_promocode_list, state_with};

fn sign_in_reply(role: &str, restaurant: Option<i32>) -> Value {
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

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, cookie, body)
}

/// Sign in through the route and return the session cookie.
async fn sign_in(app: &Router) -> String {
    let (status, cookie, body) = send(
        app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"login": "aigerim", "password": "hunter2"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Signed in");
    cookie.unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = yumbox_admin::app(state_with(ScriptedTransport::new()));

    let (status, _, body) = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn test_list_requires_session() {
    let transport = ScriptedTransport::new();
    let app = yumbox_admin::app(state_with(transport.clone()));

    let (status, _, body) = send(&app, request(Method::GET, "/promocodes", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Sign in to continue"}));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_refused_login_is_unauthorized() {
    let transport = ScriptedTransport::new();
    transport.refuse("SignIn", "Invalid login or password");
    let app = yumbox_admin::app(state_with(transport));

    let (status, cookie, _) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"login": "aigerim", "password": "wrong"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
}

#[tokio::test]
async fn test_login_during_api_outage_is_bad_gateway() {
    let transport = ScriptedTransport::new();
    transport.fail("SignIn", "HTTP 500 Internal Server Error: db down");
    let app = yumbox_admin::app(state_with(transport));

    let (status, cookie, body) = send(
        &app,
        request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"login": "aigerim", "password": "hunter2"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": GENERIC_FAILURE}));
    assert!(cookie.is_none());
}

#[tokio::test]
async fn test_created_promocode_is_patched_into_active_page() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("moderator", Some(7)));
    script_promocode_list(&transport, &[promocode(1, "A", 10, Some(7))]);
    transport.reply(
        "CreateOnePromocode",
        json!({"createOnePromocode": promocode(2, "SPRING", 15, Some(7))}),
    );
    let app = yumbox_admin::app(state_with(transport.clone()));
    let cookie = sign_in(&app).await;

    let (status, _, me) = send(&app, request(Method::GET, "/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Aigerim");

    let (status, _, page) =
        send(&app, request(Method::GET, "/promocodes", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);

    let (status, _, created) = send(
        &app,
        request(
            Method::POST,
            "/promocodes",
            Some(&cookie),
            Some(json!({"code": "spring", "discount": "15", "publish": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["message"], "Promocode added");
    assert_eq!(created["data"]["code"], "SPRING");

    let codes: Vec<&str> = created["list"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["SPRING", "A"]);
    assert_eq!(created["list"]["total"], 2);
    assert_eq!(transport.count("FindManyPromocode"), 1);

    // Every signed-in call uses the token issued at sign-in
    let tokens: Vec<Option<String>> = transport
        .requests()
        .into_iter()
        .filter(|r| r.operation != "SignIn")
        .map(|r| r.token)
        .collect();
    assert!(
        tokens
            .iter()
            .all(|t| t.as_deref() == Some("tok_issued_71Hq"))
    );
}

#[tokio::test]
async fn test_api_failure_shows_generic_message() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("moderator", Some(7)));
    transport.fail("FindManyPromocode", "connect ECONNREFUSED 10.0.0.3:5432");
    transport.reply("FindManyPromocodeCount", json!({"findManyPromocodeCount": 0}));
    let app = yumbox_admin::app(state_with(transport));
    let cookie = sign_in(&app).await;

    let (status, _, body) =
        send(&app, request(Method::GET, "/promocodes", Some(&cookie), None)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": GENERIC_FAILURE}));
}

#[tokio::test]
async fn test_invalid_discount_is_bad_request() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("moderator", Some(7)));
    let app = yumbox_admin::app(state_with(transport.clone()));
    let cookie = sign_in(&app).await;

    let (status, _, body) = send(
        &app,
        request(
            Method::POST,
            "/promocodes",
            Some(&cookie),
            Some(json!({"code": "half", "discount": "12.5"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(transport.count("CreateOnePromocode"), 0);
}

#[tokio::test]
async fn test_restaurants_forbidden_for_moderator() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("moderator", Some(7)));
    let app = yumbox_admin::app(state_with(transport.clone()));
    let cookie = sign_in(&app).await;

    let (status, _, _) =
        send(&app, request(Method::GET, "/restaurants", Some(&cookie), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(transport.count("FindManyRestaurant"), 0);
}

#[tokio::test]
async fn test_restaurants_listed_for_admin() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("admin", None));
    transport.reply(
        "FindManyRestaurant",
        json!({"findManyRestaurant": [{"id": 7, "name": "Pelmeni"}]}),
    );
    let app = yumbox_admin::app(state_with(transport));
    let cookie = sign_in(&app).await;

    let (status, _, body) =
        send(&app, request(Method::GET, "/restaurants", Some(&cookie), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 7, "name": "Pelmeni"}]));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("admin", None));
    let app = yumbox_admin::app(state_with(transport));
    let cookie = sign_in(&app).await;

    let (status, _, body) =
        send(&app, request(Method::POST, "/auth/logout", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Signed out");

    let (status, _, _) = send(&app, request(Method::GET, "/auth/me", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_going_back_to_a_page_refetches_it() {
    let transport = ScriptedTransport::new();
    transport.reply("SignIn", sign_in_reply("moderator", Some(7)));
    script_promocode_list(&transport, &[promocode(1, "A", 10, Some(7))]);
    transport.reply(
        "CreateOnePromocode",
        json!({"createOnePromocode": promocode(5, "E", 50, Some(7))}),
    );
    let app = yumbox_admin::app(state_with(transport.clone()));
    let cookie = sign_in(&app).await;

    send(&app, request(Method::GET, "/promocodes", Some(&cookie), None)).await;
    send(
        &app,
        request(Method::GET, "/promocodes?page=2", Some(&cookie), None),
    )
    .await;
    let (status, _, created) = send(
        &app,
        request(
            Method::POST,
            "/promocodes",
            Some(&cookie),
            Some(json!({"code": "e", "discount": "50"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");

    script_promocode_list(
        &transport,
        &[promocode(5, "E", 50, Some(7)), promocode(1, "A", 10, Some(7))],
    );
    let (status, _, page) =
        send(&app, request(Method::GET, "/promocodes", Some(&cookie), None)).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![5, 1]);
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(transport.count("FindManyPromocode"), 3);
}
