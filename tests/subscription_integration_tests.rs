mod common;

use axum::http::{Method, StatusCode};
use common::{RequestBuilder, TestHarness, response_json};
use serde_json::{Value, json};

fn subscription(user_id: &str, service_name: &str, price: i32, start: &str, end: Option<&str>) -> Value {
    let mut body = json!({
        "service_name": service_name,
        "price": price,
        "user_id": user_id,
        "start_date": start,
    });
    if let Some(end) = end {
        body["end_date"] = json!(end);
    }
    body
}

async fn create_subscription(harness: &TestHarness, body: &Value) -> i32 {
    let response = harness
        .make_request(RequestBuilder::json("/api/v1/subscriptions", Method::POST, body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn full_subscription_lifecycle() {
    let harness = TestHarness::new().await;
    let user = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

    // Create
    let id = create_subscription(
        &harness,
        &subscription(user, "Yandex Plus", 400, "07-2025", None),
    )
    .await;

    // Read it back
    let response = harness
        .make_request(RequestBuilder::get(&format!("/api/v1/subscriptions/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["service_name"], "Yandex Plus");
    assert_eq!(body["price"], 400);
    assert_eq!(body["user_id"], user);
    assert_eq!(body["start_date"], "07-2025");
    assert!(body.get("end_date").is_none());

    // Replace, giving it an end date
    let response = harness
        .make_request(RequestBuilder::json(
            &format!("/api/v1/subscriptions/{id}"),
            Method::PUT,
            &subscription(user, "Yandex Plus", 450, "07-2025", Some("12-2025")),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["message"], "Updated");

    let response = harness
        .make_request(RequestBuilder::get(&format!("/api/v1/subscriptions/{id}")))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["price"], 450);
    assert_eq!(body["end_date"], "12-2025");

    // Aggregate sees the updated price
    let response = harness
        .make_request(RequestBuilder::get(&format!(
            "/api/v1/total?start=08-2025&end=09-2025&user_id={user}"
        )))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["total_cost"], 450);

    // Soft delete
    let response = harness
        .make_request(RequestBuilder::delete(&format!("/api/v1/subscriptions/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["message"], "Deleted");

    // Gone from reads, list and aggregate
    let response = harness
        .make_request(RequestBuilder::get(&format!("/api/v1/subscriptions/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = harness
        .make_request(RequestBuilder::get("/api/v1/subscriptions"))
        .await;
    assert_eq!(response_json(response).await["total"], 0);

    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/total?start=01-2025&end=12-2025",
        ))
        .await;
    assert_eq!(response_json(response).await["total_cost"], 0);
}

#[tokio::test]
async fn list_pagination_and_filtering_across_users() {
    let harness = TestHarness::new().await;

    for i in 0..12 {
        create_subscription(
            &harness,
            &subscription("user-a", &format!("Service {i}"), 100, "01-2025", None),
        )
        .await;
    }
    create_subscription(
        &harness,
        &subscription("user-b", "Netflix", 400, "01-2025", None),
    )
    .await;

    // Second page for user-a
    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/subscriptions?user_id=user-a&page=2&limit=10",
        ))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["total"], 12);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_pages"], 2);

    // Service-name filter is a case-insensitive substring match
    let response = harness
        .make_request(RequestBuilder::get("/api/v1/subscriptions?service_name=NETFLIX"))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["user_id"], "user-b");
}

#[tokio::test]
async fn total_cost_combines_filters_and_period() {
    let harness = TestHarness::new().await;

    create_subscription(
        &harness,
        &subscription("user-a", "Netflix", 400, "01-2024", Some("06-2024")),
    )
    .await;
    create_subscription(
        &harness,
        &subscription("user-a", "Spotify", 300, "03-2024", None),
    )
    .await;
    create_subscription(
        &harness,
        &subscription("user-b", "Netflix", 400, "01-2024", None),
    )
    .await;

    // Everyone active in spring 2024
    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/total?start=03-2024&end=04-2024",
        ))
        .await;
    assert_eq!(response_json(response).await["total_cost"], 1100);

    // user-a only, after Netflix expired
    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/total?start=07-2024&end=12-2024&user_id=user-a",
        ))
        .await;
    assert_eq!(response_json(response).await["total_cost"], 300);

    // Service filter on top of the period
    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/total?start=01-2024&end=12-2024&service_name=netflix",
        ))
        .await;
    assert_eq!(response_json(response).await["total_cost"], 800);

    // A period no subscription overlaps
    let response = harness
        .make_request(RequestBuilder::get(
            "/api/v1/total?start=01-2020&end=12-2020",
        ))
        .await;
    assert_eq!(response_json(response).await["total_cost"], 0);
}

#[tokio::test]
async fn malformed_input_yields_400_with_error_body() {
    let harness = TestHarness::new().await;

    // Non-numeric id
    let response = harness
        .make_request(RequestBuilder::get("/api/v1/subscriptions/not-a-number"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "Invalid ID");

    // Bad date in the body
    let response = harness
        .make_request(RequestBuilder::json(
            "/api/v1/subscriptions",
            Method::POST,
            &subscription("user-a", "Netflix", 400, "2024-01", None),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Invalid fields caught by the validator
    let response = harness
        .make_request(RequestBuilder::json(
            "/api/v1/subscriptions",
            Method::POST,
            &subscription("", "Netflix", 400, "01-2024", None),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("user_id"));

    // Aggregate without its mandatory period
    let response = harness
        .make_request(RequestBuilder::get("/api/v1/total?start=01-2024"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(response).await["error"],
        "start and end are required"
    );
}
