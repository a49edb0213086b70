use axum::{
    Router,
    body::Body,
    http::{Method, Request},
};
use serde_json::Value;
use subscription_service::{Config, test_utils::TestServerBuilder};

/// Unified test harness that handles app setup
pub struct TestHarness {
    #[allow(dead_code)]
    pub config: Config,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        let config = (*server.config).clone();
        let app = server.create_app();

        Self { config, app }
    }

    /// Make request using the test app
    pub async fn make_request(&self, request: Request<Body>) -> axum::response::Response {
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.unwrap()
    }
}

/// Unified request builder for the subscription API
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method(Method::DELETE)
            .body(Body::empty())
            .unwrap()
    }

    pub fn json(uri: &str, method: Method, body: &Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method(method)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

/// Read a response body as JSON
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
