use crate::server::Server;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscription Service API",
        version = "1.0.0",
        description = "REST API for tracking user subscriptions and aggregating their cost"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::get_subscription,
        crate::routes::subscriptions::update_subscription,
        crate::routes::subscriptions::delete_subscription,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::get_total_cost,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::subscriptions::SubscriptionRequest,
            crate::routes::subscriptions::SubscriptionResponse,
            crate::routes::subscriptions::CreateSubscriptionResponse,
            crate::routes::subscriptions::MessageResponse,
            crate::routes::subscriptions::ListSubscriptionsResponse,
            crate::routes::subscriptions::TotalCostResponse,
        )
    ),
    tags(
        (name = "Subscriptions", description = "Subscription CRUD endpoints"),
        (name = "Analytics", description = "Cost aggregation endpoints"),
        (name = "Health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new().merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
}
