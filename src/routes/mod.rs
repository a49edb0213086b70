pub mod docs;
pub mod extract;
pub mod health;
pub mod subscriptions;

pub use docs::create_docs_routes;
pub use health::create_health_routes;
pub use subscriptions::create_subscription_routes;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Human-readable description of the failure
    pub error: String,
}
