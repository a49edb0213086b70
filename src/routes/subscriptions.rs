use crate::{
    database::{NewSubscription, SubscriptionFilter, entities::Subscription},
    error::AppError,
    month::{MonthRange, MonthYear},
    routes::{
        ApiErrorResponse,
        extract::{AppJson, AppPath},
    },
    server::Server,
};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

/// Request body for create and full-replace update
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    /// Name of the subscribed service
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    /// Monthly price in whole currency units
    #[schema(example = 400)]
    pub price: i32,
    /// Owning user identifier (UUID)
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    /// First month of validity, MM-YYYY
    #[schema(value_type = String, example = "07-2025")]
    pub start_date: MonthYear,
    /// Last month of validity, MM-YYYY; absent means still active
    #[schema(value_type = Option<String>, example = "12-2025")]
    pub end_date: Option<MonthYear>,
}

impl From<SubscriptionRequest> for NewSubscription {
    fn from(request: SubscriptionRequest) -> Self {
        Self {
            service_name: request.service_name,
            price: request.price,
            user_id: request.user_id,
            start: request.start_date,
            end: request.end_date,
        }
    }
}

/// Subscription record as serialized to clients. Timestamps and the
/// soft-delete marker never appear here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    #[schema(value_type = String)]
    pub start_date: MonthYear,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<MonthYear>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            service_name: subscription.service_name,
            price: subscription.price,
            user_id: subscription.user_id,
            start_date: MonthYear::from_index(subscription.start_month),
            end_date: subscription.end_month.map(MonthYear::from_index),
        }
    }
}

/// Response for successful creation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionResponse {
    pub message: String,
    pub id: i32,
}

/// Response carrying only a confirmation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for the paginated list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListSubscriptionsResponse {
    pub data: Vec<SubscriptionResponse>,
    /// Total matching records, counted before pagination
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: u64,
}

/// Response for the cost aggregate
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalCostResponse {
    pub total_cost: i64,
}

/// Query parameters for the paginated list
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListSubscriptionsQuery {
    /// 1-based page number (default: 1)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Records per page (default: 10); non-positive disables pagination
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Exact match on the owning user
    pub user_id: Option<String>,
    /// Case-insensitive substring match on the service name
    pub service_name: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query parameters for the cost aggregate
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct TotalCostQuery {
    /// Exact match on the owning user
    pub user_id: Option<String>,
    /// Case-insensitive substring match on the service name
    pub service_name: Option<String>,
    /// Start of the queried period, MM-YYYY (required)
    pub start: Option<String>,
    /// End of the queried period, MM-YYYY (required)
    pub end: Option<String>,
}

/// Empty filter strings mean "no filter", matching the query-string
/// convention where `?user_id=` and an absent parameter are equivalent.
fn normalized(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Create a subscription
#[utoipa::path(
    post,
    path = "/api/v1/subscriptions",
    summary = "Create subscription",
    request_body = SubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = CreateSubscriptionResponse),
        (status = 400, description = "Invalid body or field", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn create_subscription(
    State(server): State<Server>,
    AppJson(request): AppJson<SubscriptionRequest>,
) -> Result<(StatusCode, Json<CreateSubscriptionResponse>), AppError> {
    let subscription = server.subscriptions.create(request.into()).await?;

    info!(id = subscription.id, "created subscription");

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse {
            message: "Subscription created".to_string(),
            id: subscription.id,
        }),
    ))
}

/// Fetch a subscription by id
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    summary = "Get subscription by ID",
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription retrieved", body = SubscriptionResponse),
        (status = 400, description = "Malformed id", body = ApiErrorResponse),
        (status = 404, description = "Not found", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn get_subscription(
    State(server): State<Server>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = server.subscriptions.get_by_id(id).await?;
    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// Replace a subscription
#[utoipa::path(
    put,
    path = "/api/v1/subscriptions/{id}",
    summary = "Replace subscription",
    description = "Full-replace update: every mutable field is overwritten",
    params(("id" = i32, Path, description = "Subscription ID")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = MessageResponse),
        (status = 400, description = "Malformed id or body", body = ApiErrorResponse),
        (status = 404, description = "Not found", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn update_subscription(
    State(server): State<Server>,
    AppPath(id): AppPath<i32>,
    AppJson(request): AppJson<SubscriptionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    server.subscriptions.update(id, request.into()).await?;

    Ok(Json(MessageResponse {
        message: "Updated".to_string(),
    }))
}

/// Soft-delete a subscription
#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}",
    summary = "Delete subscription",
    params(("id" = i32, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ApiErrorResponse),
        (status = 404, description = "Not found", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn delete_subscription(
    State(server): State<Server>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    server.subscriptions.delete(id).await?;

    info!(id, "deleted subscription");

    Ok(Json(MessageResponse {
        message: "Deleted".to_string(),
    }))
}

/// List subscriptions
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions",
    summary = "List subscriptions",
    params(ListSubscriptionsQuery),
    responses(
        (status = 200, description = "Page of subscriptions", body = ListSubscriptionsResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Subscriptions"
)]
pub async fn list_subscriptions(
    State(server): State<Server>,
    Query(params): Query<ListSubscriptionsQuery>,
) -> Result<Json<ListSubscriptionsResponse>, AppError> {
    let filter = SubscriptionFilter {
        user_id: normalized(params.user_id),
        service_name: normalized(params.service_name),
    };

    let (subscriptions, total) = server
        .subscriptions
        .list(filter, params.page, params.limit)
        .await?;

    let total_pages = if params.limit > 0 {
        total.div_ceil(params.limit as u64)
    } else {
        1
    };

    Ok(Json(ListSubscriptionsResponse {
        data: subscriptions
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect(),
        total,
        page: params.page,
        page_size: params.limit,
        total_pages,
    }))
}

/// Total subscription cost over a period
#[utoipa::path(
    get,
    path = "/api/v1/total",
    summary = "Total cost over a period",
    description = "Sums the price of subscriptions active at any point in the queried month range",
    params(TotalCostQuery),
    responses(
        (status = 200, description = "Aggregated cost", body = TotalCostResponse),
        (status = 400, description = "Missing or malformed period bounds", body = ApiErrorResponse),
        (status = 500, description = "Storage failure", body = ApiErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_total_cost(
    State(server): State<Server>,
    Query(params): Query<TotalCostQuery>,
) -> Result<Json<TotalCostResponse>, AppError> {
    let (Some(start), Some(end)) = (normalized(params.start), normalized(params.end)) else {
        return Err(AppError::Validation("start and end are required".to_string()));
    };

    let parse_month = |value: &str| {
        value.parse::<MonthYear>().map_err(|_| {
            AppError::Validation("start and end must be in MM-YYYY format".to_string())
        })
    };
    let period = MonthRange {
        start: parse_month(&start)?,
        end: parse_month(&end)?,
    };

    let filter = SubscriptionFilter {
        user_id: normalized(params.user_id),
        service_name: normalized(params.service_name),
    };

    let total_cost = server.subscriptions.total_cost(filter, period).await?;

    Ok(Json(TotalCostResponse { total_cost }))
}

/// Create subscription API routes
pub fn create_subscription_routes() -> Router<Server> {
    Router::new()
        .route(
            "/subscriptions",
            axum::routing::post(create_subscription).get(list_subscriptions),
        )
        .route(
            "/subscriptions/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route("/total", get(get_total_cost))
}
