pub mod config;

use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    routes::{create_docs_routes, create_health_routes, create_subscription_routes},
    service::{SubscriptionService, SubscriptionServiceImpl},
};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub subscriptions: Arc<dyn SubscriptionService>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize database
        let database: Arc<dyn DatabaseManager> = Arc::new(
            DatabaseManagerImpl::new_from_config(&config)
                .await
                .map_err(AppError::Database)?,
        );

        // Initialize subscription service
        let subscriptions: Arc<dyn SubscriptionService> =
            Arc::new(SubscriptionServiceImpl::new(database.clone()));

        Ok(Self {
            config: Arc::new(config),
            database,
            subscriptions,
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        // Run database migrations on startup to ensure tables exist
        self.database.migrate().await.map_err(AppError::Database)?;

        let app = self.create_app();

        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid listen address: {}", e)))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        info!("Server shutdown complete");
        Ok(())
    }

    // Creates an application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            // Subscription API routes
            .nest("/api/v1", create_subscription_routes())
            // Health check routes
            .nest("/health", create_health_routes())
            // Swagger UI
            .merge(create_docs_routes())
            // All routes use Server as state
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        app
    }
}

/// Structured request/response logging middleware
async fn request_response_logger(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request"
    );

    response
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Graceful shutdown initiated");
}
