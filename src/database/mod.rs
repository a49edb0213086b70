//! Database access layer.
//!
//! Connection management lives behind the [`DatabaseManager`] trait so tests
//! can run against in-memory sqlite; subscription persistence goes through a
//! dedicated DAO.

use crate::config::Config;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use dao::{NewSubscription, SubscriptionFilter, SubscriptionsDao};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Record not found")]
    NotFound,
    #[error("Migration error: {0}")]
    Migration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get subscriptions DAO
    fn subscriptions(&self) -> SubscriptionsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &Config) -> Result<Self, DatabaseError> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options.max_connections(config.database.max_connections);

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn subscriptions(&self) -> SubscriptionsDao {
        SubscriptionsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
