//! Application service between the HTTP layer and the DAO.
//!
//! Owns the page-to-offset arithmetic and runs the field validator before
//! anything is written; everything else passes through.

use crate::database::{DatabaseManager, NewSubscription, SubscriptionFilter};
use crate::database::entities::Subscription;
use crate::error::AppError;
use crate::month::MonthRange;
use crate::validation;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn create(&self, input: NewSubscription) -> Result<Subscription, AppError>;

    async fn get_by_id(&self, id: i32) -> Result<Subscription, AppError>;

    /// Full-replace update: every mutable field of the stored record is
    /// overwritten with the input.
    async fn update(&self, id: i32, input: NewSubscription) -> Result<Subscription, AppError>;

    async fn delete(&self, id: i32) -> Result<(), AppError>;

    /// Page of matching subscriptions plus the pre-pagination total.
    /// `page` is 1-based; a non-positive limit returns everything.
    async fn list(
        &self,
        filter: SubscriptionFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Subscription>, u64), AppError>;

    async fn total_cost(
        &self,
        filter: SubscriptionFilter,
        period: MonthRange,
    ) -> Result<i64, AppError>;
}

pub struct SubscriptionServiceImpl {
    database: Arc<dyn DatabaseManager>,
}

impl SubscriptionServiceImpl {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }
}

/// 1-based page to row offset, clamped to the first page for `page <= 0`.
fn page_offset(page: i64, limit: i64) -> i64 {
    if page <= 0 { 0 } else { (page - 1) * limit }
}

#[async_trait]
impl SubscriptionService for SubscriptionServiceImpl {
    async fn create(&self, input: NewSubscription) -> Result<Subscription, AppError> {
        validation::validate(&input)?;
        let subscription = self.database.subscriptions().create(input).await?;
        Ok(subscription)
    }

    async fn get_by_id(&self, id: i32) -> Result<Subscription, AppError> {
        let subscription = self.database.subscriptions().get_by_id(id).await?;
        Ok(subscription)
    }

    async fn update(&self, id: i32, input: NewSubscription) -> Result<Subscription, AppError> {
        validation::validate(&input)?;
        let subscription = self.database.subscriptions().update(id, input).await?;
        Ok(subscription)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.database.subscriptions().soft_delete(id).await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: SubscriptionFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Subscription>, u64), AppError> {
        let offset = page_offset(page, limit);
        let result = self
            .database
            .subscriptions()
            .list(&filter, limit, offset)
            .await?;
        Ok(result)
    }

    async fn total_cost(
        &self,
        filter: SubscriptionFilter,
        period: MonthRange,
    ) -> Result<i64, AppError> {
        let total = self
            .database
            .subscriptions()
            .total_cost(&filter, &period)
            .await?;
        Ok(total)
    }
}
