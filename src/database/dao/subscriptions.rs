use crate::database::entities::{Subscription, subscriptions};
use crate::database::{DatabaseError, DatabaseResult};
use crate::month::{MonthRange, MonthYear};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Validated input for create and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start: MonthYear,
    pub end: Option<MonthYear>,
}

/// Optional filters shared by list and cost aggregation.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    /// Exact match on the owning user.
    pub user_id: Option<String>,
    /// Case-insensitive substring match on the service name.
    pub service_name: Option<String>,
}

/// Subscriptions DAO for database operations
pub struct SubscriptionsDao {
    db: DatabaseConnection,
}

impl SubscriptionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The one soft-delete predicate every read path composes in.
    fn not_deleted() -> SimpleExpr {
        subscriptions::Column::DeletedAt.is_null()
    }

    fn service_name_like(name: &str) -> SimpleExpr {
        let pattern = format!("%{}%", name.to_lowercase());
        Expr::expr(Func::lower(Expr::col(subscriptions::Column::ServiceName))).like(pattern)
    }

    fn read_condition(filter: &SubscriptionFilter) -> Condition {
        let mut condition = Condition::all().add(Self::not_deleted());
        if let Some(user_id) = &filter.user_id {
            condition = condition.add(subscriptions::Column::UserId.eq(user_id));
        }
        if let Some(name) = &filter.service_name {
            condition = condition.add(Self::service_name_like(name));
        }
        condition
    }

    /// A subscription overlaps the queried period iff it starts no later
    /// than the period end and either never ends or ends no earlier than
    /// the period start. Runs on the numeric month keys.
    fn overlap_condition(period: &MonthRange) -> Condition {
        Condition::all()
            .add(subscriptions::Column::StartMonth.lte(period.end.index()))
            .add(
                Condition::any()
                    .add(subscriptions::Column::EndMonth.is_null())
                    .add(subscriptions::Column::EndMonth.gte(period.start.index())),
            )
    }

    /// Persist a new subscription; the database assigns id and timestamps
    /// are set here.
    pub async fn create(&self, input: NewSubscription) -> DatabaseResult<Subscription> {
        let now = Utc::now();
        let active_model = subscriptions::ActiveModel {
            id: ActiveValue::NotSet,
            service_name: Set(input.service_name),
            price: Set(input.price),
            user_id: Set(input.user_id),
            start_month: Set(input.start.index()),
            end_month: Set(input.end.map(|m| m.index())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let subscription = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(subscription)
    }

    /// Fetch a non-deleted subscription by id.
    pub async fn get_by_id(&self, id: i32) -> DatabaseResult<Subscription> {
        subscriptions::Entity::find_by_id(id)
            .filter(Self::not_deleted())
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?
            .ok_or(DatabaseError::NotFound)
    }

    /// Overwrite every mutable field of an existing subscription.
    pub async fn update(&self, id: i32, input: NewSubscription) -> DatabaseResult<Subscription> {
        let existing = self.get_by_id(id).await?;

        let mut active_model: subscriptions::ActiveModel = existing.into();
        active_model.service_name = Set(input.service_name);
        active_model.price = Set(input.price);
        active_model.user_id = Set(input.user_id);
        active_model.start_month = Set(input.start.index());
        active_model.end_month = Set(input.end.map(|m| m.index()));
        active_model.updated_at = Set(Utc::now());

        let subscription = active_model
            .update(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(subscription)
    }

    /// Soft-delete: stamp `deleted_at`, keep the row. The id is never
    /// reused because the primary key sequence keeps advancing.
    pub async fn soft_delete(&self, id: i32) -> DatabaseResult<()> {
        let existing = self.get_by_id(id).await?;
        let now = Utc::now();

        let mut active_model: subscriptions::ActiveModel = existing.into();
        active_model.deleted_at = Set(Some(now));
        active_model.updated_at = Set(now);

        active_model
            .update(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(())
    }

    /// Page of matching subscriptions plus the total match count (counted
    /// before pagination). A non-positive limit disables pagination.
    pub async fn list(
        &self,
        filter: &SubscriptionFilter,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<(Vec<Subscription>, u64)> {
        let condition = Self::read_condition(filter);

        let total = subscriptions::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let mut select = subscriptions::Entity::find()
            .filter(condition)
            .order_by_asc(subscriptions::Column::Id);

        if limit > 0 {
            select = select
                .limit(Some(limit as u64))
                .offset(Some(offset.max(0) as u64));
        }

        let subscriptions = select
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok((subscriptions, total))
    }

    /// Sum of `price` over non-deleted subscriptions matching the filters
    /// and overlapping the period. Zero when nothing matches.
    pub async fn total_cost(
        &self,
        filter: &SubscriptionFilter,
        period: &MonthRange,
    ) -> DatabaseResult<i64> {
        #[derive(FromQueryResult)]
        struct PriceSum {
            total: Option<i64>,
        }

        let condition = Self::read_condition(filter).add(Self::overlap_condition(period));

        let sum = subscriptions::Entity::find()
            .select_only()
            .column_as(subscriptions::Column::Price.sum(), "total")
            .filter(condition)
            .into_model::<PriceSum>()
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(sum.and_then(|s| s.total).unwrap_or(0))
    }
}
