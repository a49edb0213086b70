use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A subscription row. `start_month` and `end_month` are numeric month keys
/// (see [`crate::month::MonthYear::index`]); `deleted_at` is the soft-delete
/// marker and must stay out of client-facing serialization.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_month: i32,
    pub end_month: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
