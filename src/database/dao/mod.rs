pub mod subscriptions;

pub use subscriptions::{NewSubscription, SubscriptionFilter, SubscriptionsDao};
