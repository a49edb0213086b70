pub mod subscriptions;

pub use subscriptions::Entity as Subscriptions;

// Type aliases
pub type Subscription = subscriptions::Model;
