//! Notifications module - the notification feed, its polling store and the
//! notification service trait.

mod notifications_model;
mod notifications_store;
mod notifications_traits;

pub use notifications_model::{Notification, NotificationFeed, NotificationPage};
pub use notifications_store::{NotificationStore, PollingHandle};
pub use notifications_traits::NotificationServiceTrait;
