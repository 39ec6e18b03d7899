use std::sync::Arc;

use crate::context::AppContext;
use crate::errors::Result;
use crate::events::{UiEvent, UiEventSink};
use crate::notifications::{Notification, NotificationStore};
use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
}

/// Full-page notification list backed by the shared store.
pub struct NotificationsPage {
    store: Arc<NotificationStore>,
    events: Arc<dyn UiEventSink>,
    pub filter: NotificationFilter,
}

impl NotificationsPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: ctx.notifications.clone(),
            events: ctx.events.clone(),
            filter: NotificationFilter::All,
        }
    }

    pub async fn load(&self) -> Result<()> {
        self.store.refresh().await
    }

    pub fn is_loading(&self) -> bool {
        self.store.snapshot().loading
    }

    /// Notifications matching the current filter, in server order.
    pub fn visible(&self) -> Vec<Notification> {
        let feed = self.store.snapshot();
        match self.filter {
            NotificationFilter::All => feed.notifications,
            NotificationFilter::Unread => feed.unread().cloned().collect(),
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self.filter {
            NotificationFilter::All => "No notifications to display",
            NotificationFilter::Unread => "No unread notifications",
        }
    }

    /// "Mark all as read" is offered while something is unread.
    pub fn shows_mark_all(&self) -> bool {
        self.store.snapshot().unread().next().is_some()
    }

    /// Marks the notification read if needed, then navigates to the screen
    /// its type points at.
    pub async fn open(&self, notification: &Notification) -> Route {
        if !notification.read {
            self.store.mark_as_read(notification.id).await;
        }
        let route = notification.target_route();
        self.events.emit(UiEvent::navigate(route.clone()));
        route
    }

    pub async fn mark_all_as_read(&self) -> bool {
        self.store.mark_all_as_read().await
    }
}
