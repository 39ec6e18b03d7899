//! Notification store.
//!
//! Holds the unread badge and the latest page of notifications, refreshes
//! them on a fixed interval while a session exists, and applies read-state
//! changes optimistically.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::auth::User;
use crate::constants::{NOTIFICATION_PAGE_SIZE, NOTIFICATION_POLL_INTERVAL_SECS};
use crate::errors::{Error, Result};
use crate::notifications::notifications_model::NotificationFeed;
use crate::notifications::notifications_traits::NotificationServiceTrait;

pub struct NotificationStore {
    service: Arc<dyn NotificationServiceTrait>,
    session: watch::Receiver<Option<User>>,
    feed: RwLock<NotificationFeed>,
    poll_interval: Duration,
}

impl NotificationStore {
    /// `session` is the identity channel published by the session store.
    pub fn new(
        service: Arc<dyn NotificationServiceTrait>,
        session: watch::Receiver<Option<User>>,
    ) -> Self {
        Self {
            service,
            session,
            feed: RwLock::new(NotificationFeed::default()),
            poll_interval: Duration::from_secs(NOTIFICATION_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn has_session(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Copy of the current feed.
    pub fn snapshot(&self) -> NotificationFeed {
        self.feed.read().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn unread_count(&self) -> u64 {
        self.feed.read().map(|f| f.unread_count).unwrap_or(0)
    }

    fn update<F: FnOnce(&mut NotificationFeed)>(&self, op: F) {
        match self.feed.write() {
            Ok(mut feed) => op(&mut feed),
            Err(_) => warn!("Notification feed lock poisoned, update dropped"),
        }
    }

    /// Drops the local feed (logout).
    pub fn clear(&self) {
        self.update(|feed| *feed = NotificationFeed::default());
    }

    /// Fetches the latest page and unread count.
    ///
    /// Without a session nothing is requested. A failed fetch keeps the
    /// previous feed and returns the error.
    pub async fn refresh(&self) -> Result<()> {
        if !self.has_session() {
            debug!("Skipping notification refresh: no session");
            return Ok(());
        }

        self.update(|feed| feed.loading = true);
        let result = self
            .service
            .get_notifications(false, NOTIFICATION_PAGE_SIZE)
            .await;

        match result {
            Ok(page) => {
                debug!(
                    "Fetched {} notifications ({} unread)",
                    page.notifications.len(),
                    page.unread_count
                );
                self.update(|feed| {
                    feed.notifications = page.notifications;
                    feed.unread_count = page.unread_count;
                    feed.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch notifications: {}", e);
                self.update(|feed| feed.loading = false);
                Err(e)
            }
        }
    }

    /// Refreshes only the badge counter.
    pub async fn refresh_unread_count(&self) -> Result<u64> {
        if !self.has_session() {
            return Err(Error::Unauthenticated("no session".into()));
        }
        let count = self.service.get_unread_count().await?;
        self.update(|feed| feed.unread_count = count);
        Ok(count)
    }

    /// Flags one notification read locally, then confirms with the server.
    ///
    /// The local change is kept even if the server rejects it; the next poll
    /// brings the feed back in line. Returns whether the server confirmed.
    pub async fn mark_as_read(&self, notification_id: i64) -> bool {
        self.update(|feed| {
            match feed
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
            {
                Some(n) if n.read => {}
                Some(n) => {
                    n.read = true;
                    feed.unread_count = feed.unread_count.saturating_sub(1);
                }
                // Older than the fetched page but still counted by the server.
                None => feed.unread_count = feed.unread_count.saturating_sub(1),
            }
        });

        match self.service.mark_as_read(notification_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to mark notification {} as read: {}", notification_id, e);
                false
            }
        }
    }

    /// Flags every local notification read and zeroes the counter, then
    /// confirms with the server. Same no-rollback rule as `mark_as_read`.
    pub async fn mark_all_as_read(&self) -> bool {
        self.update(|feed| {
            for n in feed.notifications.iter_mut() {
                n.read = true;
            }
            feed.unread_count = 0;
        });

        match self.service.mark_all_as_read().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to mark all notifications as read: {}", e);
                false
            }
        }
    }

    /// Starts the background poller.
    ///
    /// While a session exists the feed is fetched immediately and then every
    /// poll interval. Logging out drops the interval and clears the feed;
    /// logging in again restarts it. The task stops when the handle is shut
    /// down or dropped, or when the session channel closes.
    pub fn spawn_polling(self: &Arc<Self>) -> PollingHandle {
        let store = Arc::clone(self);
        let mut session = self.session.clone();

        let handle = tokio::spawn(async move {
            loop {
                let logged_in = session.borrow_and_update().is_some();
                if !logged_in {
                    if session.changed().await.is_err() {
                        return;
                    }
                    continue;
                }

                info!(
                    "Notification polling started ({}s interval)",
                    store.poll_interval.as_secs()
                );
                let mut ticker = interval(store.poll_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            let _ = store.refresh().await;
                        }
                        changed = session.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            let still_logged_in = session.borrow_and_update().is_some();
                            if !still_logged_in {
                                info!("Notification polling stopped: logged out");
                                store.clear();
                                break;
                            }
                            // Another identity: refetch right away.
                            ticker.reset_immediately();
                        }
                    }
                }
            }
        });

        PollingHandle { handle }
    }
}

/// Owns the polling task; dropping it cancels polling.
pub struct PollingHandle {
    handle: JoinHandle<()>,
}

impl PollingHandle {
    pub fn shutdown(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
