//! Wiring of services and shared stores.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthServiceTrait, UserServiceTrait};
use crate::events::UiEventSink;
use crate::groups::GroupServiceTrait;
use crate::loans::LoanServiceTrait;
use crate::notifications::{NotificationServiceTrait, NotificationStore};
use crate::secrets::SecretStore;
use crate::session::SessionStore;
use crate::transactions::TransactionServiceTrait;
use crate::withdrawals::WithdrawalServiceTrait;

/// One handle per server resource.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthServiceTrait>,
    pub users: Arc<dyn UserServiceTrait>,
    pub groups: Arc<dyn GroupServiceTrait>,
    pub transactions: Arc<dyn TransactionServiceTrait>,
    pub withdrawals: Arc<dyn WithdrawalServiceTrait>,
    pub loans: Arc<dyn LoanServiceTrait>,
    pub notifications: Arc<dyn NotificationServiceTrait>,
}

impl Services {
    /// Uses one value for every resource, typically the HTTP client.
    pub fn from_shared<T>(api: Arc<T>) -> Self
    where
        T: AuthServiceTrait
            + UserServiceTrait
            + GroupServiceTrait
            + TransactionServiceTrait
            + WithdrawalServiceTrait
            + LoanServiceTrait
            + NotificationServiceTrait
            + 'static,
    {
        Self {
            auth: api.clone(),
            users: api.clone(),
            groups: api.clone(),
            transactions: api.clone(),
            withdrawals: api.clone(),
            loans: api.clone(),
            notifications: api,
        }
    }
}

/// Everything a front-end needs: the services, the event sink and the two
/// shared stores.
#[derive(Clone)]
pub struct AppContext {
    pub services: Services,
    pub events: Arc<dyn UiEventSink>,
    pub session: Arc<SessionStore>,
    pub notifications: Arc<NotificationStore>,
}

impl AppContext {
    pub fn new(
        services: Services,
        secrets: Arc<dyn SecretStore>,
        events: Arc<dyn UiEventSink>,
        poll_interval: Duration,
    ) -> Self {
        let session = Arc::new(SessionStore::new(
            services.auth.clone(),
            secrets,
            events.clone(),
        ));
        let notifications = Arc::new(
            NotificationStore::new(services.notifications.clone(), session.subscribe())
                .with_poll_interval(poll_interval),
        );
        Self {
            services,
            events,
            session,
            notifications,
        }
    }
}
