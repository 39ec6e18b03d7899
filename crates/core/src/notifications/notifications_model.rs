//! Notification domain models.

use serde::{Deserialize, Serialize};

use crate::routes::Route;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
}

impl Notification {
    /// Screen to open when the notification is selected.
    pub fn target_route(&self) -> Route {
        match (self.kind.as_str(), self.group_id) {
            ("contribution", Some(group_id))
            | ("withdrawal_approved", Some(group_id))
            | ("withdrawal_rejected", Some(group_id)) => Route::Group { group_id },
            ("withdrawal_request", Some(group_id)) => Route::GroupWithdrawals { group_id },
            _ => Route::Dashboard,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind.as_str() {
            "contribution" => "💰",
            "withdrawal_request" => "🔔",
            "withdrawal_approved" => "✅",
            "withdrawal_rejected" => "❌",
            _ => "📌",
        }
    }
}

/// Response of the notification list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u64,
}

/// Client-side copy of the feed: the latest page in server order plus the
/// unread badge counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub loading: bool,
}

impl NotificationFeed {
    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(kind: &str, group_id: Option<i64>) -> Notification {
        Notification {
            id: 1,
            kind: kind.to_string(),
            message: "m".into(),
            read: false,
            created_at: None,
            group_id,
            group_name: None,
        }
    }

    #[test]
    fn routes_follow_notification_type() {
        assert_eq!(
            notification("contribution", Some(3)).target_route(),
            Route::Group { group_id: 3 }
        );
        assert_eq!(
            notification("withdrawal_request", Some(3)).target_route(),
            Route::GroupWithdrawals { group_id: 3 }
        );
        assert_eq!(
            notification("withdrawal_approved", Some(8)).target_route(),
            Route::Group { group_id: 8 }
        );
        assert_eq!(
            notification("withdrawal_rejected", Some(5)).target_route(),
            Route::Group { group_id: 5 }
        );
        assert_eq!(
            notification("withdrawal_rejected", None).target_route(),
            Route::Dashboard
        );
        assert_eq!(notification("loan_due", Some(3)).target_route(), Route::Dashboard);
        assert_eq!(notification("contribution", None).target_route(), Route::Dashboard);
    }

    #[test]
    fn type_field_maps_to_kind() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 2, "type": "contribution", "message": "Jane contributed 500", "read": true, "group_id": 1}"#,
        )
        .unwrap();
        assert_eq!(n.kind, "contribution");
        assert!(n.read);
        assert_eq!(n.icon(), "💰");
    }
}
