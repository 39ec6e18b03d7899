//! Screens of the application and the protected-route guard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A screen the front-end can show.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Discover,
    CreateGroup,
    Profile,
    Notifications,
    Group { group_id: i64 },
    GroupAdmin { group_id: i64 },
    GroupMembers { group_id: i64 },
    GroupWithdrawals { group_id: i64 },
    ManageMembers { group_id: i64 },
    Loan { loan_id: i64 },
}

impl Route {
    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Home | Route::Login | Route::Register)
    }

    /// Resolves the route actually shown: protected routes fall back to the
    /// login screen when nobody is signed in.
    pub fn guard(self, authenticated: bool) -> Route {
        if authenticated || self.is_public() {
            self
        } else {
            Route::Login
        }
    }

    /// Path form, mirroring the web client's URLs.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Discover => "/dashboard/discover".to_string(),
            Route::CreateGroup => "/dashboard/create-group".to_string(),
            Route::Profile => "/dashboard/profile".to_string(),
            Route::Notifications => "/dashboard/notifications".to_string(),
            Route::Group { group_id } => format!("/dashboard/group/{}", group_id),
            Route::GroupAdmin { group_id } => format!("/dashboard/group/{}/admin", group_id),
            Route::GroupMembers { group_id } => format!("/dashboard/group/{}/members", group_id),
            Route::GroupWithdrawals { group_id } => {
                format!("/dashboard/group/{}/withdrawals", group_id)
            }
            Route::ManageMembers { group_id } => format!("/groups/{}/manage-members", group_id),
            Route::Loan { loan_id } => format!("/dashboard/loans/{}", loan_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_routes_redirect_to_login() {
        assert_eq!(Route::Dashboard.guard(false), Route::Login);
        assert_eq!(
            Route::Group { group_id: 3 }.guard(false),
            Route::Login
        );
        assert_eq!(Route::Dashboard.guard(true), Route::Dashboard);
    }

    #[test]
    fn public_routes_pass_through() {
        assert_eq!(Route::Home.guard(false), Route::Home);
        assert_eq!(Route::Register.guard(false), Route::Register);
    }

    #[test]
    fn paths_match_web_urls() {
        assert_eq!(Route::Group { group_id: 7 }.to_string(), "/dashboard/group/7");
        assert_eq!(
            Route::ManageMembers { group_id: 2 }.path(),
            "/groups/2/manage-members"
        );
    }
}
