//! Group screens: dashboard list, details, creation form, discovery and the
//! two membership screens.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::auth::{User, UserServiceTrait};
use crate::context::AppContext;
use crate::errors::{Result, ValidationError};
use crate::events::{UiEvent, UiEventSink};
use crate::groups::{Group, GroupMember, GroupServiceTrait, MemberStatus, NewGroup};
use crate::loans::{LoanServiceTrait, LoanStats};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::utils::money::parse_amount;
use crate::views::ViewState;

/// One row of the dashboard group list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: Group,
    pub loan_stats: LoanStats,
}

impl GroupSummary {
    pub fn progress_percent(&self) -> u32 {
        self.group.progress_percent()
    }

    pub fn shows_admin_badge(&self) -> bool {
        self.group.member_status == Some(MemberStatus::Admin)
    }
}

/// Dashboard index: the caller's groups with a loan summary per group.
pub struct GroupListView {
    groups: Arc<dyn GroupServiceTrait>,
    loans: Arc<dyn LoanServiceTrait>,
    pub state: ViewState<Vec<GroupSummary>>,
}

impl GroupListView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            groups: ctx.services.groups.clone(),
            loans: ctx.services.loans.clone(),
            state: ViewState::Loading,
        }
    }

    /// Loads the groups, then every group's loans concurrently. A group whose
    /// loans cannot be fetched shows zeroed stats; the others are unaffected.
    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        let groups = match self.groups.get_user_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                self.state = ViewState::Failed(e.to_string());
                return;
            }
        };

        let loans = &self.loans;
        let stats = join_all(groups.iter().map(|group| async move {
            match loans.get_group_loans(group.id, None).await {
                Ok(group_loans) => LoanStats::from_loans(&group_loans),
                Err(e) => {
                    warn!("Failed to fetch loans for group {}: {}", group.id, e);
                    LoanStats::default()
                }
            }
        }))
        .await;

        let summaries = groups
            .into_iter()
            .zip(stats)
            .map(|(group, loan_stats)| GroupSummary { group, loan_stats })
            .collect();
        self.state = ViewState::Ready(summaries);
    }
}

/// Tabs of the group details screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTab {
    Overview,
    Members,
    Admin,
}

pub struct GroupDetailsView {
    pub group_id: i64,
    groups: Arc<dyn GroupServiceTrait>,
    session: Arc<SessionStore>,
    events: Arc<dyn UiEventSink>,
    pub state: ViewState<Group>,
    pub active_tab: GroupTab,
    pub error: Option<String>,
}

impl GroupDetailsView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            groups: ctx.services.groups.clone(),
            session: ctx.session.clone(),
            events: ctx.events.clone(),
            state: ViewState::Loading,
            active_tab: GroupTab::Overview,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.groups.get_group_details(self.group_id).await);
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .data()
            .map(|group| self.session.is_admin(group))
            .unwrap_or(false)
    }

    pub fn available_tabs(&self) -> Vec<GroupTab> {
        if self.is_admin() {
            vec![GroupTab::Overview, GroupTab::Members, GroupTab::Admin]
        } else {
            vec![GroupTab::Overview, GroupTab::Members]
        }
    }

    /// Switches tab; the admin tab is refused to non-admins.
    pub fn select_tab(&mut self, tab: GroupTab) -> bool {
        if !self.available_tabs().contains(&tab) {
            return false;
        }
        self.active_tab = tab;
        true
    }

    pub async fn leave(&mut self) -> Result<()> {
        match self.groups.leave_group(self.group_id).await {
            Ok(()) => {
                self.events.emit(UiEvent::success("You left the group"));
                self.events.emit(UiEvent::navigate(Route::Dashboard));
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn open_members(&mut self) {
        self.active_tab = GroupTab::Members;
        self.events.emit(UiEvent::navigate(Route::GroupMembers {
            group_id: self.group_id,
        }));
    }

    pub fn manage_members(&self) {
        self.events.emit(UiEvent::navigate(Route::ManageMembers {
            group_id: self.group_id,
        }));
    }
}

/// Group creation form.
pub struct GroupForm {
    groups: Arc<dyn GroupServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub name: String,
    pub description: String,
    pub target_amount: String,
    pub error: Option<String>,
}

impl GroupForm {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            groups: ctx.services.groups.clone(),
            events: ctx.events.clone(),
            name: String::new(),
            description: String::new(),
            target_amount: String::new(),
            error: None,
        }
    }

    fn payload(&self) -> Result<NewGroup> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("Group name".into()).into());
        }
        let target_amount = parse_amount(&self.target_amount)?;
        if target_amount < Decimal::ZERO {
            return Err(ValidationError::InvalidAmount(
                "target amount cannot be negative".into(),
            )
            .into());
        }
        Ok(NewGroup {
            name: name.to_string(),
            description: self.description.clone(),
            target_amount,
        })
    }

    pub async fn submit(&mut self) -> Result<Group> {
        self.error = None;
        let result = match self.payload() {
            Ok(payload) => self.groups.create_group(payload).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(group) => {
                self.events
                    .emit(UiEvent::success(format!("Group '{}' created", group.name)));
                self.events.emit(UiEvent::navigate(Route::Dashboard));
                Ok(group)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn cancel(&self) {
        self.events.emit(UiEvent::navigate(Route::Dashboard));
    }
}

/// Public groups the caller can join.
pub struct GroupDiscoveryView {
    groups: Arc<dyn GroupServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub state: ViewState<Vec<Group>>,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl GroupDiscoveryView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            groups: ctx.services.groups.clone(),
            events: ctx.events.clone(),
            state: ViewState::Loading,
            success: None,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.groups.get_public_groups().await);
    }

    /// Joins a group and drops it from the list.
    pub async fn join(&mut self, group_id: i64) -> Result<()> {
        debug!("Joining group {}", group_id);
        match self.groups.join_group(group_id).await {
            Ok(()) => {
                if let Some(groups) = self.state.data_mut() {
                    groups.retain(|g| g.id != group_id);
                }
                let message = "Successfully joined group!".to_string();
                self.events.emit(UiEvent::success(message.clone()));
                self.success = Some(message);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Read-mostly roster shown on the members tab.
pub struct GroupMembersView {
    pub group_id: i64,
    groups: Arc<dyn GroupServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub state: ViewState<Vec<GroupMember>>,
    pub error: Option<String>,
}

impl GroupMembersView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            groups: ctx.services.groups.clone(),
            events: ctx.events.clone(),
            state: ViewState::Loading,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.groups.get_group_members(self.group_id).await);
    }

    pub fn member_count_label(&self) -> String {
        let count = self.state.data().map(Vec::len).unwrap_or(0);
        if count == 1 {
            "1 member".to_string()
        } else {
            format!("{} members", count)
        }
    }

    /// Whether the "make admin" action is offered for `member`.
    pub fn can_promote(member: &GroupMember, viewer_is_admin: bool, viewer: Option<&User>) -> bool {
        viewer_is_admin && !member.is_admin && viewer.map_or(true, |u| u.id != member.id)
    }

    /// Promotes a member and flips the local flag without refetching.
    pub async fn make_admin(&mut self, user_id: i64) -> Result<()> {
        match self.groups.make_group_admin(self.group_id, user_id).await {
            Ok(()) => {
                if let Some(members) = self.state.data_mut() {
                    for m in members.iter_mut().filter(|m| m.id == user_id) {
                        m.is_admin = true;
                    }
                }
                self.events.emit(UiEvent::success("Member promoted to admin"));
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Admin screen to search, add, remove and promote members.
pub struct ManageMembersView {
    pub group_id: i64,
    groups: Arc<dyn GroupServiceTrait>,
    users: Arc<dyn UserServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub members: ViewState<Vec<GroupMember>>,
    pub search_query: String,
    pub search_results: Vec<User>,
    pub error: Option<String>,
}

impl ManageMembersView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            groups: ctx.services.groups.clone(),
            users: ctx.services.users.clone(),
            events: ctx.events.clone(),
            members: ViewState::Loading,
            search_query: String::new(),
            search_results: Vec::new(),
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.members = ViewState::from_result(self.groups.get_group_members(self.group_id).await);
    }

    fn is_member(&self, user_id: i64) -> bool {
        self.members
            .data()
            .map(|members| members.iter().any(|m| m.id == user_id))
            .unwrap_or(false)
    }

    /// Searches users by name or email; existing members are left out.
    pub async fn search(&mut self) -> Result<()> {
        let query = self.search_query.trim().to_string();
        if query.is_empty() {
            return Ok(());
        }
        match self.users.search_users(&query).await {
            Ok(found) => {
                let results = found.into_iter().filter(|u| !self.is_member(u.id)).collect();
                self.search_results = results;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The signed-in user cannot remove themselves here.
    pub fn can_remove(member: &GroupMember, viewer: Option<&User>) -> bool {
        viewer.map_or(true, |u| u.id != member.id)
    }

    pub async fn add_member(&mut self, user_id: i64) -> Result<()> {
        let result = self.groups.add_group_member(self.group_id, user_id).await;
        self.after_change(result, "Member added").await?;
        self.search_results.retain(|u| u.id != user_id);
        Ok(())
    }

    pub async fn remove_member(&mut self, user_id: i64) -> Result<()> {
        let result = self.groups.remove_group_member(self.group_id, user_id).await;
        self.after_change(result, "Member removed").await
    }

    pub async fn promote(&mut self, user_id: i64) -> Result<()> {
        let result = self.groups.make_group_admin(self.group_id, user_id).await;
        self.after_change(result, "Member promoted to admin").await
    }

    /// Refreshes the roster after a successful change.
    async fn after_change(&mut self, result: Result<()>, success: &str) -> Result<()> {
        if let Err(e) = result {
            self.error = Some(e.to_string());
            self.events.emit(UiEvent::error(e.to_string()));
            return Err(e);
        }
        self.events.emit(UiEvent::success(success));
        self.load().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MockUiEventSink;
    use crate::loans::LoanStatus;
    use crate::secrets::MemorySecretStore;
    use crate::views::mock_api::{group, loan, member, MockApi};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn context(api: &Arc<MockApi>) -> (AppContext, MockUiEventSink) {
        let events = MockUiEventSink::new();
        let ctx = AppContext::new(
            api.services(),
            Arc::new(MemorySecretStore::new()),
            Arc::new(events.clone()),
            Duration::from_secs(30),
        );
        (ctx, events)
    }

    #[tokio::test]
    async fn group_list_zeroes_stats_of_failing_group_only() {
        let api = MockApi::new();
        let mut admin_group = group(1, "Savings");
        admin_group.member_status = Some(MemberStatus::Admin);
        admin_group.current_amount = dec!(1500);
        *api.groups.lock().unwrap() = vec![admin_group, group(2, "Harambee"), group(3, "Boda")];
        api.group_loans.lock().unwrap().insert(
            1,
            vec![
                loan(10, LoanStatus::Active, dec!(400)),
                loan(11, LoanStatus::Pending, dec!(100)),
            ],
        );
        api.group_loans
            .lock()
            .unwrap()
            .insert(3, vec![loan(12, LoanStatus::Approved, dec!(50))]);
        api.failing_loan_groups.lock().unwrap().insert(2);

        let (ctx, _events) = context(&api);
        let mut view = GroupListView::new(&ctx);
        view.load().await;

        let rows = view.state.data().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].loan_stats.total_loans, 2);
        assert_eq!(rows[0].loan_stats.active_loans, 1);
        assert_eq!(rows[0].loan_stats.pending_loans, 1);
        assert_eq!(rows[0].loan_stats.outstanding_balance, dec!(400));
        assert_eq!(rows[0].progress_percent(), 100);
        assert!(rows[0].shows_admin_badge());
        assert!(rows[1].loan_stats.is_zero());
        assert_eq!(rows[2].loan_stats.active_loans, 1);
        assert!(!rows[2].shows_admin_badge());
        assert_eq!(api.call_count("get_group_loans"), 3);
    }

    #[tokio::test]
    async fn group_list_failure_is_reported() {
        let api = MockApi::new();
        api.fail("get_user_groups");
        let (ctx, _events) = context(&api);
        let mut view = GroupListView::new(&ctx);
        view.load().await;
        assert_eq!(view.state.error(), Some("get_user_groups failed"));
        assert_eq!(api.call_count("get_group_loans"), 0);
    }

    #[tokio::test]
    async fn details_admin_tab_follows_is_admin() {
        let api = MockApi::new();
        let mut g = group(5, "Savings");
        g.creator_id = Some(1);
        *api.groups.lock().unwrap() = vec![g, group(6, "Other")];
        let (ctx, _events) = context(&api);
        ctx.session
            .login(crate::auth::Credentials {
                email: "amina@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        let mut mine = GroupDetailsView::new(&ctx, 5);
        mine.load().await;
        assert!(mine.is_admin());
        assert!(mine.select_tab(GroupTab::Admin));

        let mut other = GroupDetailsView::new(&ctx, 6);
        other.load().await;
        assert!(!other.is_admin());
        assert!(!other.select_tab(GroupTab::Admin));
        assert_eq!(other.active_tab, GroupTab::Overview);
    }

    #[tokio::test]
    async fn leaving_navigates_to_dashboard() {
        let api = MockApi::new();
        let (ctx, events) = context(&api);
        let mut view = GroupDetailsView::new(&ctx, 5);
        view.leave().await.unwrap();
        assert_eq!(events.last_route(), Some(Route::Dashboard));
        assert_eq!(api.calls("leave_group")[0]["group_id"], 5);
    }

    #[tokio::test]
    async fn group_form_validates_and_creates() {
        let api = MockApi::new();
        let (ctx, events) = context(&api);
        let mut form = GroupForm::new(&ctx);

        form.target_amount = "1000".into();
        assert!(form.submit().await.is_err());
        assert_eq!(form.error.as_deref(), Some("Group name is required"));
        assert_eq!(api.call_count("create_group"), 0);

        form.name = "Harambee".into();
        form.description = "School fees".into();
        form.submit().await.unwrap();
        let sent = &api.calls("create_group")[0];
        assert_eq!(sent["name"], "Harambee");
        assert_eq!(sent["target_amount"].as_f64(), Some(1000.0));
        assert_eq!(events.last_route(), Some(Route::Dashboard));
    }

    #[tokio::test]
    async fn joining_removes_group_from_discovery() {
        let api = MockApi::new();
        *api.public_groups.lock().unwrap() = vec![group(1, "A"), group(2, "B")];
        let (ctx, _events) = context(&api);
        let mut view = GroupDiscoveryView::new(&ctx);
        view.load().await;

        view.join(1).await.unwrap();
        let remaining: Vec<i64> = view.state.data().unwrap().iter().map(|g| g.id).collect();
        assert_eq!(remaining, vec![2]);
        assert_eq!(view.success.as_deref(), Some("Successfully joined group!"));
    }

    #[tokio::test]
    async fn make_admin_flips_flag_locally() {
        let api = MockApi::new();
        *api.members.lock().unwrap() = vec![member(1, "amina", true), member(2, "baraka", false)];
        let (ctx, _events) = context(&api);
        let mut view = GroupMembersView::new(&ctx, 9);
        view.load().await;
        assert_eq!(view.member_count_label(), "2 members");

        view.make_admin(2).await.unwrap();
        assert!(view.state.data().unwrap()[1].is_admin);
        assert_eq!(api.call_count("get_group_members"), 1);
    }

    #[test]
    fn promote_and_remove_rules() {
        let viewer = User {
            id: 1,
            username: "amina".into(),
            email: String::new(),
        };
        let me = member(1, "amina", false);
        let other = member(2, "baraka", false);
        let admin = member(3, "chebet", true);

        assert!(GroupMembersView::can_promote(&other, true, Some(&viewer)));
        assert!(!GroupMembersView::can_promote(&other, false, Some(&viewer)));
        assert!(!GroupMembersView::can_promote(&me, true, Some(&viewer)));
        assert!(!GroupMembersView::can_promote(&admin, true, Some(&viewer)));

        assert!(!ManageMembersView::can_remove(&me, Some(&viewer)));
        assert!(ManageMembersView::can_remove(&other, Some(&viewer)));
    }

    #[tokio::test]
    async fn search_excludes_members_and_add_refreshes_roster() {
        let api = MockApi::new();
        *api.members.lock().unwrap() = vec![member(1, "amina", true)];
        *api.users.lock().unwrap() = vec![
            User {
                id: 1,
                username: "amina".into(),
                email: String::new(),
            },
            User {
                id: 4,
                username: "daudi".into(),
                email: String::new(),
            },
        ];
        let (ctx, _events) = context(&api);
        let mut view = ManageMembersView::new(&ctx, 9);
        view.load().await;

        view.search_query = "   ".into();
        view.search().await.unwrap();
        assert_eq!(api.call_count("search_users"), 0);

        view.search_query = "d".into();
        view.search().await.unwrap();
        assert_eq!(view.search_results.len(), 1);
        assert_eq!(view.search_results[0].id, 4);

        view.add_member(4).await.unwrap();
        assert!(view.search_results.is_empty());
        assert_eq!(view.members.data().unwrap().len(), 2);
        assert_eq!(api.call_count("get_group_members"), 2);

        view.remove_member(4).await.unwrap();
        assert_eq!(view.members.data().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_membership_change_keeps_roster() {
        let api = MockApi::new();
        *api.members.lock().unwrap() = vec![member(1, "amina", true), member(2, "baraka", false)];
        api.fail("remove_group_member");
        let (ctx, events) = context(&api);
        let mut view = ManageMembersView::new(&ctx, 9);
        view.load().await;

        assert!(view.remove_member(2).await.is_err());
        assert_eq!(view.error.as_deref(), Some("remove_group_member failed"));
        assert_eq!(view.members.data().unwrap().len(), 2);
        assert_eq!(api.call_count("get_group_members"), 1);
        assert_eq!(events.len(), 1);
    }
}
