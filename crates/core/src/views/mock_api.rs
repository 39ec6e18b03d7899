//! In-memory implementation of every service trait for view model tests.
//!
//! Each call is recorded with its payload; operations listed in `failing`
//! return a 400 with a fixed message.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::auth::{
    AuthResponse, AuthServiceTrait, Credentials, NewUser, ProfileUpdate, User, UserServiceTrait,
};
use crate::context::Services;
use crate::errors::{Error, Result};
use crate::groups::{Group, GroupMember, GroupServiceTrait, GroupUpdate, NewGroup};
use crate::loans::{
    Loan, LoanEligibility, LoanRequest, LoanServiceTrait, LoanSettings, LoanStatus,
};
use crate::notifications::{NotificationPage, NotificationServiceTrait};
use crate::transactions::{
    ContributionReceipt, GroupStats, MpesaContribution, MpesaReceipt, NewContribution,
    TransactionPage, TransactionServiceTrait,
};
use crate::withdrawals::{
    AvailableBalance, NewWithdrawal, Withdrawal, WithdrawalDecision, WithdrawalServiceTrait,
    WithdrawalStatus,
};

#[derive(Default)]
pub(crate) struct MockApi {
    pub groups: Mutex<Vec<Group>>,
    pub public_groups: Mutex<Vec<Group>>,
    pub members: Mutex<Vec<GroupMember>>,
    pub users: Mutex<Vec<User>>,
    pub group_loans: Mutex<HashMap<i64, Vec<Loan>>>,
    pub failing_loan_groups: Mutex<HashSet<i64>>,
    pub user_loans: Mutex<Vec<Loan>>,
    pub loan: Mutex<Option<Loan>>,
    pub eligibility: Mutex<Option<LoanEligibility>>,
    pub loan_settings: Mutex<Option<LoanSettings>>,
    pub available_balance: Mutex<Decimal>,
    pub pending_withdrawals: Mutex<Vec<Withdrawal>>,
    pub group_withdrawals: Mutex<Vec<Withdrawal>>,
    pub user_withdrawals: Mutex<Vec<Withdrawal>>,
    pub transactions: Mutex<TransactionPage>,
    pub stats: Mutex<GroupStats>,
    pub failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<(&'static str, Value)>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn services(self: &Arc<Self>) -> Services {
        Services::from_shared(self.clone())
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Payloads of every call to `operation`, in order.
    pub fn calls(&self, operation: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == operation)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls(operation).len()
    }

    fn record(&self, operation: &'static str, payload: Value) -> Result<()> {
        self.calls.lock().unwrap().push((operation, payload));
        if self.failing.lock().unwrap().contains(operation) {
            return Err(Error::api(400, format!("{} failed", operation)));
        }
        Ok(())
    }
}

pub(crate) fn group(id: i64, name: &str) -> Group {
    Group {
        id,
        name: name.to_string(),
        description: None,
        current_amount: Decimal::ZERO,
        target_amount: Decimal::ONE_THOUSAND,
        member_status: None,
        creator_id: None,
    }
}

pub(crate) fn member(id: i64, username: &str, is_admin: bool) -> GroupMember {
    GroupMember {
        id,
        username: username.to_string(),
        email: format!("{}@example.com", username),
        is_admin,
    }
}

pub(crate) fn withdrawal(id: i64, amount: Decimal, status: WithdrawalStatus) -> Withdrawal {
    Withdrawal {
        id,
        amount,
        status,
        admin_comment: None,
        description: None,
        timestamp: Some("2024-03-01T10:00:00".into()),
        user_username: Some("amina".into()),
        group_id: Some(1),
        group_name: Some("Savings".into()),
    }
}

pub(crate) fn loan(id: i64, status: LoanStatus, outstanding: Decimal) -> Loan {
    Loan {
        id,
        amount: outstanding,
        status,
        interest_rate: Decimal::TEN,
        outstanding_balance: outstanding,
        total_repayment: outstanding,
        amount_paid: Decimal::ZERO,
        purpose: None,
        duration_weeks: Some(8),
        due_date: None,
        created_at: None,
        approved_at: None,
        group_id: Some(1),
        group_name: Some("Savings".into()),
        user_username: Some("amina".into()),
        repayments: Vec::new(),
    }
}

#[async_trait]
impl AuthServiceTrait for MockApi {
    async fn register(&self, new_user: NewUser) -> Result<AuthResponse> {
        self.record("register", json!({ "username": new_user.username }))?;
        Ok(AuthResponse {
            user: User {
                id: 1,
                username: new_user.username,
                email: new_user.email,
            },
            access_token: "token".into(),
        })
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthResponse> {
        self.record("login", json!({ "email": credentials.email }))?;
        Ok(AuthResponse {
            user: User {
                id: 1,
                username: "amina".into(),
                email: credentials.email,
            },
            access_token: "token".into(),
        })
    }

    async fn get_profile(&self, _token: &str) -> Result<User> {
        self.record("get_profile", Value::Null)?;
        Ok(User {
            id: 1,
            username: "amina".into(),
            email: "amina@example.com".into(),
        })
    }

    async fn update_profile(&self, _token: &str, update: ProfileUpdate) -> Result<User> {
        self.record("update_profile", serde_json::to_value(&update)?)?;
        Ok(User {
            id: 1,
            username: update.username.unwrap_or_else(|| "amina".into()),
            email: update.email.unwrap_or_else(|| "amina@example.com".into()),
        })
    }
}

#[async_trait]
impl UserServiceTrait for MockApi {
    async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        self.record("search_users", json!({ "q": query }))?;
        Ok(self.users.lock().unwrap().clone())
    }
}

#[async_trait]
impl GroupServiceTrait for MockApi {
    async fn create_group(&self, new_group: NewGroup) -> Result<Group> {
        self.record("create_group", serde_json::to_value(&new_group)?)?;
        Ok(group(99, &new_group.name))
    }

    async fn get_user_groups(&self) -> Result<Vec<Group>> {
        self.record("get_user_groups", Value::Null)?;
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn get_group_details(&self, group_id: i64) -> Result<Group> {
        self.record("get_group_details", json!({ "group_id": group_id }))?;
        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .ok_or_else(|| Error::api(404, "Group not found"))
    }

    async fn update_group(&self, group_id: i64, update: GroupUpdate) -> Result<Group> {
        self.record("update_group", serde_json::to_value(&update)?)?;
        let mut g = group(group_id, update.name.as_deref().unwrap_or("Group"));
        g.description = update.description;
        Ok(g)
    }

    async fn join_group(&self, group_id: i64) -> Result<()> {
        self.record("join_group", json!({ "group_id": group_id }))
    }

    async fn leave_group(&self, group_id: i64) -> Result<()> {
        self.record("leave_group", json!({ "group_id": group_id }))
    }

    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        self.record("get_group_members", json!({ "group_id": group_id }))?;
        Ok(self.members.lock().unwrap().clone())
    }

    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.record(
            "add_group_member",
            json!({ "group_id": group_id, "user_id": user_id }),
        )?;
        let added = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned();
        if let Some(user) = added {
            self.members
                .lock()
                .unwrap()
                .push(member(user.id, &user.username, false));
        }
        Ok(())
    }

    async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.record(
            "remove_group_member",
            json!({ "group_id": group_id, "user_id": user_id }),
        )?;
        self.members.lock().unwrap().retain(|m| m.id != user_id);
        Ok(())
    }

    async fn make_group_admin(&self, group_id: i64, user_id: i64) -> Result<()> {
        self.record(
            "make_group_admin",
            json!({ "group_id": group_id, "user_id": user_id }),
        )?;
        for m in self.members.lock().unwrap().iter_mut() {
            if m.id == user_id {
                m.is_admin = true;
            }
        }
        Ok(())
    }

    async fn get_public_groups(&self) -> Result<Vec<Group>> {
        self.record("get_public_groups", Value::Null)?;
        Ok(self.public_groups.lock().unwrap().clone())
    }
}

#[async_trait]
impl TransactionServiceTrait for MockApi {
    async fn contribute(&self, contribution: NewContribution) -> Result<ContributionReceipt> {
        self.record("contribute", serde_json::to_value(&contribution)?)?;
        Ok(ContributionReceipt {
            message: Some("Contribution successful".into()),
            transaction: None,
        })
    }

    async fn get_group_transactions(
        &self,
        group_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<TransactionPage> {
        self.record(
            "get_group_transactions",
            json!({ "group_id": group_id, "page": page, "per_page": per_page }),
        )?;
        let mut result = self.transactions.lock().unwrap().clone();
        result.current_page = Some(page);
        Ok(result)
    }

    async fn get_user_transactions(&self, page: u32, per_page: u32) -> Result<TransactionPage> {
        self.record(
            "get_user_transactions",
            json!({ "page": page, "per_page": per_page }),
        )?;
        Ok(self.transactions.lock().unwrap().clone())
    }

    async fn get_group_stats(&self, group_id: i64) -> Result<GroupStats> {
        self.record("get_group_stats", json!({ "group_id": group_id }))?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn initiate_mpesa_contribution(
        &self,
        group_id: i64,
        contribution: MpesaContribution,
    ) -> Result<MpesaReceipt> {
        self.record(
            "initiate_mpesa_contribution",
            json!({
                "group_id": group_id,
                "amount": contribution.amount,
                "phone_number": contribution.phone_number,
            }),
        )?;
        Ok(MpesaReceipt {
            message: Some("STK push sent".into()),
            checkout_request_id: Some("ws_CO_1".into()),
        })
    }
}

#[async_trait]
impl WithdrawalServiceTrait for MockApi {
    async fn request_withdrawal(&self, request: NewWithdrawal) -> Result<()> {
        self.record("request_withdrawal", serde_json::to_value(&request)?)?;
        let mut balance = self.available_balance.lock().unwrap();
        *balance -= request.amount;
        Ok(())
    }

    async fn get_pending_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>> {
        self.record("get_pending_withdrawals", json!({ "group_id": group_id }))?;
        Ok(self.pending_withdrawals.lock().unwrap().clone())
    }

    async fn process_withdrawal(
        &self,
        withdrawal_id: i64,
        decision: WithdrawalDecision,
        admin_comment: &str,
    ) -> Result<()> {
        self.record(
            "process_withdrawal",
            json!({
                "withdrawal_id": withdrawal_id,
                "status": decision,
                "admin_comment": admin_comment,
            }),
        )?;
        self.pending_withdrawals
            .lock()
            .unwrap()
            .retain(|w| w.id != withdrawal_id);
        Ok(())
    }

    async fn get_user_withdrawals(&self) -> Result<Vec<Withdrawal>> {
        self.record("get_user_withdrawals", Value::Null)?;
        Ok(self.user_withdrawals.lock().unwrap().clone())
    }

    async fn get_withdrawal_status(&self, withdrawal_id: i64) -> Result<Withdrawal> {
        self.record("get_withdrawal_status", json!({ "id": withdrawal_id }))?;
        self.user_withdrawals
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == withdrawal_id)
            .cloned()
            .ok_or_else(|| Error::api(404, "Withdrawal not found"))
    }

    async fn get_group_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>> {
        self.record("get_group_withdrawals", json!({ "group_id": group_id }))?;
        Ok(self.group_withdrawals.lock().unwrap().clone())
    }

    async fn get_available_balance(&self, group_id: i64) -> Result<AvailableBalance> {
        self.record("get_available_balance", json!({ "group_id": group_id }))?;
        Ok(AvailableBalance {
            available_balance: *self.available_balance.lock().unwrap(),
        })
    }
}

#[async_trait]
impl LoanServiceTrait for MockApi {
    async fn get_loan_settings(&self, group_id: i64) -> Result<LoanSettings> {
        self.record("get_loan_settings", json!({ "group_id": group_id }))?;
        Ok(self.loan_settings.lock().unwrap().clone().unwrap_or_default())
    }

    async fn update_loan_settings(&self, group_id: i64, settings: LoanSettings) -> Result<()> {
        self.record(
            "update_loan_settings",
            json!({ "group_id": group_id, "settings": settings }),
        )?;
        *self.loan_settings.lock().unwrap() = Some(settings);
        Ok(())
    }

    async fn check_eligibility(&self, group_id: i64) -> Result<LoanEligibility> {
        self.record("check_eligibility", json!({ "group_id": group_id }))?;
        self.eligibility
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::api(403, "You are not a member of this group"))
    }

    async fn request_loan(&self, request: LoanRequest) -> Result<()> {
        self.record("request_loan", serde_json::to_value(&request)?)
    }

    async fn get_user_loans(&self, status: Option<LoanStatus>) -> Result<Vec<Loan>> {
        self.record(
            "get_user_loans",
            json!({ "status": status.map(|s| s.as_query()).unwrap_or("") }),
        )?;
        Ok(self
            .user_loans
            .lock()
            .unwrap()
            .iter()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .cloned()
            .collect())
    }

    async fn get_group_loans(
        &self,
        group_id: i64,
        status: Option<LoanStatus>,
    ) -> Result<Vec<Loan>> {
        self.record(
            "get_group_loans",
            json!({ "group_id": group_id, "status": status.map(|s| s.as_query()).unwrap_or("") }),
        )?;
        if self.failing_loan_groups.lock().unwrap().contains(&group_id) {
            return Err(Error::Network("connection reset".into()));
        }
        Ok(self
            .group_loans
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .collect())
    }

    async fn get_loan_details(&self, loan_id: i64) -> Result<Loan> {
        self.record("get_loan_details", json!({ "loan_id": loan_id }))?;
        self.loan
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::api(404, "Loan not found"))
    }

    async fn approve_loan(&self, loan_id: i64) -> Result<()> {
        self.record("approve_loan", json!({ "loan_id": loan_id }))
    }

    async fn reject_loan(&self, loan_id: i64, reason: &str) -> Result<()> {
        self.record("reject_loan", json!({ "loan_id": loan_id, "reason": reason }))
    }

    async fn repay_loan(&self, loan_id: i64, amount: Decimal) -> Result<()> {
        self.record("repay_loan", json!({ "loan_id": loan_id, "amount": amount }))?;
        if let Some(loan) = self.loan.lock().unwrap().as_mut() {
            loan.outstanding_balance -= amount;
            loan.amount_paid += amount;
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationServiceTrait for MockApi {
    async fn get_notifications(&self, unread_only: bool, limit: u32) -> Result<NotificationPage> {
        self.record(
            "get_notifications",
            json!({ "unread": unread_only, "limit": limit }),
        )?;
        Ok(NotificationPage::default())
    }

    async fn mark_as_read(&self, notification_id: i64) -> Result<()> {
        self.record("mark_as_read", json!({ "id": notification_id }))
    }

    async fn mark_all_as_read(&self) -> Result<()> {
        self.record("mark_all_as_read", Value::Null)
    }

    async fn get_unread_count(&self) -> Result<u64> {
        self.record("get_unread_count", Value::Null)?;
        Ok(0)
    }
}
