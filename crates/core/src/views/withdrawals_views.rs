//! Withdrawal request form, member/admin dashboards and the approval panels.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use futures::try_join;
use log::{error, warn};
use rust_decimal::Decimal;

use crate::context::AppContext;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{UiEvent, UiEventSink};
use crate::utils::money::{format_amount, parse_amount};
use crate::views::ViewState;
use crate::withdrawals::{
    NewWithdrawal, Withdrawal, WithdrawalDecision, WithdrawalServiceTrait, WithdrawalStatus,
};

/// Number of pending requests listed on the member dashboard.
const RECENT_PENDING_SHOWN: usize = 3;

pub struct WithdrawalRequestForm {
    pub group_id: i64,
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub amount: String,
    pub description: String,
    pub available_balance: Decimal,
    pub error: Option<String>,
    pub success: bool,
}

impl WithdrawalRequestForm {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            withdrawals: ctx.services.withdrawals.clone(),
            events: ctx.events.clone(),
            amount: String::new(),
            description: String::new(),
            available_balance: Decimal::ZERO,
            error: None,
            success: false,
        }
    }

    /// Fetches the caller's available balance for the group.
    pub async fn load(&mut self) {
        match self.withdrawals.get_available_balance(self.group_id).await {
            Ok(balance) => self.available_balance = balance.available_balance,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn max_label(&self) -> String {
        format!("Maximum: {}", format_amount(self.available_balance))
    }

    fn payload(&self) -> Result<NewWithdrawal> {
        if self.available_balance <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount("no balance available".into()).into());
        }
        let amount = parse_amount(&self.amount)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount(
                "amount must be greater than zero".into(),
            )
            .into());
        }
        if amount > self.available_balance {
            return Err(ValidationError::AmountAboveLimit {
                limit: format_amount(self.available_balance),
            }
            .into());
        }
        Ok(NewWithdrawal {
            group_id: self.group_id,
            amount,
            description: self.description.clone(),
        })
    }

    /// Submit is disabled without balance, without a positive amount, or
    /// when the amount is above the balance.
    pub fn can_submit(&self) -> bool {
        self.payload().is_ok()
    }

    pub async fn submit(&mut self) -> Result<()> {
        self.error = None;
        self.success = false;
        let result = match self.payload() {
            Ok(payload) => self.withdrawals.request_withdrawal(payload).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.success = true;
        self.amount.clear();
        self.description.clear();
        self.events
            .emit(UiEvent::success("Withdrawal request submitted"));
        self.load().await;
        Ok(())
    }
}

/// The caller's own withdrawal requests, all groups.
pub struct WithdrawalListView {
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    pub state: ViewState<Vec<Withdrawal>>,
}

impl WithdrawalListView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            withdrawals: ctx.services.withdrawals.clone(),
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.withdrawals.get_user_withdrawals().await);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberDashboardData {
    pub available_balance: Decimal,
    pub pending: Vec<Withdrawal>,
}

impl MemberDashboardData {
    pub fn recent_pending(&self) -> &[Withdrawal] {
        &self.pending[..self.pending.len().min(RECENT_PENDING_SHOWN)]
    }

    /// Pending requests not listed by `recent_pending`.
    pub fn more_pending(&self) -> usize {
        self.pending.len().saturating_sub(RECENT_PENDING_SHOWN)
    }

    pub fn pending_label(&self) -> String {
        let n = self.pending.len();
        format!(
            "You have {} pending withdrawal {}",
            n,
            if n == 1 { "request" } else { "requests" }
        )
    }
}

pub struct MemberDashboard {
    pub group_id: i64,
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    pub state: ViewState<MemberDashboardData>,
}

impl MemberDashboard {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            withdrawals: ctx.services.withdrawals.clone(),
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self) {
        let result = try_join!(
            self.withdrawals.get_available_balance(self.group_id),
            self.withdrawals.get_user_withdrawals()
        )
        .map(|(balance, requests)| MemberDashboardData {
            available_balance: balance.available_balance,
            pending: requests.into_iter().filter(Withdrawal::is_pending).collect(),
        });
        self.state = ViewState::from_result(result);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboardData {
    pub pending: Vec<Withdrawal>,
    pub all: Vec<Withdrawal>,
}

pub struct AdminDashboard {
    pub group_id: i64,
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    pub state: ViewState<AdminDashboardData>,
}

impl AdminDashboard {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            withdrawals: ctx.services.withdrawals.clone(),
            state: ViewState::Loading,
        }
    }

    /// Fetches pending and all withdrawals of the group concurrently.
    pub async fn load(&mut self) {
        let result = try_join!(
            self.withdrawals.get_pending_withdrawals(self.group_id),
            self.withdrawals.get_group_withdrawals(self.group_id)
        )
        .map(|(pending, all)| AdminDashboardData { pending, all });
        self.state = ViewState::from_result(result);
    }

    /// Applies a processed request locally: it leaves the pending list and
    /// takes its new status in the full list.
    pub fn on_processed(&mut self, withdrawal_id: i64, status: WithdrawalStatus) {
        if let Some(data) = self.state.data_mut() {
            data.pending.retain(|w| w.id != withdrawal_id);
            for w in data.all.iter_mut().filter(|w| w.id == withdrawal_id) {
                w.status = status;
            }
        }
    }
}

/// Pending requests of a group with approve/reject actions.
///
/// Several requests can be processed at once; ids in flight are tracked so a
/// front-end can disable their buttons.
pub struct PendingWithdrawalsView {
    pub group_id: i64,
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    events: Arc<dyn UiEventSink>,
    state: RwLock<ViewState<Vec<Withdrawal>>>,
    processing: Mutex<HashSet<i64>>,
}

impl PendingWithdrawalsView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            withdrawals: ctx.services.withdrawals.clone(),
            events: ctx.events.clone(),
            state: RwLock::new(ViewState::Loading),
            processing: Mutex::new(HashSet::new()),
        }
    }

    pub fn state(&self) -> ViewState<Vec<Withdrawal>> {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|_| ViewState::Failed("view state unavailable".into()))
    }

    pub async fn load(&self) {
        let result = self
            .withdrawals
            .get_pending_withdrawals(self.group_id)
            .await
            .map_err(|e| {
                error!("Error fetching withdrawals: {}", e);
                e
            });
        let next = ViewState::from_result(result);
        match self.state.write() {
            Ok(mut state) => *state = next,
            Err(_) => warn!("Pending withdrawals state lock poisoned"),
        }
    }

    pub fn is_processing(&self, withdrawal_id: i64) -> bool {
        self.processing
            .lock()
            .map(|ids| ids.contains(&withdrawal_id))
            .unwrap_or(false)
    }

    /// Sends the decision, then reloads the pending list.
    pub async fn process(
        &self,
        withdrawal_id: i64,
        decision: WithdrawalDecision,
        admin_comment: &str,
    ) -> Result<WithdrawalStatus> {
        let started = self
            .processing
            .lock()
            .map(|mut ids| ids.insert(withdrawal_id))
            .unwrap_or(false);
        if !started {
            return Err(Error::Unexpected(format!(
                "withdrawal {} is already being processed",
                withdrawal_id
            )));
        }

        let result = self
            .withdrawals
            .process_withdrawal(withdrawal_id, decision, admin_comment)
            .await;
        let outcome = match result {
            Ok(()) => {
                self.events
                    .emit(UiEvent::success(format!("Withdrawal {}", decision)));
                self.load().await;
                Ok(decision.resulting_status())
            }
            Err(e) => {
                error!("Withdrawal processing error: {}", e);
                self.events.emit(UiEvent::error(format!("Error: {}", e)));
                Err(e)
            }
        };

        if let Ok(mut ids) = self.processing.lock() {
            ids.remove(&withdrawal_id);
        }
        outcome
    }
}

/// Single-request decision form with an optional comment.
pub struct ProcessWithdrawalForm {
    pub withdrawal_id: i64,
    withdrawals: Arc<dyn WithdrawalServiceTrait>,
    pub comment: String,
    pub error: Option<String>,
}

impl ProcessWithdrawalForm {
    pub fn new(ctx: &AppContext, withdrawal_id: i64) -> Self {
        Self {
            withdrawal_id,
            withdrawals: ctx.services.withdrawals.clone(),
            comment: String::new(),
            error: None,
        }
    }

    /// Returns the new status so the caller can update its lists.
    pub async fn process(&mut self, decision: WithdrawalDecision) -> Result<WithdrawalStatus> {
        self.error = None;
        match self
            .withdrawals
            .process_withdrawal(self.withdrawal_id, decision, &self.comment)
            .await
        {
            Ok(()) => Ok(decision.resulting_status()),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
