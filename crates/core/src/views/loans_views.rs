//! Loan screens: request form, lists, details with repayment, admin actions
//! and the group settings card.

use std::sync::Arc;

use log::warn;
use rust_decimal::Decimal;

use crate::constants::{
    DEFAULT_LOAN_DURATION_WEEKS, DEFAULT_MAX_REPAYMENT_WEEKS, DEFAULT_MIN_REPAYMENT_WEEKS,
};
use crate::context::AppContext;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{UiEvent, UiEventSink};
use crate::loans::{Loan, LoanEligibility, LoanRequest, LoanServiceTrait, LoanSettings, LoanStatus};
use crate::utils::money::{format_amount, parse_amount, parse_positive_amount};
use crate::views::ViewState;

/// Reports the outcome of an action as a toast and hands the result back.
fn notify<T>(events: &dyn UiEventSink, result: Result<T>, success: &str) -> Result<T> {
    match &result {
        Ok(_) => events.emit(UiEvent::success(success)),
        Err(e) => events.emit(UiEvent::error(e.to_string())),
    }
    result
}

pub struct LoanRequestForm {
    pub group_id: i64,
    loans: Arc<dyn LoanServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub amount: String,
    pub duration_weeks: u32,
    pub purpose: String,
    pub eligibility: Option<LoanEligibility>,
}

impl LoanRequestForm {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            loans: ctx.services.loans.clone(),
            events: ctx.events.clone(),
            amount: String::new(),
            duration_weeks: DEFAULT_LOAN_DURATION_WEEKS,
            purpose: String::new(),
            eligibility: None,
        }
    }

    pub async fn check_eligibility(&mut self) -> Result<LoanEligibility> {
        let result = self.loans.check_eligibility(self.group_id).await;
        if let Ok(eligibility) = &result {
            self.eligibility = Some(eligibility.clone());
        }
        notify(&*self.events, result, "Eligibility checked successfully")
    }

    pub fn eligibility_label(&self) -> String {
        match &self.eligibility {
            Some(e) => format!("You can borrow up to {}", format_amount(e.eligible_amount)),
            None => "Check your eligible loan amount".to_string(),
        }
    }

    /// Allowed duration range in weeks.
    pub fn duration_bounds(&self) -> (u32, u32) {
        self.eligibility
            .as_ref()
            .map(LoanEligibility::repayment_bounds)
            .unwrap_or((DEFAULT_MIN_REPAYMENT_WEEKS, DEFAULT_MAX_REPAYMENT_WEEKS))
    }

    /// True once eligibility is known and the typed amount is above it.
    pub fn exceeds_eligibility(&self) -> bool {
        match (&self.eligibility, parse_amount(&self.amount)) {
            (Some(e), Ok(amount)) => amount > e.eligible_amount,
            _ => false,
        }
    }

    fn payload(&self) -> Result<LoanRequest> {
        let amount = parse_positive_amount(&self.amount)?;
        if let Some(e) = &self.eligibility {
            if amount > e.eligible_amount {
                return Err(ValidationError::AmountAboveLimit {
                    limit: format_amount(e.eligible_amount),
                }
                .into());
            }
        }
        let (min, max) = self.duration_bounds();
        if self.duration_weeks < min || self.duration_weeks > max {
            return Err(ValidationError::InvalidInput(format!(
                "Must be between {} and {} weeks",
                min, max
            ))
            .into());
        }
        Ok(LoanRequest {
            group_id: self.group_id,
            amount,
            duration_weeks: self.duration_weeks,
            purpose: self.purpose.clone(),
        })
    }

    pub fn can_submit(&self) -> bool {
        self.payload().is_ok()
    }

    /// Sends the request; success resets the form.
    pub async fn submit(&mut self) -> Result<()> {
        let result = match self.payload() {
            Ok(payload) => self.loans.request_loan(payload).await,
            Err(e) => Err(e),
        };
        let result = notify(&*self.events, result, "Loan request submitted successfully");
        if result.is_ok() {
            self.amount.clear();
            self.duration_weeks = DEFAULT_LOAN_DURATION_WEEKS;
            self.purpose.clear();
        }
        result
    }
}

/// Whose loans a list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanListMode {
    User,
    Group(i64),
}

/// Status tabs of a loan list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanTab {
    Active,
    Pending,
    Paid,
}

impl LoanTab {
    pub fn status(self) -> LoanStatus {
        match self {
            LoanTab::Active => LoanStatus::Active,
            LoanTab::Pending => LoanStatus::Pending,
            LoanTab::Paid => LoanStatus::Paid,
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            LoanTab::Active => "Your active loans will appear here",
            LoanTab::Pending => "When you request a loan, it will appear here",
            LoanTab::Paid => "Your paid loans will appear here",
        }
    }
}

pub struct LoanListView {
    pub mode: LoanListMode,
    loans: Arc<dyn LoanServiceTrait>,
    pub tab: LoanTab,
    pub state: ViewState<Vec<Loan>>,
}

impl LoanListView {
    pub fn new(ctx: &AppContext, mode: LoanListMode) -> Self {
        Self {
            mode,
            loans: ctx.services.loans.clone(),
            tab: LoanTab::Active,
            state: ViewState::Loading,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            LoanListMode::User => "Your Loans",
            LoanListMode::Group(_) => "Group Loans",
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        let status = Some(self.tab.status());
        let result = match self.mode {
            LoanListMode::User => self.loans.get_user_loans(status).await,
            LoanListMode::Group(group_id) => self.loans.get_group_loans(group_id, status).await,
        };
        self.state = ViewState::from_result(result);
    }

    pub async fn select_tab(&mut self, tab: LoanTab) {
        self.tab = tab;
        self.load().await;
    }

    /// Borrower in group mode, group in user mode.
    pub fn counterpart<'a>(&self, loan: &'a Loan) -> &'a str {
        let name = match self.mode {
            LoanListMode::User => loan.group_name.as_deref(),
            LoanListMode::Group(_) => loan.user_username.as_deref(),
        };
        name.unwrap_or("-")
    }
}

pub struct LoanDetailsView {
    pub loan_id: i64,
    loans: Arc<dyn LoanServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub state: ViewState<Loan>,
    pub repayment_amount: String,
}

impl LoanDetailsView {
    pub fn new(ctx: &AppContext, loan_id: i64) -> Self {
        Self {
            loan_id,
            loans: ctx.services.loans.clone(),
            events: ctx.events.clone(),
            state: ViewState::Loading,
            repayment_amount: String::new(),
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.loans.get_loan_details(self.loan_id).await);
    }

    /// The repayment form is only shown for active loans.
    pub fn shows_repayment(&self) -> bool {
        self.state.data().map(Loan::accepts_repayment).unwrap_or(false)
    }

    fn repayment(&self) -> Result<Decimal> {
        let loan = self
            .state
            .data()
            .ok_or_else(|| Error::Unexpected("loan not loaded".into()))?;
        if !loan.accepts_repayment() {
            return Err(ValidationError::InvalidInput(format!(
                "a {} loan cannot be repaid",
                loan.status
            ))
            .into());
        }
        let amount = parse_positive_amount(&self.repayment_amount)?;
        if amount > loan.outstanding_balance {
            return Err(ValidationError::AmountAboveLimit {
                limit: format_amount(loan.outstanding_balance),
            }
            .into());
        }
        Ok(amount)
    }

    pub fn can_repay(&self) -> bool {
        self.repayment().is_ok()
    }

    /// Sends a repayment, then reloads the loan.
    pub async fn repay(&mut self) -> Result<()> {
        let result = match self.repayment() {
            Ok(amount) => self.loans.repay_loan(self.loan_id, amount).await,
            Err(e) => Err(e),
        };
        notify(&*self.events, result, "Repayment processed successfully")?;
        self.repayment_amount.clear();
        self.load().await;
        Ok(())
    }
}

/// Approve/reject controls for a pending loan.
pub struct LoanAdminActions {
    pub loan_id: i64,
    loans: Arc<dyn LoanServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub rejection_reason: String,
}

impl LoanAdminActions {
    pub fn new(ctx: &AppContext, loan_id: i64) -> Self {
        Self {
            loan_id,
            loans: ctx.services.loans.clone(),
            events: ctx.events.clone(),
            rejection_reason: String::new(),
        }
    }

    pub async fn approve(&self) -> Result<LoanStatus> {
        let result = self.loans.approve_loan(self.loan_id).await;
        notify(&*self.events, result, "Loan approved successfully").map(|_| LoanStatus::Approved)
    }

    pub fn can_reject(&self) -> bool {
        !self.rejection_reason.trim().is_empty()
    }

    /// Rejects with the typed reason. Without a reason nothing is sent.
    pub async fn reject(&mut self) -> Result<LoanStatus> {
        if !self.can_reject() {
            let err: Error = ValidationError::MissingField("Rejection reason".into()).into();
            self.events
                .emit(UiEvent::error("Please provide a reason for rejection"));
            return Err(err);
        }
        let reason = std::mem::take(&mut self.rejection_reason);
        let result = self.loans.reject_loan(self.loan_id, reason.trim()).await;
        notify(&*self.events, result, "Loan rejected successfully").map(|_| LoanStatus::Rejected)
    }
}

/// Editable fields of the settings card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanSettingsField {
    MaxLoanMultiplier,
    BaseInterestRate,
    MinRepaymentPeriod,
    MaxRepaymentPeriod,
    LatePenaltyRate,
}

pub struct LoanSettingsCard {
    pub group_id: i64,
    loans: Arc<dyn LoanServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub settings: LoanSettings,
    pub draft: Option<LoanSettings>,
}

impl LoanSettingsCard {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            loans: ctx.services.loans.clone(),
            events: ctx.events.clone(),
            settings: LoanSettings::default(),
            draft: None,
        }
    }

    /// Loads the group's settings; the defaults stay when none can be read.
    pub async fn load(&mut self) {
        match self.loans.get_loan_settings(self.group_id).await {
            Ok(settings) => self.settings = settings,
            Err(e) => warn!(
                "Using default loan settings for group {}: {}",
                self.group_id, e
            ),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn edit(&mut self) {
        self.draft = Some(self.settings.clone());
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Updates one draft field. Unparseable input becomes zero.
    pub fn set_field(&mut self, field: LoanSettingsField, raw: &str) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let value: Decimal = raw.trim().parse().unwrap_or(Decimal::ZERO);
        let weeks = || raw.trim().parse::<u32>().unwrap_or(0);
        match field {
            LoanSettingsField::MaxLoanMultiplier => draft.max_loan_multiplier = value,
            LoanSettingsField::BaseInterestRate => draft.base_interest_rate = value,
            LoanSettingsField::MinRepaymentPeriod => draft.min_repayment_period = weeks(),
            LoanSettingsField::MaxRepaymentPeriod => draft.max_repayment_period = weeks(),
            LoanSettingsField::LatePenaltyRate => draft.late_penalty_rate = value,
        }
    }

    pub async fn save(&mut self) -> Result<()> {
        let Some(draft) = self.draft.clone() else {
            return Ok(());
        };
        let result = self
            .loans
            .update_loan_settings(self.group_id, draft.clone())
            .await;
        notify(&*self.events, result, "Loan settings updated successfully")?;
        self.settings = draft;
        self.draft = None;
        Ok(())
    }
}
