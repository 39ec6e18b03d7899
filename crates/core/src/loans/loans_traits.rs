use crate::errors::Result;
use crate::loans::loans_model::{Loan, LoanEligibility, LoanRequest, LoanSettings, LoanStatus};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for the loans resource. `None` status filters mean "all".
#[async_trait]
pub trait LoanServiceTrait: Send + Sync {
    async fn get_loan_settings(&self, group_id: i64) -> Result<LoanSettings>;
    async fn update_loan_settings(&self, group_id: i64, settings: LoanSettings) -> Result<()>;
    async fn check_eligibility(&self, group_id: i64) -> Result<LoanEligibility>;
    async fn request_loan(&self, request: LoanRequest) -> Result<()>;
    async fn get_user_loans(&self, status: Option<LoanStatus>) -> Result<Vec<Loan>>;
    async fn get_group_loans(&self, group_id: i64, status: Option<LoanStatus>)
        -> Result<Vec<Loan>>;
    async fn get_loan_details(&self, loan_id: i64) -> Result<Loan>;
    async fn approve_loan(&self, loan_id: i64) -> Result<()>;
    async fn reject_loan(&self, loan_id: i64, reason: &str) -> Result<()>;
    async fn repay_loan(&self, loan_id: i64, amount: Decimal) -> Result<()>;
}
