use crate::errors::Result;
use crate::withdrawals::withdrawals_model::{
    AvailableBalance, NewWithdrawal, Withdrawal, WithdrawalDecision,
};
use async_trait::async_trait;

/// Trait for the withdrawals resource.
#[async_trait]
pub trait WithdrawalServiceTrait: Send + Sync {
    async fn request_withdrawal(&self, request: NewWithdrawal) -> Result<()>;
    async fn get_pending_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>>;
    async fn process_withdrawal(
        &self,
        withdrawal_id: i64,
        decision: WithdrawalDecision,
        admin_comment: &str,
    ) -> Result<()>;
    async fn get_user_withdrawals(&self) -> Result<Vec<Withdrawal>>;
    async fn get_withdrawal_status(&self, withdrawal_id: i64) -> Result<Withdrawal>;
    async fn get_group_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>>;
    async fn get_available_balance(&self, group_id: i64) -> Result<AvailableBalance>;
}
