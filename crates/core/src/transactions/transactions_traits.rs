use crate::errors::Result;
use crate::transactions::transactions_model::{
    ContributionReceipt, GroupStats, MpesaContribution, MpesaReceipt, NewContribution,
    TransactionPage,
};
use async_trait::async_trait;

/// Trait for the transactions resource.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn contribute(&self, contribution: NewContribution) -> Result<ContributionReceipt>;
    async fn get_group_transactions(
        &self,
        group_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<TransactionPage>;
    async fn get_user_transactions(&self, page: u32, per_page: u32) -> Result<TransactionPage>;
    async fn get_group_stats(&self, group_id: i64) -> Result<GroupStats>;
    async fn initiate_mpesa_contribution(
        &self,
        group_id: i64,
        contribution: MpesaContribution,
    ) -> Result<MpesaReceipt>;
}
