use async_trait::async_trait;
use chama_core::transactions::{
    ContributionReceipt, GroupStats, MpesaContribution, MpesaReceipt, NewContribution,
    TransactionPage, TransactionServiceTrait,
};
use chama_core::Result;

use crate::client::ApiClient;

#[async_trait]
impl TransactionServiceTrait for ApiClient {
    /// POST /api/transactions/contribute
    async fn contribute(&self, contribution: NewContribution) -> Result<ContributionReceipt> {
        Ok(self
            .post(
                "/api/transactions/contribute",
                &contribution,
                "Failed to contribute",
            )
            .await?)
    }

    /// GET /api/transactions/group/{id}/transactions?page={page}&per_page={per_page}
    async fn get_group_transactions(
        &self,
        group_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<TransactionPage> {
        let path = format!(
            "/api/transactions/group/{}/transactions?page={}&per_page={}",
            group_id, page, per_page
        );
        Ok(self
            .get(&path, "Failed to fetch group transactions")
            .await?)
    }

    /// GET /api/transactions/user/transactions?page={page}&per_page={per_page}
    async fn get_user_transactions(&self, page: u32, per_page: u32) -> Result<TransactionPage> {
        let path = format!(
            "/api/transactions/user/transactions?page={}&per_page={}",
            page, per_page
        );
        Ok(self.get(&path, "Failed to fetch user transactions").await?)
    }

    /// GET /api/transactions/group/{id}/stats
    async fn get_group_stats(&self, group_id: i64) -> Result<GroupStats> {
        Ok(self
            .get(
                &format!("/api/transactions/group/{}/stats", group_id),
                "Failed to fetch group statistics",
            )
            .await?)
    }

    /// POST /api/groups/{id}/contribute/mpesa
    async fn initiate_mpesa_contribution(
        &self,
        group_id: i64,
        contribution: MpesaContribution,
    ) -> Result<MpesaReceipt> {
        Ok(self
            .post(
                &format!("/api/groups/{}/contribute/mpesa", group_id),
                &contribution,
                "Failed to initiate M-Pesa payment",
            )
            .await?)
    }
}
