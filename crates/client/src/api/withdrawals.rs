use async_trait::async_trait;
use chama_core::withdrawals::{
    AvailableBalance, NewWithdrawal, Withdrawal, WithdrawalDecision, WithdrawalServiceTrait,
};
use chama_core::Result;

use crate::client::ApiClient;
use crate::types::{
    PendingWithdrawalsEnvelope, ProcessWithdrawalRequest, WithdrawalEnvelope,
    WithdrawalRequestsEnvelope,
};

#[async_trait]
impl WithdrawalServiceTrait for ApiClient {
    /// POST /api/withdrawals/request
    async fn request_withdrawal(&self, request: NewWithdrawal) -> Result<()> {
        Ok(self
            .post_unit(
                "/api/withdrawals/request",
                &request,
                "Failed to request withdrawal",
            )
            .await?)
    }

    /// GET /api/withdrawals/pending/{group_id}
    async fn get_pending_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>> {
        let envelope: PendingWithdrawalsEnvelope = self
            .get(
                &format!("/api/withdrawals/pending/{}", group_id),
                "Failed to fetch pending withdrawals",
            )
            .await?;
        Ok(envelope.pending_withdrawals)
    }

    /// POST /api/withdrawals/{id}/action
    async fn process_withdrawal(
        &self,
        withdrawal_id: i64,
        decision: WithdrawalDecision,
        admin_comment: &str,
    ) -> Result<()> {
        let body = ProcessWithdrawalRequest {
            status: decision,
            admin_comment,
        };
        Ok(self
            .post_unit(
                &format!("/api/withdrawals/{}/action", withdrawal_id),
                &body,
                "Failed to process withdrawal",
            )
            .await?)
    }

    /// GET /api/withdrawals/user
    async fn get_user_withdrawals(&self) -> Result<Vec<Withdrawal>> {
        let envelope: WithdrawalRequestsEnvelope = self
            .get("/api/withdrawals/user", "Failed to fetch user withdrawals")
            .await?;
        Ok(envelope.withdrawal_requests)
    }

    /// GET /api/withdrawals/{id}/status
    async fn get_withdrawal_status(&self, withdrawal_id: i64) -> Result<Withdrawal> {
        let envelope: WithdrawalEnvelope = self
            .get(
                &format!("/api/withdrawals/{}/status", withdrawal_id),
                "Failed to fetch withdrawal status",
            )
            .await?;
        Ok(envelope.into_inner())
    }

    /// GET /api/withdrawals/group/{group_id}
    async fn get_group_withdrawals(&self, group_id: i64) -> Result<Vec<Withdrawal>> {
        let envelope: WithdrawalRequestsEnvelope = self
            .get(
                &format!("/api/withdrawals/group/{}", group_id),
                "Failed to fetch group withdrawals",
            )
            .await?;
        Ok(envelope.withdrawal_requests)
    }

    /// GET /api/withdrawals/user/available-balance/{group_id}
    async fn get_available_balance(&self, group_id: i64) -> Result<AvailableBalance> {
        Ok(self
            .get(
                &format!("/api/withdrawals/user/available-balance/{}", group_id),
                "Failed to fetch available balance",
            )
            .await?)
    }
}
