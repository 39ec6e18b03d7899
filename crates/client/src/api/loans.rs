use async_trait::async_trait;
use chama_core::loans::{
    Loan, LoanEligibility, LoanRequest, LoanServiceTrait, LoanSettings, LoanStatus,
};
use chama_core::Result;
use rust_decimal::Decimal;

use crate::client::ApiClient;
use crate::types::{
    LoanEnvelope, LoanSettingsUpdate, LoansEnvelope, RejectLoanRequest, RepayLoanRequest,
};

const LOANS_FETCH_FAILED: &str = "An unknown error occurred while fetching loans";

/// Value of the `status` query parameter; "all" is an empty filter.
fn status_query(status: Option<LoanStatus>) -> &'static str {
    status.map(|s| s.as_query()).unwrap_or("")
}

#[async_trait]
impl LoanServiceTrait for ApiClient {
    /// GET /api/loans/settings?group_id={group_id}
    async fn get_loan_settings(&self, group_id: i64) -> Result<LoanSettings> {
        Ok(self
            .get(
                &format!("/api/loans/settings?group_id={}", group_id),
                "Failed to fetch loan settings",
            )
            .await?)
    }

    /// PUT /api/loans/settings
    async fn update_loan_settings(&self, group_id: i64, settings: LoanSettings) -> Result<()> {
        let body = LoanSettingsUpdate {
            group_id,
            settings: &settings,
        };
        Ok(self
            .put_unit("/api/loans/settings", &body, "Failed to update loan settings")
            .await?)
    }

    /// GET /api/loans/eligibility?group_id={group_id}
    async fn check_eligibility(&self, group_id: i64) -> Result<LoanEligibility> {
        Ok(self
            .get(
                &format!("/api/loans/eligibility?group_id={}", group_id),
                "Failed to check eligibility",
            )
            .await?)
    }

    /// POST /api/loans/request
    async fn request_loan(&self, request: LoanRequest) -> Result<()> {
        Ok(self
            .post_unit("/api/loans/request", &request, "Request failed")
            .await?)
    }

    /// GET /api/loans/user?status={status}
    async fn get_user_loans(&self, status: Option<LoanStatus>) -> Result<Vec<Loan>> {
        let path = format!("/api/loans/user?status={}", status_query(status));
        let envelope: LoansEnvelope = self.get(&path, LOANS_FETCH_FAILED).await?;
        Ok(envelope.loans)
    }

    /// GET /api/loans/group/{id}?status={status}
    async fn get_group_loans(
        &self,
        group_id: i64,
        status: Option<LoanStatus>,
    ) -> Result<Vec<Loan>> {
        let path = format!(
            "/api/loans/group/{}?status={}",
            group_id,
            status_query(status)
        );
        let envelope: LoansEnvelope = self.get(&path, LOANS_FETCH_FAILED).await?;
        Ok(envelope.loans)
    }

    /// GET /api/loans/{id}
    async fn get_loan_details(&self, loan_id: i64) -> Result<Loan> {
        let envelope: LoanEnvelope = self
            .get(
                &format!("/api/loans/{}", loan_id),
                "Failed to fetch loan details",
            )
            .await?;
        Ok(envelope.loan)
    }

    /// POST /api/loans/{id}/approve
    async fn approve_loan(&self, loan_id: i64) -> Result<()> {
        Ok(self
            .post_empty(
                &format!("/api/loans/{}/approve", loan_id),
                "Failed to approve loan",
            )
            .await?)
    }

    /// POST /api/loans/{id}/reject
    async fn reject_loan(&self, loan_id: i64, reason: &str) -> Result<()> {
        Ok(self
            .post_unit(
                &format!("/api/loans/{}/reject", loan_id),
                &RejectLoanRequest { reason },
                "Failed to reject loan",
            )
            .await?)
    }

    /// POST /api/loans/{id}/repay
    async fn repay_loan(&self, loan_id: i64, amount: Decimal) -> Result<()> {
        Ok(self
            .post_unit(
                &format!("/api/loans/{}/repay", loan_id),
                &RepayLoanRequest { amount },
                "Failed to repay loan",
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_filter_means_all() {
        assert_eq!(status_query(None), "");
        assert_eq!(status_query(Some(LoanStatus::Active)), "active");
        assert_eq!(status_query(Some(LoanStatus::Paid)), "paid");
    }
}
