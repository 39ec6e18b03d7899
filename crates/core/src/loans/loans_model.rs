//! Loan domain models.
//!
//! Interest, penalties and schedules are computed by the server; these types
//! only carry what it returns.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::constants::{DEFAULT_MAX_REPAYMENT_WEEKS, DEFAULT_MIN_REPAYMENT_WEEKS};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum LoanStatus {
    Pending,
    Approved,
    Active,
    Paid,
    Rejected,
    Defaulted,
}

impl LoanStatus {
    /// Value of the `status` query filter.
    pub fn as_query(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Active => "active",
            LoanStatus::Paid => "paid",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Defaulted => "defaulted",
        }
    }

    /// Approved and active loans still have money outstanding.
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Approved | LoanStatus::Active)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query().to_ascii_uppercase())
    }
}

impl FromStr for LoanStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "active" => Ok(LoanStatus::Active),
            "paid" => Ok(LoanStatus::Paid),
            "rejected" => Ok(LoanStatus::Rejected),
            "defaulted" => Ok(LoanStatus::Defaulted),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown loan status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum RepaymentStatus {
    Pending,
    Paid,
    Overdue,
    Other(String),
}

impl fmt::Display for RepaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepaymentStatus::Pending => f.write_str("PENDING"),
            RepaymentStatus::Paid => f.write_str("PAID"),
            RepaymentStatus::Overdue => f.write_str("OVERDUE"),
            RepaymentStatus::Other(other) => f.write_str(other),
        }
    }
}

impl FromStr for RepaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => RepaymentStatus::Pending,
            "PAID" => RepaymentStatus::Paid,
            "OVERDUE" => RepaymentStatus::Overdue,
            other => RepaymentStatus::Other(other.to_string()),
        })
    }
}

/// One installment of a loan's repayment schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repayment {
    pub id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: RepaymentStatus,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub is_overdue: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id: i64,
    pub amount: Decimal,
    pub status: LoanStatus,
    #[serde(default)]
    pub interest_rate: Decimal,
    #[serde(default)]
    pub outstanding_balance: Decimal,
    #[serde(default)]
    pub total_repayment: Decimal,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub duration_weeks: Option<u32>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub user_username: Option<String>,
    #[serde(default)]
    pub repayments: Vec<Repayment>,
}

impl Loan {
    /// Only active loans accept repayments.
    pub fn accepts_repayment(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn overdue_installments(&self) -> usize {
        self.repayments.iter().filter(|r| r.is_overdue).count()
    }
}

/// Group-level lending rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanSettings {
    pub max_loan_multiplier: Decimal,
    pub base_interest_rate: Decimal,
    pub min_repayment_period: u32,
    pub max_repayment_period: u32,
    pub late_penalty_rate: Decimal,
}

impl Default for LoanSettings {
    fn default() -> Self {
        Self {
            max_loan_multiplier: dec!(3.0),
            base_interest_rate: dec!(10.0),
            min_repayment_period: DEFAULT_MIN_REPAYMENT_WEEKS,
            max_repayment_period: DEFAULT_MAX_REPAYMENT_WEEKS,
            late_penalty_rate: dec!(2.0),
        }
    }
}

/// How much the caller may borrow from one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanEligibility {
    pub eligible_amount: Decimal,
    #[serde(default)]
    pub min_repayment_period: Option<u32>,
    #[serde(default)]
    pub max_repayment_period: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoanEligibility {
    /// Allowed duration range in weeks, falling back to the defaults.
    pub fn repayment_bounds(&self) -> (u32, u32) {
        (
            self.min_repayment_period.unwrap_or(DEFAULT_MIN_REPAYMENT_WEEKS),
            self.max_repayment_period.unwrap_or(DEFAULT_MAX_REPAYMENT_WEEKS),
        )
    }
}

/// Payload of the loan request form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanRequest {
    pub group_id: i64,
    pub amount: Decimal,
    pub duration_weeks: u32,
    pub purpose: String,
}

/// Per-group loan summary shown on the group list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanStats {
    pub total_loans: usize,
    pub active_loans: usize,
    pub pending_loans: usize,
    pub outstanding_balance: Decimal,
}

impl LoanStats {
    pub fn from_loans(loans: &[Loan]) -> Self {
        loans.iter().fold(Self::default(), |mut stats, loan| {
            stats.total_loans += 1;
            if loan.status.is_open() {
                stats.active_loans += 1;
                stats.outstanding_balance += loan.outstanding_balance;
            }
            if loan.status == LoanStatus::Pending {
                stats.pending_loans += 1;
            }
            stats
        })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(id: i64, status: LoanStatus, outstanding: Decimal) -> Loan {
        Loan {
            id,
            amount: dec!(1000),
            status,
            interest_rate: dec!(10),
            outstanding_balance: outstanding,
            total_repayment: dec!(1100),
            amount_paid: Decimal::ZERO,
            purpose: None,
            duration_weeks: Some(8),
            due_date: None,
            created_at: None,
            approved_at: None,
            group_id: Some(1),
            group_name: None,
            user_username: None,
            repayments: Vec::new(),
        }
    }

    #[test]
    fn loan_status_parses_any_case() {
        assert_eq!("ACTIVE".parse::<LoanStatus>().unwrap(), LoanStatus::Active);
        assert_eq!("defaulted".parse::<LoanStatus>().unwrap(), LoanStatus::Defaulted);
        assert_eq!(LoanStatus::Paid.to_string(), "PAID");
        assert_eq!(LoanStatus::Paid.as_query(), "paid");
        assert!("frozen".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn loan_with_schedule_deserializes() {
        let raw = r#"{
            "id": 9, "amount": 500, "status": "ACTIVE", "interest_rate": 10,
            "outstanding_balance": 275.5, "repayments": [
                {"id": 1, "amount": 137.5, "due_date": "2024-05-01", "status": "PAID", "paid_at": "2024-04-30"},
                {"id": 2, "amount": 137.5, "due_date": "2024-05-15", "status": "pending", "is_overdue": true}
            ]
        }"#;
        let loan: Loan = serde_json::from_str(raw).unwrap();
        assert!(loan.accepts_repayment());
        assert_eq!(loan.repayments.len(), 2);
        assert_eq!(loan.repayments[1].status, RepaymentStatus::Pending);
        assert_eq!(loan.overdue_installments(), 1);
    }

    #[test]
    fn stats_from_loans() {
        let loans = vec![
            loan(1, LoanStatus::Active, dec!(400)),
            loan(2, LoanStatus::Approved, dec!(100)),
            loan(3, LoanStatus::Pending, dec!(999)),
            loan(4, LoanStatus::Paid, Decimal::ZERO),
        ];
        let stats = LoanStats::from_loans(&loans);
        assert_eq!(stats.total_loans, 4);
        assert_eq!(stats.active_loans, 2);
        assert_eq!(stats.pending_loans, 1);
        assert_eq!(stats.outstanding_balance, dec!(500));
        assert!(LoanStats::from_loans(&[]).is_zero());
    }

    #[test]
    fn eligibility_bounds_default() {
        let eligibility: LoanEligibility =
            serde_json::from_str(r#"{"eligible_amount": 3000}"#).unwrap();
        assert_eq!(eligibility.repayment_bounds(), (4, 12));
        assert_eq!(LoanSettings::default().max_repayment_period, 12);
    }
}
