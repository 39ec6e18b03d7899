//! Withdrawal domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::errors::ValidationError;

/// Lifecycle of a withdrawal request.
///
/// Different endpoints emit the status in different casings; parsing is
/// case-insensitive so the rest of the client only sees this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalStatus::Pending => f.write_str("PENDING"),
            WithdrawalStatus::Approved => f.write_str("APPROVED"),
            WithdrawalStatus::Rejected => f.write_str("REJECTED"),
        }
    }
}

impl FromStr for WithdrawalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(WithdrawalStatus::Pending),
            "APPROVED" => Ok(WithdrawalStatus::Approved),
            "REJECTED" => Ok(WithdrawalStatus::Rejected),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown withdrawal status '{}'",
                other
            ))),
        }
    }
}

/// A withdrawal request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Withdrawal {
    pub id: i64,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub admin_comment: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_username: Option<String>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub group_name: Option<String>,
}

impl Withdrawal {
    pub fn is_pending(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }
}

/// Payload of the withdrawal request form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWithdrawal {
    pub group_id: i64,
    pub amount: Decimal,
    pub description: String,
}

/// Admin verdict on a pending request. Sent lower-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalDecision {
    Approved,
    Rejected,
}

impl WithdrawalDecision {
    /// Status the request ends up in once the decision is applied.
    pub fn resulting_status(self) -> WithdrawalStatus {
        match self {
            WithdrawalDecision::Approved => WithdrawalStatus::Approved,
            WithdrawalDecision::Rejected => WithdrawalStatus::Rejected,
        }
    }
}

impl fmt::Display for WithdrawalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalDecision::Approved => f.write_str("approved"),
            WithdrawalDecision::Rejected => f.write_str("rejected"),
        }
    }
}

/// What the caller may still withdraw from one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AvailableBalance {
    #[serde(default)]
    pub available_balance: Decimal,
}
