//! Transaction domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::constants::MPESA_COUNTRY_PREFIX;
use crate::errors::{Result, ValidationError};

/// Kind of a history record. Types this client does not know are kept
/// verbatim so the history still renders.
#[derive(Debug, Clone, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum TransactionType {
    Contribution,
    Withdrawal,
    Other(String),
}

impl TransactionType {
    /// Sign shown in front of the amount.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionType::Contribution => "+",
            TransactionType::Withdrawal => "-",
            TransactionType::Other(_) => "",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Contribution => f.write_str("CONTRIBUTION"),
            TransactionType::Withdrawal => f.write_str("WITHDRAWAL"),
            TransactionType::Other(other) => f.write_str(other),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "CONTRIBUTION" => TransactionType::Contribution,
            "WITHDRAWAL" => TransactionType::Withdrawal,
            other => TransactionType::Other(other.to_string()),
        })
    }
}

/// A read-only history record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One page of history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Payload of the manual contribution form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewContribution {
    pub group_id: i64,
    pub amount: Decimal,
    pub description: String,
}

/// Server acknowledgement of a contribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContributionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

/// Payload of the M-Pesa contribution form. `phone_number` is already in
/// international form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MpesaContribution {
    pub amount: Decimal,
    pub phone_number: String,
}

/// Response to an M-Pesa push request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MpesaReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "CheckoutRequestID")]
    pub checkout_request_id: Option<String>,
}

/// Converts a local phone number (`712345678` or `0712345678`) to the
/// `2547...` form the payment gateway expects.
pub fn normalize_mpesa_phone(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(ValidationError::MissingField("Phone number".into()).into());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidInput(format!("invalid phone number '{}'", raw)).into());
    }
    let local = digits
        .strip_prefix(MPESA_COUNTRY_PREFIX)
        .or_else(|| digits.strip_prefix('0'))
        .unwrap_or(&digits);
    if local.len() != 9 {
        return Err(ValidationError::InvalidInput(format!(
            "phone number must have 9 digits after the prefix, got '{}'",
            raw
        ))
        .into());
    }
    Ok(format!("{}{}", MPESA_COUNTRY_PREFIX, local))
}

/// Leaderboard entry of the stats panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopContributor {
    pub username: String,
    #[serde(alias = "total", alias = "total_amount")]
    pub amount: Decimal,
}

/// Aggregates computed by the server for one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupStats {
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default)]
    pub total_contributions: Decimal,
    #[serde(default)]
    pub total_withdrawals: Decimal,
    #[serde(default)]
    pub top_contributors: Vec<TopContributor>,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
}
