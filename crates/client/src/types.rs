//! Wire shapes that exist only on the HTTP boundary: response envelopes,
//! request bodies and the error body.

use chama_core::auth::User;
use chama_core::groups::{Group, GroupMember};
use chama_core::loans::{Loan, LoanSettings};
use chama_core::withdrawals::{Withdrawal, WithdrawalDecision};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Response envelopes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsEnvelope {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Group writes answer with `{ "group": ... }`, reads with the bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GroupEnvelope {
    Wrapped { group: Group },
    Bare(Group),
}

impl GroupEnvelope {
    pub fn into_inner(self) -> Group {
        match self {
            GroupEnvelope::Wrapped { group } => group,
            GroupEnvelope::Bare(group) => group,
        }
    }
}

/// Profile endpoints answer with either `{ "user": ... }` or the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    pub fn into_inner(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

/// The roster endpoint may contain `null` entries; they are dropped.
#[derive(Debug, Deserialize)]
pub(crate) struct MembersEnvelope {
    #[serde(default)]
    pub members: Vec<Option<GroupMember>>,
}

impl MembersEnvelope {
    pub fn into_members(self) -> Vec<GroupMember> {
        self.members.into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingWithdrawalsEnvelope {
    #[serde(default)]
    pub pending_withdrawals: Vec<Withdrawal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalRequestsEnvelope {
    #[serde(default)]
    pub withdrawal_requests: Vec<Withdrawal>,
}

/// The status endpoint answers with either the bare record or
/// `{ "withdrawal": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WithdrawalEnvelope {
    Wrapped { withdrawal: Withdrawal },
    Bare(Withdrawal),
}

impl WithdrawalEnvelope {
    pub fn into_inner(self) -> Withdrawal {
        match self {
            WithdrawalEnvelope::Wrapped { withdrawal } => withdrawal,
            WithdrawalEnvelope::Bare(withdrawal) => withdrawal,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoansEnvelope {
    #[serde(default)]
    pub loans: Vec<Loan>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoanEnvelope {
    pub loan: Loan,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountEnvelope {
    #[serde(default)]
    pub count: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct JoinGroupRequest {
    pub group_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddMemberRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessWithdrawalRequest<'a> {
    pub status: WithdrawalDecision,
    pub admin_comment: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoanSettingsUpdate<'a> {
    pub group_id: i64,
    #[serde(flatten)]
    pub settings: &'a LoanSettings,
}

#[derive(Debug, Serialize)]
pub(crate) struct RejectLoanRequest<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RepayLoanRequest {
    pub amount: Decimal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Error body
// ─────────────────────────────────────────────────────────────────────────────

/// Keys the server may put its message under, in order of preference.
const MESSAGE_KEYS: [&str; 5] = ["error", "errors", "detail", "details", "message"];

/// Pulls a human-readable message out of an error body.
///
/// Field-error maps (`{"errors": {"amount": ["too small"]}}`) are flattened
/// and their values joined with a space.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    MESSAGE_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(flatten_message)
}

fn flatten_message(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => join(items.iter()),
        Value::Object(map) => join(map.values()),
        Value::Number(n) => n.to_string(),
        Value::Bool(_) | Value::Null => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn join<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values
        .filter_map(flatten_message)
        .collect::<Vec<_>>()
        .join(" ")
}
