//! Groups domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::errors::ValidationError;
use crate::utils::money::progress_percent;

/// The caller's role inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub enum MemberStatus {
    Admin,
    Member,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberStatus::Admin => f.write_str("admin"),
            MemberStatus::Member => f.write_str("member"),
        }
    }
}

impl FromStr for MemberStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(MemberStatus::Admin),
            "member" => Ok(MemberStatus::Member),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown member status '{}'",
                other
            ))),
        }
    }
}

/// A savings pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default)]
    pub target_amount: Decimal,
    /// Absent when the caller is not a member (discovery listings).
    #[serde(default)]
    pub member_status: Option<MemberStatus>,
    #[serde(default)]
    pub creator_id: Option<i64>,
}

impl Group {
    pub fn progress_percent(&self) -> u32 {
        progress_percent(self.current_amount, self.target_amount)
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description",
        }
    }
}

/// Input model for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub target_amount: Decimal,
}

/// Partial group change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Decimal>,
}

/// One entry of a group roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupMember {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl GroupMember {
    /// Avatar letter shown next to the member.
    pub fn initial(&self) -> char {
        self.username
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}
