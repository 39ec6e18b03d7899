/// Key under which the bearer token is persisted in the secret store.
pub const TOKEN_KEY: &str = "token";

/// Seconds between two notification polls.
pub const NOTIFICATION_POLL_INTERVAL_SECS: u64 = 30;

/// Size of the notification page fetched on every poll.
pub const NOTIFICATION_PAGE_SIZE: u32 = 20;

/// Default page size for transaction history.
pub const TRANSACTIONS_PER_PAGE: u32 = 20;

/// Default loan duration offered by the loan request form.
pub const DEFAULT_LOAN_DURATION_WEEKS: u32 = 8;

/// Repayment period bounds used until the server reports eligibility.
pub const DEFAULT_MIN_REPAYMENT_WEEKS: u32 = 4;
pub const DEFAULT_MAX_REPAYMENT_WEEKS: u32 = 12;

/// Currency label shown next to amounts.
pub const CURRENCY_LABEL: &str = "Ksh.";

/// Country prefix prepended to local M-Pesa phone numbers.
pub const MPESA_COUNTRY_PREFIX: &str = "254";
