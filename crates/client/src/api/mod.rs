//! Service trait implementations, one file per resource.

mod auth;
mod groups;
mod loans;
mod notifications;
mod transactions;
mod withdrawals;
