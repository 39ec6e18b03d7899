//! Transactions module - contribution history, group statistics and the
//! transaction service trait.

mod transactions_model;
mod transactions_traits;

pub use transactions_model::{
    normalize_mpesa_phone, ContributionReceipt, GroupStats, MpesaContribution, MpesaReceipt,
    NewContribution, TopContributor, Transaction, TransactionPage, TransactionType,
};
pub use transactions_traits::TransactionServiceTrait;
