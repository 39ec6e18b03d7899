//! Withdrawals module - withdrawal requests, the admin decision and the
//! withdrawal service trait.

mod withdrawals_model;
mod withdrawals_traits;

pub use withdrawals_model::{
    AvailableBalance, NewWithdrawal, Withdrawal, WithdrawalDecision, WithdrawalStatus,
};
pub use withdrawals_traits::WithdrawalServiceTrait;
