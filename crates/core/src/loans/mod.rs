//! Loans module - loans, repayment schedules, group loan settings and the
//! loan service trait.

mod loans_model;
mod loans_traits;

pub use loans_model::{
    Loan, LoanEligibility, LoanRequest, LoanSettings, LoanStats, LoanStatus, Repayment,
    RepaymentStatus,
};
pub use loans_traits::LoanServiceTrait;
