//! Loan back office: members, loans, fixed-payment amortization schedules
//! and their export.

pub mod config;
pub mod error;
pub mod loan;
pub mod member;
pub mod office;
pub mod report;
pub mod store;

pub use config::{Config, ShortfallPolicy};
pub use error::{LoanError, LoanResult};
pub use loan::{
    generate_schedule, generate_schedule_with, level_payment, round_half_up, Installment, Loan,
    LoanId, LoanStatus, LoanType, Money, ScheduleSummary, MAX_INTEREST, MAX_LOAN_AMOUNT,
    MAX_PAYMENT, MAX_TERM,
};
pub use member::{BranchOfService, Member, MemberId, Sex};
pub use office::LoanOffice;
pub use store::ScheduleStore;

// verifies that types can be shared across request threads
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<Installment>();
    is_normal::<Member>();
    is_normal::<LoanError>();
    is_normal::<ScheduleStore>();
    is_normal::<LoanOffice>();
}
