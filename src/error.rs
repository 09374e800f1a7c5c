use rust_decimal::Decimal;
use thiserror::Error;

use crate::loan::{LoanId, LoanStatus};
use crate::member::MemberId;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Amortization schedule already exists for loan {loan_id}")]
    DuplicateSchedule { loan_id: LoanId },

    #[error("Loan {loan_id} is {status}, not released")]
    LoanNotReleased { loan_id: LoanId, status: LoanStatus },

    #[error("Loan {loan_id} not found")]
    LoanNotFound { loan_id: LoanId },

    #[error("Loan {loan_id} is already registered")]
    DuplicateLoan { loan_id: LoanId },

    #[error("Member {member_id} not found")]
    MemberNotFound { member_id: MemberId },

    #[error("Member {member_id} is already registered")]
    DuplicateMember { member_id: MemberId },

    #[error("Service number {service_no} belongs to another member")]
    DuplicateServiceNo { service_no: String },

    #[error("Loan {loan_id} does not amortize within {term} periods (remaining balance {remaining_balance})")]
    DoesNotAmortize {
        loan_id: LoanId,
        term: u32,
        remaining_balance: Decimal,
    },

    #[error("Report error: {0}")]
    Report(String),
}

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for LoanError {
    fn from(e: csv::Error) -> Self {
        LoanError::Report(e.to_string())
    }
}

impl From<std::io::Error> for LoanError {
    fn from(e: std::io::Error) -> Self {
        LoanError::Report(e.to_string())
    }
}

pub type LoanResult<T> = Result<T, LoanError>;
