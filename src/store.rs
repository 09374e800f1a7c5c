use log::{info, warn};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::config::ShortfallPolicy;
use crate::error::{LoanError, LoanResult};
use crate::loan::{generate_schedule_with, Installment, Loan, LoanId, Money};

/// Amortization schedules keyed by loan, at most one per loan.
///
/// Generation runs while the map is locked, so the existence check and the
/// insert are one step. Of two callers racing on the same loan exactly one
/// commits; the other gets [`LoanError::DuplicateSchedule`]. A schedule is
/// inserted whole, so readers never see part of one.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    schedules: Mutex<HashMap<LoanId, Vec<Installment>>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<LoanId, Vec<Installment>>> {
        // rows are only ever inserted whole, so a poisoned map is still consistent
        self.schedules.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn generate(
        &self,
        loan: &Loan,
        payment_amount: Money,
        policy: ShortfallPolicy,
    ) -> LoanResult<Vec<Installment>> {
        let mut schedules = self.lock();
        match schedules.entry(loan.id) {
            Entry::Occupied(_) => {
                warn!("loan {}: amortization schedule already exists", loan.id);
                Err(LoanError::DuplicateSchedule { loan_id: loan.id })
            }
            Entry::Vacant(slot) => {
                let installments = generate_schedule_with(loan, payment_amount, policy)?;
                info!(
                    "loan {}: created {} installments at {} per period",
                    loan.id,
                    installments.len(),
                    payment_amount
                );
                Ok(slot.insert(installments).clone())
            }
        }
    }

    pub fn contains(&self, loan_id: LoanId) -> bool {
        self.lock().contains_key(&loan_id)
    }

    /// Installments for `loan_id` in `seq` order; empty if none were generated.
    pub fn installments(&self, loan_id: LoanId) -> Vec<Installment> {
        self.lock().get(&loan_id).cloned().unwrap_or_default()
    }

    pub fn remove(&self, loan_id: LoanId) -> Option<Vec<Installment>> {
        self.lock().remove(&loan_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
