//! Member and loan registry, and the schedule request boundary.
//!
//! [`LoanOffice`] plays the part of the request handler: it resolves a loan id,
//! refuses loans that have not been released, parses the submitted payment and
//! hands the loan to the [`ScheduleStore`].
//!
//! Locks are always taken in the order members, loans, schedules.

use log::{info, warn};
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    str::FromStr,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::config::Config;
use crate::error::{LoanError, LoanResult};
use crate::loan::{Installment, Loan, LoanId, LoanStatus, Money, ScheduleSummary};
use crate::member::{Member, MemberId};
use crate::store::ScheduleStore;

#[derive(Debug, Default)]
pub struct LoanOffice {
    config: Config,
    members: RwLock<HashMap<MemberId, Member>>,
    loans: RwLock<HashMap<LoanId, Loan>>,
    schedules: ScheduleStore,
}

impl LoanOffice {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            members: RwLock::default(),
            loans: RwLock::default(),
            schedules: ScheduleStore::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn read_members(&self) -> RwLockReadGuard<'_, HashMap<MemberId, Member>> {
        self.members.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_members(&self) -> RwLockWriteGuard<'_, HashMap<MemberId, Member>> {
        self.members.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_loans(&self) -> RwLockReadGuard<'_, HashMap<LoanId, Loan>> {
        self.loans.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_loans(&self) -> RwLockWriteGuard<'_, HashMap<LoanId, Loan>> {
        self.loans.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_member(&self, member: Member) -> LoanResult<()> {
        member.validate()?;
        let mut members = self.write_members();
        if members.contains_key(&member.id) {
            return Err(LoanError::DuplicateMember {
                member_id: member.id,
            });
        }
        check_service_no(&members, &member)?;
        info!("registered member {} ({member})", member.id);
        members.insert(member.id, member);
        Ok(())
    }

    /// Replace the details of an existing member. Its loans are untouched.
    pub fn update_member(&self, member: Member) -> LoanResult<()> {
        member.validate()?;
        let mut members = self.write_members();
        if !members.contains_key(&member.id) {
            return Err(LoanError::MemberNotFound {
                member_id: member.id,
            });
        }
        check_service_no(&members, &member)?;
        info!("updated member {} ({member})", member.id);
        members.insert(member.id, member);
        Ok(())
    }

    pub fn member(&self, member_id: MemberId) -> LoanResult<Member> {
        self.read_members()
            .get(&member_id)
            .cloned()
            .ok_or(LoanError::MemberNotFound { member_id })
    }

    /// All members, ordered by id.
    pub fn members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.read_members().values().cloned().collect();
        members.sort_by_key(|m| m.id);
        members
    }

    /// Members whose first or last name contains `query`, or whose id is
    /// `query`, ordered by id.
    pub fn search_members(&self, query: &str) -> Vec<Member> {
        let mut found: Vec<Member> = self
            .read_members()
            .values()
            .filter(|m| m.matches(query))
            .cloned()
            .collect();
        found.sort_by_key(|m| m.id);
        found
    }

    /// Remove the member together with every loan it holds and their
    /// schedules.
    pub fn delete_member(&self, member_id: MemberId) -> LoanResult<Member> {
        let mut members = self.write_members();
        let mut loans = self.write_loans();
        let member = members
            .remove(&member_id)
            .ok_or(LoanError::MemberNotFound { member_id })?;

        let held: Vec<LoanId> = loans
            .values()
            .filter(|loan| loan.member_id == member_id)
            .map(|loan| loan.id)
            .collect();
        let mut installments = 0;
        for loan_id in &held {
            loans.remove(loan_id);
            installments += self.schedules.remove(*loan_id).map_or(0, |rows| rows.len());
        }
        info!(
            "deleted member {member_id} with {} loans and {installments} installments",
            held.len()
        );
        Ok(member)
    }

    /// Register a pending loan for an existing member.
    pub fn register(&self, loan: Loan) -> LoanResult<()> {
        loan.validate()?;
        // held until the insert so the member cannot be deleted in between
        let members = self.read_members();
        if !members.contains_key(&loan.member_id) {
            return Err(LoanError::MemberNotFound {
                member_id: loan.member_id,
            });
        }
        let mut loans = self.write_loans();
        if loans.contains_key(&loan.id) {
            return Err(LoanError::DuplicateLoan { loan_id: loan.id });
        }
        info!(
            "registered {} loan {} for member {}: {} over {} periods at {}%",
            loan.loan_type, loan.id, loan.member_id, loan.loan_amount, loan.term, loan.interest
        );
        loans.insert(loan.id, loan);
        Ok(())
    }

    pub fn loan(&self, loan_id: LoanId) -> LoanResult<Loan> {
        self.read_loans()
            .get(&loan_id)
            .cloned()
            .ok_or(LoanError::LoanNotFound { loan_id })
    }

    /// All loans, ordered by id.
    pub fn loans(&self) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self.read_loans().values().cloned().collect();
        loans.sort_by_key(|loan| loan.id);
        loans
    }

    pub fn loans_for_member(&self, member_id: MemberId) -> LoanResult<Vec<Loan>> {
        let members = self.read_members();
        if !members.contains_key(&member_id) {
            return Err(LoanError::MemberNotFound { member_id });
        }
        let mut held: Vec<Loan> = self
            .read_loans()
            .values()
            .filter(|loan| loan.member_id == member_id)
            .cloned()
            .collect();
        held.sort_by_key(|loan| loan.id);
        Ok(held)
    }

    pub fn release(&self, loan_id: LoanId) -> LoanResult<()> {
        self.decide(loan_id, LoanStatus::Released)
    }

    pub fn reject(&self, loan_id: LoanId) -> LoanResult<()> {
        self.decide(loan_id, LoanStatus::Reject)
    }

    // a loan is decided once, out of pending
    fn decide(&self, loan_id: LoanId, status: LoanStatus) -> LoanResult<()> {
        let mut loans = self.write_loans();
        let loan = loans
            .get_mut(&loan_id)
            .ok_or(LoanError::LoanNotFound { loan_id })?;
        if loan.status != LoanStatus::Pending {
            return Err(LoanError::invalid(
                "status",
                format!("loan {loan_id} is already {}", loan.status),
            ));
        }
        loan.status = status;
        info!("loan {loan_id} marked {status}");
        Ok(())
    }

    /// Generate and store the amortization schedule for a released loan.
    ///
    /// `payment` is the raw payment amount as submitted. The loan's read lock
    /// is held until the schedule is stored so a concurrent delete cannot
    /// leave an orphaned schedule behind.
    pub fn create_schedule(
        &self,
        loan_id: LoanId,
        payment: Option<&str>,
    ) -> LoanResult<Vec<Installment>> {
        let loans = self.read_loans();
        let loan = loans
            .get(&loan_id)
            .ok_or(LoanError::LoanNotFound { loan_id })?;

        if loan.status != LoanStatus::Released {
            warn!("loan {loan_id}: schedule refused, status is {}", loan.status);
            return Err(LoanError::LoanNotReleased {
                loan_id,
                status: loan.status,
            });
        }

        let payment_amount = parse_payment(payment)?;
        self.schedules
            .generate(loan, payment_amount, self.config.shortfall)
    }

    /// Stored installments for the loan, ordered by `seq`.
    pub fn schedule(&self, loan_id: LoanId) -> Vec<Installment> {
        self.schedules.installments(loan_id)
    }

    pub fn summary(&self, loan_id: LoanId) -> LoanResult<ScheduleSummary> {
        let loans = self.read_loans();
        if !loans.contains_key(&loan_id) {
            return Err(LoanError::LoanNotFound { loan_id });
        }
        Ok(ScheduleSummary::from_installments(
            &self.schedules.installments(loan_id),
        ))
    }

    /// Remove the loan together with its schedule.
    pub fn delete_loan(&self, loan_id: LoanId) -> LoanResult<Loan> {
        let mut loans = self.write_loans();
        let loan = loans
            .remove(&loan_id)
            .ok_or(LoanError::LoanNotFound { loan_id })?;
        let removed = self.schedules.remove(loan_id).map_or(0, |rows| rows.len());
        info!("deleted loan {loan_id} and {removed} installments");
        Ok(loan)
    }
}

fn parse_payment(payment: Option<&str>) -> LoanResult<Money> {
    let raw = payment
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| LoanError::invalid("payment_amount", "value required"))?;
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| {
            LoanError::invalid("payment_amount", format!("'{raw}' is not a valid amount"))
        })
}

fn check_service_no(members: &HashMap<MemberId, Member>, member: &Member) -> LoanResult<()> {
    let taken = members
        .values()
        .any(|other| other.id != member.id && other.service_no == member.service_no);
    if taken {
        return Err(LoanError::DuplicateServiceNo {
            service_no: member.service_no.clone(),
        });
    }
    Ok(())
}
