use chrono::{Days, NaiveDate};
use log::{debug, trace, warn};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fmt;

use crate::config::ShortfallPolicy;
use crate::error::{LoanError, LoanResult};
use crate::member::MemberId;

/// Monetary amounts, always settled to the cent.
pub type Money = Decimal;

pub type LoanId = u64;

/// Installments fall due every 30 calendar days, regardless of month length.
pub const INSTALLMENT_INTERVAL_DAYS: u64 = 30;

const CENTS: u32 = 2;

// 100 (percent) * 12 (months)
const MONTHLY_PERCENT_DIVISOR: Decimal = dec!(1200);

/// Largest principal a loan can carry: ten digits, two of them cents.
pub const MAX_LOAN_AMOUNT: Money = dec!(99999999.99);
/// Largest annual rate in percent: five digits, two of them decimals.
pub const MAX_INTEREST: Decimal = dec!(999.99);
/// Longest schedule, in monthly periods (fifty years).
pub const MAX_TERM: u32 = 600;
/// Largest installment payment: twelve digits, two of them cents.
pub const MAX_PAYMENT: Money = dec!(9999999999.99);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum LoanStatus {
    #[default]
    Pending,
    Released,
    Reject,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Released => "released",
            LoanStatus::Reject => "reject",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum LoanType {
    Quick,
    Salary,
    Emergency,
    Multipurpose,
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoanType::Quick => "quick",
            LoanType::Salary => "salary",
            LoanType::Emergency => "emergency",
            LoanType::Multipurpose => "multipurpose",
        };
        write!(f, "{name}")
    }
}

/// One row of an amortization schedule.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Installment {
    pub seq: u32,
    pub due_date: NaiveDate,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, date {}, payment ${:.2}, principal ${:.2}, interest ${:.2}, ending balance ${:.2}",
            self.seq,
            self.due_date,
            self.payment_amount,
            self.principal_portion,
            self.interest_portion,
            self.remaining_balance
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loan {
    pub id: LoanId,
    pub member_id: MemberId,
    pub loan_type: LoanType,
    pub loan_amount: Money,
    /// Annual rate in percent, so 12.00 means 12%.
    pub interest: Decimal,
    pub term: u32,
    pub payment_start_date: NaiveDate,
    /// Grace period in months before collection starts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grace: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub maturity_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl Loan {
    pub fn new(
        id: LoanId,
        member_id: MemberId,
        loan_type: LoanType,
        loan_amount: Money,
        interest: Decimal,
        term: u32,
        payment_start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            member_id,
            loan_type,
            loan_amount,
            interest,
            term,
            payment_start_date,
            grace: 0,
            maturity_date: None,
            status: LoanStatus::Pending,
        }
    }

    pub fn with_grace(mut self, months: u32) -> Self {
        self.grace = months;
        self
    }

    pub fn with_maturity_date(mut self, maturity_date: NaiveDate) -> Self {
        self.maturity_date = Some(maturity_date);
        self
    }

    pub fn monthly_rate(&self) -> Decimal {
        self.interest / Decimal::ONE_HUNDRED / Decimal::from(12)
    }

    /// One month of interest on `balance`, rounded to the cent. Divides last,
    /// so an exact half cent stays exact.
    pub fn monthly_interest(&self, balance: Money) -> Money {
        round_half_up(balance * self.interest / MONTHLY_PERCENT_DIVISOR)
    }

    /// Checks every field against its column bounds. Within these bounds no
    /// schedule arithmetic can overflow.
    pub fn validate(&self) -> LoanResult<()> {
        let amount = round_half_up(self.loan_amount);
        if amount <= Decimal::ZERO {
            return Err(LoanError::invalid("loan_amount", "must be at least 0.01"));
        }
        if amount > MAX_LOAN_AMOUNT {
            return Err(LoanError::invalid(
                "loan_amount",
                format!("cannot exceed {MAX_LOAN_AMOUNT}"),
            ));
        }
        if self.interest < Decimal::ZERO {
            return Err(LoanError::invalid("interest", "annual rate cannot be negative"));
        }
        if self.interest > MAX_INTEREST {
            return Err(LoanError::invalid(
                "interest",
                format!("annual rate cannot exceed {MAX_INTEREST}"),
            ));
        }
        if self.term == 0 {
            return Err(LoanError::invalid("term", "must be at least one period"));
        }
        if self.term > MAX_TERM {
            return Err(LoanError::invalid(
                "term",
                format!("cannot exceed {MAX_TERM} periods"),
            ));
        }
        if self.grace > MAX_TERM {
            return Err(LoanError::invalid(
                "grace",
                format!("cannot exceed {MAX_TERM} months"),
            ));
        }
        if let Some(maturity_date) = self.maturity_date {
            if maturity_date < self.payment_start_date {
                return Err(LoanError::invalid(
                    "maturity_date",
                    format!("{maturity_date} is before the first due date {}", self.payment_start_date),
                ));
            }
        }
        Ok(())
    }
}

/// Totals over a generated schedule.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleSummary {
    pub installments: usize,
    pub total_payments: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub maturity_date: Option<NaiveDate>,
    pub remaining_balance: Money,
    pub fully_amortized: bool,
}

impl ScheduleSummary {
    pub fn from_installments(installments: &[Installment]) -> Self {
        let last = installments.iter().max_by_key(|i| i.seq);
        let remaining_balance = last.map_or(Decimal::ZERO, |i| i.remaining_balance);
        Self {
            installments: installments.len(),
            total_payments: installments.iter().map(|i| i.payment_amount).sum(),
            total_principal: installments.iter().map(|i| i.principal_portion).sum(),
            total_interest: installments.iter().map(|i| i.interest_portion).sum(),
            maturity_date: last.map(|i| i.due_date),
            remaining_balance,
            fully_amortized: last.is_some() && remaining_balance.is_zero(),
        }
    }
}

/// Round to the cent, with exact halves going away from zero.
pub fn round_half_up(amt: Decimal) -> Money {
    amt.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

/// Level payment that retires the loan in `term` monthly periods, rounded up
/// to the next cent.
pub fn level_payment(loan: &Loan) -> LoanResult<Money> {
    loan.validate()?;

    let principal = round_half_up(loan.loan_amount);
    let term = Decimal::from(loan.term);
    let rate = loan.monthly_rate();

    if rate.is_zero() {
        return Ok((principal / term).round_dp_with_strategy(CENTS, RoundingStrategy::AwayFromZero));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(loan.term))
        .ok_or_else(|| LoanError::invalid("term", "too many periods to quote a level payment"))?;

    principal
        .checked_mul(rate)
        .and_then(|pmt| pmt.checked_mul(factor))
        .and_then(|pmt| pmt.checked_div(factor - Decimal::ONE))
        .map(|pmt| pmt.round_dp_with_strategy(CENTS, RoundingStrategy::AwayFromZero))
        .ok_or_else(|| LoanError::invalid("interest", "no level payment can be quoted at this rate"))
}

/// Build the schedule for `loan` under the default shortfall policy.
pub fn generate_schedule(loan: &Loan, payment_amount: Money) -> LoanResult<Vec<Installment>> {
    generate_schedule_with(loan, payment_amount, ShortfallPolicy::default())
}

/// Fixed-payment amortization with per-step rounding to the cent.
///
/// Each row charges a month of interest on the open balance and applies the
/// rest of the payment to principal. The row that would overpay the balance is
/// shrunk to exactly retire it, and generation stops there even if periods
/// remain. `policy` decides what happens if `term` runs out first.
///
/// Pure: nothing is stored, so a failure leaves no trace.
pub fn generate_schedule_with(
    loan: &Loan,
    payment_amount: Money,
    policy: ShortfallPolicy,
) -> LoanResult<Vec<Installment>> {
    loan.validate()?;

    let payment_amount = round_half_up(payment_amount);
    if payment_amount <= Decimal::ZERO {
        return Err(LoanError::invalid("payment_amount", "must be greater than zero"));
    }
    if payment_amount > MAX_PAYMENT {
        return Err(LoanError::invalid(
            "payment_amount",
            format!("cannot exceed {MAX_PAYMENT}"),
        ));
    }

    let mut balance = round_half_up(loan.loan_amount);

    // the first period carries the most interest, so covering it covers all of them
    let first_interest = loan.monthly_interest(balance);
    if payment_amount < first_interest {
        return Err(LoanError::invalid(
            "payment_amount",
            format!("{payment_amount} does not cover the first period's interest of {first_interest}"),
        ));
    }

    let mut schedule: Vec<Installment> = Vec::new();
    let mut due_date = loan.payment_start_date;

    for seq in 1..=loan.term {
        if seq > 1 {
            due_date = get_next_due_date(&due_date)?;
        }

        let interest_portion = loan.monthly_interest(balance);
        let mut principal_portion = round_half_up(payment_amount - interest_portion);
        let mut row_payment = payment_amount;

        let balloon = policy == ShortfallPolicy::Balloon && seq == loan.term;
        if principal_portion > balance || balloon {
            principal_portion = balance;
            row_payment = round_half_up(principal_portion + interest_portion);
        }

        balance = round_half_up(balance - principal_portion).max(Decimal::ZERO);
        trace!(
            "loan {}, pmt # {}, due {}, payment {}, principal {}, interest {}, end bal {}",
            loan.id,
            seq,
            due_date,
            row_payment,
            principal_portion,
            interest_portion,
            balance
        );

        schedule.push(Installment {
            seq,
            due_date,
            payment_amount: row_payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    if balance > Decimal::ZERO {
        match policy {
            ShortfallPolicy::Reject => {
                return Err(LoanError::DoesNotAmortize {
                    loan_id: loan.id,
                    term: loan.term,
                    remaining_balance: balance,
                });
            }
            ShortfallPolicy::Warn => warn!(
                "loan {}: payment {} leaves {} outstanding after {} periods",
                loan.id, payment_amount, balance, loan.term
            ),
            ShortfallPolicy::Accept | ShortfallPolicy::Balloon => debug!(
                "loan {}: schedule ends with {} outstanding",
                loan.id, balance
            ),
        }
    }

    Ok(schedule)
}

fn get_next_due_date(&due_date: &NaiveDate) -> LoanResult<NaiveDate> {
    due_date
        .checked_add_days(Days::new(INSTALLMENT_INTERVAL_DAYS))
        .ok_or_else(|| {
            LoanError::invalid(
                "payment_start_date",
                format!("{due_date} does not return a next due date"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::{
        generate_schedule, generate_schedule_with, get_next_due_date, level_payment,
        round_half_up, Installment, Loan, LoanStatus, LoanType, ScheduleSummary,
        MAX_INTEREST, MAX_LOAN_AMOUNT, MAX_PAYMENT, MAX_TERM,
    };
    use crate::config::ShortfallPolicy;
    use crate::error::LoanError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn sample_loan(amount: Decimal, interest: Decimal, term: u32) -> Loan {
        Loan::new(
            1,
            7,
            LoanType::Salary,
            amount,
            interest,
            term,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
        assert_eq!(round_half_up(dec!(2.675)), dec!(2.68));
        assert_eq!(round_half_up(dec!(1.004)), dec!(1.00));
        assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_half_up(dec!(83.9200)), dec!(83.92));
    }

    #[test]
    fn test_new_loan_is_pending() {
        let loan = sample_loan(dec!(1000), dec!(12), 3);
        assert_eq!(loan.status, LoanStatus::Pending);
        assert_eq!(loan.monthly_rate(), dec!(0.01));
        assert_eq!(loan.monthly_interest(dec!(9200.00)), dec!(92.00));
        // 1.50 at 4% is exactly half a cent
        let loan = sample_loan(dec!(1000), dec!(4), 3);
        assert_eq!(loan.monthly_interest(dec!(1.50)), dec!(0.01));
    }

    #[test]
    fn test_get_next_due_date() {
        assert_eq!(get_next_due_date(&date(2024, 1, 1)).unwrap(), date(2024, 1, 31));
        // leap february is not month-aware
        assert_eq!(get_next_due_date(&date(2024, 1, 31)).unwrap(), date(2024, 3, 1));
        assert_eq!(get_next_due_date(&date(2023, 12, 15)).unwrap(), date(2024, 1, 14));
        assert!(get_next_due_date(&NaiveDate::MAX).is_err());
    }

    #[test]
    fn test_twelve_month_schedule() {
        let loan = sample_loan(dec!(10000.00), dec!(12.00), 12);
        let schedule = generate_schedule(&loan, dec!(900.00)).unwrap();

        assert_eq!(schedule.len(), 12);
        assert_eq!(
            schedule[0],
            Installment {
                seq: 1,
                due_date: date(2024, 1, 1),
                payment_amount: dec!(900.00),
                principal_portion: dec!(800.00),
                interest_portion: dec!(100.00),
                remaining_balance: dec!(9200.00),
            }
        );
        assert_eq!(schedule[2].interest_portion, dec!(83.92));
        assert_eq!(schedule[2].remaining_balance, dec!(7575.92));
        assert_eq!(schedule[10].remaining_balance, dec!(746.52));
        assert_eq!(
            schedule[11],
            Installment {
                seq: 12,
                due_date: date(2024, 11, 26),
                payment_amount: dec!(753.99),
                principal_portion: dec!(746.52),
                interest_portion: dec!(7.47),
                remaining_balance: dec!(0.00),
            }
        );
        assert_eq!(
            schedule[11].to_string(),
            "pmt number 12, date 2024-11-26, payment $753.99, principal $746.52, interest $7.47, ending balance $0.00"
        );

        for row in &schedule {
            assert_eq!(row.principal_portion + row.interest_portion, row.payment_amount);
        }
    }

    #[test]
    fn test_single_period_balloon() {
        let loan = sample_loan(dec!(500.00), dec!(0), 1);
        let schedule = generate_schedule(&loan, dec!(100.00)).unwrap();

        assert_eq!(
            schedule,
            vec![Installment {
                seq: 1,
                due_date: date(2024, 1, 1),
                payment_amount: dec!(500.00),
                principal_portion: dec!(500.00),
                interest_portion: dec!(0.00),
                remaining_balance: dec!(0.00),
            }]
        );
    }

    #[test]
    fn test_single_period_accept_leaves_balance() {
        let loan = sample_loan(dec!(500.00), dec!(0), 1);
        let schedule = generate_schedule_with(&loan, dec!(100.00), ShortfallPolicy::Accept).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].payment_amount, dec!(100.00));
        assert_eq!(schedule[0].principal_portion, dec!(100.00));
        assert_eq!(schedule[0].remaining_balance, dec!(400.00));
    }

    #[test]
    fn test_shortfall_policies() {
        let loan = sample_loan(dec!(1000.00), dec!(12.00), 3);

        let warned = generate_schedule_with(&loan, dec!(100.00), ShortfallPolicy::Warn).unwrap();
        assert_eq!(warned.len(), 3);
        assert_eq!(warned[1].principal_portion, dec!(90.90));
        assert_eq!(warned[2].payment_amount, dec!(100.00));
        assert_eq!(warned[2].remaining_balance, dec!(727.29));
        assert!(!ScheduleSummary::from_installments(&warned).fully_amortized);

        let balloon = generate_schedule_with(&loan, dec!(100.00), ShortfallPolicy::Balloon).unwrap();
        assert_eq!(balloon.len(), 3);
        assert_eq!(balloon[2].interest_portion, dec!(8.19));
        assert_eq!(balloon[2].principal_portion, dec!(819.10));
        assert_eq!(balloon[2].payment_amount, dec!(827.29));
        assert_eq!(balloon[2].remaining_balance, dec!(0.00));

        match generate_schedule_with(&loan, dec!(100.00), ShortfallPolicy::Reject) {
            Err(LoanError::DoesNotAmortize {
                loan_id,
                term,
                remaining_balance,
            }) => {
                assert_eq!(loan_id, 1);
                assert_eq!(term, 3);
                assert_eq!(remaining_balance, dec!(727.29));
            }
            other => panic!("expected DoesNotAmortize, got {other:?}"),
        }
    }

    #[test]
    fn test_early_payoff_stops_before_term() {
        let loan = sample_loan(dec!(1200.00), dec!(10.00), 12);
        let schedule = generate_schedule_with(&loan, dec!(210.00), ShortfallPolicy::Reject).unwrap();

        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule[1].interest_portion, dec!(8.33));
        assert_eq!(schedule[4].remaining_balance, dec!(183.19));
        assert_eq!(schedule[5].payment_amount, dec!(184.72));
        assert_eq!(schedule[5].principal_portion, dec!(183.19));
        assert_eq!(schedule[5].interest_portion, dec!(1.53));
        assert_eq!(schedule[5].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_payment_is_settled_to_the_cent() {
        let loan = sample_loan(dec!(1000.00), dec!(0), 2);
        let schedule = generate_schedule(&loan, dec!(600.005)).unwrap();

        assert_eq!(schedule[0].payment_amount, dec!(600.01));
        assert_eq!(schedule[1].payment_amount, dec!(399.99));
    }

    #[test]
    fn test_invalid_payment_amount() {
        let loan = sample_loan(dec!(1000.00), dec!(12.00), 12);

        for payment in [dec!(0), dec!(-50), dec!(0.004)] {
            let err = generate_schedule(&loan, payment).unwrap_err();
            assert!(
                matches!(err, LoanError::InvalidInput { ref field, .. } if field == "payment_amount"),
                "payment {payment} gave {err:?}"
            );
        }

        // 10.00 of interest is due in the first month
        let err = generate_schedule(&loan, dec!(9.99)).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "payment_amount"));
        assert!(generate_schedule_with(&loan, dec!(10.00), ShortfallPolicy::Accept).is_ok());
    }

    #[test]
    fn test_invalid_loan() {
        let err = generate_schedule(&sample_loan(dec!(1000), dec!(12), 0), dec!(100)).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "term"));

        let err = generate_schedule(&sample_loan(dec!(0), dec!(12), 12), dec!(100)).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "loan_amount"));

        let err = generate_schedule(&sample_loan(dec!(1000), dec!(-1), 12), dec!(100)).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "interest"));
    }

    fn invalid_field(err: LoanError) -> String {
        match err {
            LoanError::InvalidInput { field, .. } => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_at_column_limits() {
        let loan = sample_loan(MAX_LOAN_AMOUNT, MAX_INTEREST, MAX_TERM);
        assert!(loan.validate().is_ok());

        // interest only: the balance never moves
        let first_interest = loan.monthly_interest(MAX_LOAN_AMOUNT);
        assert_eq!(first_interest, dec!(83332499.99));
        let schedule = generate_schedule_with(&loan, first_interest, ShortfallPolicy::Accept).unwrap();
        assert_eq!(schedule.len(), MAX_TERM as usize);
        assert_eq!(schedule[599].principal_portion, Decimal::ZERO);
        assert_eq!(schedule[599].remaining_balance, MAX_LOAN_AMOUNT);

        let schedule = generate_schedule(&loan, first_interest).unwrap();
        let last = schedule.last().unwrap();
        assert_eq!(last.payment_amount, dec!(183332499.98));
        assert_eq!(last.remaining_balance, Decimal::ZERO);

        let schedule = generate_schedule(&loan, MAX_PAYMENT).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].payment_amount, dec!(183332499.98));

        // too large to quote, but refused rather than overflowing
        assert!(level_payment(&loan).is_err());
        assert!(level_payment(&sample_loan(MAX_LOAN_AMOUNT, MAX_INTEREST, 100)).is_err());
    }

    #[test]
    fn test_values_past_column_limits() {
        let cases = [
            (sample_loan(dec!(100000000.00), dec!(12), 12), "loan_amount"),
            (sample_loan(dec!(10000000000000000000000000000), dec!(12), 12), "loan_amount"),
            (sample_loan(dec!(1000), dec!(1000.00), 12), "interest"),
            (sample_loan(dec!(1000), dec!(999.991), 12), "interest"),
            (sample_loan(dec!(1000), dec!(12), MAX_TERM + 1), "term"),
            (sample_loan(dec!(1000), dec!(12), 12).with_grace(MAX_TERM + 1), "grace"),
        ];
        for (loan, field) in cases {
            assert_eq!(invalid_field(generate_schedule(&loan, dec!(100)).unwrap_err()), field);
            assert_eq!(invalid_field(level_payment(&loan).unwrap_err()), field);
        }

        let loan = sample_loan(dec!(1000), dec!(12), 12);
        let err = generate_schedule(&loan, dec!(10000000000.00)).unwrap_err();
        assert_eq!(invalid_field(err), "payment_amount");
    }

    #[test]
    fn test_grace_and_maturity_date() {
        let loan = sample_loan(dec!(1000), dec!(12), 12)
            .with_grace(2)
            .with_maturity_date(date(2024, 12, 31));
        assert_eq!(loan.grace, 2);
        assert_eq!(loan.maturity_date, Some(date(2024, 12, 31)));
        assert!(loan.validate().is_ok());

        let loan = sample_loan(dec!(1000), dec!(12), 12).with_maturity_date(date(2023, 12, 31));
        assert_eq!(invalid_field(loan.validate().unwrap_err()), "maturity_date");
    }

    #[test]
    fn test_level_payment() {
        assert_eq!(level_payment(&sample_loan(dec!(10000), dec!(12), 12)).unwrap(), dec!(888.49));
        assert_eq!(level_payment(&sample_loan(dec!(200000), dec!(7), 180)).unwrap(), dec!(1797.66));
        assert_eq!(level_payment(&sample_loan(dec!(1000), dec!(0), 3)).unwrap(), dec!(333.34));
    }

    #[test]
    fn test_level_payment_retires_loan() {
        let loan = sample_loan(dec!(200000), dec!(7), 180);
        let pmt = level_payment(&loan).unwrap();
        let schedule = generate_schedule_with(&loan, pmt, ShortfallPolicy::Reject).unwrap();

        assert_eq!(schedule.len(), 180);
        let last = schedule.last().unwrap();
        assert_eq!(last.payment_amount, dec!(1796.70));
        assert_eq!(last.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_summary() {
        let loan = sample_loan(dec!(10000.00), dec!(12.00), 12);
        let schedule = generate_schedule(&loan, dec!(900.00)).unwrap();
        let summary = ScheduleSummary::from_installments(&schedule);

        assert_eq!(
            summary,
            ScheduleSummary {
                installments: 12,
                total_payments: dec!(10653.99),
                total_principal: dec!(10000.00),
                total_interest: dec!(653.99),
                maturity_date: Some(date(2024, 11, 26)),
                remaining_balance: dec!(0.00),
                fully_amortized: true,
            }
        );

        let empty = ScheduleSummary::from_installments(&[]);
        assert_eq!(empty.installments, 0);
        assert_eq!(empty.maturity_date, None);
        assert!(!empty.fully_amortized);
    }
}
