//! Tabular export of an amortization schedule.
//!
//! Rows are always written in `seq` order, whatever order they are passed in.

use std::{fmt::Write as _, io};

use crate::error::LoanResult;
use crate::loan::{Installment, ScheduleSummary};

pub const REPORT_HEADERS: [&str; 6] = [
    "seq",
    "due_date",
    "principal_portion",
    "interest_portion",
    "payment_amount",
    "remaining_balance",
];

fn in_seq_order(installments: &[Installment]) -> Vec<&Installment> {
    let mut rows: Vec<&Installment> = installments.iter().collect();
    rows.sort_by_key(|i| i.seq);
    rows
}

pub fn write_csv<W: io::Write>(writer: W, installments: &[Installment]) -> LoanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADERS)?;
    for row in in_seq_order(installments) {
        wtr.write_record([
            row.seq.to_string(),
            row.due_date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.principal_portion),
            format!("{:.2}", row.interest_portion),
            format!("{:.2}", row.payment_amount),
            format!("{:.2}", row.remaining_balance),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn render_table(installments: &[Installment], summary: &ScheduleSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<10}  {:>14}  {:>14}  {:>14}  {:>14}",
        "seq", "due date", "principal", "interest", "payment", "balance"
    );
    for row in in_seq_order(installments) {
        let _ = writeln!(
            out,
            "{:>4}  {:<10}  {:>14.2}  {:>14.2}  {:>14.2}  {:>14.2}",
            row.seq,
            row.due_date,
            row.principal_portion,
            row.interest_portion,
            row.payment_amount,
            row.remaining_balance
        );
    }
    let _ = writeln!(
        out,
        "{:>4}  {:<10}  {:>14.2}  {:>14.2}  {:>14.2}  {:>14.2}",
        "",
        "total",
        summary.total_principal,
        summary.total_interest,
        summary.total_payments,
        summary.remaining_balance
    );
    if !summary.fully_amortized {
        let _ = writeln!(
            out,
            "balance of {:.2} still outstanding after the last installment",
            summary.remaining_balance
        );
    }
    out
}
