use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rust_decimal::Decimal;
use serde::Serialize;
use std::{io, process::ExitCode};

use loan_ledger::{
    level_payment, report, BranchOfService, Config, Installment, Loan, LoanError, LoanOffice,
    LoanResult, LoanType, Member, ScheduleSummary, Sex, ShortfallPolicy,
};

/// Fixed-payment loan amortization schedules
#[derive(Parser)]
#[command(name = "loan-ledger", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// What to do when the payment leaves a balance after the last period
    #[arg(long, global = true, env = "LOAN_LEDGER_SHORTFALL", default_value = "balloon")]
    shortfall: ShortfallPolicy,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LOAN_LEDGER_LOG", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an amortization schedule
    Schedule(ScheduleArgs),
    /// Quote the level payment that retires a loan within its term
    Quote(TermsArgs),
}

#[derive(Args)]
struct TermsArgs {
    /// Loan principal
    #[arg(long)]
    amount: Decimal,
    /// Annual interest rate in percent (12 means 12%)
    #[arg(long, default_value = "0")]
    interest: Decimal,
    /// Number of monthly periods
    #[arg(long)]
    term: u32,
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    terms: TermsArgs,
    /// Due date of the first installment (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,
    /// Fixed payment per period; defaults to the level payment
    #[arg(long)]
    payment: Option<String>,
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Serialize)]
struct ScheduleOutput<'a> {
    summary: &'a ScheduleSummary,
    installments: &'a [Installment],
}

const CLI_LOAN_ID: u64 = 1;
const CLI_MEMBER_ID: u64 = 1;

fn loan_from_terms(terms: &TermsArgs, start: NaiveDate) -> Loan {
    Loan::new(
        CLI_LOAN_ID,
        CLI_MEMBER_ID,
        LoanType::Multipurpose,
        terms.amount,
        terms.interest,
        terms.term,
        start,
    )
}

fn run_schedule(config: Config, args: ScheduleArgs) -> LoanResult<()> {
    let loan = loan_from_terms(&args.terms, args.start);
    let payment = match args.payment {
        Some(payment) => payment,
        None => level_payment(&loan)?.to_string(),
    };

    let office = LoanOffice::new(config);
    office.register_member(Member::new(
        CLI_MEMBER_ID,
        "Walk-in",
        "Borrower",
        Sex::Male,
        BranchOfService::ArmedForces,
        "CLI",
    ))?;
    office.register(loan)?;
    office.release(CLI_LOAN_ID)?;
    let installments = office.create_schedule(CLI_LOAN_ID, Some(&payment))?;
    let summary = office.summary(CLI_LOAN_ID)?;

    match args.format {
        OutputFormat::Table => print!("{}", report::render_table(&installments, &summary)),
        OutputFormat::Csv => report::write_csv(io::stdout().lock(), &installments)?,
        OutputFormat::Json => {
            let output = ScheduleOutput {
                summary: &summary,
                installments: &installments,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| LoanError::Report(e.to_string()))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_quote(args: TermsArgs) -> LoanResult<()> {
    let loan = loan_from_terms(&args, Local::now().date_naive());
    println!("{}", level_payment(&loan)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::new(cli.shortfall, cli.log_level);
    if let Err(e) = config.init_logging() {
        eprintln!("could not start logging: {e}");
    }

    let result = match cli.command {
        Commands::Schedule(args) => run_schedule(config, args),
        Commands::Quote(args) => run_quote(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
