mod commands;
mod input;
mod ledger;
mod output;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::loan::{AddLoanArgs, DeleteLoanArgs, EditLoanArgs};
use commands::payment::{AddPaymentArgs, DeletePaymentArgs, EditPaymentArgs, PaymentsArgs};
use commands::report::{CalculateArgs, MonthlyArgs, SummaryArgs};

/// Track loans you have issued and the payments received against them
#[derive(Parser)]
#[command(
    name = "loans",
    version,
    about = "Track issued loans, record payments and compute repayment progress",
    long_about = "A CLI for recording loans and the payments received against them. \
                  Computes flat monthly-equivalent interest, total payable, remaining \
                  balance, days remaining and repayment progress with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Ledger file holding all loans and payments
    #[arg(long, env = "LOAN_TRACKER_LEDGER", default_value = "loans.json", global = true)]
    ledger: PathBuf,

    /// Account that owns the loans
    #[arg(long, env = "LOAN_TRACKER_USER", default_value = "default", global = true)]
    user: String,

    /// Date to measure days remaining from (defaults to today)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new loan
    AddLoan(AddLoanArgs),
    /// List loans, newest first
    ListLoans,
    /// Edit fields of an existing loan
    EditLoan(EditLoanArgs),
    /// Delete a loan and all of its payments
    DeleteLoan(DeleteLoanArgs),
    /// Record a payment against a loan
    AddPayment(AddPaymentArgs),
    /// Edit an existing payment
    EditPayment(EditPaymentArgs),
    /// Delete a payment
    DeletePayment(DeletePaymentArgs),
    /// Payment history of a loan, newest first
    Payments(PaymentsArgs),
    /// Interest, balance and progress for one loan or the whole portfolio
    Summary(SummaryArgs),
    /// Payment totals per calendar month
    Monthly(MonthlyArgs),
    /// Compute figures for a loan given as JSON, without touching the ledger
    Calculate(CalculateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Settings shared by every command.
pub struct Context {
    pub ledger: PathBuf,
    pub user: String,
    pub today: NaiveDate,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context {
        ledger: cli.ledger,
        user: cli.user,
        today: cli.as_of.unwrap_or_else(|| Local::now().date_naive()),
    };
    tracing::debug!(ledger = %ctx.ledger.display(), user = %ctx.user, today = %ctx.today, "starting");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::AddLoan(args) => commands::loan::run_add_loan(args, &ctx),
        Commands::ListLoans => commands::loan::run_list_loans(&ctx),
        Commands::EditLoan(args) => commands::loan::run_edit_loan(args, &ctx),
        Commands::DeleteLoan(args) => commands::loan::run_delete_loan(args, &ctx),
        Commands::AddPayment(args) => commands::payment::run_add_payment(args, &ctx),
        Commands::EditPayment(args) => commands::payment::run_edit_payment(args, &ctx),
        Commands::DeletePayment(args) => commands::payment::run_delete_payment(args, &ctx),
        Commands::Payments(args) => commands::payment::run_payments(args, &ctx),
        Commands::Summary(args) => commands::report::run_summary(args, &ctx),
        Commands::Monthly(args) => commands::report::run_monthly(args, &ctx),
        Commands::Calculate(args) => commands::report::run_calculate(args, &ctx),
        Commands::Version => {
            println!("loans {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
