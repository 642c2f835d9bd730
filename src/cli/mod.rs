//! Non-interactive command harness over a ledger snapshot file.

pub mod output;
mod reports;

use std::{fs, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{ConfigError, ConfigManager, EngineConfig},
    core::{
        payoff::{PayoffEstimate, Projection, ProjectionOutcome},
        services::{
            NetWorthService, PayoffService, RecurringService, ServiceError, TransactionService,
        },
    },
    currency::{format_currency_value, CurrencyCode, LocaleConfig},
    errors::LedgerError,
    ledger::{Ledger, PayoffStrategy, Transaction},
    utils::persistence::{load_ledger_from_file, save_ledger_to_file},
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Invalid(String),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "finflow", about = "Inspect and update a finflow ledger snapshot")]
pub struct Cli {
    /// Path to the ledger snapshot (JSON)
    #[arg(long, value_name = "PATH", env = "FINFLOW_LEDGER", global = true)]
    pub ledger: Option<PathBuf>,

    /// Base directory holding config/config.json
    #[arg(long, value_name = "DIR", env = "FINFLOW_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project the ledger's debt payoff plan
    Payoff(PayoffArgs),
    /// Show totals and optionally record today's snapshot
    NetWorth(NetWorthArgs),
    /// Record a transaction read from a JSON file
    Apply(ApplyArgs),
    /// Delete a transaction and reverse its effects
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// List accounts with debt, payment and contribution details
    Accounts,
    /// List envelopes with funding and overdraft status
    Envelopes,
    /// Total expenses for one category
    Spending(SpendingArgs),
    /// Record due recurring transactions and show what comes next
    Recurring(RecurringArgs),
    /// Print build information
    Version,
}

#[derive(Args, Debug)]
pub struct PayoffArgs {
    /// Override the plan's strategy (avalanche or snowball)
    #[arg(long)]
    pub strategy: Option<PayoffStrategy>,
    /// Override the plan's extra monthly payment
    #[arg(long)]
    pub extra: Option<f64>,
    /// First month of the projection (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Emit the projection as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct NetWorthArgs {
    /// Append a snapshot to the ledger's history and save it
    #[arg(long)]
    pub record: bool,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON file containing one transaction
    #[arg(long, value_name = "PATH")]
    pub transaction: PathBuf,
}

#[derive(Args, Debug)]
pub struct SpendingArgs {
    #[arg(long)]
    pub category: Uuid,
    /// Any day of the month to report on; defaults to today
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub month: Option<NaiveDate>,
    /// Start of a custom range (inclusive)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    /// End of a custom range (inclusive)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct RecurringArgs {
    /// Record occurrences dated on or before this day; defaults to today
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

pub fn run_cli() -> CliResult<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> CliResult<()> {
    output::set_plain(cli.plain);
    if let Command::Version = cli.command {
        print_version();
        return Ok(());
    }

    let base = cli.home.clone().unwrap_or_else(ConfigManager::default_base_dir);
    let config = ConfigManager::with_base_dir(base)?.load()?;
    let ledger_path = cli
        .ledger
        .clone()
        .ok_or_else(|| CliError::Invalid("No ledger given; pass --ledger or set FINFLOW_LEDGER".into()))?;
    let mut ledger = load_ledger_from_file(&ledger_path)?;
    let money = Money::from_config(&config);

    match cli.command {
        Command::Payoff(args) => payoff(&ledger, &config, &money, args)?,
        Command::NetWorth(args) => {
            net_worth(&mut ledger, &config, &money, &args);
            if args.record {
                save_ledger_to_file(&ledger, &ledger_path)?;
            }
        }
        Command::Apply(args) => {
            let data = fs::read_to_string(&args.transaction).map_err(LedgerError::from)?;
            let transaction: Transaction = serde_json::from_str(&data).map_err(LedgerError::from)?;
            let id = transaction.id;
            let report = TransactionService::record(&mut ledger, transaction)?;
            save_ledger_to_file(&ledger, &ledger_path)?;
            output::success(format!("Recorded transaction {id}"));
            if let Some(overdraft) = report.overdraft {
                output::warning(format!(
                    "Envelope {} is overdrawn by {}",
                    envelope_name(&ledger, overdraft.envelope_id),
                    money.format(overdraft.overdraft)
                ));
            }
            for skipped in report.unresolved {
                output::warning(format!("Skipped {:?} reference {}", skipped.slot, skipped.id));
            }
        }
        Command::Delete { id } => {
            let removed = TransactionService::delete(&mut ledger, id)?;
            save_ledger_to_file(&ledger, &ledger_path)?;
            output::success(format!(
                "Deleted {} of {}",
                removed.transaction_type(),
                money.format(removed.amount)
            ));
        }
        Command::Accounts => reports::accounts(&ledger, Local::now().date_naive(), &money),
        Command::Envelopes => reports::envelopes(&ledger, &money),
        Command::Spending(args) => {
            let range = args.from.zip(args.to);
            if let Some((from, to)) = range {
                if from > to {
                    return Err(CliError::Invalid(format!("--from {from} is after --to {to}")));
                }
            }
            let month = args.month.unwrap_or_else(|| Local::now().date_naive());
            reports::spending(&ledger, args.category, range, month, &money);
        }
        Command::Recurring(args) => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            let runs = RecurringService::process_due(&mut ledger, today)?;
            if !runs.is_empty() {
                save_ledger_to_file(&ledger, &ledger_path)?;
            }
            reports::recurring(&ledger, &runs, &money);
        }
        Command::Version => {}
    }
    Ok(())
}

fn payoff(ledger: &Ledger, config: &EngineConfig, money: &Money, args: PayoffArgs) -> CliResult<()> {
    let mut plan = ledger
        .debt_plan
        .clone()
        .ok_or_else(|| CliError::Invalid("Ledger has no debt payoff plan".into()))?;
    if let Some(strategy) = args.strategy {
        plan.strategy = strategy;
    }
    if let Some(extra) = args.extra {
        plan.extra_payment = extra;
    }
    let projection = PayoffService::project(ledger, &plan, config)?;
    if args.json {
        let json = serde_json::to_string_pretty(&projection).map_err(LedgerError::from)?;
        println!("{json}");
        return Ok(());
    }

    let start = args.start.unwrap_or_else(|| Local::now().date_naive());
    output::section(format!("Payoff plan ({})", plan.strategy));
    print_projection(ledger, &projection, start, money);
    Ok(())
}

fn print_projection(ledger: &Ledger, projection: &Projection, start: NaiveDate, money: &Money) {
    for outcome in &projection.debts {
        let name = account_name(ledger, outcome.id);
        match outcome.paid_off_month {
            Some(month) => output::info(format!(
                "{name}: paid off in month {month}, interest {}",
                money.format(outcome.interest_paid)
            )),
            None => output::warning(format!("{name}: still owed at the horizon")),
        }
    }
    match &projection.outcome {
        ProjectionOutcome::PaidOff => {
            let finish = projection
                .payoff_date(start)
                .map(|date| date.to_string())
                .unwrap_or_default();
            output::success(format!(
                "Debt free in {} months ({finish}); interest {}, paid {}",
                projection.months,
                money.format(projection.total_interest),
                money.format(projection.total_paid)
            ));
        }
        ProjectionOutcome::NotPayableWithinHorizon { remaining } => output::warning(format!(
            "Not payable within {} months; {} remains",
            projection.months,
            money.format(*remaining)
        )),
    }
}

fn net_worth(ledger: &mut Ledger, config: &EngineConfig, money: &Money, args: &NetWorthArgs) {
    output::section(&ledger.name);
    output::info(format!("Assets:      {}", money.format(ledger.total_assets())));
    output::info(format!("Liabilities: {}", money.format(ledger.total_liabilities())));
    output::info(format!("Net worth:   {}", money.format(ledger.net_worth())));

    if args.record {
        let date = args.date.unwrap_or_else(|| Local::now().date_naive());
        NetWorthService::record_snapshot(ledger, date, config.net_worth_retention_days);
        output::success(format!("Recorded snapshot for {date}"));
        if let Some(change) = NetWorthService::change(ledger) {
            output::info(format!("Change over history: {}", money.format(change)));
        }
    }

    let start = Local::now().date_naive();
    if let Ok(estimates) = PayoffService::payoff_dates(ledger, start, config) {
        for (id, estimate) in estimates {
            let name = account_name(ledger, id);
            match estimate {
                PayoffEstimate::PaidOff { date, .. } => {
                    output::info(format!("{name}: minimum payments finish {date}"))
                }
                PayoffEstimate::NeverPaysOff => {
                    output::warning(format!("{name}: minimum payment does not cover interest"))
                }
                PayoffEstimate::BeyondHorizon => {
                    output::warning(format!("{name}: not paid off within the horizon"))
                }
            }
        }
    }
}

fn print_version() {
    println!(
        "finflow {} ({} {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("FINFLOW_BUILD_HASH"),
        env!("FINFLOW_BUILD_PROFILE"),
        env!("FINFLOW_BUILD_TIMESTAMP"),
    );
}

fn account_name(ledger: &Ledger, id: Uuid) -> String {
    ledger
        .account(id)
        .map(|account| account.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn envelope_name(ledger: &Ledger, id: Uuid) -> String {
    ledger
        .envelope(id)
        .map(|envelope| envelope.name.clone())
        .unwrap_or_else(|| id.to_string())
}

struct Money {
    code: CurrencyCode,
    locale: LocaleConfig,
}

impl Money {
    fn from_config(config: &EngineConfig) -> Self {
        Self {
            code: CurrencyCode::new(config.currency.as_str()),
            locale: LocaleConfig::from_tag(&config.locale),
        }
    }

    fn format(&self, amount: f64) -> String {
        format_currency_value(amount, &self.code, &self.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_payoff_overrides() {
        let cli = Cli::try_parse_from([
            "finflow",
            "--ledger",
            "ledger.json",
            "payoff",
            "--strategy",
            "snowball",
            "--extra",
            "150",
        ])
        .unwrap();
        match cli.command {
            Command::Payoff(args) => {
                assert_eq!(args.strategy, Some(PayoffStrategy::Snowball));
                assert_eq!(args.extra, Some(150.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn spending_range_needs_both_ends() {
        let category = Uuid::new_v4().to_string();
        let parsed = Cli::try_parse_from([
            "finflow", "spending", "--category", &category, "--from", "2026-02-01",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "finflow", "spending", "--category", &category, "--month", "2026-02-14",
        ])
        .unwrap();
        match cli.command {
            Command::Spending(args) => {
                assert_eq!(args.month, NaiveDate::from_ymd_opt(2026, 2, 14));
                assert!(args.from.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
