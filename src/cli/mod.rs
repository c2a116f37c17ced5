use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::application::{LedgerService, NewTransaction, ReportingService};
use crate::domain::{
    DashboardSummary, ReportResult, Transaction, TransactionType, cents_to_f64, format_cents,
    parse_cents,
};

/// Cashbook - Personal Cash-Flow Tracker
#[derive(Parser)]
#[command(name = "cashbook")]
#[command(about = "Record income and expenses, then see balances and monthly reports")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "CASHBOOK_DB", default_value = "cashbook.db")]
    pub database: String,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Record a transaction
    Add {
        /// Amount (e.g., "100.00" or "100")
        amount: String,

        /// Transaction type: in (income) or out (expense)
        #[arg(short = 't', long = "type")]
        transaction_type: String,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Person the money is going to or coming from
        #[arg(short, long)]
        person: Option<String>,

        /// Category name or id
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Balances, recent activity and the last six months
    Dashboard {
        /// Anchor date for the monthly chart (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Ledger and totals for a date range
    Report {
        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Add {
        /// Category name (unique per type)
        name: String,

        /// Category type: in (income) or out (expense)
        #[arg(short = 't', long = "type")]
        category_type: String,
    },

    /// List all categories
    List,

    /// Delete a category (its transactions become uncategorised)
    Delete {
        /// Category name or id
        name: String,

        /// Category type, needed when the name exists for both: in or out
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Category(category_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_category_command(&service, category_cmd).await?;
            }

            Commands::Add {
                amount,
                transaction_type,
                date,
                description,
                person,
                category,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let transaction_type = parse_type(&transaction_type)?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Utc::now().date_naive(),
                };

                let transaction = service
                    .record_transaction(NewTransaction {
                        transaction_type,
                        amount_cents,
                        date,
                        description,
                        related_person: person,
                        category,
                    })
                    .await?;

                println!("Recorded {} ({})", transaction, transaction.id);
            }

            Commands::Delete { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let id = Uuid::parse_str(&id).context("Invalid transaction ID format (expected UUID)")?;
                let transaction = service.delete_transaction(id).await?;
                println!("Deleted {}", transaction);
            }

            Commands::Dashboard { today, format } => {
                let service = LedgerService::connect(&self.database).await?;
                let reporting = ReportingService::new(service.repository().clone());
                let today = match today {
                    Some(date_str) => parse_date(&date_str)?,
                    None => Utc::now().date_naive(),
                };

                let summary = reporting.dashboard_summary(today).await?;
                print_dashboard(&summary, format)?;
            }

            Commands::Report { from, to, format } => {
                let service = LedgerService::connect(&self.database).await?;
                let reporting = ReportingService::new(service.repository().clone());

                let report = reporting.report(from.as_deref(), to.as_deref()).await?;
                print_report(&report, format)?;
            }
        }

        Ok(())
    }
}

async fn run_category_command(service: &LedgerService, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Add {
            name,
            category_type,
        } => {
            let category_type = parse_type(&category_type)?;
            let category = service.create_category(name, category_type).await?;
            println!("Created category: {}", category);
        }

        CategoryCommands::List => {
            let categories = service.list_categories().await?;
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                println!("{:<24} {:<10} ID", "NAME", "TYPE");
                println!("{}", "-".repeat(72));
                for category in categories {
                    println!(
                        "{:<24} {:<10} {}",
                        truncate(&category.name, 24),
                        category.category_type.label(),
                        category.id
                    );
                }
            }
        }

        CategoryCommands::Delete {
            name,
            category_type,
        } => {
            let category_type = category_type.as_deref().map(parse_type).transpose()?;
            let category = service.delete_category(&name, category_type).await?;
            println!("Deleted category: {}", category);
        }
    }
    Ok(())
}

fn print_dashboard(summary: &DashboardSummary, format: OutputFormat) -> Result<()> {
    let series = &summary.monthly_series;

    match format {
        OutputFormat::Json => {
            let view = serde_json::json!({
                "recent_transactions": summary.recent_transactions,
                "total_in": cents_to_f64(summary.total_in),
                "total_out": cents_to_f64(summary.total_out),
                "balance": cents_to_f64(summary.balance),
                "chart": series.chart(),
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["month", "label", "income", "expense"])?;
            for i in 0..series.len() {
                writer.write_record([
                    series.keys[i].clone(),
                    series.labels[i].clone(),
                    format_cents(series.income[i]),
                    format_cents(series.expense[i]),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Total In:   {:>15}", format_cents(summary.total_in));
            println!("Total Out:  {:>15}", format_cents(summary.total_out));
            println!("{}", "-".repeat(27));
            println!("Balance:    {:>15}", format_cents(summary.balance));

            println!();
            println!("Recent Transactions:");
            if summary.recent_transactions.is_empty() {
                println!("  No transactions yet.");
            } else {
                print_transaction_table(&summary.recent_transactions);
            }

            println!();
            println!("{:<10} {:>12} {:>12}", "MONTH", "INCOME", "EXPENSE");
            println!("{}", "-".repeat(36));
            for i in 0..series.len() {
                println!(
                    "{:<10} {:>12} {:>12}",
                    series.labels[i],
                    format_cents(series.income[i]),
                    format_cents(series.expense[i])
                );
            }
        }
    }
    Ok(())
}

fn print_report(report: &ReportResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record([
                "id",
                "date",
                "type",
                "amount",
                "category",
                "related_person",
                "description",
            ])?;
            for t in &report.transactions {
                writer.write_record([
                    t.id.to_string(),
                    t.date.format("%Y-%m-%d").to_string(),
                    t.transaction_type.as_str().to_string(),
                    format_cents(t.amount_cents),
                    t.category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                    t.related_person.clone().unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Financial Report");
            let (from, to) = period_bounds(report.start_date, report.end_date);
            println!("Period: {} to {}", from, to);
            println!();

            if report.transactions.is_empty() {
                println!("No transactions found.");
            } else {
                print_transaction_table(&report.transactions);
            }

            println!();
            println!("Total In:   {:>15}", format_cents(report.total_in));
            println!("Total Out:  {:>15}", format_cents(report.total_out));
            println!("{}", "-".repeat(27));
            println!("Balance:    {:>15}", format_cents(report.balance));
        }
    }
    Ok(())
}

/// Header text for a report range. A missing end bound means "up to the
/// latest transaction", not the current date.
fn period_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (String, String) {
    let show = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    (
        start.map(show).unwrap_or_else(|| "beginning".to_string()),
        end.map(show).unwrap_or_else(|| "latest".to_string()),
    )
}

fn print_transaction_table(transactions: &[Transaction]) {
    println!(
        "{:<12} {:<9} {:>12} {:<15} {:<15} DESCRIPTION",
        "DATE", "TYPE", "AMOUNT", "CATEGORY", "PERSON"
    );
    println!("{}", "-".repeat(90));
    for t in transactions {
        println!(
            "{:<12} {:<9} {:>12} {:<15} {:<15} {}",
            t.date.format("%Y-%m-%d"),
            t.transaction_type.label(),
            format_cents(t.amount_cents),
            truncate(t.category.as_ref().map(|c| c.name.as_str()).unwrap_or(""), 15),
            truncate(t.related_person.as_deref().unwrap_or(""), 15),
            truncate(t.description.as_deref().unwrap_or(""), 30)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn parse_type(input: &str) -> Result<TransactionType> {
    TransactionType::from_str(input).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid type '{}'. Valid types: in, out, income, expense",
            input
        )
    })
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 15), "Groceries");
        assert_eq!(truncate("Weekly grocery shopping", 10), "Weekly ...");
        assert_eq!(truncate("Café au lait", 6), "Caf...");
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(parse_type("in").unwrap(), TransactionType::Income);
        assert_eq!(parse_type("OUT").unwrap(), TransactionType::Expense);
        assert!(parse_type("sideways").is_err());
    }

    #[test]
    fn test_cli_parses_report_flags() {
        let cli = Cli::try_parse_from([
            "cashbook", "-d", "test.db", "report", "--from", "2024-02-01", "--format", "csv",
        ])
        .unwrap();

        assert_eq!(cli.database, "test.db");
        match cli.command {
            Commands::Report { from, to, format } => {
                assert_eq!(from.as_deref(), Some("2024-02-01"));
                assert_eq!(to, None);
                assert_eq!(format, OutputFormat::Csv);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["cashbook", "dashboard", "--format", "yaml"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["cashbook", "dashboard"]).unwrap();
        match cli.command {
            Commands::Dashboard { format, .. } => assert_eq!(format, OutputFormat::Table),
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_open_ended_report_header() {
        assert_eq!(
            period_bounds(None, None),
            ("beginning".to_string(), "latest".to_string())
        );
        let start = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(period_bounds(start, None).0, "2024-02-01");
    }
}
