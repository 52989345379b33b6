use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::application::{IncomeLine, LedgerService, MonthlyExpenses, MonthlyTotal};
use crate::domain::{format_amount, format_date, Amount, DetailMap, EntryInput};

/// Longest bar the chart will draw.
const MAX_CHART_WIDTH: i64 = 200;

/// Expensa - Daily expenses and monthly income tracker
#[derive(Parser)]
#[command(name = "expensa")]
#[command(about = "A local-first tracker for daily expenses and monthly income")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "EXPENSA_DB", default_value = "finance_tracker.db", global = true)]
    pub database: String,

    /// Currency symbol shown after amounts
    #[arg(long, env = "EXPENSA_CURRENCY", default_value = "៛", global = true)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database (also done implicitly by every command)
    Init,

    /// Daily expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Monthly income commands
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Bar chart of total expenses per month
    Chart {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,

        /// Length of the longest bar, in characters (1-200)
        #[arg(short, long, default_value = "40", value_parser = clap::value_parser!(u16).range(1..=MAX_CHART_WIDTH))]
        width: u16,
    },

    /// Delete a record by ID
    Delete {
        /// Table: expenses (transactions) or income (monthly_income)
        table: String,

        /// Record ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record one day's expenses
    Add {
        /// Date of the expenses (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Category and amount, e.g. "food=12.5" (up to 5)
        #[arg(short, long = "entry", value_name = "CATEGORY=AMOUNT")]
        entries: Vec<String>,
    },

    /// List expenses grouped by month
    List {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record a month's income
    Add {
        /// Month of the income (YYYY-MM)
        #[arg(long)]
        month: String,

        /// Source and amount, e.g. "salary=1500" (up to 5)
        #[arg(short, long = "entry", value_name = "SOURCE=AMOUNT")]
        entries: Vec<String>,
    },

    /// List monthly income records
    List {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let service = LedgerService::open(&self.database).await?;
        let currency = self.currency.as_str();

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Expense(cmd) => run_expense_command(&service, cmd, currency).await?,

            Commands::Income(cmd) => run_income_command(&service, cmd, currency).await?,

            Commands::Chart { format, width } => {
                let totals = service.monthly_expense_totals().await?;
                print_chart(&totals, &format, usize::from(width), currency)?;
            }

            Commands::Delete { table, id } => {
                let result = service.delete_by_id(&table, &id).await?;
                if result.removed {
                    println!("Record with ID {} deleted from {}", result.id, result.table);
                } else {
                    println!("No record with ID {} in {}", result.id, result.table);
                }
            }
        }

        service.close().await;
        Ok(())
    }
}

async fn run_expense_command(
    service: &LedgerService,
    cmd: ExpenseCommands,
    currency: &str,
) -> Result<()> {
    match cmd {
        ExpenseCommands::Add { date, entries } => {
            let inputs = parse_entries(&entries);
            let record = service.add_expense(&date, &inputs).await?;
            println!(
                "Daily expenses for {} added successfully! (ID {}, total {})",
                format_date(record.date),
                record.id,
                format_money(record.daily_total(), currency)
            );
        }

        ExpenseCommands::List { format } => {
            let groups = service.expenses_by_month().await?;
            if groups.is_empty() {
                println!("No expense records found.");
            } else {
                print_expenses(&groups, &format, currency)?;
            }
        }
    }
    Ok(())
}

async fn run_income_command(
    service: &LedgerService,
    cmd: IncomeCommands,
    currency: &str,
) -> Result<()> {
    match cmd {
        IncomeCommands::Add { month, entries } => {
            let inputs = parse_entries(&entries);
            let record = service.add_income(&month, &inputs).await?;
            println!(
                "Monthly income for {} added successfully! (ID {}, total {})",
                record.month,
                record.id,
                format_money(record.total(), currency)
            );
        }

        IncomeCommands::List { format } => {
            let lines = service.income_view().await?;
            if lines.is_empty() {
                println!("No monthly income records found.");
            } else {
                print_income(&lines, &format, currency)?;
            }
        }
    }
    Ok(())
}

fn parse_entries(pairs: &[String]) -> Vec<EntryInput> {
    pairs.iter().map(|pair| EntryInput::parse_pair(pair)).collect()
}

fn print_expenses(groups: &[MonthlyExpenses], format: &str, currency: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(groups)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["id", "month", "date", "details", "daily_total"])?;
            for group in groups {
                for entry in &group.daily_entries {
                    writer.write_record([
                        entry.id.to_string(),
                        group.month.to_string(),
                        format_date(entry.date),
                        entry.details.to_json()?,
                        entry.daily_total.to_string(),
                    ])?;
                }
            }
            writer.flush()?;
        }
        _ => {
            println!(
                "{:<6} {:<8} {:<15} {:<44} {:>14}",
                "ID", "MONTH", "DATE", "DETAILS", "DAILY TOTAL"
            );
            println!("{}", "-".repeat(91));
            for group in groups {
                println!(
                    "{:<6} {:<8} {:<15} {:<44} {:>14}",
                    "",
                    group.month,
                    "Total for Month",
                    "",
                    format_money(group.monthly_total, currency)
                );
                for entry in &group.daily_entries {
                    println!(
                        "{:<6} {:<8} {:<15} {:<44} {:>14}",
                        entry.id,
                        group.month,
                        format_date(entry.date),
                        truncate(&format_details(&entry.details, currency), 44),
                        format_money(entry.daily_total, currency)
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_income(lines: &[IncomeLine], format: &str, currency: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(lines)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["id", "month", "details", "monthly_total"])?;
            for line in lines {
                writer.write_record([
                    line.id.to_string(),
                    line.month.to_string(),
                    line.details.to_json()?,
                    line.monthly_total.to_string(),
                ])?;
            }
            writer.flush()?;
        }
        _ => {
            println!(
                "{:<6} {:<8} {:<50} {:>16}",
                "ID", "MONTH", "DETAILS", "MONTHLY TOTAL"
            );
            println!("{}", "-".repeat(83));
            for line in lines {
                println!(
                    "{:<6} {:<8} {:<50} {:>16}",
                    line.id,
                    line.month,
                    truncate(&format_details(&line.details, currency), 50),
                    format_money(line.monthly_total, currency)
                );
            }
        }
    }
    Ok(())
}

fn print_chart(totals: &[MonthlyTotal], format: &str, width: usize, currency: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(totals)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["month", "total"])?;
            for total in totals {
                writer.write_record([total.month.to_string(), total.total.to_string()])?;
            }
            writer.flush()?;
        }
        _ => {
            if totals.is_empty() {
                println!("No expense records found.");
                return Ok(());
            }
            println!("Total Expenses Per Month");
            println!();
            for line in render_bar_chart(totals, width, currency) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Horizontal bars, one per month, scaled so the largest total spans `width`.
fn render_bar_chart(totals: &[MonthlyTotal], width: usize, currency: &str) -> Vec<String> {
    let max = totals.iter().map(|t| t.total).fold(0.0, f64::max);

    totals
        .iter()
        .map(|t| {
            let len = if max > 0.0 {
                ((t.total / max) * width as f64).round() as usize
            } else {
                0
            };
            format!(
                "{} | {:<width$} {}",
                t.month,
                "█".repeat(len),
                format_money(t.total, currency),
                width = width
            )
        })
        .collect()
}

fn format_money(amount: Amount, currency: &str) -> String {
    format!("{} {}", format_amount(amount), currency)
}

/// "food: 12.50 ៛, transport: 3.00 ៛"
fn format_details(details: &DetailMap, currency: &str) -> String {
    details
        .iter()
        .map(|(name, amount)| format!("{}: {}", name, format_money(amount, currency)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
