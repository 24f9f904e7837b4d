use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::{AppError, LedgerService};
use crate::domain::{Cents, format_cents, parse_cents};

/// Fiscus - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "fiscus")]
#[command(about = "A menu-driven personal finance tracker backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "fiscus.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and exit (the menu does this on startup too)
    Init,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Schema creation is idempotent, so every startup goes through init.
        let service = LedgerService::init(&self.database).await?;

        let result = match self.command {
            Some(Commands::Init) => {
                println!("Database initialized: {}", self.database);
                Ok(())
            }
            None => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                run_menu_loop(&service, &mut input).await
            }
        };

        service.close().await;
        result
    }
}

/// What the loop should do after handling one menu selection.
enum Flow {
    Continue,
    Quit,
}

/// Outcome of prompting for a single field.
enum Field<T> {
    Value(T),
    /// Unparseable input; already reported, back to the menu.
    Invalid,
    /// Stdin closed.
    Eof,
}

/// The interactive menu. User mistakes (bad numbers, bad dates, missing
/// ids) are reported and the menu is shown again; only storage failures
/// escape this loop.
async fn run_menu_loop(service: &LedgerService, input: &mut impl BufRead) -> Result<()> {
    loop {
        print_menu();

        let Some(choice) = prompt(input, "Enter your choice (0-9)")? else {
            break;
        };

        let choice: u32 = match choice.parse() {
            Ok(n) => n,
            Err(_) => {
                println!("Error: please enter a valid number between 0 and 9.");
                continue;
            }
        };

        let outcome = match choice {
            0 => {
                println!("Exiting. Bye!");
                break;
            }
            1 => menu_add_income(service, input).await,
            2 => menu_add_expense(service, input).await,
            3 => menu_create_budget(service, input).await,
            4 => menu_add_savings_goal(service, input).await,
            5 => menu_total_expenses(service).await,
            6 => menu_report(service).await,
            7 => menu_join_report(service).await,
            8 => menu_delete_expense(service, input).await,
            9 => menu_update_budget_limit(service, input).await,
            _ => {
                println!("Error: invalid choice. Please enter a number between 0 and 9.");
                continue;
            }
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) if err.is_soft() => println!("Error: {}", err),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("===== Fiscus Menu =====");
    println!("1. Add income");
    println!("2. Add expense");
    println!("3. Create budget");
    println!("4. Add savings goal");
    println!("5. Show total expenses");
    println!("6. Show financial report");
    println!("7. Run join report");
    println!("8. Delete expense");
    println!("9. Update budget limit");
    println!("0. Exit");
}

async fn menu_add_income(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let Some(source) = prompt(input, "Income source")? else {
        return Ok(Flow::Quit);
    };
    let amount = match read_amount(input, "Income amount")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };
    let date = match read_date(input, "Date (YYYY-MM-DD, blank for today)")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    let entry = service.add_income(&source, amount, date).await?;
    println!(
        "Recorded income {}: {} ({})",
        entry.id,
        format_cents(entry.amount_cents),
        entry.source
    );
    Ok(Flow::Continue)
}

async fn menu_add_expense(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let Some(name) = prompt(input, "Expense name")? else {
        return Ok(Flow::Quit);
    };
    let amount = match read_amount(input, "Expense amount")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };
    let date = match read_date(input, "Date (YYYY-MM-DD, blank for today)")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };
    let Some(category) = prompt(input, "Category (blank for Uncategorized)")? else {
        return Ok(Flow::Quit);
    };
    let income_id = match read_optional_id(input, "Linked income id (blank for none)")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    let category = (!category.is_empty()).then_some(category);
    let entry = service
        .add_expense(&name, amount, date, category, income_id)
        .await?;
    println!(
        "Recorded expense {}: {} ({}, {})",
        entry.id,
        format_cents(entry.amount_cents),
        entry.name,
        entry.category
    );
    Ok(Flow::Continue)
}

async fn menu_create_budget(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let Some(category) = prompt(input, "Budget category")? else {
        return Ok(Flow::Quit);
    };
    let limit = match read_amount(input, "Budget limit")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    let budget = service.create_budget(&category, limit).await?;
    println!(
        "Budget created - ID: {}, Category: {}, Limit: {}",
        budget.id,
        budget.category,
        format_cents(budget.limit_cents)
    );
    Ok(Flow::Continue)
}

async fn menu_add_savings_goal(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let Some(name) = prompt(input, "Savings goal name")? else {
        return Ok(Flow::Quit);
    };
    let target = match read_amount(input, "Target amount")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };
    // Deadline is free text, stored as-is.
    let Some(deadline) = prompt(input, "Deadline (YYYY-MM-DD)")? else {
        return Ok(Flow::Quit);
    };
    let budget_id = match read_optional_id(input, "Linked budget id (blank for none)")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    let goal = service
        .add_savings_goal(&name, target, &deadline, budget_id)
        .await?;
    println!(
        "Savings goal created - ID: {}, Name: {}, Target: {}",
        goal.id,
        goal.name,
        format_cents(goal.target_cents)
    );
    Ok(Flow::Continue)
}

async fn menu_total_expenses(service: &LedgerService) -> Result<Flow, AppError> {
    let total = service.total_expenses().await?;
    println!("Total expenses: {}", format_cents(total));
    Ok(Flow::Continue)
}

async fn menu_report(service: &LedgerService) -> Result<Flow, AppError> {
    let report = service.report().await?;

    println!();
    println!("Financial Summary:");
    println!("Income:");
    for entry in &report.income {
        println!(
            "  {}: {} on {}",
            entry.source,
            format_cents(entry.amount_cents),
            entry.date
        );
    }

    println!();
    println!("Expenses:");
    for entry in &report.expenses {
        println!(
            "  {}: {} on {} ({})",
            entry.name,
            format_cents(entry.amount_cents),
            entry.date,
            entry.category
        );
    }

    if !report.is_empty() {
        println!();
        println!("Net: {}", format_cents(report.net()));
    }
    Ok(Flow::Continue)
}

async fn menu_join_report(service: &LedgerService) -> Result<Flow, AppError> {
    let rows = service.join_report().await?;

    println!();
    println!("Join Report:");
    if rows.is_empty() {
        println!("  No linked rows. Link expenses to income entries and savings");
        println!("  goals to budgets for this report to produce output.");
    } else {
        for row in rows {
            println!(
                "  {} -> {} -> {} -> {}",
                row.income_source, row.expense_name, row.budget_category, row.goal_name
            );
        }
    }
    Ok(Flow::Continue)
}

async fn menu_delete_expense(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let id = match read_id(input, "Expense id to delete")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    service.delete_expense(id).await?;
    println!("Expense {} deleted.", id);
    Ok(Flow::Continue)
}

async fn menu_update_budget_limit(
    service: &LedgerService,
    input: &mut impl BufRead,
) -> Result<Flow, AppError> {
    let id = match read_id(input, "Budget id to update")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };
    let new_limit = match read_amount(input, "New budget limit")? {
        Field::Value(v) => v,
        Field::Invalid => return Ok(Flow::Continue),
        Field::Eof => return Ok(Flow::Quit),
    };

    let budget = service.update_budget_limit(id, new_limit).await?;
    println!(
        "Budget {} updated - new limit: {}",
        budget.id,
        format_cents(budget.limit_cents)
    );
    Ok(Flow::Continue)
}

// ========================
// Input helpers
// ========================

/// Print a prompt and read one trimmed line. None means stdin closed.
fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn read_amount(input: &mut impl BufRead, label: &str) -> Result<Field<Cents>> {
    let Some(raw) = prompt(input, label)? else {
        return Ok(Field::Eof);
    };
    match parse_cents(&raw) {
        Ok(cents) => Ok(Field::Value(cents)),
        Err(_) => {
            println!("Error: please enter a valid numeric amount (e.g. 50 or 50.00).");
            Ok(Field::Invalid)
        }
    }
}

fn read_id(input: &mut impl BufRead, label: &str) -> Result<Field<i64>> {
    let Some(raw) = prompt(input, label)? else {
        return Ok(Field::Eof);
    };
    match raw.parse() {
        Ok(id) => Ok(Field::Value(id)),
        Err(_) => {
            println!("Error: please enter a valid numeric id.");
            Ok(Field::Invalid)
        }
    }
}

fn read_optional_id(input: &mut impl BufRead, label: &str) -> Result<Field<Option<i64>>> {
    let Some(raw) = prompt(input, label)? else {
        return Ok(Field::Eof);
    };
    if raw.is_empty() {
        return Ok(Field::Value(None));
    }
    match raw.parse() {
        Ok(id) => Ok(Field::Value(Some(id))),
        Err(_) => {
            println!("Error: please enter a valid numeric id or leave blank.");
            Ok(Field::Invalid)
        }
    }
}

/// Blank means today (handled downstream as None).
fn read_date(input: &mut impl BufRead, label: &str) -> Result<Field<Option<NaiveDate>>> {
    let Some(raw) = prompt(input, label)? else {
        return Ok(Field::Eof);
    };
    if raw.is_empty() {
        return Ok(Field::Value(None));
    }
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Ok(Field::Value(Some(date))),
        Err(_) => {
            println!("Error: invalid date '{}'. Use YYYY-MM-DD.", raw);
            Ok(Field::Invalid)
        }
    }
}
