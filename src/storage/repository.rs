use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use crate::domain::{
    Budget, BudgetId, Cents, ExpenseEntry, ExpenseId, IncomeEntry, IncomeId, SavingsGoal,
};

use super::MIGRATION_001_INITIAL;

/// A single row of the four-way join report:
/// income -> expense (income_id) -> budget (category) -> goal (budget_id).
#[derive(Debug, Clone)]
pub struct JoinReportRow {
    pub income_source: String,
    pub expense_name: String,
    pub budget_category: String,
    pub goal_name: String,
}

/// Repository for persisting and querying the four ledger tables.
/// Holds the sole connection pool for its lifetime; callers release it
/// with [`Repository::close`].
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Create the schema if it doesn't exist yet. Safe to run on every
    /// startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close the connection pool. Idempotent.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Income operations
    // ========================

    /// Insert an income entry. Source and amount are stored verbatim.
    pub async fn insert_income(
        &self,
        source: &str,
        amount_cents: Cents,
        date: NaiveDate,
    ) -> Result<IncomeEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO income (source, amount_cents, date)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(source)
        .bind(amount_cents)
        .bind(date.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to insert income entry")?;

        Ok(IncomeEntry {
            id: result.last_insert_rowid(),
            source: source.to_string(),
            amount_cents,
            date,
        })
    }

    /// List all income entries in insertion order.
    pub async fn list_income(&self) -> Result<Vec<IncomeEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source, amount_cents, date
            FROM income
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list income entries")?;

        rows.iter().map(Self::row_to_income).collect()
    }

    // ========================
    // Expense operations
    // ========================

    /// Insert an expense entry. The category must already be normalized.
    pub async fn insert_expense(
        &self,
        name: &str,
        amount_cents: Cents,
        date: NaiveDate,
        category: &str,
        income_id: Option<IncomeId>,
    ) -> Result<ExpenseEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (name, amount_cents, date, category, income_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(amount_cents)
        .bind(date.to_string())
        .bind(category)
        .bind(income_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert expense entry")?;

        Ok(ExpenseEntry {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            amount_cents,
            date,
            category: category.to_string(),
            income_id,
        })
    }

    /// Get an expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<ExpenseEntry>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, amount_cents, date, category, income_id
            FROM expenses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_expense(&row)?)),
            None => Ok(None),
        }
    }

    /// List all expense entries in insertion order.
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, amount_cents, date, category, income_id
            FROM expenses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expense entries")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Delete an expense by id. Returns false when no row matched.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;
        Ok(result.rows_affected() > 0)
    }

    /// Sum of all expense amounts. 0 when the table is empty, never NULL.
    pub async fn total_expenses(&self) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0) as total
            FROM expenses
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum expenses")?;

        Ok(row.get("total"))
    }

    // ========================
    // Budget operations
    // ========================

    /// Insert a budget. The limit must already be clamped by the caller.
    pub async fn insert_budget(&self, category: &str, limit_cents: Cents) -> Result<Budget> {
        let result = sqlx::query(
            r#"
            INSERT INTO budgets (category, limit_cents)
            VALUES (?, ?)
            "#,
        )
        .bind(category)
        .bind(limit_cents)
        .execute(&self.pool)
        .await
        .context("Failed to insert budget")?;

        Ok(Budget {
            id: result.last_insert_rowid(),
            category: category.to_string(),
            limit_cents,
        })
    }

    /// Get a budget by id.
    pub async fn get_budget(&self, id: BudgetId) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, category, limit_cents
            FROM budgets
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch budget")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_budget(&row)?)),
            None => Ok(None),
        }
    }

    /// List all budgets in insertion order.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, limit_cents
            FROM budgets
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    /// Overwrite a budget's limit. Returns false when no row matched.
    pub async fn update_budget_limit(&self, id: BudgetId, limit_cents: Cents) -> Result<bool> {
        let result = sqlx::query("UPDATE budgets SET limit_cents = ? WHERE id = ?")
            .bind(limit_cents)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update budget limit")?;
        Ok(result.rows_affected() > 0)
    }

    // ========================
    // Savings goal operations
    // ========================

    /// Insert a savings goal. The target must already be clamped.
    /// The deadline is free text and stored as-is.
    pub async fn insert_savings_goal(
        &self,
        name: &str,
        target_cents: Cents,
        deadline: &str,
        budget_id: Option<BudgetId>,
    ) -> Result<SavingsGoal> {
        let result = sqlx::query(
            r#"
            INSERT INTO savings_goals (name, target_cents, deadline, budget_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(target_cents)
        .bind(deadline)
        .bind(budget_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert savings goal")?;

        Ok(SavingsGoal {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            target_cents,
            deadline: deadline.to_string(),
            budget_id,
        })
    }

    /// List all savings goals in insertion order.
    pub async fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, target_cents, deadline, budget_id
            FROM savings_goals
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list savings goals")?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    // ========================
    // Join report
    // ========================

    /// Four-way equi-join across all tables. Only rows whose optional
    /// links (expenses.income_id, savings_goals.budget_id) are set and
    /// whose categories line up can appear; with no links the result is
    /// empty.
    pub async fn join_report(&self) -> Result<Vec<JoinReportRow>> {
        let rows = sqlx::query(
            r#"
            SELECT income.source AS income_source,
                   expenses.name AS expense_name,
                   budgets.category AS budget_category,
                   savings_goals.name AS goal_name
            FROM income
            JOIN expenses ON expenses.income_id = income.id
            JOIN budgets ON budgets.category = expenses.category
            JOIN savings_goals ON savings_goals.budget_id = budgets.id
            ORDER BY income.id, expenses.id, budgets.id, savings_goals.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to run join report")?;

        Ok(rows
            .iter()
            .map(|row| JoinReportRow {
                income_source: row.get("income_source"),
                expense_name: row.get("expense_name"),
                budget_category: row.get("budget_category"),
                goal_name: row.get("goal_name"),
            })
            .collect())
    }

    // ========================
    // Row mapping
    // ========================

    fn row_to_income(row: &sqlx::sqlite::SqliteRow) -> Result<IncomeEntry> {
        Ok(IncomeEntry {
            id: row.get("id"),
            source: row.get("source"),
            amount_cents: row.get("amount_cents"),
            date: Self::parse_stored_date(&row.get::<String, _>("date"))?,
        })
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<ExpenseEntry> {
        Ok(ExpenseEntry {
            id: row.get("id"),
            name: row.get("name"),
            amount_cents: row.get("amount_cents"),
            date: Self::parse_stored_date(&row.get::<String, _>("date"))?,
            category: row.get("category"),
            income_id: row.get("income_id"),
        })
    }

    fn row_to_budget(row: &sqlx::sqlite::SqliteRow) -> Result<Budget> {
        Ok(Budget {
            id: row.get("id"),
            category: row.get("category"),
            limit_cents: row.get("limit_cents"),
        })
    }

    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> Result<SavingsGoal> {
        Ok(SavingsGoal {
            id: row.get("id"),
            name: row.get("name"),
            target_cents: row.get("target_cents"),
            deadline: row.get("deadline"),
            budget_id: row.get("budget_id"),
        })
    }

    fn parse_stored_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid stored date: {}", s))
    }
}
