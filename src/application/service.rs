use chrono::{Local, NaiveDate};

use crate::domain::{
    Budget, BudgetId, Cents, ExpenseEntry, ExpenseId, IncomeEntry, IncomeId, SavingsGoal,
    clamp_non_negative, normalize_category,
};
use crate::storage::{JoinReportRow, Repository};

use super::{AppError, FinancialReport};

/// Application service providing the ledger operations. This is the
/// primary interface for any client (CLI, tests, ...). It owns input
/// normalization and the non-negativity clamp at the write boundary;
/// the repository below it only executes statements.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a database at the given path (created if absent) and
    /// ensure the schema exists.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Release the underlying connection pool.
    pub async fn close(&self) {
        self.repo.close().await;
    }

    // ========================
    // Write operations
    // ========================

    /// Record an income entry. The date defaults to today when omitted.
    /// Source and amount are accepted verbatim: empty sources and
    /// negative amounts are stored as given.
    pub async fn add_income(
        &self,
        source: &str,
        amount_cents: Cents,
        date: Option<NaiveDate>,
    ) -> Result<IncomeEntry, AppError> {
        let date = date.unwrap_or_else(today);
        Ok(self.repo.insert_income(source, amount_cents, date).await?)
    }

    /// Record an expense entry. The date defaults to today and the
    /// category to "Uncategorized" when absent or blank. An optional
    /// income id links the expense for the join report.
    pub async fn add_expense(
        &self,
        name: &str,
        amount_cents: Cents,
        date: Option<NaiveDate>,
        category: Option<String>,
        income_id: Option<IncomeId>,
    ) -> Result<ExpenseEntry, AppError> {
        let date = date.unwrap_or_else(today);
        let category = normalize_category(category);
        Ok(self
            .repo
            .insert_expense(name, amount_cents, date, &category, income_id)
            .await?)
    }

    /// Create a budget, clamping the limit to >= 0. Returns the stored
    /// row including its generated id. Duplicate categories are allowed.
    pub async fn create_budget(
        &self,
        category: &str,
        limit_cents: Cents,
    ) -> Result<Budget, AppError> {
        let limit_cents = clamp_non_negative(limit_cents);
        Ok(self.repo.insert_budget(category, limit_cents).await?)
    }

    /// Record a savings goal, clamping the target to >= 0. The deadline
    /// is free text and not validated.
    pub async fn add_savings_goal(
        &self,
        name: &str,
        target_cents: Cents,
        deadline: &str,
        budget_id: Option<BudgetId>,
    ) -> Result<SavingsGoal, AppError> {
        let target_cents = clamp_non_negative(target_cents);
        Ok(self
            .repo
            .insert_savings_goal(name, target_cents, deadline, budget_id)
            .await?)
    }

    /// Delete an expense by id. Signals `ExpenseNotFound` when absent;
    /// repeating the call is a no-op that reports the same condition.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), AppError> {
        if self.repo.delete_expense(id).await? {
            Ok(())
        } else {
            Err(AppError::ExpenseNotFound(id))
        }
    }

    /// Overwrite a budget's limit, clamped to >= 0. Signals
    /// `BudgetNotFound` when absent, leaving the table untouched.
    pub async fn update_budget_limit(
        &self,
        id: BudgetId,
        new_limit_cents: Cents,
    ) -> Result<Budget, AppError> {
        let budget = self
            .repo
            .get_budget(id)
            .await?
            .ok_or(AppError::BudgetNotFound(id))?;

        let limit_cents = clamp_non_negative(new_limit_cents);
        self.repo.update_budget_limit(id, limit_cents).await?;

        Ok(Budget {
            limit_cents,
            ..budget
        })
    }

    // ========================
    // Read operations
    // ========================

    /// Sum of all expense amounts; 0 when no expenses exist.
    pub async fn total_expenses(&self) -> Result<Cents, AppError> {
        Ok(self.repo.total_expenses().await?)
    }

    /// The financial summary: income rows then expense rows, each in
    /// insertion order.
    pub async fn report(&self) -> Result<FinancialReport, AppError> {
        let income = self.repo.list_income().await?;
        let expenses = self.repo.list_expenses().await?;
        Ok(FinancialReport { income, expenses })
    }

    /// The four-way join across income, expenses, budgets and savings
    /// goals. Empty unless rows are linked via income_id/budget_id and
    /// matching categories.
    pub async fn join_report(&self) -> Result<Vec<JoinReportRow>, AppError> {
        Ok(self.repo.join_report().await?)
    }

    /// Look up a single expense by id.
    pub async fn get_expense(&self, id: ExpenseId) -> Result<Option<ExpenseEntry>, AppError> {
        Ok(self.repo.get_expense(id).await?)
    }

    /// List all budgets in insertion order.
    pub async fn list_budgets(&self) -> Result<Vec<Budget>, AppError> {
        Ok(self.repo.list_budgets().await?)
    }

    /// List all savings goals in insertion order.
    pub async fn list_savings_goals(&self) -> Result<Vec<SavingsGoal>, AppError> {
        Ok(self.repo.list_savings_goals().await?)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
