use thiserror::Error;

use crate::domain::{BudgetId, ExpenseId};

#[derive(Error, Debug)]
pub enum AppError {
    /// Delete target absent. Soft condition: reported, never fatal.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Update target absent. Soft condition: reported, never fatal.
    #[error("Budget not found: {0}")]
    BudgetNotFound(BudgetId),

    /// Connection or statement failure. Hard failure, propagates to the
    /// caller; no recovery path exists.
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// Soft conditions are reported to the user and the command loop
    /// continues; everything else aborts the loop.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            AppError::ExpenseNotFound(_) | AppError::BudgetNotFound(_)
        )
    }
}
