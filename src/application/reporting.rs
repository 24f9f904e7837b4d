use serde::{Deserialize, Serialize};

use crate::domain::{Cents, ExpenseEntry, IncomeEntry};

/// The financial summary: every income row followed by every expense row,
/// each block in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    pub income: Vec<IncomeEntry>,
    pub expenses: Vec<ExpenseEntry>,
}

impl FinancialReport {
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }

    /// Net position: income total minus expense total.
    pub fn net(&self) -> Cents {
        let income: Cents = self.income.iter().map(|i| i.amount_cents).sum();
        let expenses: Cents = self.expenses.iter().map(|e| e.amount_cents).sum();
        income - expenses
    }
}
