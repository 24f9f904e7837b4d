use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, IncomeId};

pub type ExpenseId = i64;

/// Category assigned when the caller provides none (or an empty string).
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A single expense record. Expenses are the only entity with a delete
/// path. `income_id` optionally links the expense to the income entry it
/// was paid from, feeding the join report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: ExpenseId,
    pub name: String,
    pub amount_cents: Cents,
    pub date: NaiveDate,
    pub category: String,
    pub income_id: Option<IncomeId>,
}

/// Normalize an optional category: absent or blank becomes the default.
pub fn normalize_category(category: Option<String>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c,
        _ => DEFAULT_CATEGORY.to_string(),
    }
}
