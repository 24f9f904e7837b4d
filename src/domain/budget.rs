use serde::{Deserialize, Serialize};

use super::Cents;

pub type BudgetId = i64;

/// A spending limit for a category. Categories are plain text and not
/// unique, so several budgets may track the same category. The limit is
/// the only mutable field in the whole data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: String,
    pub limit_cents: Cents,
}
