use serde::{Deserialize, Serialize};

use super::{BudgetId, Cents};

pub type SavingsGoalId = i64;

/// A savings target. The deadline is stored as free text and never
/// validated. `budget_id` optionally ties the goal to a budget, feeding
/// the join report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: SavingsGoalId,
    pub name: String,
    pub target_cents: Cents,
    pub deadline: String,
    pub budget_id: Option<BudgetId>,
}
