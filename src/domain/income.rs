use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

pub type IncomeId = i64;

/// A single income record. Append-only: once written it is never updated
/// or deleted. Source and amount are stored exactly as given, including
/// empty sources and negative amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub id: IncomeId,
    pub source: String,
    pub amount_cents: Cents,
    pub date: NaiveDate,
}
