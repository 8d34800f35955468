use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BudgetError;

/// Creation-time identifier of an expense, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single spending record. Amount is always in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: Decimal,
}

/// Hands out time-based ids that never repeat within a session, even when
/// several expenses are created in the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Start after the highest id already in use.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a Expense>) -> Self {
        let last = existing.into_iter().map(|e| e.id.0).max().unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self) -> Result<ExpenseId, BudgetError> {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    /// Fails once the highest id in use is `i64::MAX`; there is no fresh id
    /// left to hand out.
    pub(crate) fn next_at(&mut self, now_ms: i64) -> Result<ExpenseId, BudgetError> {
        let after_last = self
            .last
            .checked_add(1)
            .ok_or_else(|| BudgetError::invalid("no expense ids left; remove the expense with the largest id"))?;
        self.last = now_ms.max(after_last);
        Ok(ExpenseId(self.last))
    }
}
