mod alert;
mod storage;

pub(crate) use alert::{AlertPolicy, LowBalance};
#[cfg(test)]
pub(crate) use alert::AlertState;
pub(crate) use storage::{MemoryStore, SnapshotStore};

use std::sync::mpsc::{self, Receiver, Sender};

use rust_decimal::Decimal;

use crate::error::BudgetError;
use crate::models::{BudgetSnapshot, Expense, ExpenseId, IdGenerator};
use crate::money;

/// Emitted after every recomputation so presenters can redraw without the
/// engine knowing about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BudgetEvent {
    Changed,
    LowBalance(LowBalance),
    PersistenceFailed(String),
}

/// What a successful mutation did besides changing memory.
#[derive(Debug)]
pub(crate) struct Mutation<T> {
    pub(crate) value: T,
    /// `Err(PersistenceFailure)` when the snapshot could not be written; the
    /// in-memory change stands regardless.
    pub(crate) saved: Result<(), BudgetError>,
    pub(crate) alert: Option<LowBalance>,
}

/// Expenses vs. what is left of the salary, for the split chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpendingSplit {
    pub(crate) spent: Decimal,
    /// Never negative; an overspent budget has nothing remaining.
    pub(crate) remaining: Decimal,
}

/// Owns salary and expenses. Every successful mutation is written through to
/// the snapshot store before the call returns.
pub(crate) struct BudgetStore {
    salary: Decimal,
    expenses: Vec<Expense>,
    ids: IdGenerator,
    alert: AlertPolicy,
    storage: Box<dyn SnapshotStore>,
    key: String,
    subscribers: Vec<Sender<BudgetEvent>>,
    load_issues: Vec<BudgetError>,
}

impl BudgetStore {
    /// Load the snapshot stored under `key`. Unreadable or corrupted data
    /// falls back to an empty budget; the problems are kept in `load_issues`.
    pub(crate) fn open(storage: Box<dyn SnapshotStore>, key: &str, alert: AlertPolicy) -> Self {
        let mut load_issues = Vec::new();
        let snapshot = match storage.read(key) {
            Ok(Some(raw)) => {
                let decoded = BudgetSnapshot::decode(&raw);
                load_issues.extend(decoded.issues.into_iter().map(BudgetError::PersistenceFailure));
                decoded.snapshot
            }
            Ok(None) => BudgetSnapshot::default(),
            Err(e) => {
                load_issues.push(BudgetError::persistence(format!("{e:#}")));
                BudgetSnapshot::default()
            }
        };

        for issue in &load_issues {
            tracing::warn!(%issue, key, "budget snapshot loaded with problems");
        }
        tracing::info!(
            key,
            salary = %snapshot.salary,
            expenses = snapshot.expenses.len(),
            "budget loaded"
        );

        Self {
            ids: IdGenerator::seeded(&snapshot.expenses),
            salary: snapshot.salary,
            expenses: snapshot.expenses,
            alert,
            storage,
            key: key.to_string(),
            subscribers: Vec::new(),
            load_issues,
        }
    }

    pub(crate) fn load_issues(&self) -> &[BudgetError] {
        &self.load_issues
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<BudgetEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    // ── Mutations ─────────────────────────────────────────────

    pub(crate) fn set_salary(&mut self, value: Decimal) -> Result<Mutation<()>, BudgetError> {
        let salary = money::validate_salary(value)?;
        tracing::debug!(%salary, "salary set");
        self.salary = salary;
        self.alert.rearm();
        Ok(self.commit(()))
    }

    pub(crate) fn add_expense(&mut self, name: &str, amount: Decimal) -> Result<Mutation<Expense>, BudgetError> {
        let (name, amount) = money::validate_expense(name, amount)?;
        money::checked_total(self.total_expenses(), amount)?;
        let expense = Expense {
            id: self.ids.next_id()?,
            name,
            amount,
        };
        tracing::debug!(id = %expense.id, name = %expense.name, amount = %expense.amount, "expense added");
        self.expenses.push(expense.clone());
        Ok(self.commit(expense))
    }

    /// Removing an id that is not present changes nothing and writes nothing.
    pub(crate) fn remove_expense(&mut self, id: ExpenseId) -> Mutation<Option<Expense>> {
        let Some(pos) = self.expenses.iter().position(|e| e.id == id) else {
            tracing::debug!(%id, "remove ignored, no such expense");
            return Mutation {
                value: None,
                saved: Ok(()),
                alert: None,
            };
        };
        let removed = self.expenses.remove(pos);
        tracing::debug!(%id, name = %removed.name, "expense removed");
        self.commit(Some(removed))
    }

    /// Recompute and notify without changing anything, e.g. after the display
    /// currency changed or right after subscribing.
    pub(crate) fn refresh(&mut self) -> Option<LowBalance> {
        self.recompute()
    }

    fn commit<T>(&mut self, value: T) -> Mutation<T> {
        let saved = self.persist();
        if let Err(ref err) = saved {
            tracing::warn!(%err, "continuing with unsaved changes");
            self.emit(BudgetEvent::PersistenceFailed(err.to_string()));
        }
        let alert = self.recompute();
        Mutation { value, saved, alert }
    }

    fn persist(&mut self) -> Result<(), BudgetError> {
        let payload = self.snapshot().encode().map_err(BudgetError::persistence)?;
        self.storage
            .write(&self.key, &payload)
            .map_err(|e| BudgetError::persistence(format!("{e:#}")))
    }

    fn recompute(&mut self) -> Option<LowBalance> {
        let alert = self.alert.evaluate(self.salary, self.balance());
        self.emit(BudgetEvent::Changed);
        if let Some(low) = alert {
            tracing::info!(balance = %low.balance, threshold = %low.threshold, "low balance warning");
            self.emit(BudgetEvent::LowBalance(low));
        }
        alert
    }

    fn emit(&mut self, event: BudgetEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ── Queries ───────────────────────────────────────────────

    pub(crate) fn salary(&self) -> Decimal {
        self.salary
    }

    /// Oldest first.
    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Saturates rather than overflowing; `add_expense` and snapshot decoding
    /// keep the real total within `money::MAX_AMOUNT`.
    pub(crate) fn total_expenses(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |total, e| total.saturating_add(e.amount))
    }

    pub(crate) fn balance(&self) -> Decimal {
        self.salary.saturating_sub(self.total_expenses())
    }

    pub(crate) fn is_low(&self) -> bool {
        self.alert.is_low(self.salary, self.balance())
    }

    #[cfg(test)]
    pub(crate) fn alert_state(&self) -> AlertState {
        self.alert.state()
    }

    pub(crate) fn low_balance_threshold(&self) -> Decimal {
        self.alert.threshold(self.salary)
    }

    /// `None` when there is nothing to chart yet.
    pub(crate) fn spending_split(&self) -> Option<SpendingSplit> {
        let spent = self.total_expenses();
        if self.salary.is_zero() && spent.is_zero() {
            return None;
        }
        Some(SpendingSplit {
            spent,
            remaining: self.balance().max(Decimal::ZERO),
        })
    }

    pub(crate) fn snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            salary: self.salary,
            expenses: self.expenses.clone(),
        }
    }
}
