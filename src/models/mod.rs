mod currency;
mod expense;
mod snapshot;

pub use currency::CurrencyCode;
pub use expense::{Expense, ExpenseId, IdGenerator};
pub use snapshot::BudgetSnapshot;

#[cfg(test)]
mod tests;
