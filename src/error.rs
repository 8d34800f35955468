use thiserror::Error;

/// Conditions the budget engine reports back to whoever triggered an action.
///
/// None of these are fatal: input errors leave state untouched, persistence
/// errors leave the in-memory state authoritative, and rate errors revert the
/// display to the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum BudgetError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("could not save or load budget data: {0}")]
    PersistenceFailure(String),
    #[error("currency conversion unavailable: {0}")]
    RateLookupFailure(String),
}

impl BudgetError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn persistence(err: impl std::fmt::Display) -> Self {
        Self::PersistenceFailure(err.to_string())
    }

    pub(crate) fn rate(err: impl std::fmt::Display) -> Self {
        Self::RateLookupFailure(err.to_string())
    }
}
