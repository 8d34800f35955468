use rust_decimal::Decimal;

use super::DisplayState;
use crate::error::BudgetError;
use crate::models::CurrencyCode;

/// Largest exchange rate accepted from a provider (10^9 target units per base
/// unit). Together with `money::MAX_AMOUNT` it keeps projections finite.
pub(crate) const MAX_RATE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// An outstanding `base → target` lookup. Only the response carrying the
/// latest ticket may change the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RateRequest {
    pub(crate) ticket: u64,
    pub(crate) base: CurrencyCode,
    pub(crate) target: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Display already reflects the choice (the base currency needs no rate).
    Ready,
    /// Caller must fetch this rate and hand the result to `resolve`.
    Lookup(RateRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Applied,
    /// Lookup failed; display is back on the base currency.
    FellBack(BudgetError),
    /// A newer selection superseded this response.
    Stale,
}

pub(crate) struct CurrencySelection {
    base: CurrencyCode,
    display: DisplayState,
    pending: Option<RateRequest>,
    next_ticket: u64,
}

impl CurrencySelection {
    pub(crate) fn new(base: CurrencyCode) -> Self {
        Self {
            display: DisplayState::identity(base.clone()),
            base,
            pending: None,
            next_ticket: 1,
        }
    }

    pub(crate) fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub(crate) fn display(&self) -> &DisplayState {
        &self.display
    }

    pub(crate) fn pending_target(&self) -> Option<&CurrencyCode> {
        self.pending.as_ref().map(|r| &r.target)
    }

    pub(crate) fn select(&mut self, target: CurrencyCode) -> Selection {
        if target == self.base {
            self.pending = None;
            self.display = DisplayState::identity(self.base.clone());
            return Selection::Ready;
        }

        let request = RateRequest {
            ticket: self.next_ticket,
            base: self.base.clone(),
            target,
        };
        self.next_ticket += 1;
        self.pending = Some(request.clone());
        Selection::Lookup(request)
    }

    pub(crate) fn resolve(&mut self, ticket: u64, result: Result<Decimal, BudgetError>) -> Resolution {
        let Some(request) = self.pending.take_if(|r| r.ticket == ticket) else {
            tracing::debug!(ticket, "discarding stale rate response");
            return Resolution::Stale;
        };

        match result {
            Ok(rate) if rate > Decimal::ZERO && rate <= MAX_RATE => {
                tracing::info!(currency = %request.target, %rate, "display currency switched");
                self.display = DisplayState {
                    currency: request.target,
                    rate,
                };
                Resolution::Applied
            }
            Ok(rate) => self.fall_back(BudgetError::rate(format!(
                "provider returned unusable rate {rate} for {}",
                request.target
            ))),
            Err(err) => self.fall_back(err),
        }
    }

    fn fall_back(&mut self, err: BudgetError) -> Resolution {
        tracing::warn!(error = %err, base = %self.base, "rate lookup failed, showing base currency");
        self.display = DisplayState::identity(self.base.clone());
        Resolution::FellBack(err)
    }
}
