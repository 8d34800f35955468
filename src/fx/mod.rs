//! Currency projection: turns base-currency amounts into display amounts.
//!
//! Stored amounts never change when the user switches currency; only the
//! [`DisplayState`] does. Rate lookups are side effects that live behind
//! [`RateProvider`], and [`CurrencySelection`] decides which lookup result is
//! allowed to land.

mod provider;
mod selection;

pub(crate) use provider::{spawn_lookup, FrankfurterClient, RateProvider, RateResponse};
pub(crate) use selection::{CurrencySelection, RateRequest, Resolution, Selection};

use rust_decimal::Decimal;

use crate::models::CurrencyCode;

/// `base * rate`, unrounded. Round only when formatting.
///
/// Saturates at the `Decimal` limits instead of overflowing. Stored amounts
/// are capped at `money::MAX_AMOUNT` and applied rates at `selection::MAX_RATE`, so a
/// display projection never gets there.
pub(crate) fn project(base: Decimal, rate: Decimal) -> Decimal {
    base.saturating_mul(rate)
}

/// The currency the user is looking at and the multiplier that gets there
/// from the base currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DisplayState {
    pub(crate) currency: CurrencyCode,
    pub(crate) rate: Decimal,
}

impl DisplayState {
    pub(crate) fn identity(base: CurrencyCode) -> Self {
        Self {
            currency: base,
            rate: Decimal::ONE,
        }
    }

    pub(crate) fn project(&self, base: Decimal) -> Decimal {
        project(base, self.rate)
    }

    pub(crate) fn format(&self, base: Decimal) -> String {
        crate::money::format_amount(self.project(base), &self.currency)
    }
}
