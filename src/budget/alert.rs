use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlertState {
    Armed,
    Fired,
}

/// Fired when the balance first drops below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LowBalance {
    pub(crate) balance: Decimal,
    pub(crate) threshold: Decimal,
}

/// Edge-triggered low-balance warning: fires once when the balance crosses
/// below `salary * ratio`, then stays quiet until the balance recovers.
#[derive(Debug, Clone)]
pub(crate) struct AlertPolicy {
    state: AlertState,
    ratio: Decimal,
}

impl AlertPolicy {
    /// `percent` of the salary below which the balance counts as low.
    pub(crate) fn new(percent: u32) -> Self {
        Self {
            state: AlertState::Armed,
            ratio: Decimal::from(percent) / Decimal::ONE_HUNDRED,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> AlertState {
        self.state
    }

    pub(crate) fn threshold(&self, salary: Decimal) -> Decimal {
        salary.saturating_mul(self.ratio)
    }

    /// Level check, independent of whether the warning was already shown.
    pub(crate) fn is_low(&self, salary: Decimal, balance: Decimal) -> bool {
        salary > Decimal::ZERO && balance < self.threshold(salary)
    }

    pub(crate) fn rearm(&mut self) {
        self.state = AlertState::Armed;
    }

    pub(crate) fn evaluate(&mut self, salary: Decimal, balance: Decimal) -> Option<LowBalance> {
        if !self.is_low(salary, balance) {
            self.state = AlertState::Armed;
            return None;
        }
        match self.state {
            AlertState::Fired => None,
            AlertState::Armed => {
                self.state = AlertState::Fired;
                Some(LowBalance {
                    balance,
                    threshold: self.threshold(salary),
                })
            }
        }
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(10)
    }
}
