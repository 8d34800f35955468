use crate::error::BudgetError;

/// Upper-case three-letter ISO-4217 code, e.g. `INR` or `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub(crate) fn parse(s: &str) -> Result<Self, BudgetError> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(BudgetError::invalid(format!(
                "'{}' is not a three-letter currency code",
                s.trim()
            )))
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol shown in front of amounts; unknown codes fall back to the code itself.
    pub(crate) fn symbol(&self) -> &str {
        match self.0.as_str() {
            "INR" => "₹",
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            other => other,
        }
    }

    pub(crate) fn has_symbol(&self) -> bool {
        self.symbol() != self.as_str()
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
