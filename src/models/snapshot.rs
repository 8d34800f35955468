use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{Expense, ExpenseId};
use crate::money;

/// Everything that is persisted: the salary and the expense list, both in
/// base currency.
///
/// Encoded as `{"salary": <number>, "expenses": [{"id", "name", "amount"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSnapshot {
    pub salary: Decimal,
    pub expenses: Vec<Expense>,
}

/// Result of a lenient decode: whatever could be salvaged, plus a note for
/// every field that had to be dropped or defaulted.
#[derive(Debug, Default)]
pub struct Decoded {
    pub snapshot: BudgetSnapshot,
    pub issues: Vec<String>,
}

impl BudgetSnapshot {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode a stored payload. Never fails: a corrupted record degrades to
    /// the empty snapshot, a corrupted field to its zero value.
    pub fn decode(raw: &str) -> Decoded {
        let mut decoded = Decoded::default();

        let root = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                decoded.issues.push("stored budget is not a JSON object".into());
                return decoded;
            }
            Err(e) => {
                decoded.issues.push(format!("stored budget is not valid JSON: {e}"));
                return decoded;
            }
        };

        match root.get("salary") {
            None | Some(Value::Null) => {}
            Some(value) => match decimal_from_json(value) {
                Some(salary) if salary >= Decimal::ZERO && salary <= money::MAX_AMOUNT => {
                    decoded.snapshot.salary = salary;
                }
                _ => decoded
                    .issues
                    .push(format!("ignored invalid salary: {value}")),
            },
        }

        match root.get("expenses") {
            None | Some(Value::Null) => {}
            Some(Value::Array(entries)) => {
                let mut seen = HashSet::new();
                let mut total = Decimal::ZERO;
                for (i, entry) in entries.iter().enumerate() {
                    let n = i + 1;
                    let Some(expense) = expense_from_json(entry) else {
                        decoded.issues.push(format!("skipped malformed expense #{n}"));
                        continue;
                    };
                    if seen.contains(&expense.id) {
                        decoded
                            .issues
                            .push(format!("skipped expense #{n} with duplicate id {}", expense.id));
                        continue;
                    }
                    match money::checked_total(total, expense.amount) {
                        Ok(sum) => {
                            total = sum;
                            seen.insert(expense.id);
                            decoded.snapshot.expenses.push(expense);
                        }
                        Err(err) => decoded.issues.push(format!("skipped expense #{n}: {err}")),
                    }
                }
            }
            Some(_) => decoded
                .issues
                .push("ignored expenses: not a list".into()),
        }

        decoded
    }
}

fn expense_from_json(value: &Value) -> Option<Expense> {
    let obj = value.as_object()?;
    let id = obj.get("id")?.as_i64()?;
    let name = obj.get("name")?.as_str()?.trim();
    let amount = decimal_from_json(obj.get("amount")?)?;
    if name.is_empty() || amount <= Decimal::ZERO {
        return None;
    }
    Some(Expense {
        id: ExpenseId(id),
        name: name.to_string(),
        amount,
    })
}

/// Read a JSON number through its shortest textual form so that values written
/// as floats (`0.1`) come back as the same decimal rather than their binary
/// expansion.
fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let Value::Number(n) = value else {
        return None;
    };
    let text = n.to_string();
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).ok()
    } else {
        Decimal::from_str(&text).ok()
    }
}
