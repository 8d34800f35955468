#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn expense(id: i64, name: &str, amount: Decimal) -> Expense {
    Expense {
        id: ExpenseId(id),
        name: name.into(),
        amount,
    }
}

// ── IdGenerator ───────────────────────────────────────────────

#[test]
fn test_ids_follow_clock() {
    let mut ids = IdGenerator::default();
    assert_eq!(ids.next_at(1_000).unwrap(), ExpenseId(1_000));
    assert_eq!(ids.next_at(2_000).unwrap(), ExpenseId(2_000));
}

#[test]
fn test_ids_same_millisecond_do_not_collide() {
    let mut ids = IdGenerator::default();
    let a = ids.next_at(5_000).unwrap();
    let b = ids.next_at(5_000).unwrap();
    let c = ids.next_at(5_000).unwrap();
    assert_eq!(a, ExpenseId(5_000));
    assert_eq!(b, ExpenseId(5_001));
    assert_eq!(c, ExpenseId(5_002));
}

#[test]
fn test_ids_never_go_backwards_when_clock_does() {
    let mut ids = IdGenerator::default();
    ids.next_at(9_000).unwrap();
    assert_eq!(ids.next_at(100).unwrap(), ExpenseId(9_001));
}

#[test]
fn test_ids_seeded_from_existing() {
    let existing = vec![expense(40, "a", dec!(1)), expense(70, "b", dec!(1))];
    let mut ids = IdGenerator::seeded(&existing);
    assert_eq!(ids.next_at(10).unwrap(), ExpenseId(71));
}

#[test]
fn test_ids_run_out_at_i64_max() {
    let existing = vec![expense(i64::MAX, "last", dec!(1))];
    let mut ids = IdGenerator::seeded(&existing);
    let err = ids.next_at(1_000).unwrap_err();
    assert!(matches!(err, crate::error::BudgetError::InvalidInput(_)));
    // Still exhausted; never hands out the id already in use.
    assert!(ids.next_at(i64::MAX).is_err());
}

#[test]
fn test_ids_reach_i64_max_once() {
    let existing = vec![expense(i64::MAX - 1, "a", dec!(1))];
    let mut ids = IdGenerator::seeded(&existing);
    assert_eq!(ids.next_at(0).unwrap(), ExpenseId(i64::MAX));
    assert!(ids.next_at(0).is_err());
}

#[test]
fn test_next_id_uses_wall_clock() {
    let mut ids = IdGenerator::default();
    let a = ids.next_id().unwrap();
    let b = ids.next_id().unwrap();
    assert!(a.0 > 1_600_000_000_000);
    assert!(b > a);
}

#[test]
fn test_expense_id_parse() {
    assert_eq!(" 1700000000000 ".parse::<ExpenseId>().unwrap(), ExpenseId(1_700_000_000_000));
    assert!("abc".parse::<ExpenseId>().is_err());
}

// ── CurrencyCode ──────────────────────────────────────────────

#[test]
fn test_currency_parse_normalizes_case() {
    let code = CurrencyCode::parse(" usd ").unwrap();
    assert_eq!(code.as_str(), "USD");
    assert_eq!(format!("{code}"), "USD");
}

#[test]
fn test_currency_parse_rejects_garbage() {
    assert!(CurrencyCode::parse("").is_err());
    assert!(CurrencyCode::parse("US").is_err());
    assert!(CurrencyCode::parse("USDT").is_err());
    assert!(CurrencyCode::parse("U$D").is_err());
}

#[test]
fn test_currency_symbols() {
    assert_eq!(CurrencyCode::parse("INR").unwrap().symbol(), "₹");
    assert_eq!(CurrencyCode::parse("USD").unwrap().symbol(), "$");
    let chf = CurrencyCode::parse("CHF").unwrap();
    assert_eq!(chf.symbol(), "CHF");
    assert!(!chf.has_symbol());
}

// ── BudgetSnapshot ────────────────────────────────────────────

#[test]
fn test_snapshot_roundtrip_preserves_order_and_fields() {
    let snapshot = BudgetSnapshot {
        salary: dec!(50000),
        expenses: vec![
            expense(1_700_000_000_002, "Rent", dec!(20000)),
            expense(1_700_000_000_001, "Food", dec!(249.99)),
            expense(1_700_000_000_003, "Bus pass", dec!(0.1)),
        ],
    };
    let raw = snapshot.encode().unwrap();
    let decoded = BudgetSnapshot::decode(&raw);
    assert!(decoded.issues.is_empty(), "{:?}", decoded.issues);
    assert_eq!(decoded.snapshot, snapshot);
}

#[test]
fn test_snapshot_encodes_numbers_not_strings() {
    let snapshot = BudgetSnapshot {
        salary: dec!(1000),
        expenses: vec![expense(7, "Tea", dec!(12.5))],
    };
    let value: serde_json::Value = serde_json::from_str(&snapshot.encode().unwrap()).unwrap();
    assert!(value["salary"].is_number());
    assert!(value["expenses"][0]["id"].is_i64());
    assert_eq!(value["expenses"][0]["name"], "Tea");
    assert!(value["expenses"][0]["amount"].is_number());
}

#[test]
fn test_decode_empty_snapshot() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":0,"expenses":[]}"#);
    assert_eq!(decoded.snapshot, BudgetSnapshot::default());
    assert!(decoded.issues.is_empty());
}

#[test]
fn test_decode_missing_fields_default_quietly() {
    let decoded = BudgetSnapshot::decode("{}");
    assert_eq!(decoded.snapshot, BudgetSnapshot::default());
    assert!(decoded.issues.is_empty());
}

#[test]
fn test_decode_invalid_json() {
    let decoded = BudgetSnapshot::decode("{not json");
    assert_eq!(decoded.snapshot, BudgetSnapshot::default());
    assert_eq!(decoded.issues.len(), 1);
}

#[test]
fn test_decode_non_object_root() {
    for raw in ["[]", "42", "null", "\"salary\""] {
        let decoded = BudgetSnapshot::decode(raw);
        assert_eq!(decoded.snapshot, BudgetSnapshot::default(), "{raw}");
        assert!(!decoded.issues.is_empty(), "{raw}");
    }
}

#[test]
fn test_decode_malformed_fields_default() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":"lots","expenses":{"id":1}}"#);
    assert_eq!(decoded.snapshot.salary, Decimal::ZERO);
    assert!(decoded.snapshot.expenses.is_empty());
    assert_eq!(decoded.issues.len(), 2);
}

#[test]
fn test_decode_negative_salary_defaults_to_zero() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":-10,"expenses":[]}"#);
    assert_eq!(decoded.snapshot.salary, Decimal::ZERO);
    assert_eq!(decoded.issues.len(), 1);
}

#[test]
fn test_decode_keeps_good_fields_next_to_bad_ones() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":1200.5,"expenses":"oops"}"#);
    assert_eq!(decoded.snapshot.salary, dec!(1200.5));
    assert!(decoded.snapshot.expenses.is_empty());
}

#[test]
fn test_decode_skips_bad_expense_entries() {
    let raw = r#"{
        "salary": 1000,
        "expenses": [
            {"id": 1, "name": "Rent", "amount": 400},
            {"id": 2, "name": "   ", "amount": 10},
            {"id": 3, "name": "Free", "amount": 0},
            {"id": "4", "name": "Strid", "amount": 5},
            {"name": "No id", "amount": 5},
            "garbage",
            {"id": 1, "name": "Dupe", "amount": 9},
            {"id": 8, "name": " Food ", "amount": 55.25}
        ]
    }"#;
    let decoded = BudgetSnapshot::decode(raw);
    let names: Vec<&str> = decoded
        .snapshot
        .expenses
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Rent", "Food"]);
    assert_eq!(decoded.snapshot.expenses[1].amount, dec!(55.25));
    assert_eq!(decoded.issues.len(), 6);
}

#[test]
fn test_decode_rejects_salary_over_bound() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":5e28}"#);
    assert_eq!(decoded.snapshot.salary, Decimal::ZERO);
    assert_eq!(decoded.issues.len(), 1);

    let decoded = BudgetSnapshot::decode(r#"{"salary":1e15}"#);
    assert_eq!(decoded.snapshot.salary, crate::money::MAX_AMOUNT);
    assert!(decoded.issues.is_empty());
}

#[test]
fn test_decode_drops_expenses_past_the_total_bound() {
    let raw = r#"{"salary":10,"expenses":[
        {"id":1,"name":"Big","amount":6e14},
        {"id":2,"name":"Bigger","amount":5e14},
        {"id":3,"name":"Huge","amount":5e28},
        {"id":4,"name":"Fits","amount":4e14}
    ]}"#;
    let decoded = BudgetSnapshot::decode(raw);
    let names: Vec<&str> = decoded
        .snapshot
        .expenses
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Big", "Fits"]);
    assert_eq!(decoded.issues.len(), 2);
    assert!(decoded.issues[0].starts_with("skipped expense #2"), "{:?}", decoded.issues);
}

#[test]
fn test_decode_scientific_notation() {
    let decoded = BudgetSnapshot::decode(r#"{"salary":1e3}"#);
    assert_eq!(decoded.snapshot.salary, dec!(1000));
}
