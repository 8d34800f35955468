#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::{handle_command, remove};
use crate::budget::{AlertPolicy, BudgetStore, MemoryStore};
use crate::error::BudgetError;
use crate::fx::RateProvider;
use crate::models::CurrencyCode;

struct FixedRate(Result<Decimal, BudgetError>);

impl RateProvider for FixedRate {
    fn fetch_rate(&self, _base: &CurrencyCode, _target: &CurrencyCode) -> Result<Decimal, BudgetError> {
        self.0.clone()
    }
}

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::parse(s).unwrap()
}

fn setup_with(rate: Result<Decimal, BudgetError>) -> (App, BudgetStore) {
    let mut store = BudgetStore::open(Box::new(MemoryStore::default()), "k", AlertPolicy::default());
    let events = store.subscribe();
    let app = App::new(
        code("INR"),
        vec![code("INR"), code("USD"), code("EUR")],
        Arc::new(FixedRate(rate)),
        events,
    );
    (app, store)
}

fn setup() -> (App, BudgetStore) {
    setup_with(Ok(dec!(0.012)))
}

fn run(cmd: &str, app: &mut App, store: &mut BudgetStore) {
    handle_command(cmd, app, store).unwrap();
}

fn await_rate(app: &mut App, store: &mut BudgetStore) {
    let response = app.rate_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    app.apply_rate(response, store);
}

// ── salary / add ──────────────────────────────────────────────

#[test]
fn test_salary_command() {
    let (mut app, mut store) = setup();
    run("salary 50,000", &mut app, &mut store);
    assert_eq!(store.salary(), dec!(50000));
    assert_eq!(app.status_message, "Salary set to ₹50,000.00");
}

#[test]
fn test_salary_rejects_bad_input() {
    let (mut app, mut store) = setup();
    run("salary 1000", &mut app, &mut store);
    for bad in ["salary -5", "salary NaN", "salary abc", "salary 0"] {
        run(bad, &mut app, &mut store);
        assert!(app.status_message.starts_with("Error:"), "{bad}");
        assert_eq!(store.salary(), dec!(1000), "{bad}");
    }
}

#[test]
fn test_salary_without_args_shows_usage() {
    let (mut app, mut store) = setup();
    run("salary", &mut app, &mut store);
    assert_eq!(app.status_message, "Usage: :salary <amount>");
}

#[test]
fn test_add_takes_amount_from_last_word() {
    let (mut app, mut store) = setup();
    run("add Electricity bill 1,250.50", &mut app, &mut store);
    let expenses = store.expenses();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].name, "Electricity bill");
    assert_eq!(expenses[0].amount, dec!(1250.50));
    assert_eq!(app.status_message, "Added Electricity bill (₹1,250.50)");
}

#[test]
fn test_add_rejections_leave_state_unchanged() {
    let (mut app, mut store) = setup();
    for bad in ["add", "add Rent", "add Food 0", "add Food -3", "add Food ten"] {
        run(bad, &mut app, &mut store);
        assert!(store.expenses().is_empty(), "{bad}");
    }
}

// ── delete / rm ───────────────────────────────────────────────

#[test]
fn test_delete_needs_expenses_screen() {
    let (mut app, mut store) = setup();
    run("add Rent 100", &mut app, &mut store);
    run("delete", &mut app, &mut store);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
}

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, mut store) = setup();
    run("add Rent 100", &mut app, &mut store);
    run("add Food 50", &mut app, &mut store);
    run("expenses", &mut app, &mut store);
    app.cursor.index = 1;
    run("delete", &mut app, &mut store);

    let food = store.expenses()[1].id;
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Food'?");
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteExpense {
            id: food,
            name: "Food".into()
        })
    );
    // Nothing removed until confirmed.
    assert_eq!(store.expenses().len(), 2);
}

#[test]
fn test_rm_by_id_and_cursor_clamp() {
    let (mut app, mut store) = setup();
    run("add Rent 100", &mut app, &mut store);
    run("add Food 50", &mut app, &mut store);
    app.cursor.index = 1;
    let id = store.expenses()[1].id;

    run(&format!("rm {id}"), &mut app, &mut store);
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(app.cursor.index, 0);
    assert_eq!(app.status_message, "Deleted: Food");

    remove(id, &mut app, &mut store);
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(app.status_message, format!("No expense with id {id}"));
}

#[test]
fn test_rm_rejects_non_numeric_id() {
    let (mut app, mut store) = setup();
    run("rm rent", &mut app, &mut store);
    assert_eq!(app.status_message, "Usage: :rm <id>");
}

// ── navigation / misc ─────────────────────────────────────────

#[test]
fn test_screen_and_quit_commands() {
    let (mut app, mut store) = setup();
    run("e", &mut app, &mut store);
    assert_eq!(app.screen, Screen::Expenses);
    run("dashboard", &mut app, &mut store);
    assert_eq!(app.screen, Screen::Dashboard);
    run("h", &mut app, &mut store);
    assert!(app.show_help);
    run("quit", &mut app, &mut store);
    assert!(!app.running);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut store) = setup();
    run("salry 10", &mut app, &mut store);
    assert_eq!(
        app.status_message,
        "Unknown command: :salry. Did you mean :salary?"
    );
}

#[test]
fn test_command_line_editing() {
    let (mut app, _store) = setup();
    app.enter_command_mode();
    app.command_input.push_str("add Rent 100");
    app.delete_word();
    assert_eq!(app.command_input, "add Rent ");
    app.delete_word();
    app.delete_word();
    assert!(app.command_input.is_empty());
    assert_eq!(app.input_mode, InputMode::Normal);
}

// ── currency ──────────────────────────────────────────────────

#[test]
fn test_currency_switch_applies_rate() {
    let (mut app, mut store) = setup();
    run("add Tea 250", &mut app, &mut store);
    run("currency usd", &mut app, &mut store);
    assert_eq!(app.selection.pending_target(), Some(&code("USD")));
    assert_eq!(app.display().currency, code("INR"));

    await_rate(&mut app, &mut store);
    assert_eq!(app.display().currency, code("USD"));
    assert_eq!(app.display().format(store.total_expenses()), "$3.00");
    // Stored amounts are untouched.
    assert_eq!(store.total_expenses(), dec!(250));
    assert_eq!(app.status_message, "Showing amounts in USD");
}

#[test]
fn test_currency_failure_falls_back_to_base() {
    let (mut app, mut store) = setup_with(Err(BudgetError::rate("offline")));
    run("currency EUR", &mut app, &mut store);
    await_rate(&mut app, &mut store);
    assert_eq!(app.display().currency, code("INR"));
    assert_eq!(app.display().rate, Decimal::ONE);
    assert!(app.status_message.contains("conversion unavailable"), "{}", app.status_message);
}

#[test]
fn test_currency_base_needs_no_lookup() {
    let (mut app, mut store) = setup();
    run("currency INR", &mut app, &mut store);
    assert!(app.selection.pending_target().is_none());
    assert!(app.rate_rx.try_recv().is_err());
    assert_eq!(app.status_message, "Showing amounts in INR");
}

#[test]
fn test_currency_without_code_cycles() {
    let (mut app, mut store) = setup();
    run("currency", &mut app, &mut store);
    assert_eq!(app.selection.pending_target(), Some(&code("USD")));
    // While USD is pending the next step is EUR.
    assert_eq!(app.next_currency(), Some(code("EUR")));
}

#[test]
fn test_currency_rejects_bad_code() {
    let (mut app, mut store) = setup();
    run("currency dollars", &mut app, &mut store);
    assert!(app.status_message.starts_with("Error:"));
    assert!(app.selection.pending_target().is_none());
}

// ── events ────────────────────────────────────────────────────

#[test]
fn test_low_balance_event_opens_alert_once() {
    let (mut app, mut store) = setup();
    run("salary 1000", &mut app, &mut store);
    run("add Rent 905", &mut app, &mut store);
    app.drain_events();
    let msg = app.alert_message.take().unwrap();
    assert!(msg.contains("₹95.00"), "{msg}");
    assert!(msg.contains("₹100.00"), "{msg}");

    run("add Tea 1", &mut app, &mut store);
    app.drain_events();
    assert!(app.alert_message.is_none());
}

// ── reports ───────────────────────────────────────────────────

#[test]
fn test_report_and_csv_commands_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut store) = setup();
    run("salary 50000", &mut app, &mut store);
    run("add Rent 20000", &mut app, &mut store);

    let txt = dir.path().join("r.txt");
    run(&format!("report {}", txt.display()), &mut app, &mut store);
    assert!(std::fs::read_to_string(&txt).unwrap().contains("CASH-FLOW REPORT"));

    let csv = dir.path().join("r.csv");
    run(&format!("csv {}", csv.display()), &mut app, &mut store);
    assert!(app.status_message.starts_with("Exported 1 expenses"));
    assert!(std::fs::read_to_string(&csv).unwrap().contains("Rent"));
}

#[test]
fn test_report_into_missing_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, mut store) = setup();
    let bad = dir.path().join("missing").join("r.txt");
    assert!(handle_command(&format!("report {}", bad.display()), &mut app, &mut store).is_err());
}
