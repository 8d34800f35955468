use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Local;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::budget::{BudgetStore, Mutation};
use crate::models::{CurrencyCode, ExpenseId};
use crate::money;
use crate::report::{self, Report};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut BudgetStore) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit CashFlow", cmd_quit, r);
    register_command!("quit", "Quit CashFlow", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("salary", "Set salary (e.g. :salary 50000)", cmd_salary, r);
    register_command!("s", "Set salary (e.g. :s 50000)", cmd_salary, r);
    register_command!("add", "Add expense (e.g. :add Rent 20000)", cmd_add, r);
    register_command!("a", "Add expense (e.g. :a Rent 20000)", cmd_add, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!("rm", "Remove expense by id (e.g. :rm 1718000000000)", cmd_rm, r);
    register_command!(
        "currency",
        "Display currency (e.g. :currency USD, no code cycles)",
        cmd_currency,
        r
    );
    register_command!("c", "Display currency (e.g. :c USD)", cmd_currency, r);
    register_command!(
        "report",
        "Write text report (e.g. :report ~/cashflow.txt)",
        cmd_report,
        r
    );
    register_command!(
        "csv",
        "Write CSV of expenses (e.g. :csv ~/cashflow.csv)",
        cmd_csv,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, store)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Status text for a mutation that went through, flagging a failed save.
fn outcome<T>(app: &mut App, mutation: &Mutation<T>, done: String) {
    match &mutation.saved {
        Ok(()) => app.set_status(done),
        Err(err) => app.set_status(format!("{done} (not saved: {err})")),
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _store: &mut BudgetStore) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _store: &mut BudgetStore) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.cursor.clamp(store.expenses().len());
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _store: &mut BudgetStore) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_salary(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :salary <amount>");
        return Ok(());
    }

    let result = money::parse_amount(args).and_then(|amount| store.set_salary(amount));
    match result {
        Ok(mutation) => {
            let shown = money::format_amount(store.salary(), app.base());
            outcome(app, &mutation, format!("Salary set to {shown}"));
        }
        Err(err) => app.set_status(format!("Error: {err}")),
    }
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    // Amount is the last word so names may contain spaces.
    let Some((name, amount)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :add <name> <amount>");
        return Ok(());
    };

    let result = money::parse_amount(amount).and_then(|amount| store.add_expense(name, amount));
    match result {
        Ok(mutation) => {
            let shown = money::format_amount(mutation.value.amount, app.base());
            let done = format!("Added {} ({shown})", mutation.value.name);
            outcome(app, &mutation, done);
        }
        Err(err) => app.set_status(format!("Error: {err}")),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses || store.expenses().is_empty() {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    if let Some(expense) = app.selected_expense(store) {
        let (id, name) = (expense.id, expense.name.clone());
        app.confirm_message = format!("Delete '{name}'?");
        app.pending_action = Some(PendingAction::DeleteExpense { id, name });
        app.input_mode = InputMode::Confirm;
    }
    Ok(())
}

fn cmd_rm(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    let Ok(id) = args.parse::<ExpenseId>() else {
        app.set_status("Usage: :rm <id>");
        return Ok(());
    };
    remove(id, app, store);
    Ok(())
}

/// Shared by `:rm` and the delete confirmation.
pub(crate) fn remove(id: ExpenseId, app: &mut App, store: &mut BudgetStore) {
    let mutation = store.remove_expense(id);
    app.cursor.clamp(store.expenses().len());
    match &mutation.value {
        Some(removed) => {
            let done = format!("Deleted: {}", removed.name);
            outcome(app, &mutation, done);
        }
        None => app.set_status(format!("No expense with id {id}")),
    }
}

fn cmd_currency(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    let target = if args.is_empty() {
        match app.next_currency() {
            Some(code) => code,
            None => {
                app.set_status("No display currencies configured");
                return Ok(());
            }
        }
    } else {
        match CurrencyCode::parse(args) {
            Ok(code) => code,
            Err(err) => {
                app.set_status(format!("Error: {err}"));
                return Ok(());
            }
        }
    };
    app.request_currency(target, store);
    Ok(())
}

fn cmd_report(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    let path = report::output_path(Some(args), report::DEFAULT_TEXT_NAME);
    Report::build(store, app.display(), Local::now()).write_text(&path)?;
    app.set_status(format!("Report written to {}", path.display()));
    Ok(())
}

fn cmd_csv(args: &str, app: &mut App, store: &mut BudgetStore) -> anyhow::Result<()> {
    let path = report::output_path(Some(args), report::DEFAULT_CSV_NAME);
    let count = Report::build(store, app.display(), Local::now()).write_csv(&path)?;
    if count == 0 {
        app.set_status(format!("No expenses to export; wrote header to {}", path.display()));
    } else {
        app.set_status(format!("Exported {count} expenses to {}", path.display()));
    }
    Ok(())
}
