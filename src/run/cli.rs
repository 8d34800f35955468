use anyhow::Result;
use chrono::Local;

use crate::budget::{BudgetStore, Mutation};
use crate::config::Settings;
use crate::fx::{CurrencySelection, DisplayState, FrankfurterClient, RateProvider, Resolution, Selection};
use crate::models::{CurrencyCode, ExpenseId};
use crate::money;
use crate::report::{self, Report};

pub(crate) fn as_cli(args: &[String], store: &mut BudgetStore, settings: &Settings) -> Result<()> {
    for issue in store.load_issues() {
        eprintln!("Warning: {issue}");
    }

    match args[1].as_str() {
        "salary" => cli_salary(&args[2..], store, settings),
        "add" | "a" => cli_add(&args[2..], store, settings),
        "rm" => cli_rm(&args[2..], store),
        "list" | "ls" => cli_list(&args[2..], store, settings),
        "summary" | "s" => cli_summary(&args[2..], store, settings),
        "report" => cli_report(&args[2..], store, settings),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cashflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("CashFlow - salary, expenses and what is left");
    println!();
    println!("Usage: cashflow [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  salary <amount>               Set the salary");
    println!("  add <name...> <amount>        Record an expense");
    println!("  rm <id>                       Remove an expense");
    println!("  list                          List expenses");
    println!("  summary                       Print salary, expenses and balance");
    println!("  report [path]                 Write the text report (default ~/{})", report::DEFAULT_TEXT_NAME);
    println!("    --csv                       Write the CSV itemization instead");
    println!("  --currency <CODE>             Show amounts in another currency (list, summary, report)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments with flags (and their values) removed.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--currency" => {
                iter.next();
            }
            a if a.starts_with("--") => {}
            a => out.push(a),
        }
    }
    out
}

/// Resolve `--currency` synchronously. A failed lookup prints a warning and
/// keeps the base currency.
fn display_for(args: &[String], settings: &Settings) -> Result<DisplayState> {
    let mut selection = CurrencySelection::new(settings.base()?);
    let Some(code) = flag_value(args, "--currency") else {
        return Ok(selection.display().clone());
    };
    let target = CurrencyCode::parse(code)?;

    if let Selection::Lookup(request) = selection.select(target) {
        let client = FrankfurterClient::new(&settings.rate_api_url, settings.rate_timeout())?;
        let result = client.fetch_rate(&request.base, &request.target);
        if let Resolution::FellBack(err) = selection.resolve(request.ticket, result) {
            eprintln!("Warning: {err}; showing {}", request.base);
        }
    }
    Ok(selection.display().clone())
}

fn report_saved<T>(mutation: &Mutation<T>, display: &DisplayState) {
    if let Err(err) = &mutation.saved {
        eprintln!("Warning: {err}; the change was not saved");
    }
    if let Some(low) = mutation.alert {
        println!(
            "Low balance: {} left, under the mark of {}",
            display.format(low.balance),
            display.format(low.threshold)
        );
    }
}

fn cli_salary(args: &[String], store: &mut BudgetStore, settings: &Settings) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: cashflow salary <amount>");
    };
    let mutation = store.set_salary(money::parse_amount(raw)?)?;
    let display = DisplayState::identity(settings.base()?);
    println!("Salary set to {}", display.format(store.salary()));
    report_saved(&mutation, &display);
    Ok(())
}

fn cli_add(args: &[String], store: &mut BudgetStore, settings: &Settings) -> Result<()> {
    let Some((amount, name)) = args.split_last() else {
        anyhow::bail!("Usage: cashflow add <name...> <amount>");
    };
    if name.is_empty() {
        anyhow::bail!("Usage: cashflow add <name...> <amount>");
    }

    let mutation = store.add_expense(&name.join(" "), money::parse_amount(amount)?)?;
    let display = DisplayState::identity(settings.base()?);
    let expense = &mutation.value;
    println!(
        "Added {} ({}) with id {}",
        expense.name,
        display.format(expense.amount),
        expense.id
    );
    println!("Balance: {}", display.format(store.balance()));
    report_saved(&mutation, &display);
    Ok(())
}

fn cli_rm(args: &[String], store: &mut BudgetStore) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: cashflow rm <id>");
    };
    let id: ExpenseId = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid expense id: {raw}"))?;

    let mutation = store.remove_expense(id);
    match &mutation.value {
        Some(removed) => println!("Removed {}", removed.name),
        None => println!("No expense with id {id}"),
    }
    if let Err(err) = &mutation.saved {
        eprintln!("Warning: {err}; the change was not saved");
    }
    Ok(())
}

fn cli_list(args: &[String], store: &BudgetStore, settings: &Settings) -> Result<()> {
    let expenses = store.expenses();
    if expenses.is_empty() {
        println!("No expenses recorded yet");
        return Ok(());
    }

    let display = display_for(args, settings)?;
    println!("{:<4} {:<15} {:<28} {:>16}", "#", "ID", "Name", "Amount");
    println!("{}", "─".repeat(66));
    for (i, e) in expenses.iter().enumerate() {
        println!(
            "{:<4} {:<15} {:<28} {:>16}",
            i + 1,
            e.id,
            crate::ui::util::truncate(&e.name, 28),
            display.format(e.amount),
        );
    }
    Ok(())
}

fn cli_summary(args: &[String], store: &BudgetStore, settings: &Settings) -> Result<()> {
    let display = display_for(args, settings)?;

    println!("CashFlow - {}", display.currency);
    println!("{}", "─".repeat(40));
    println!("  Salary:     {}", display.format(store.salary()));
    println!("  Expenses:   {}", display.format(store.total_expenses()));
    println!("  Balance:    {}", display.format(store.balance()));
    println!("  Items:      {}", store.expenses().len());
    if store.is_low() {
        println!();
        println!(
            "  Low balance: under {}",
            display.format(store.low_balance_threshold())
        );
    }
    Ok(())
}

fn cli_report(args: &[String], store: &BudgetStore, settings: &Settings) -> Result<()> {
    let display = display_for(args, settings)?;
    let csv = args.iter().any(|a| a == "--csv");
    let path_arg = positional(args).first().copied();
    let report = Report::build(store, &display, Local::now());

    if csv {
        let path = report::output_path(path_arg, report::DEFAULT_CSV_NAME);
        let count = report.write_csv(&path)?;
        println!("Exported {count} expenses to {}", path.display());
    } else {
        let path = report::output_path(path_arg, report::DEFAULT_TEXT_NAME);
        report.write_text(&path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
