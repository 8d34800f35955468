use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::budget::BudgetStore;
use crate::fx::DisplayState;
use crate::models::{CurrencyCode, ExpenseId};
use crate::money::{format_plain, round_for_display};

pub(crate) const DEFAULT_TEXT_NAME: &str = "Cash-Flow-Report.txt";
pub(crate) const DEFAULT_CSV_NAME: &str = "Cash-Flow-Report.csv";

const WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportLine {
    pub(crate) number: usize,
    pub(crate) id: ExpenseId,
    pub(crate) name: String,
    /// Display currency, unrounded.
    pub(crate) amount: Decimal,
}

/// Read-only picture of the budget in the display currency at one moment.
#[derive(Debug, Clone)]
pub(crate) struct Report {
    pub(crate) generated_at: DateTime<Local>,
    pub(crate) currency: CurrencyCode,
    pub(crate) salary: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) balance: Decimal,
    /// Share of the salary already spent, if there is a salary.
    pub(crate) spent_percent: Option<Decimal>,
    pub(crate) lines: Vec<ReportLine>,
}

impl Report {
    pub(crate) fn build(store: &BudgetStore, display: &DisplayState, generated_at: DateTime<Local>) -> Self {
        let salary = store.salary();
        let spent = store.total_expenses();
        let spent_percent = spent
            .checked_div(salary)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED));

        let lines = store
            .expenses()
            .iter()
            .enumerate()
            .map(|(i, e)| ReportLine {
                number: i + 1,
                id: e.id,
                name: e.name.clone(),
                amount: display.project(e.amount),
            })
            .collect();

        Self {
            generated_at,
            currency: display.currency.clone(),
            salary: display.project(salary),
            total_expenses: display.project(spent),
            balance: display.project(store.balance()),
            spent_percent,
            lines,
        }
    }

    pub(crate) fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);
        let cur = &self.currency;

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^WIDTH$}", "CASH-FLOW REPORT");
        let _ = writeln!(out, "{:^WIDTH$}", "Smart Financial Dashboard");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d | %H:%M")
        );
        let _ = writeln!(out, "Currency:  {cur}");
        let _ = writeln!(out);

        let _ = writeln!(out, "{:<20}{:>28} {cur}", "TOTAL SALARY", format_plain(self.salary));
        let _ = writeln!(
            out,
            "{:<20}{:>28} {cur}",
            "TOTAL EXPENSES",
            format_plain(self.total_expenses)
        );
        let _ = writeln!(
            out,
            "{:<20}{:>28} {cur}",
            "REMAINING BALANCE",
            format_plain(self.balance)
        );
        if let Some(pct) = self.spent_percent {
            let pct = format!("{:.1}%", pct.round_dp(1));
            let _ = writeln!(out, "{:<20}{:>28}", "SPENT OF SALARY", pct);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "EXPENSE BREAKDOWN");
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:<6}{:<34}{:>20}", "S.No", "Item Name", "Amount");
        let _ = writeln!(out, "{thin}");
        if self.lines.is_empty() {
            let _ = writeln!(out, "No expenses recorded yet");
        } else {
            for line in &self.lines {
                let _ = writeln!(
                    out,
                    "{:<6}{:<34}{:>20}",
                    line.number,
                    crate::ui::util::truncate(&line.name, 32),
                    format!("{} {cur}", format_plain(line.amount))
                );
            }
        }
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:^WIDTH$}", "CashFlow - Smart Financial Dashboard");
        out
    }

    pub(crate) fn write_text(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render_text())
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(path = %path.display(), "text report written");
        Ok(())
    }

    /// One row per expense: `id,name,amount,currency`, amounts rounded to cents.
    pub(crate) fn write_csv(&self, path: &Path) -> Result<usize> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        wtr.write_record(["id", "name", "amount", "currency"])?;
        for line in &self.lines {
            wtr.write_record([
                line.id.to_string(),
                line.name.clone(),
                format!("{:.2}", round_for_display(line.amount)),
                self.currency.to_string(),
            ])?;
        }
        wtr.flush()?;
        tracing::info!(path = %path.display(), rows = self.lines.len(), "csv report written");
        Ok(self.lines.len())
    }
}

/// Resolve a user-supplied report path; `~/` expands to the home directory
/// and no path means `default_name` in the home directory.
pub(crate) fn output_path(arg: Option<&str>, default_name: &str) -> std::path::PathBuf {
    match arg.map(str::trim).filter(|a| !a.is_empty()) {
        Some(path) => std::path::PathBuf::from(shellexpand(path)),
        None => home_dir().join(default_name),
    }
}

fn home_dir() -> std::path::PathBuf {
    directories::UserDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home_dir().display())
    } else {
        path.to_string()
    }
}
