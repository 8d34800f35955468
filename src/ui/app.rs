use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::budget::{BudgetEvent, BudgetStore};
use crate::fx::{spawn_lookup, CurrencySelection, DisplayState, RateProvider, RateResponse, Resolution, Selection};
use crate::models::{CurrencyCode, Expense, ExpenseId};
use crate::ui::util::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: ExpenseId, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    /// Low-balance popup; dismissed by any key.
    pub(crate) alert_message: Option<String>,

    pub(crate) cursor: Cursor,

    // Currency
    pub(crate) currencies: Vec<CurrencyCode>,
    pub(crate) selection: CurrencySelection,
    rates: Arc<dyn RateProvider>,
    rate_tx: Sender<RateResponse>,
    pub(crate) rate_rx: Receiver<RateResponse>,

    events: Receiver<BudgetEvent>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(
        base: CurrencyCode,
        currencies: Vec<CurrencyCode>,
        rates: Arc<dyn RateProvider>,
        events: Receiver<BudgetEvent>,
    ) -> Self {
        let (rate_tx, rate_rx) = mpsc::channel();
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            alert_message: None,

            cursor: Cursor::default(),

            currencies,
            selection: CurrencySelection::new(base),
            rates,
            rate_tx,
            rate_rx,

            events,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn display(&self) -> &DisplayState {
        self.selection.display()
    }

    pub(crate) fn base(&self) -> &CurrencyCode {
        self.selection.base()
    }

    /// Switch the display currency. Anything but the base currency starts a
    /// background lookup whose answer lands through `poll_rates`.
    pub(crate) fn request_currency(&mut self, target: CurrencyCode, store: &mut BudgetStore) {
        match self.selection.select(target.clone()) {
            Selection::Ready => {
                store.refresh();
                self.set_status(format!("Showing amounts in {target}"));
            }
            Selection::Lookup(request) => {
                self.set_status(format!("Fetching {} → {} rate...", request.base, request.target));
                spawn_lookup(Arc::clone(&self.rates), request, self.rate_tx.clone());
            }
        }
    }

    /// Next currency in the configured list, wrapping around.
    pub(crate) fn next_currency(&self) -> Option<CurrencyCode> {
        if self.currencies.is_empty() {
            return None;
        }
        let current = self
            .selection
            .pending_target()
            .unwrap_or(&self.display().currency);
        let next = self
            .currencies
            .iter()
            .position(|c| c == current)
            .map_or(0, |i| (i + 1) % self.currencies.len());
        Some(self.currencies[next].clone())
    }

    pub(crate) fn poll_rates(&mut self, store: &mut BudgetStore) {
        while let Ok(response) = self.rate_rx.try_recv() {
            self.apply_rate(response, store);
        }
    }

    pub(crate) fn apply_rate(&mut self, response: RateResponse, store: &mut BudgetStore) {
        match self.selection.resolve(response.ticket, response.result) {
            Resolution::Applied => {
                store.refresh();
                let currency = self.display().currency.clone();
                self.set_status(format!("Showing amounts in {currency}"));
            }
            Resolution::FellBack(err) => {
                store.refresh();
                let base = self.base().clone();
                self.set_status(format!("{err}; showing {base}"));
            }
            Resolution::Stale => {}
        }
    }

    pub(crate) fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                BudgetEvent::Changed => {}
                BudgetEvent::LowBalance(low) => {
                    let display = self.display();
                    let msg = format!(
                        "Balance is {}, under the low-balance mark of {}.",
                        display.format(low.balance),
                        display.format(low.threshold)
                    );
                    self.alert_message = Some(msg);
                }
                BudgetEvent::PersistenceFailed(msg) => {
                    self.set_status(format!("Warning: changes not saved ({msg})"));
                }
            }
        }
    }

    pub(crate) fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.command_input.clear();
    }

    pub(crate) fn leave_command_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command_input.clear();
    }

    /// Ctrl-w: drop the last word, leaving command mode once nothing is left.
    pub(crate) fn delete_word(&mut self) {
        let keep = self
            .command_input
            .trim_end()
            .rfind(' ')
            .map_or(0, |pos| pos + 1);
        self.command_input.truncate(keep);
        if self.command_input.is_empty() {
            self.leave_command_mode();
        }
    }

    pub(crate) fn selected_expense<'a>(&self, store: &'a BudgetStore) -> Option<&'a Expense> {
        store.expenses().get(self.cursor.index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
