use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::budget::BudgetStore;
use crate::config::Settings;
use crate::fx::{FrankfurterClient, RateProvider};
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;

/// How long to wait for a key before checking for rate responses.
const TICK: Duration = Duration::from_millis(200);

pub(crate) fn as_tui(store: &mut BudgetStore, settings: &Settings) -> Result<()> {
    let rates: Arc<dyn RateProvider> = Arc::new(FrankfurterClient::new(
        &settings.rate_api_url,
        settings.rate_timeout(),
    )?);
    let events = store.subscribe();
    let mut app = App::new(settings.base()?, settings.display_currencies(), rates, events);

    if let Some(issue) = store.load_issues().first() {
        app.set_status(format!("Warning: saved budget partly unreadable ({issue})"));
    }
    // Surfaces a low balance carried over from the last session.
    store.refresh();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut BudgetStore,
) -> Result<()> {
    while app.running {
        app.poll_rates(store);
        app.drain_events();

        terminal.draw(|f| {
            // tab + status + command bars, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, store);
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            if app.alert_message.take().is_some() {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, store),
                InputMode::Command => handle_command_input(key, app, store),
                InputMode::Confirm => handle_confirm_input(key, app, store),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, store: &mut BudgetStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let len = store.expenses().len();
    match key.code {
        KeyCode::Char('q' | 'c') if ctrl => app.running = false,
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('1') => app.screen = Screen::Dashboard,
        KeyCode::Char('2') => switch_to_expenses(app, len),
        KeyCode::Tab | KeyCode::BackTab => match app.screen {
            Screen::Dashboard => switch_to_expenses(app, len),
            Screen::Expenses => app.screen = Screen::Dashboard,
        },
        KeyCode::Char('c') => {
            if let Some(next) = app.next_currency() {
                app.request_currency(next, store);
            }
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ if app.screen == Screen::Expenses => handle_list_input(key, app, store),
        _ => {}
    }
}

fn handle_list_input(key: KeyEvent, app: &mut App, store: &mut BudgetStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let len = store.expenses().len();
    let page = app.visible_rows;
    let half = page / 2;
    match key.code {
        KeyCode::Char('d') if ctrl => (0..half).for_each(|_| app.cursor.down(len, page)),
        KeyCode::Char('u') if ctrl => (0..half).for_each(|_| app.cursor.up()),
        KeyCode::Char('j') | KeyCode::Down => app.cursor.down(len, page),
        KeyCode::Char('k') | KeyCode::Up => app.cursor.up(),
        KeyCode::Char('g') | KeyCode::Home => app.cursor.top(),
        KeyCode::Char('G') | KeyCode::End => app.cursor.bottom(len, page),
        KeyCode::Char('D') | KeyCode::Delete => run_command("delete", app, store),
        _ => {}
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App, store: &mut BudgetStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            run_command(&input, app, store);
        }
        KeyCode::Esc => app.leave_command_mode(),
        KeyCode::Char('u') if ctrl => app.leave_command_mode(),
        KeyCode::Char('w') if ctrl => app.delete_word(),
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.leave_command_mode();
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, store: &mut BudgetStore) {
    let action = app.pending_action.take();
    app.confirm_message.clear();
    app.input_mode = InputMode::Normal;

    match (key.code, action) {
        (KeyCode::Char('y' | 'Y'), Some(PendingAction::DeleteExpense { id, .. })) => {
            commands::remove(id, app, store);
        }
        _ => app.set_status("Cancelled"),
    }
}

/// Command failures (e.g. an unwritable report path) land in the status bar
/// instead of tearing down the terminal.
fn run_command(input: &str, app: &mut App, store: &mut BudgetStore) {
    if let Err(e) = commands::handle_command(input, app, store) {
        tracing::warn!(command = input, error = %e, "command failed");
        app.set_status(format!("Error: {e:#}"));
    }
}

fn switch_to_expenses(app: &mut App, len: usize) {
    app.screen = Screen::Expenses;
    app.cursor.clamp(len);
}
