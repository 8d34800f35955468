use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use super::util::centered;
use crate::budget::BudgetStore;

/// Normal-mode keys shown in the help overlay.
const KEYS: &[(&str, &str)] = &[
    ("j/k, Up/Down", "Move the expense cursor"),
    ("g/G", "Jump to first/last expense"),
    ("1-2, Tab", "Switch screen"),
    ("c", "Cycle display currency"),
    ("D, Delete", "Delete selected expense"),
    (":", "Enter a command"),
    ("Esc", "Clear the status line"),
    ("Ctrl-q", "Quit"),
];

pub(crate) fn render(f: &mut Frame, app: &App, store: &BudgetStore) {
    let [tabs, body, status, command] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_tabs(f, tabs, app);
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, body, app, store),
        Screen::Expenses => super::screens::expenses::render(f, body, app, store),
    }
    render_status(f, status, app, store);
    render_command_line(f, command, app);

    if app.show_help {
        render_help(f);
    } else if let Some(msg) = &app.alert_message {
        render_alert(f, msg);
    }
}

fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, screen)| format!("{}:{screen}", i + 1));
    let selected = Screen::all()
        .iter()
        .position(|s| *s == app.screen)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::TEXT_DIM).bg(theme::HEADER_BG))
        .highlight_style(
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("|", Style::default().fg(theme::OVERLAY)));
    f.render_widget(tabs, area);
}

fn mode_badge(mode: InputMode) -> Span<'static> {
    let bg = match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    Span::styled(
        format!(" {mode} "),
        Style::default()
            .fg(theme::HEADER_BG)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_status(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let shown = &app.display().currency;
    let currency = app
        .selection
        .pending_target()
        .map_or_else(|| shown.to_string(), |target| format!("{shown} → {target}…"));
    let left = format!(" {} | {currency} | {} expenses", app.screen, store.expenses().len());
    let hint = match app.screen {
        Screen::Dashboard => " c currency | :add | ? help ",
        Screen::Expenses => " j/k move | D delete | ? help ",
    };

    let badge = mode_badge(app.input_mode);
    let taken = badge.width() + left.chars().count() + hint.chars().count();
    let gap = " ".repeat((area.width as usize).saturating_sub(taken));

    let line = Line::from(vec![badge, Span::raw(left), Span::raw(gap), Span::raw(hint)])
        .style(theme::status_bar_style());
    f.render_widget(Paragraph::new(line), area);
}

fn render_command_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.input_mode {
        InputMode::Command => Line::from(vec![
            Span::styled(":", Style::default().fg(theme::ACCENT)),
            Span::raw(app.command_input.as_str()),
        ]),
        InputMode::Confirm => Line::from(vec![
            Span::styled(app.confirm_message.as_str(), Style::default().fg(theme::YELLOW)),
            Span::styled(" [y/N]", Style::default().fg(theme::RED)),
        ]),
        InputMode::Normal if app.status_message.is_empty() => {
            Line::styled(" Press : for commands, ? for help", theme::dim_style())
        }
        InputMode::Normal => Line::raw(app.status_message.as_str()),
    };
    f.render_widget(Paragraph::new(line).style(theme::command_bar_style()), area);

    if app.input_mode == InputMode::Command {
        let col = 1 + app.command_input.chars().count() as u16;
        f.set_cursor_position((area.x + col, area.y));
    }
}

/// Clear a centered box and draw `lines` inside a bordered block.
fn popup(f: &mut Frame, width: u16, lines: Vec<Line>, border: Color) {
    let height = lines.len() as u16 + 2;
    let area = centered(f.area(), width, height);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn render_alert(f: &mut Frame, msg: &str) {
    let lines = vec![
        Line::styled(
            " Low balance ",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(format!(" {msg}"), theme::normal_style()),
        Line::raw(""),
        Line::styled(" Press any key to dismiss ", theme::dim_style()),
    ];
    popup(f, 72, lines, theme::RED);
}

fn render_help(f: &mut Frame) {
    let mut lines = vec![
        Line::styled(
            " CashFlow Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(" Keys", theme::section_style()),
    ];
    lines.extend(
        KEYS.iter()
            .map(|(key, what)| Line::styled(format!("  {key:<16} {what}"), theme::normal_style())),
    );

    // One line per command; single-letter aliases are left out.
    let mut by_description: BTreeMap<&str, &str> = BTreeMap::new();
    for (&name, cmd) in commands::COMMANDS.iter().filter(|(name, _)| name.len() > 1) {
        by_description
            .entry(cmd.description)
            .and_modify(|kept| *kept = (*kept).min(name))
            .or_insert(name);
    }
    let mut names: Vec<(&str, &str)> = by_description
        .into_iter()
        .map(|(desc, name)| (name, desc))
        .collect();
    names.sort_unstable();

    lines.push(Line::raw(""));
    lines.push(Line::styled(" Commands", theme::section_style()));
    lines.extend(
        names
            .iter()
            .map(|(name, desc)| Line::styled(format!("  :{name:<15} {desc}"), theme::normal_style())),
    );
    lines.push(Line::raw(""));
    lines.push(Line::styled(" Press any key to close ", theme::dim_style()));

    popup(f, 64, lines, theme::ACCENT);
}
