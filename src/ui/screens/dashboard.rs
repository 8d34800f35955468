use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Gauge, Paragraph},
    Frame,
};

use crate::budget::BudgetStore;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar_value, ratio};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Length(3), // Salary used gauge
            Constraint::Min(8),    // Spent vs remaining
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app, store);
    render_usage_gauge(f, chunks[1], app, store);
    render_split_chart(f, chunks[2], app, store);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let display = app.display();
    let count = store.expenses().len();

    let salary_note = match app.selection.pending_target() {
        Some(target) => format!("fetching {target} rate…"),
        None if store.salary().is_zero() => "set one with :salary".to_string(),
        None => format!("shown in {}", display.currency),
    };
    render_card(
        f,
        cards[0],
        "Salary",
        display.format(store.salary()),
        theme::ACCENT,
        salary_note,
    );
    render_card(
        f,
        cards[1],
        "Expenses",
        display.format(store.total_expenses()),
        theme::RED,
        format!("{count} item{}", if count == 1 { "" } else { "s" }),
    );

    let low = store.is_low();
    let balance_note = if low {
        format!("LOW: under {}", display.format(store.low_balance_threshold()))
    } else if store.balance().is_sign_negative() {
        "overspent".to_string()
    } else {
        String::new()
    };
    render_card(
        f,
        cards[2],
        "Balance",
        display.format(store.balance()),
        theme::balance_color(low || store.balance().is_sign_negative()),
        balance_note,
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, note: String) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(note, theme::dim_style())),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

fn render_usage_gauge(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let used = ratio(store.total_expenses(), store.salary());
    let label = if store.salary().is_zero() {
        "no salary set".to_string()
    } else {
        format!(
            "{:.1}% of {} spent",
            used * 100.0,
            app.display().format(store.salary())
        )
    };

    let gauge = Gauge::default()
        .block(theme::panel("Salary Used"))
        .gauge_style(
            Style::default()
                .fg(theme::balance_color(store.is_low()))
                .bg(theme::SURFACE),
        )
        .ratio(used)
        .label(Span::styled(label, theme::normal_style()));

    f.render_widget(gauge, area);
}

fn render_split_chart(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let Some(split) = store.spending_split() else {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing to chart yet", theme::dim_style())),
            Line::from(Span::styled(
                "Set a salary with :salary and add expenses with :add",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Spent vs Remaining"));
        f.render_widget(msg, area);
        return;
    };

    let display = app.display();
    let bars = [
        ("Spent", split.spent, theme::RED),
        ("Remaining", split.remaining, theme::GREEN),
    ]
    .map(|(label, amount, color)| {
        Bar::default()
            .value(bar_value(display.project(amount)))
            .text_value(display.format(amount))
            .label(Line::from(label))
            .style(Style::default().fg(color))
            .value_style(
                Style::default()
                    .fg(theme::HEADER_BG)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            )
    });

    let bar_width = (area.width.saturating_sub(6) / 2).clamp(5, 24);
    let chart = BarChart::default()
        .block(theme::panel("Spent vs Remaining"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);

    f.render_widget(chart, area);
}
