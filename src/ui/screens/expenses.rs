use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::budget::BudgetStore;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, store: &BudgetStore) {
    let expenses = store.expenses();
    if expenses.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses recorded yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add <name> <amount>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Expenses (0)")),
            area,
        );
        return;
    }

    let header_cells = ["#", "Item", "Amount", "Id"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let display = app.display();
    let rows: Vec<Row> = expenses
        .iter()
        .enumerate()
        .skip(app.cursor.scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let style = if i == app.cursor.index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(truncate(&expense.name, 40)),
                Cell::from(Span::styled(
                    display.format(expense.amount),
                    Style::default().fg(theme::RED),
                )),
                Cell::from(Span::styled(expense.id.to_string(), theme::dim_style())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(15),
    ];

    let title = format!(
        "Expenses ({}) | total {}",
        expenses.len(),
        display.format(store.total_expenses())
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(&title));

    f.render_widget(table, area);
}
