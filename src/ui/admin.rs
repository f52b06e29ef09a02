//! Admin table of every issue.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::feed::status_color;
use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ({}) ", app.t("adminTitle"), app.issues.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);

    if app.issues.is_empty() {
        let text = if app.issues_loaded {
            app.t("noIssuesInDatabase")
        } else {
            app.t("loading")
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Category"),
        Cell::from("Description"),
        Cell::from(app.t("location")),
        Cell::from(app.t("status")),
        Cell::from("👍"),
        Cell::from("🔁"),
        Cell::from("Created"),
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .issues
        .iter()
        .map(|issue| {
            Row::new(vec![
                Cell::from(format!("{} {}", issue.category.icon(), app.t(issue.category.key()))),
                Cell::from(issue.description.clone()),
                Cell::from(issue.location_label().unwrap_or_default()),
                Cell::from(Span::styled(
                    app.t(issue.status.key()),
                    Style::default().fg(status_color(issue.status)),
                )),
                Cell::from(issue.likes.to_string()),
                Cell::from(issue.reports.to_string()),
                Cell::from(
                    issue
                        .created_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Min(20),
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.admin_selected));
    frame.render_stateful_widget(table, area, &mut state);
}
