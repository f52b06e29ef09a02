//! Public issue feed and the signed-in user's own reports.

use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;
use crate::feed::{time_ago, StatusCounts};
use crate::i18n::Translator;
use crate::models::{Issue, IssueStatus};

pub(crate) fn status_color(status: IssueStatus) -> Color {
    match status {
        IssueStatus::Pending => Color::Yellow,
        IssueStatus::InProgress => Color::Blue,
        IssueStatus::Resolved => Color::Green,
    }
}

/// Three-line card for one issue
fn issue_lines(issue: &Issue, t: &Translator, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let header = Line::from(vec![
        Span::raw(format!("{} ", issue.category.icon())),
        Span::styled(
            t.t(issue.category.key()).to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", t.t(issue.status.key())),
            Style::default().fg(status_color(issue.status)),
        ),
        Span::styled(
            format!("  {}", time_ago(issue.created_at, now)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let description = Line::from(format!("  {}", issue.description));

    let mut details = vec![
        Span::styled(
            format!(
                "  📍 {}",
                issue
                    .location_label()
                    .unwrap_or_else(|| t.t("locationUnavailable").to_string())
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("   👍 {} {}", issue.likes, t.t("likes"))),
        Span::raw(format!("   🔁 {} {}", issue.reports, t.t("reports"))),
    ];
    if let Some(ref department) = issue.assigned_to {
        details.push(Span::styled(
            format!("   {}: {}", t.t("assignedTo"), department),
            Style::default().fg(Color::DarkGray),
        ));
    }

    vec![header, description, Line::from(details)]
}

fn render_list(
    frame: &mut Frame,
    items: Vec<ListItem>,
    title: String,
    selected: usize,
    area: Rect,
) {
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▌");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_empty(frame: &mut Frame, text: &str, title: String, area: Rect) {
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

pub fn render_feed(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    // Filter bar
    let counts = StatusCounts::of(&app.issues);
    let query = app.feed_query;
    let category = match query.category {
        Some(c) => format!("{} {}", c.icon(), app.t(c.key())),
        None => app.t("all").to_string(),
    };
    let status = match query.status {
        Some(s) => app.t(s.key()).to_string(),
        None => app.t("all").to_string(),
    };
    let dim = Style::default().fg(Color::DarkGray);
    let filters = vec![
        Line::from(vec![
            Span::styled(format!(" c:{}: ", app.t("filterByCategory")), dim),
            Span::styled(category, Style::default().fg(Color::Cyan)),
            Span::styled(format!("   f:{}: ", app.t("filterByStatus")), dim),
            Span::styled(
                format!("{} ({})", status, counts.get(query.status)),
                Style::default().fg(query.status.map_or(Color::White, status_color)),
            ),
            Span::styled(format!("   s:{}: ", app.t("sortBy")), dim),
            Span::raw(app.t(query.sort.label_key())),
        ]),
        Line::from(Span::styled(
            format!(
                " {} {} · {} {} · {} {}",
                counts.pending,
                app.t("pending"),
                counts.in_progress,
                app.t("inProgress"),
                counts.resolved,
                app.t("resolved"),
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(filters), chunks[0]);

    let visible = app.visible_issues();
    let title = format!(" {} ({}) ", app.t("viewIssues"), visible.len());

    if visible.is_empty() {
        let text = if !app.issues_loaded {
            app.t("loading")
        } else if app.issues.is_empty() {
            app.t("noIssuesYet")
        } else {
            app.t("noMatchingIssues")
        };
        render_empty(frame, text, title, chunks[1]);
        return;
    }

    let now = Utc::now();
    let items = visible
        .into_iter()
        .map(|issue| ListItem::new(issue_lines(issue, &app.translator, now)))
        .collect();
    render_list(frame, items, title, app.feed_selected, chunks[1]);
}

pub fn render_my_issues(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ({}) ", app.t("myReportedIssues"), app.my_issues.len());

    if app.my_issues.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                app.t("noIssuesYet"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(app.t("noIssuesDesc")),
            Line::from(""),
            Line::from(Span::styled(
                format!("n: {}", app.t("reportFirstIssue")),
                Style::default().fg(Color::Green),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let now = Utc::now();
    let items = app
        .my_issues
        .iter()
        .map(|issue| {
            let mut lines = issue_lines(issue, &app.translator, now);
            if issue.status == IssueStatus::Resolved {
                lines.push(Line::from(Span::styled(
                    format!("  f: {}", app.t("giveFeedback")),
                    Style::default().fg(Color::Green),
                )));
            }
            ListItem::new(lines)
        })
        .collect();
    render_list(frame, items, title, app.my_selected, area);
}
