//! Landing screen: hero, how it works, counters and the latest reports.

use chrono::Utc;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;
use crate::feed::{self, StatusCounts};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // hero
            Constraint::Length(6), // steps
            Constraint::Length(3), // counters
            Constraint::Min(3),    // recent issues
        ])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_steps(frame, app, chunks[1]);
    render_counters(frame, app, chunks[2]);
    render_recent(frame, app, chunks[3]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            app.t("heroTitle"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(app.t("heroSubtitle")),
        Line::from(Span::styled(app.t("subtitle"), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::Green)),
            Span::raw(format!(" {}   ", app.t("startReporting"))),
            Span::styled(" v ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Span::raw(format!(" {}", app.t("viewIssues"))),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_steps(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.t("howItWorks")));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner);

    let steps = [
        ("1", "step1Title", "step1Desc"),
        ("2", "step2Title", "step2Desc"),
        ("3", "step3Title", "step3Desc"),
    ];
    for ((number, title, desc), column) in steps.into_iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{}. ", number), Style::default().fg(Color::Cyan)),
                Span::styled(app.t(title), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(Span::styled(app.t(desc), Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), *column);
    }
}

fn render_counters(frame: &mut Frame, app: &App, area: Rect) {
    let counts = StatusCounts::of(&app.issues);
    let value = |n: usize| {
        if app.issues_loaded {
            n.to_string()
        } else {
            "...".to_string()
        }
    };
    let line = Line::from(vec![
        Span::styled(
            value(counts.all),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}     ", app.t("issuesReported"))),
        Span::styled(
            value(counts.resolved),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}", app.t("issuesResolved"))),
    ]);
    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}

fn render_recent(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.t("recentIssues")));

    let now = Utc::now();
    let items: Vec<ListItem> = feed::recent(&app.issues, 3)
        .into_iter()
        .map(|issue| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", issue.category.icon())),
                Span::styled(
                    format!("{:<14}", app.t(issue.category.key())),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(issue.description.clone()),
                Span::styled(
                    format!("  {}", feed::time_ago(issue.created_at, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        let text = if app.issues_loaded { app.t("noIssuesYet") } else { app.t("loading") };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    frame.render_widget(List::new(items).block(block), area);
}
