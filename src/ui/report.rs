//! New report screen: camera panel on the left, form on the right.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use super::preview;
use super::text_input;
use crate::app::{App, AppMode};
use crate::capture::{GeoStatus, WorkflowState};
use crate::models::IssueCategory;
use crate::tasks::TaskType;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_camera(frame, app, columns[0]);
    render_form(frame, app, columns[1]);
}

fn render_camera(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = app.t("photoCaptured");
    if let Some(image) = app.workflow.captured() {
        preview::render(frame, &mut app.preview, image, title, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", app.t("capturePhoto")));

    let mut lines = vec![Line::from(vec![
        Span::styled("Camera: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.workflow.camera_name()),
    ])];

    if let Some(error) = app.workflow.camera_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(app.t("cameraError"), Style::default().fg(Color::Red))));
        lines.push(Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("x: {}", app.t("retryCamera")),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        let (text, color) = match app.workflow.state() {
            WorkflowState::Idle => (app.t("allowCamera"), Color::DarkGray),
            WorkflowState::Starting => (app.t("startingCamera"), Color::Yellow),
            WorkflowState::Ready | WorkflowState::Captured => (app.t("cameraReady"), Color::Green),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        if let Some((w, h)) = app.workflow.frame_dimensions() {
            lines.push(Line::from(Span::styled(
                format!("{}x{}", w, h),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if app.workflow.state() == WorkflowState::Ready {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(" Space ", Style::default().fg(Color::Black).bg(Color::Green)),
                Span::raw(format!(" {}", app.t("capturePhoto"))),
            ]));
        }
    }

    if let Some(rejection) = app.workflow.last_rejection() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            rejection.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let submitting = app
        .task_manager
        .running_tasks()
        .iter()
        .find(|task| task.task_type == TaskType::SubmitReport);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // location
            Constraint::Min(9),    // categories
            Constraint::Length(2), // department
            Constraint::Length(3), // description
            Constraint::Length(3), // submit
        ])
        .split(area);

    // Location
    let geofix = app.workflow.geofix();
    let location = match geofix.status {
        GeoStatus::Pending => {
            Span::styled(app.t("detectingLocation"), Style::default().fg(Color::Yellow))
        }
        GeoStatus::Resolved => match geofix.position {
            Some(p) => Span::styled(
                match p.accuracy_m {
                    Some(acc) => format!("{:.5}, {:.5} (±{:.0} m)", p.latitude, p.longitude, acc),
                    None => format!("{:.5}, {:.5}", p.latitude, p.longitude),
                },
                Style::default().fg(Color::Green),
            ),
            None => Span::raw(app.t("locationUnavailable")),
        },
        GeoStatus::Failed(ref reason) => Span::styled(
            format!("{} ({})", app.t("locationUnavailable"), reason),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let location = Paragraph::new(Line::from(location)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", app.t("location"))),
    );
    frame.render_widget(location, chunks[0]);

    // Categories
    let items: Vec<ListItem> = IssueCategory::ALL
        .iter()
        .map(|c| ListItem::new(format!("{} {}", c.icon(), app.t(c.key()))))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ([/]) ", app.t("selectCategory"))),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::Cyan))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(
        app.draft
            .category
            .and_then(|c| IssueCategory::ALL.iter().position(|x| *x == c)),
    );
    frame.render_stateful_widget(list, chunks[1], &mut state);

    // Department routing
    if let Some(category) = app.draft.category {
        let department = category.department();
        let dim = Style::default().fg(Color::DarkGray);
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", app.t("assignedTo")), dim),
            Span::raw(department.name),
            Span::styled(format!(" <{}>", department.contact), dim),
        ]);
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), chunks[2]);
    }

    // Description
    text_input::render(
        frame,
        &app.description_input,
        &format!("{} (e)", app.t("describeIssue")),
        app.mode == AppMode::EditingDescription,
        false,
        chunks[3],
    );

    // Submit
    let submit_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    match submitting {
        Some(task) => {
            let percent = task.progress.percent();
            let label = task.progress.label.clone().unwrap_or_default();
            let gauge = Gauge::default()
                .block(submit_block.title(format!(" {} ", app.t("submitting"))))
                .gauge_style(Style::default().fg(Color::Cyan))
                .percent(percent as u16)
                .label(label);
            frame.render_widget(gauge, chunks[4]);
        }
        None => {
            let ready = app.draft.is_complete(app.workflow.captured());
            let style = if ready {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let button = Paragraph::new(Line::from(Span::styled(
                format!(" s: {} ", app.t("submitReport")),
                style,
            )))
            .alignment(Alignment::Center)
            .block(submit_block);
            frame.render_widget(button, chunks[4]);
        }
    }
}
