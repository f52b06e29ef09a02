mod admin;
pub mod auth_form;
pub mod confirm_dialog;
mod dialogs;
mod feed;
pub mod feedback_dialog;
mod home;
pub mod preview;
mod report;
mod status_bar;
pub mod text_input;

use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::{App, AppMode, Screen};
use crate::tasks::TaskType;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Header, content, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, main_chunks[0]);

    match app.screen {
        Screen::Home => home::render(frame, app, main_chunks[1]),
        Screen::Report => report::render(frame, app, main_chunks[1]),
        Screen::Issues => feed::render_feed(frame, app, main_chunks[1]),
        Screen::MyIssues => feed::render_my_issues(frame, app, main_chunks[1]),
        Screen::Admin => admin::render(frame, app, main_chunks[1]),
        Screen::Auth => {
            let busy = app.task_manager.is_running(TaskType::Auth);
            auth_form::render(frame, &app.auth_form, &app.translator, busy, main_chunks[1]);
        }
    }

    status_bar::render(frame, app, main_chunks[2]);

    match app.mode {
        AppMode::Help => dialogs::render_help(frame, area),
        AppMode::Feedback => {
            if let Some(ref dialog) = app.feedback_dialog {
                let busy = app.task_manager.is_running(TaskType::SubmitFeedback);
                feedback_dialog::render(frame, dialog, &app.translator, busy);
            }
        }
        AppMode::Confirm => {
            if let Some(ref dialog) = app.confirm_dialog {
                confirm_dialog::render(frame, dialog, &app.translator);
            }
        }
        AppMode::Normal | AppMode::EditingDescription => {}
    }
}

/// App name, screen tabs and the signed-in user
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.t("appName")),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    for (i, screen) in Screen::TABS.iter().enumerate() {
        let hidden = match screen {
            Screen::MyIssues => app.user.is_none(),
            Screen::Admin => !app.is_admin(),
            _ => false,
        };
        if hidden {
            continue;
        }
        let label = format!(" {}:{} ", i + 1, app.t(screen.title_key()));
        let style = if *screen == app.screen {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }

    let account = match app.user {
        Some(ref user) => {
            let role = if user.is_admin { "admin" } else { app.t("citizen") };
            format!(" {} ({}) ", user.username, role)
        }
        None => format!(" a:{} ", app.t("login")),
    };
    let language = format!(" {} ", app.translator.language().native_name());

    let right = [
        Span::styled(account, Style::default().fg(Color::Yellow)),
        Span::styled(language, Style::default().fg(Color::White).bg(Color::DarkGray)),
    ];

    let used: usize = spans.iter().chain(right.iter()).map(|s| s.width()).sum();
    let available = area.width as usize;
    if available > used {
        spans.push(Span::raw(" ".repeat(available - used)));
    }
    spans.extend(right);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centered rect of at most `width` x `height` inside `area`
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
