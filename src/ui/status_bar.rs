use ratatui::{
    prelude::*,
    widgets::Paragraph,
};

use crate::app::{App, AppMode, Screen};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // If there's a status message, show it prominently
    if let Some(ref message) = app.status_message {
        let line = Line::from(vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow).bg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Running task indicators, with the step label when one is reported
    let running_tasks = app.task_manager.running_tasks();
    let task_indicators: Vec<String> = running_tasks
        .iter()
        .map(|task| match task.progress.label {
            Some(ref label) => format!(
                "[{}:{}% {}]",
                task.task_type.short_name(),
                task.progress.percent(),
                label
            ),
            None => format!("[{}:...]", task.task_type.short_name()),
        })
        .collect();

    let mut spans = vec![Span::styled(
        format!(" {} ", app.t(app.screen.title_key())),
        Style::default().fg(Color::White).bg(Color::DarkGray),
    )];

    if !task_indicators.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", task_indicators.join(" ")),
            Style::default().fg(Color::Cyan),
        ));
    }

    let help_text = format!(" {} ", key_hints(app));
    let content_len: usize = spans.iter().map(|s| s.width()).sum();
    let help_len = Span::raw(help_text.as_str()).width();
    let available = area.width as usize;
    if available > content_len + help_len {
        spans.push(Span::raw(" ".repeat(available - content_len - help_len)));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hints(app: &App) -> &'static str {
    if app.mode == AppMode::EditingDescription {
        return "Enter/Esc:done";
    }
    match app.screen {
        Screen::Home => "r:report v:issues l:lang ?:help q:quit",
        Screen::Report => "Space:capture t:retake [/]:category e:describe s:submit ?:help",
        Screen::Issues => "j/k:move c:category f:status s:sort u:support R:re-report ?:help",
        Screen::MyIssues => "j/k:move f:feedback n:new r:refresh ?:help",
        Screen::Admin => "j/k:move s:status d:delete x:csv X:json ?:help",
        Screen::Auth => "Tab:field Ctrl+t:mode Enter:submit Esc:back",
    }
}
