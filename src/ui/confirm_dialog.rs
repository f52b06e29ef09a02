//! Confirmation dialog for destructive admin actions.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::i18n::Translator;

/// Action pending confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteIssue { id: String },
}

pub struct ConfirmDialog {
    pub action: ConfirmAction,
    /// Short description of the target, shown under the message
    pub subject: String,
}

impl ConfirmDialog {
    pub fn delete_issue(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            action: ConfirmAction::DeleteIssue { id: id.into() },
            subject: subject.into(),
        }
    }
}

pub fn render(frame: &mut Frame, dialog: &ConfirmDialog, t: &Translator) {
    let area = frame.area();
    let dialog_width = 56.min(area.width.saturating_sub(4));
    let dialog_height = 10.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let (title, body) = match dialog.action {
        ConfirmAction::DeleteIssue { .. } => (t.t("deleteIssueTitle"), t.t("deleteIssueBody")),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Message
            Constraint::Length(1), // Subject
            Constraint::Length(2), // Buttons
        ])
        .margin(1)
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {} ", title));
    frame.render_widget(block, dialog_area);

    let message = Paragraph::new(body)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let subject = Paragraph::new(dialog.subject.as_str())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(subject, chunks[1]);

    let buttons = Line::from(vec![
        Span::styled(
            "  [Enter/y] ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Delete"),
        Span::raw("    "),
        Span::styled("[Esc/n] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(t.t("cancel")),
    ]);
    frame.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), chunks[2]);
}
