//! Login / sign-up screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::text_input::{self, TextInput};
use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Confirm,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: TextInput,
    pub password: TextInput,
    pub confirm: TextInput,
    focus: usize,
    /// Inline error under the form
    pub error: Option<String>,
}

impl AuthForm {
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Username, AuthField::Password],
            AuthMode::SignUp => &[AuthField::Username, AuthField::Password, AuthField::Confirm],
        }
    }

    pub fn focused(&self) -> AuthField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Switch between login and sign-up, keeping the username.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        };
        self.password.clear();
        self.confirm.clear();
        self.focus = 0;
        self.error = None;
    }

    pub fn input_mut(&mut self) -> &mut TextInput {
        match self.focused() {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    /// Forget everything typed, e.g. after a successful sign-in.
    pub fn reset(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Default::default()
        };
    }
}

pub fn render(frame: &mut Frame, form: &AuthForm, t: &Translator, busy: bool, area: Rect) {
    let form_area = super::centered_rect(area, 50.min(area.width.saturating_sub(4)), 18);

    let title = match form.mode {
        AuthMode::Login => t.t("login"),
        AuthMode::SignUp => t.t("signup"),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut constraints = vec![
        Constraint::Length(1), // tabs
        Constraint::Length(3), // username
        Constraint::Length(3), // password
    ];
    if form.mode == AuthMode::SignUp {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(2)); // error / hints

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let tab = |label: &str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };
    let tabs = Line::from(vec![
        tab(t.t("login"), form.mode == AuthMode::Login),
        Span::raw("  "),
        tab(t.t("signup"), form.mode == AuthMode::SignUp),
    ]);
    frame.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), chunks[0]);

    let focused = form.focused();
    text_input::render(
        frame,
        &form.username,
        t.t("username"),
        !busy && focused == AuthField::Username,
        false,
        chunks[1],
    );
    text_input::render(
        frame,
        &form.password,
        t.t("password"),
        !busy && focused == AuthField::Password,
        true,
        chunks[2],
    );
    if form.mode == AuthMode::SignUp {
        text_input::render(
            frame,
            &form.confirm,
            t.t("confirmPassword"),
            !busy && focused == AuthField::Confirm,
            true,
            chunks[3],
        );
    }

    let footer = chunks[chunks.len() - 1];
    let mut lines = Vec::new();
    if busy {
        lines.push(Line::from(Span::styled(t.t("loading"), Style::default().fg(Color::Yellow))));
    } else if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Tab:next field  Ctrl+t:login/signup  Enter:submit  Esc:back",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), footer);
}
