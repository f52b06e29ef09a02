use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
    ))
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    // Center the help dialog
    let dialog_width = 62.min(area.width.saturating_sub(4));
    let dialog_height = 40.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;
    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let help_text = vec![
        heading("Screens"),
        Line::from("  1-5 / Tab  Home, Report, Issues, My issues, Admin"),
        Line::from("  a          Login or sign up"),
        Line::from("  o          Log out"),
        Line::from("  l          Switch language (English/हिंदी/ಕನ್ನಡ)"),
        Line::from("  Esc        Cancel running task / clear message"),
        Line::from(""),
        heading("Report an issue"),
        Line::from("  Space      Capture photo"),
        Line::from("  t          Retake photo"),
        Line::from("  x          Retry camera after an error"),
        Line::from("  [ / ]      Previous / next category"),
        Line::from("  e          Edit description"),
        Line::from("  s / Enter  Submit report"),
        Line::from(""),
        heading("Issues"),
        Line::from("  j / k      Move down / up"),
        Line::from("  c          Cycle category filter"),
        Line::from("  f          Cycle status filter"),
        Line::from("  s          Most recent / most supported"),
        Line::from("  u          Support issue"),
        Line::from("  R          Re-report issue"),
        Line::from("  r          Refresh"),
        Line::from(""),
        heading("My issues"),
        Line::from("  f / Enter  Rate a resolved issue"),
        Line::from(""),
        heading("Admin"),
        Line::from("  s          Advance status"),
        Line::from("  d          Delete issue"),
        Line::from("  x / X      Export CSV / JSON"),
        Line::from(""),
        Line::from("  ?          Show this help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from(Span::styled("Press ? or Esc to close", Style::default().fg(Color::DarkGray))),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, dialog_area);
}
