//! Star-rating dialog for a resolved issue.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::text_input::{self, TextInput};
use crate::i18n::Translator;
use crate::models::{Issue, RatingAspect, Ratings, MAX_STARS};

/// Rows of the dialog: the four aspects, then the comment box
const ROWS: usize = RatingAspect::ALL.len() + 1;

pub struct FeedbackDialog {
    pub issue: Issue,
    pub ratings: Ratings,
    pub comments: TextInput,
    pub row: usize,
}

impl FeedbackDialog {
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            ratings: Ratings::default(),
            comments: TextInput::default(),
            row: 0,
        }
    }

    /// Aspect under the cursor, `None` on the comment row
    pub fn current_aspect(&self) -> Option<RatingAspect> {
        RatingAspect::ALL.get(self.row).copied()
    }

    pub fn on_comments(&self) -> bool {
        self.row == ROWS - 1
    }

    pub fn next_row(&mut self) {
        self.row = (self.row + 1) % ROWS;
    }

    pub fn prev_row(&mut self) {
        self.row = (self.row + ROWS - 1) % ROWS;
    }

    /// Set the current aspect and move on to the next row.
    pub fn rate(&mut self, stars: u8) {
        if let Some(aspect) = self.current_aspect() {
            self.ratings.set(aspect, stars);
            if (1..=MAX_STARS).contains(&stars) {
                self.next_row();
            }
        }
    }

    pub fn adjust(&mut self, delta: i8) {
        if let Some(aspect) = self.current_aspect() {
            let current = self.ratings.get(aspect) as i8;
            let stars = (current + delta).clamp(1, MAX_STARS as i8) as u8;
            self.ratings.set(aspect, stars);
        }
    }
}

fn stars(count: u8) -> String {
    (1..=MAX_STARS)
        .map(|i| if i <= count { '★' } else { '☆' })
        .collect()
}

pub fn render(frame: &mut Frame, dialog: &FeedbackDialog, t: &Translator, busy: bool) {
    let area = frame.area();
    let dialog_area = super::centered_rect(
        area,
        64.min(area.width.saturating_sub(4)),
        22.min(area.height.saturating_sub(2)),
    );

    frame.render_widget(Clear, dialog_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", t.t("feedbackTitle")))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // description
            Constraint::Length(12), // aspects, 3 lines each
            Constraint::Length(3),  // comments
            Constraint::Min(1),     // hints
        ])
        .split(inner);

    let header = Paragraph::new(vec![
        Line::from(t.t("feedbackDescription")),
        Line::from(Span::styled(
            format!("{} {}", dialog.issue.category.icon(), dialog.issue.description),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(header, chunks[0]);

    let mut lines = Vec::new();
    for (i, aspect) in RatingAspect::ALL.iter().enumerate() {
        let selected = i == dialog.row;
        let marker = if selected { "> " } else { "  " };
        let label_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(t.t(aspect.label_key()), label_style),
            Span::raw("  "),
            Span::styled(stars(dialog.ratings.get(*aspect)), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", aspect.prompt()),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);

    text_input::render(
        frame,
        &dialog.comments,
        t.t("additionalComments"),
        !busy && dialog.on_comments(),
        false,
        chunks[2],
    );

    let hint = if busy {
        Span::styled(t.t("submitting"), Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "1-5:rate  j/k:row  h/l:adjust  Enter:submit  Esc:cancel",
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(hint)).alignment(Alignment::Center), chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::issue;
    use crate::models::{IssueCategory, IssueStatus};

    #[test]
    fn test_rating_advances_rows() {
        let mut dialog = FeedbackDialog::new(issue(
            "a",
            IssueCategory::Water,
            IssueStatus::Resolved,
            0,
            1,
        ));
        for stars in [5, 4, 3, 2] {
            dialog.rate(stars);
        }
        assert!(dialog.ratings.is_complete());
        assert!(dialog.on_comments());
        assert_eq!(dialog.ratings.get(RatingAspect::SpeedOfWork), 4);

        // no aspect on the comment row
        dialog.rate(1);
        assert!(dialog.on_comments());
    }

    #[test]
    fn test_adjust_clamps() {
        let mut dialog = FeedbackDialog::new(issue(
            "a",
            IssueCategory::Water,
            IssueStatus::Resolved,
            0,
            1,
        ));
        dialog.adjust(-1);
        assert_eq!(dialog.ratings.get(RatingAspect::ResolutionSatisfaction), 1);
        dialog.adjust(9);
        assert_eq!(dialog.ratings.get(RatingAspect::ResolutionSatisfaction), 5);
        assert_eq!(stars(2), "★★☆☆☆");
    }
}
