//! Client-side filtering, sorting and summaries of the issue feed.

use chrono::{DateTime, Utc};

use crate::models::{Issue, IssueCategory, IssueStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    MostRecent,
    MostLiked,
}

impl SortOrder {
    pub fn label_key(&self) -> &'static str {
        match self {
            SortOrder::MostRecent => "mostRecent",
            SortOrder::MostLiked => "mostLiked",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::MostRecent => SortOrder::MostLiked,
            SortOrder::MostLiked => SortOrder::MostRecent,
        }
    }
}

/// Current filter selection; `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub category: Option<IssueCategory>,
    pub status: Option<IssueStatus>,
    pub sort: SortOrder,
}

impl FeedQuery {
    pub fn matches(&self, issue: &Issue) -> bool {
        self.category.map_or(true, |c| issue.category == c)
            && self.status.map_or(true, |s| issue.status == s)
    }

    /// Matching issues in display order
    pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
        let mut result: Vec<&Issue> = issues.iter().filter(|i| self.matches(i)).collect();
        match self.sort {
            SortOrder::MostRecent => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::MostLiked => result.sort_by(|a, b| b.likes.cmp(&a.likes)),
        }
        result
    }

    /// all -> roads -> ... -> other -> all
    pub fn cycle_category(&mut self) {
        self.category = cycle(&IssueCategory::ALL, self.category);
    }

    pub fn cycle_status(&mut self) {
        self.status = cycle(&IssueStatus::ALL, self.status);
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let index = all.iter().position(|v| *v == value)?;
            all.get(index + 1).copied()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn of(issues: &[Issue]) -> Self {
        issues.iter().fold(
            StatusCounts {
                all: issues.len(),
                ..Default::default()
            },
            |mut counts, issue| {
                match issue.status {
                    IssueStatus::Pending => counts.pending += 1,
                    IssueStatus::InProgress => counts.in_progress += 1,
                    IssueStatus::Resolved => counts.resolved += 1,
                }
                counts
            },
        )
    }

    pub fn get(&self, status: Option<IssueStatus>) -> usize {
        match status {
            None => self.all,
            Some(IssueStatus::Pending) => self.pending,
            Some(IssueStatus::InProgress) => self.in_progress,
            Some(IssueStatus::Resolved) => self.resolved,
        }
    }
}

/// Compact age: "3d", "5h", "12m" or "now"
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    for (label, unit) in [("d", 86_400), ("h", 3_600), ("m", 60)] {
        let count = seconds / unit;
        if count >= 1 {
            return format!("{}{}", count, label);
        }
    }
    "now".to_string()
}

/// The `count` newest issues
pub fn recent(issues: &[Issue], count: usize) -> Vec<&Issue> {
    let mut sorted: Vec<&Issue> = issues.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(count);
    sorted
}
