//! Table access through the REST gateway.

use serde::de::DeserializeOwned;

use super::{FeedbackStore, IssueStore, SupabaseClient};
use crate::error::BackendError;
use crate::models::{Issue, IssuePatch, IssueRow, NewFeedback, NewIssue};

const ISSUES: &str = "issues";
const FEEDBACK: &str = "issue_feedback";

pub(crate) fn table_path(table: &str) -> String {
    format!("/rest/v1/{}", table)
}

/// `eq.` filter value
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

pub(crate) fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, BackendError> {
    response
        .into_json::<T>()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Validate rows, dropping (and logging) the ones that do not parse.
pub(crate) fn rows_to_issues(rows: Vec<IssueRow>) -> Vec<Issue> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match Issue::try_from(row) {
                Ok(issue) => Some(issue),
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Skipping invalid issue row");
                    None
                }
            }
        })
        .collect()
}

impl SupabaseClient {
    fn select_issues(&self, user_id: Option<&str>) -> Result<Vec<Issue>, BackendError> {
        let mut request = self
            .request("GET", &table_path(ISSUES))
            .query("select", "*")
            .query("order", "created_at.desc");
        if let Some(user_id) = user_id {
            request = request.query("user_id", &eq(user_id));
        }

        let rows: Vec<IssueRow> = read_json(request.call()?)?;
        let issues = rows_to_issues(rows);
        tracing::debug!(count = issues.len(), "Fetched issues");
        Ok(issues)
    }
}

impl IssueStore for SupabaseClient {
    fn list_issues(&self) -> Result<Vec<Issue>, BackendError> {
        self.select_issues(None)
    }

    fn list_issues_by_user(&self, user_id: &str) -> Result<Vec<Issue>, BackendError> {
        self.select_issues(Some(user_id))
    }

    fn insert_issue(&self, issue: &NewIssue) -> Result<Issue, BackendError> {
        let response = self
            .request("POST", &table_path(ISSUES))
            .set("Prefer", "return=representation")
            .send_json(issue)?;

        let rows: Vec<IssueRow> = read_json(response)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no row".to_string()))?;

        let issue = Issue::try_from(row).map_err(|e| BackendError::Decode(e.to_string()))?;
        tracing::info!(id = %issue.id, category = issue.category.key(), "Issue inserted");
        Ok(issue)
    }

    fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), BackendError> {
        self.request("PATCH", &table_path(ISSUES))
            .query("id", &eq(id))
            .send_json(patch)?;
        tracing::info!(id, ?patch, "Issue updated");
        Ok(())
    }

    fn delete_issue(&self, id: &str) -> Result<(), BackendError> {
        self.request("DELETE", &table_path(ISSUES))
            .query("id", &eq(id))
            .call()?;
        tracing::info!(id, "Issue deleted");
        Ok(())
    }
}

impl FeedbackStore for SupabaseClient {
    fn insert_feedback(&self, feedback: &NewFeedback) -> Result<(), BackendError> {
        self.request("POST", &table_path(FEEDBACK))
            .send_json(feedback)?;
        tracing::info!(issue = %feedback.issue_id, "Feedback submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::tests::sample_row;

    #[test]
    fn test_invalid_rows_skipped() {
        let mut bad = sample_row();
        bad.id = "bad".to_string();
        bad.status = "archived".to_string();

        let issues = rows_to_issues(vec![sample_row(), bad]);
        assert_eq!(issues.len(), 1);
        assert_ne!(issues[0].id, "bad");
    }

    #[test]
    fn test_paths_and_filters() {
        assert_eq!(table_path("issues"), "/rest/v1/issues");
        assert_eq!(eq("abc"), "eq.abc");
    }
}
