//! Operations on existing issues: support, re-report, feedback and the
//! admin edits.
//!
//! Each returns the patch that was applied so the caller can update its
//! local copy only after the backend accepted the change.

use thiserror::Error;

use crate::backend::{FeedbackStore, IssueStore};
use crate::error::{BackendError, ValidationError};
use crate::models::{Issue, IssuePatch, IssueStatus, NewFeedback, Ratings};
use crate::session::CurrentUser;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Please login to support this issue")]
    LoginRequired,

    #[error("Admin access required")]
    AdminOnly,

    #[error("Feedback can only be given on resolved issues")]
    NotResolved,

    #[error("You have already submitted feedback for this issue")]
    AlreadySubmitted,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for ActionError {
    fn from(err: BackendError) -> Self {
        if err.is_conflict() {
            ActionError::AlreadySubmitted
        } else {
            ActionError::Backend(err)
        }
    }
}

impl ActionError {
    /// Translation key for the notification, when one exists
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            ActionError::LoginRequired => Some("loginToSupport"),
            ActionError::AdminOnly => Some("adminOnly"),
            ActionError::AlreadySubmitted => Some("feedbackAlreadySubmitted"),
            _ => None,
        }
    }
}

fn signed_in(user: Option<&CurrentUser>) -> Result<&CurrentUser, ActionError> {
    user.ok_or(ActionError::LoginRequired)
}

fn admin(user: Option<&CurrentUser>) -> Result<&CurrentUser, ActionError> {
    let user = user.ok_or(ActionError::AdminOnly)?;
    if user.is_admin {
        Ok(user)
    } else {
        Err(ActionError::AdminOnly)
    }
}

/// Add one to the issue's like counter.
pub fn support(
    store: &dyn IssueStore,
    user: Option<&CurrentUser>,
    issue: &Issue,
) -> Result<IssuePatch, ActionError> {
    signed_in(user)?;
    let patch = IssuePatch::likes(issue.likes.saturating_add(1));
    store.update_issue(&issue.id, &patch)?;
    Ok(patch)
}

/// Add one to the issue's report counter.
pub fn re_report(
    store: &dyn IssueStore,
    user: Option<&CurrentUser>,
    issue: &Issue,
) -> Result<IssuePatch, ActionError> {
    signed_in(user)?;
    let patch = IssuePatch::reports(issue.reports.saturating_add(1));
    store.update_issue(&issue.id, &patch)?;
    Ok(patch)
}

pub fn submit_feedback(
    store: &dyn FeedbackStore,
    user: Option<&CurrentUser>,
    issue: &Issue,
    ratings: &Ratings,
    comments: &str,
) -> Result<(), ActionError> {
    let user = signed_in(user)?;
    if issue.status != IssueStatus::Resolved {
        return Err(ActionError::NotResolved);
    }
    let feedback = NewFeedback::new(&issue.id, &user.id, ratings, comments)?;
    store.insert_feedback(&feedback)?;
    Ok(())
}

pub fn set_status(
    store: &dyn IssueStore,
    user: Option<&CurrentUser>,
    issue_id: &str,
    status: IssueStatus,
) -> Result<IssuePatch, ActionError> {
    admin(user)?;
    let patch = IssuePatch::status(status);
    store.update_issue(issue_id, &patch)?;
    Ok(patch)
}

pub fn delete(
    store: &dyn IssueStore,
    user: Option<&CurrentUser>,
    issue_id: &str,
) -> Result<(), ActionError> {
    admin(user)?;
    store.delete_issue(issue_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::MemoryBackend;
    use crate::feed::tests::issue;
    use crate::models::{IssueCategory, RatingAspect};

    fn citizen() -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            username: "ravi".to_string(),
            is_admin: false,
        }
    }

    fn officer() -> CurrentUser {
        CurrentUser {
            is_admin: true,
            ..citizen()
        }
    }

    fn backend_with(issue: Issue) -> MemoryBackend {
        let backend = MemoryBackend::default();
        backend.issues.lock().unwrap().push(issue);
        backend
    }

    fn full_ratings() -> Ratings {
        let mut ratings = Ratings::default();
        for aspect in RatingAspect::ALL {
            ratings.set(aspect, 4);
        }
        ratings
    }

    #[test]
    fn test_support_requires_login() {
        let target = issue("a", IssueCategory::Roads, IssueStatus::Pending, 3, 1);
        let backend = backend_with(target.clone());

        let err = support(&backend, None, &target).unwrap_err();
        assert_eq!(err, ActionError::LoginRequired);
        assert_eq!(err.message_key(), Some("loginToSupport"));
        assert_eq!(backend.issues.lock().unwrap()[0].likes, 3);
    }

    #[test]
    fn test_support_and_re_report_increment() {
        let mut target = issue("a", IssueCategory::Roads, IssueStatus::Pending, 3, 1);
        let backend = backend_with(target.clone());
        let user = citizen();

        let patch = support(&backend, Some(&user), &target).unwrap();
        patch.apply(&mut target);
        assert_eq!(target.likes, 4);

        let patch = re_report(&backend, Some(&user), &target).unwrap();
        patch.apply(&mut target);
        assert_eq!(target.reports, 1);

        let stored = backend.issues.lock().unwrap()[0].clone();
        assert_eq!((stored.likes, stored.reports), (4, 1));
    }

    #[test]
    fn test_failed_update_leaves_local_copy() {
        let target = issue("a", IssueCategory::Roads, IssueStatus::Pending, 3, 1);
        let backend = MemoryBackend {
            fail_updates: true,
            ..backend_with(target.clone())
        };

        let err = support(&backend, Some(&citizen()), &target).unwrap_err();
        assert!(matches!(err, ActionError::Backend(BackendError::Network(_))));
    }

    #[test]
    fn test_duplicate_feedback_is_distinct_error() {
        let target = issue("a", IssueCategory::Water, IssueStatus::Resolved, 0, 1);
        let backend = backend_with(target.clone());
        let user = citizen();

        submit_feedback(&backend, Some(&user), &target, &full_ratings(), "thanks").unwrap();
        let err =
            submit_feedback(&backend, Some(&user), &target, &full_ratings(), "").unwrap_err();
        assert_eq!(err, ActionError::AlreadySubmitted);
        assert_eq!(err.message_key(), Some("feedbackAlreadySubmitted"));
    }

    #[test]
    fn test_feedback_rules() {
        let open = issue("a", IssueCategory::Water, IssueStatus::Pending, 0, 1);
        let done = issue("b", IssueCategory::Water, IssueStatus::Resolved, 0, 1);
        let backend = MemoryBackend::default();
        let user = citizen();

        assert_eq!(
            submit_feedback(&backend, Some(&user), &open, &full_ratings(), ""),
            Err(ActionError::NotResolved)
        );
        assert_eq!(
            submit_feedback(&backend, Some(&user), &done, &Ratings::default(), ""),
            Err(ActionError::Invalid(ValidationError::IncompleteRatings))
        );
        assert_eq!(
            submit_feedback(&backend, None, &done, &full_ratings(), ""),
            Err(ActionError::LoginRequired)
        );
    }

    #[test]
    fn test_admin_edits() {
        let target = issue("a", IssueCategory::Garbage, IssueStatus::Pending, 0, 1);
        let backend = backend_with(target);

        assert_eq!(
            set_status(&backend, Some(&citizen()), "a", IssueStatus::Resolved),
            Err(ActionError::AdminOnly)
        );

        set_status(&backend, Some(&officer()), "a", IssueStatus::InProgress).unwrap();
        assert_eq!(
            backend.issues.lock().unwrap()[0].status,
            IssueStatus::InProgress
        );

        assert_eq!(delete(&backend, None, "a"), Err(ActionError::AdminOnly));
        delete(&backend, Some(&officer()), "a").unwrap();
        assert!(backend.issues.lock().unwrap().is_empty());
    }
}
