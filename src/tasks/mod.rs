//! Background work for backend calls.
//!
//! Backend requests block, so each one runs on its own thread and reports
//! back over a channel that the UI loop drains every tick. Nothing here
//! touches app state directly; results come back as [`TaskOutcome`]s.

pub mod manager;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

pub use manager::BackgroundTaskManager;

use crate::models::{Issue, IssuePatch};
use crate::session::CurrentUser;

/// Unique identifier for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new() -> Self {
        use std::sync::atomic::AtomicU64;
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    LoadIssues,
    LoadMyIssues,
    SubmitReport,
    UpdateIssue,
    DeleteIssue,
    SubmitFeedback,
    Auth,
    Export,
}

impl TaskType {
    /// Short display name for status bar.
    pub fn short_name(&self) -> &'static str {
        match self {
            TaskType::LoadIssues | TaskType::LoadMyIssues => "L",
            TaskType::SubmitReport => "R",
            TaskType::UpdateIssue | TaskType::DeleteIssue => "U",
            TaskType::SubmitFeedback => "F",
            TaskType::Auth => "A",
            TaskType::Export => "E",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskType::LoadIssues => "Loading issues",
            TaskType::LoadMyIssues => "Loading your issues",
            TaskType::SubmitReport => "Submitting report",
            TaskType::UpdateIssue => "Updating issue",
            TaskType::DeleteIssue => "Deleting issue",
            TaskType::SubmitFeedback => "Sending feedback",
            TaskType::Auth => "Account",
            TaskType::Export => "Exporting",
        }
    }
}

/// Step counter for a multi-step task
#[derive(Debug, Clone, Default)]
pub struct TaskProgress {
    pub step: usize,
    pub total: usize,
    pub label: Option<String>,
}

impl TaskProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.step.min(self.total) * 100 / self.total) as u8
    }
}

/// Result data handed back to the app
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    Issues(Vec<Issue>),
    MyIssues(Vec<Issue>),
    Submitted(Box<Issue>),
    IssuePatched { id: String, patch: IssuePatch },
    IssueDeleted(String),
    FeedbackSent,
    /// `None` after a sign-up that still needs confirmation
    SignedIn(Option<CurrentUser>),
    SessionRestored(Option<CurrentUser>),
    SignedOut,
    Exported,
}

/// How a task ended
#[derive(Debug, Clone)]
pub enum TaskResult {
    Done { message: String, outcome: TaskOutcome },
    Failed(String),
    Cancelled,
}

/// Sent from a worker thread to the manager
#[derive(Debug)]
enum TaskUpdate {
    Step { step: usize, label: String },
    Finished(TaskResult),
}

/// A task that has not reported its result yet
pub struct BackgroundTask {
    pub id: TaskId,
    pub task_type: TaskType,
    pub progress: TaskProgress,
    cancel_flag: Arc<AtomicBool>,
    receiver: mpsc::Receiver<TaskUpdate>,
}

impl BackgroundTask {
    /// Ask the task to drop its result. The request itself cannot be
    /// interrupted.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }
}

/// A finished task, as seen by the app
#[derive(Debug, Clone)]
pub struct TaskCompletionInfo {
    pub task_type: TaskType,
    pub result: TaskResult,
}
