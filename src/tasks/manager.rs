//! Tracks running backend tasks and collects their results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use super::{
    BackgroundTask, TaskCompletionInfo, TaskId, TaskOutcome, TaskProgress, TaskResult, TaskType,
    TaskUpdate,
};

/// Handle given to a task body for reporting progress.
pub struct TaskContext {
    tx: mpsc::Sender<TaskUpdate>,
    cancel_flag: Arc<AtomicBool>,
}

impl TaskContext {
    pub fn progress(&self, step: usize, label: impl Into<String>) {
        let _ = self.tx.send(TaskUpdate::Step {
            step,
            label: label.into(),
        });
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

/// Running tasks, oldest first
#[derive(Default)]
pub struct BackgroundTaskManager {
    tasks: Vec<BackgroundTask>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `body` on a worker thread.
    ///
    /// `Ok((message, outcome))` completes the task, `Err(message)` fails it.
    /// A task cancelled while running reports `Cancelled` and its outcome
    /// is dropped.
    pub fn spawn<F>(&mut self, task_type: TaskType, total: usize, body: F) -> TaskId
    where
        F: FnOnce(&TaskContext) -> Result<(String, TaskOutcome), String> + Send + 'static,
    {
        let (tx, receiver) = mpsc::channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let id = TaskId::new();
        self.tasks.push(BackgroundTask {
            id,
            task_type,
            progress: TaskProgress {
                total,
                ..TaskProgress::default()
            },
            cancel_flag: cancel_flag.clone(),
            receiver,
        });

        std::thread::spawn(move || {
            let ctx = TaskContext { tx, cancel_flag };
            let result = body(&ctx);

            let result = if ctx.is_cancelled() {
                TaskResult::Cancelled
            } else {
                match result {
                    Ok((message, outcome)) => TaskResult::Done { message, outcome },
                    Err(error) => TaskResult::Failed(error),
                }
            };
            let _ = ctx.tx.send(TaskUpdate::Finished(result));
        });

        tracing::debug!(?task_type, id = id.0, "Task spawned");
        id
    }

    pub fn is_running(&self, task_type: TaskType) -> bool {
        self.tasks.iter().any(|t| t.task_type == task_type)
    }

    /// Cancel the most recently started task.
    pub fn cancel_most_recent(&mut self) -> bool {
        match self.tasks.last() {
            Some(task) => {
                task.cancel();
                true
            }
            None => false,
        }
    }

    /// Drain every task channel. Returns the tasks that finished.
    pub fn poll_updates(&mut self) -> Vec<TaskCompletionInfo> {
        let mut completed = Vec::new();

        self.tasks.retain_mut(|task| loop {
            let update = match task.receiver.try_recv() {
                Ok(update) => update,
                Err(mpsc::TryRecvError::Empty) => return true,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // worker panicked before reporting
                    TaskUpdate::Finished(TaskResult::Failed("Task ended unexpectedly".to_string()))
                }
            };

            match update {
                TaskUpdate::Step { step, label } => {
                    task.progress.step = step;
                    task.progress.label = Some(label);
                }
                TaskUpdate::Finished(result) => {
                    if let TaskResult::Failed(ref error) = result {
                        tracing::warn!(task = ?task.task_type, %error, "Task failed");
                    }
                    completed.push(TaskCompletionInfo {
                        task_type: task.task_type,
                        result,
                    });
                    return false;
                }
            }
        });

        completed
    }

    pub fn running_tasks(&self) -> &[BackgroundTask] {
        &self.tasks
    }

    pub fn has_running_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(manager: &mut BackgroundTaskManager) -> Vec<TaskCompletionInfo> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let done = manager.poll_updates();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_completed_task_carries_outcome() {
        let mut manager = BackgroundTaskManager::new();
        manager.spawn(TaskType::LoadIssues, 1, |ctx| {
            ctx.progress(1, "fetched");
            Ok(("Loaded 0 issues".to_string(), TaskOutcome::Issues(Vec::new())))
        });
        assert!(manager.is_running(TaskType::LoadIssues));

        let done = wait_for(&mut manager);
        assert_eq!(done.len(), 1);
        assert!(matches!(
            done[0].result,
            TaskResult::Done { outcome: TaskOutcome::Issues(_), .. }
        ));
        assert!(!manager.has_running_tasks());
    }

    #[test]
    fn test_failed_task() {
        let mut manager = BackgroundTaskManager::new();
        manager.spawn(TaskType::SubmitFeedback, 1, |_| Err("offline".to_string()));

        let done = wait_for(&mut manager);
        assert!(matches!(done[0].result, TaskResult::Failed(ref e) if e == "offline"));
    }

    #[test]
    fn test_cancelled_task_drops_outcome() {
        let mut manager = BackgroundTaskManager::new();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        manager.spawn(TaskType::LoadMyIssues, 1, move |_| {
            let _ = gate_rx.recv();
            Ok(("done".to_string(), TaskOutcome::MyIssues(Vec::new())))
        });

        assert!(manager.cancel_most_recent());
        gate_tx.send(()).unwrap();

        let done = wait_for(&mut manager);
        assert!(matches!(done[0].result, TaskResult::Cancelled));
        assert!(!manager.cancel_most_recent());
    }

    #[test]
    fn test_progress_percent() {
        let progress = TaskProgress {
            step: 2,
            total: 3,
            label: None,
        };
        assert_eq!(progress.percent(), 66);
        assert_eq!(TaskProgress::default().percent(), 0);
    }
}
