use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::actions::{self, ActionError};
use crate::backend::{IssueStore, SupabaseClient};
use crate::capture::{
    geolocation_from_config, CapturePolicy, CaptureRejection, CaptureWorkflow, DirectoryCamera,
    PositionOptions, StreamConstraints, WorkflowState,
};
use crate::config::Config;
use crate::error::ValidationError;
use crate::export::{default_export_path, export_issues, ExportFormat};
use crate::feed::FeedQuery;
use crate::geocoding::{NoGeocoding, NominatimClient, ReverseGeocoder};
use crate::i18n::Translator;
use crate::models::{Issue, IssueCategory, IssueStatus};
use crate::report::{self, ReportDraft, ReportServices, SubmitStep};
use crate::session::{validate_sign_in, validate_sign_up, CurrentUser, SessionManager};
use crate::tasks::{BackgroundTaskManager, TaskCompletionInfo, TaskOutcome, TaskResult, TaskType};
use crate::ui;
use crate::ui::auth_form::{AuthForm, AuthMode};
use crate::ui::confirm_dialog::{ConfirmAction, ConfirmDialog};
use crate::ui::feedback_dialog::FeedbackDialog;
use crate::ui::preview::CapturePreview;
use crate::ui::text_input::TextInput;

/// Top-level screens, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Report,
    Issues,
    MyIssues,
    Admin,
    Auth,
}

impl Screen {
    pub const TABS: [Screen; 5] = [
        Screen::Home,
        Screen::Report,
        Screen::Issues,
        Screen::MyIssues,
        Screen::Admin,
    ];

    pub fn title_key(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Report => "reportIssue",
            Screen::Issues => "viewIssues",
            Screen::MyIssues => "myReportedIssues",
            Screen::Admin => "adminDashboard",
            Screen::Auth => "login",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    EditingDescription,
    Feedback,
    Confirm,
}

pub struct App {
    pub config: Config,
    pub screen: Screen,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub translator: Translator,
    pub task_manager: BackgroundTaskManager,

    backend: Arc<SupabaseClient>,
    geocoder: Arc<dyn ReverseGeocoder>,
    session: Arc<SessionManager>,
    user_rx: watch::Receiver<Option<CurrentUser>>,
    pub user: Option<CurrentUser>,

    pub issues: Vec<Issue>,
    pub issues_loaded: bool,
    pub my_issues: Vec<Issue>,
    pub feed_query: FeedQuery,
    pub feed_selected: usize,
    pub my_selected: usize,
    pub admin_selected: usize,

    pub workflow: CaptureWorkflow,
    pub draft: ReportDraft,
    pub description_input: TextInput,
    pub preview: CapturePreview,

    pub auth_form: AuthForm,
    /// Screen to open after a successful sign-in
    after_auth: Screen,
    pub feedback_dialog: Option<FeedbackDialog>,
    pub confirm_dialog: Option<ConfirmDialog>,
}

impl App {
    /// Build the app and kick off session restore and the first feed load.
    /// Must be called inside a Tokio runtime, after the terminal is set up.
    pub fn new(config: Config) -> Result<Self> {
        let backend = Arc::new(SupabaseClient::from_config(&config.backend));
        let geocoder: Arc<dyn ReverseGeocoder> = if config.geocoding.enabled {
            Arc::new(NominatimClient::from_config(&config.geocoding))
        } else {
            Arc::new(NoGeocoding)
        };
        let session = Arc::new(SessionManager::new(backend.clone(), config.auth.clone()));
        let user_rx = session.subscribe();

        let camera = Arc::new(DirectoryCamera::new(
            config.camera.source.clone(),
            config.camera.image_extensions.clone(),
        ));
        let workflow = CaptureWorkflow::new(
            camera,
            StreamConstraints::from(&config.camera),
            geolocation_from_config(&config.geolocation, &config.camera),
            PositionOptions::from(&config.geolocation),
            CapturePolicy::from(&config.camera),
            Duration::from_millis(config.camera.retake_delay_ms),
        );
        let preview = CapturePreview::new(config.ui.preview);
        let translator = Translator::new(config.ui.language);

        let mut app = Self {
            config,
            screen: Screen::Home,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            translator,
            task_manager: BackgroundTaskManager::new(),
            backend,
            geocoder,
            session,
            user_rx,
            user: None,
            issues: Vec::new(),
            issues_loaded: false,
            my_issues: Vec::new(),
            feed_query: FeedQuery::default(),
            feed_selected: 0,
            my_selected: 0,
            admin_selected: 0,
            workflow,
            draft: ReportDraft::default(),
            description_input: TextInput::default(),
            preview,
            auth_form: AuthForm::default(),
            after_auth: Screen::Home,
            feedback_dialog: None,
            confirm_dialog: None,
        };

        app.restore_session();
        app.load_issues();
        Ok(app)
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            let completions = self.task_manager.poll_updates();
            for completion in completions {
                self.handle_completion(completion);
            }

            self.workflow.poll();
            self.poll_session();

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key)?,
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        self.workflow.unmount();
        Ok(())
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.translator.t(key)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    // --- Navigation ---

    pub fn set_screen(&mut self, screen: Screen) {
        if screen == self.screen {
            return;
        }
        match screen {
            Screen::Admin if !self.is_admin() => {
                self.status_message = Some(self.t("adminOnly").to_string());
                return;
            }
            Screen::MyIssues if self.user.is_none() => {
                self.require_login(Screen::MyIssues, "loginRequired");
                return;
            }
            _ => {}
        }

        if self.screen == Screen::Report {
            self.workflow.unmount();
        }
        self.screen = screen;
        tracing::debug!(?screen, "Screen changed");

        match screen {
            Screen::Report => self.workflow.mount(),
            Screen::Home | Screen::Issues | Screen::Admin => {
                if !self.issues_loaded {
                    self.load_issues();
                }
            }
            Screen::MyIssues => self.load_my_issues(),
            Screen::Auth => self.auth_form.error = None,
        }
    }

    /// Show `message_key` and open the login screen, returning to `next`
    /// once signed in.
    fn require_login(&mut self, next: Screen, message_key: &str) {
        self.status_message = Some(self.t(message_key).to_string());
        self.after_auth = next;
        self.set_screen(Screen::Auth);
    }

    fn cycle_language(&mut self) {
        let language = self.translator.language().next();
        self.translator.set_language(language);
        self.config.ui.language = language;
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "Could not save language preference");
        }
        self.status_message = Some(language.native_name().to_string());
    }

    // --- Session ---

    fn poll_session(&mut self) {
        if !self.user_rx.has_changed().unwrap_or(false) {
            return;
        }
        let user = self.user_rx.borrow_and_update().clone();
        self.on_user_changed(user);
    }

    fn on_user_changed(&mut self, user: Option<CurrentUser>) {
        tracing::debug!(signed_in = user.is_some(), "User changed");
        self.user = user;
        self.my_issues.clear();
        self.my_selected = 0;

        if self.user.is_some() {
            self.load_my_issues();
        } else if self.screen == Screen::MyIssues {
            self.set_screen(Screen::Home);
        }
        if self.screen == Screen::Admin && !self.is_admin() {
            self.set_screen(Screen::Home);
        }
    }

    fn restore_session(&mut self) {
        let session = self.session.clone();
        self.task_manager.spawn(TaskType::Auth, 1, move |_| {
            let user = session.restore().map_err(|e| e.user_message())?;
            Ok((String::new(), TaskOutcome::SessionRestored(user)))
        });
    }

    fn submit_auth(&mut self) {
        if self.task_manager.is_running(TaskType::Auth) {
            return;
        }
        let mode = self.auth_form.mode;
        let username = self.auth_form.username.as_str().trim().to_string();
        let password = self.auth_form.password.as_str().to_string();
        let confirm = self.auth_form.confirm.as_str().to_string();

        let validation = match mode {
            AuthMode::Login => validate_sign_in(&username, &password),
            AuthMode::SignUp => validate_sign_up(&username, &password, &confirm),
        };
        if let Err(e) = validation {
            self.auth_form.error = Some(self.validation_message(e));
            return;
        }
        self.auth_form.error = None;

        let session = self.session.clone();
        let t = self.translator.clone();
        self.task_manager.spawn(TaskType::Auth, 1, move |_| match mode {
            AuthMode::Login => {
                let user = session
                    .sign_in(&username, &password)
                    .map_err(|e| e.to_string())?;
                Ok((t.t("loginSuccess").to_string(), TaskOutcome::SignedIn(Some(user))))
            }
            AuthMode::SignUp => {
                let user = session
                    .sign_up(&username, &password, &confirm)
                    .map_err(|e| e.to_string())?;
                Ok((t.t("signupSuccess").to_string(), TaskOutcome::SignedIn(user)))
            }
        });
    }

    fn sign_out(&mut self) {
        if self.user.is_none() || self.task_manager.is_running(TaskType::Auth) {
            return;
        }
        let session = self.session.clone();
        let t = self.translator.clone();
        self.task_manager.spawn(TaskType::Auth, 1, move |_| {
            // local state is cleared even when the server call fails
            if let Err(e) = session.sign_out() {
                tracing::warn!(error = %e, "Sign-out request failed");
            }
            Ok((t.t("logout").to_string(), TaskOutcome::SignedOut))
        });
    }

    // --- Loading ---

    fn load_issues(&mut self) {
        if self.task_manager.is_running(TaskType::LoadIssues) {
            return;
        }
        let store = self.backend.clone();
        self.task_manager.spawn(TaskType::LoadIssues, 1, move |_| {
            let issues = store.list_issues().map_err(|e| e.user_message())?;
            tracing::info!(count = issues.len(), "Issues loaded");
            Ok((String::new(), TaskOutcome::Issues(issues)))
        });
    }

    fn load_my_issues(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        if self.task_manager.is_running(TaskType::LoadMyIssues) {
            return;
        }
        let store = self.backend.clone();
        self.task_manager.spawn(TaskType::LoadMyIssues, 1, move |_| {
            let issues = store
                .list_issues_by_user(&user_id)
                .map_err(|e| e.user_message())?;
            Ok((String::new(), TaskOutcome::MyIssues(issues)))
        });
    }

    fn refresh(&mut self) {
        self.load_issues();
        self.load_my_issues();
    }

    // --- Task results ---

    fn handle_completion(&mut self, completion: TaskCompletionInfo) {
        let (message, outcome) = match completion.result {
            TaskResult::Done { message, outcome } => (message, outcome),
            TaskResult::Failed(error) => {
                self.on_task_failed(completion.task_type, error);
                return;
            }
            TaskResult::Cancelled => {
                tracing::debug!(task = ?completion.task_type, "Task cancelled");
                return;
            }
        };
        if !message.is_empty() {
            self.status_message = Some(message);
        }

        match outcome {
            TaskOutcome::Issues(issues) => {
                self.issues = issues;
                self.issues_loaded = true;
                self.clamp_selections();
            }
            TaskOutcome::MyIssues(issues) => {
                self.my_issues = issues;
                self.clamp_selections();
            }
            TaskOutcome::Submitted(issue) => self.on_report_submitted(*issue),
            TaskOutcome::IssuePatched { id, patch } => {
                for issue in self
                    .issues
                    .iter_mut()
                    .chain(self.my_issues.iter_mut())
                    .filter(|i| i.id == id)
                {
                    patch.apply(issue);
                }
            }
            TaskOutcome::IssueDeleted(id) => {
                self.issues.retain(|i| i.id != id);
                self.my_issues.retain(|i| i.id != id);
                self.clamp_selections();
            }
            TaskOutcome::FeedbackSent => {
                self.feedback_dialog = None;
                self.mode = AppMode::Normal;
            }
            TaskOutcome::SignedIn(Some(_)) => {
                self.auth_form.reset();
                if self.screen == Screen::Auth {
                    let next = self.after_auth;
                    self.after_auth = Screen::Home;
                    self.set_screen(next);
                }
            }
            TaskOutcome::SignedIn(None) => {
                // account created, confirmation pending
                self.auth_form.toggle_mode();
            }
            TaskOutcome::SessionRestored(user) => {
                if let Some(user) = user {
                    self.status_message =
                        Some(format!("{}, {}", self.t("welcomeBack"), user.username));
                }
            }
            TaskOutcome::SignedOut | TaskOutcome::Exported => {}
        }
    }

    fn on_task_failed(&mut self, task_type: TaskType, message: String) {
        match task_type {
            TaskType::Auth if self.screen == Screen::Auth => {
                self.auth_form.error = Some(message);
            }
            TaskType::LoadIssues | TaskType::LoadMyIssues => {
                self.status_message = Some(format!("{}: {}", self.t("loadFailed"), message));
            }
            _ => {
                self.status_message = Some(format!("{} - {}", task_type.display_name(), message));
            }
        }
    }

    fn clamp_selections(&mut self) {
        let visible = self.visible_issues().len();
        self.feed_selected = self.feed_selected.min(visible.saturating_sub(1));
        self.my_selected = self.my_selected.min(self.my_issues.len().saturating_sub(1));
        self.admin_selected = self.admin_selected.min(self.issues.len().saturating_sub(1));
    }

    // --- Issue feed ---

    pub fn visible_issues(&self) -> Vec<&Issue> {
        self.feed_query.apply(&self.issues)
    }

    fn selected_feed_issue(&self) -> Option<Issue> {
        self.visible_issues().get(self.feed_selected).map(|i| (*i).clone())
    }

    fn support_selected(&mut self, re_report: bool) {
        let Some(issue) = self.selected_feed_issue() else {
            return;
        };
        if self.user.is_none() {
            self.require_login(Screen::Issues, "loginToSupport");
            return;
        }
        if self.task_manager.is_running(TaskType::UpdateIssue) {
            return;
        }

        let store = self.backend.clone();
        let user = self.user.clone();
        let t = self.translator.clone();
        self.task_manager.spawn(TaskType::UpdateIssue, 1, move |_| {
            let (result, success_key) = if re_report {
                (actions::re_report(&*store, user.as_ref(), &issue), "reReportSuccess")
            } else {
                (actions::support(&*store, user.as_ref(), &issue), "likeSuccess")
            };
            let patch = result.map_err(|e| action_message(&t, &e))?;
            Ok((
                t.t(success_key).to_string(),
                TaskOutcome::IssuePatched {
                    id: issue.id.clone(),
                    patch,
                },
            ))
        });
    }

    // --- Report ---

    fn capture_photo(&mut self) {
        match self.workflow.capture() {
            Ok(image) => {
                tracing::info!(bytes = image.jpeg.len(), "Photo captured");
                self.status_message = Some(self.t("photoCaptured").to_string());
            }
            Err(CaptureRejection::NotReady) => {
                self.status_message = Some(self.t("startingCamera").to_string());
            }
            Err(
                rejection @ (CaptureRejection::PayloadTooSmall { .. }
                | CaptureRejection::ZeroSizedFrame),
            ) => {
                tracing::warn!(%rejection, "Capture rejected");
                self.status_message = Some(self.t("captureRejected").to_string());
            }
            Err(rejection) => {
                tracing::warn!(%rejection, "Capture failed");
                self.status_message = Some(rejection.to_string());
            }
        }
    }

    fn retake_photo(&mut self) {
        if self.workflow.state() == WorkflowState::Captured {
            self.preview.clear();
            self.workflow.retake();
        }
    }

    fn step_category(&mut self, forward: bool) {
        let all = IssueCategory::ALL;
        let len = all.len();
        let next = match self.draft.category.and_then(|c| all.iter().position(|x| *x == c)) {
            None if forward => 0,
            None => len - 1,
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
        };
        self.draft.category = Some(all[next]);
    }

    fn submit_report(&mut self) {
        if self.task_manager.is_running(TaskType::SubmitReport) {
            return;
        }
        self.draft.description = self.description_input.as_str().to_string();
        if let Err(e) = self.draft.validate(self.workflow.captured()) {
            self.status_message = Some(self.validation_message(e));
            return;
        }
        let Some(image) = self.workflow.captured().cloned() else {
            return;
        };

        let draft = self.draft.clone();
        let backend = self.backend.clone();
        let geocoder = self.geocoder.clone();
        let user_id = self.user.as_ref().map(|u| u.id.clone());
        let t = self.translator.clone();

        self.task_manager.spawn(TaskType::SubmitReport, SubmitStep::COUNT, move |ctx| {
            let services = ReportServices {
                issues: &*backend,
                objects: &*backend,
                geocoder: &*geocoder,
            };
            let user_id = user_id.as_deref();
            let issue = report::submit_report(&services, &draft, &image, user_id, |step| {
                ctx.progress(step.index() + 1, step.label())
            })
            .map_err(|e| e.to_string())?;
            Ok((t.t("reportSuccess").to_string(), TaskOutcome::Submitted(Box::new(issue))))
        });
    }

    fn on_report_submitted(&mut self, issue: Issue) {
        if self.user.is_some() {
            self.my_issues.insert(0, issue.clone());
        }
        self.issues.insert(0, issue);

        self.workflow.take_captured();
        self.preview.clear();
        self.draft = ReportDraft::default();
        self.description_input.clear();
        self.feed_selected = 0;

        if self.screen == Screen::Report {
            self.set_screen(Screen::Issues);
        }
    }

    // --- My issues / feedback ---

    fn open_feedback(&mut self) {
        let Some(issue) = self.my_issues.get(self.my_selected).cloned() else {
            return;
        };
        if issue.status != IssueStatus::Resolved {
            self.status_message = Some(ActionError::NotResolved.to_string());
            return;
        }
        self.feedback_dialog = Some(FeedbackDialog::new(issue));
        self.mode = AppMode::Feedback;
    }

    fn submit_feedback(&mut self) {
        if self.task_manager.is_running(TaskType::SubmitFeedback) {
            return;
        }
        let Some(ref dialog) = self.feedback_dialog else {
            return;
        };
        if !dialog.ratings.is_complete() {
            self.status_message = Some(self.validation_message(ValidationError::IncompleteRatings));
            return;
        }

        let issue = dialog.issue.clone();
        let ratings = dialog.ratings;
        let comments = dialog.comments.as_str().to_string();
        let store = self.backend.clone();
        let user = self.user.clone();
        let t = self.translator.clone();

        self.task_manager.spawn(TaskType::SubmitFeedback, 1, move |_| {
            actions::submit_feedback(&*store, user.as_ref(), &issue, &ratings, &comments)
                .map_err(|e| action_message(&t, &e))?;
            Ok((t.t("feedbackSuccess").to_string(), TaskOutcome::FeedbackSent))
        });
    }

    // --- Admin ---

    fn selected_admin_issue(&self) -> Option<&Issue> {
        self.issues.get(self.admin_selected)
    }

    fn advance_status(&mut self) {
        let Some(issue) = self.selected_admin_issue() else {
            return;
        };
        if self.task_manager.is_running(TaskType::UpdateIssue) {
            return;
        }
        let id = issue.id.clone();
        let status = issue.status.next();
        let store = self.backend.clone();
        let user = self.user.clone();
        let t = self.translator.clone();

        self.task_manager.spawn(TaskType::UpdateIssue, 1, move |_| {
            let patch = actions::set_status(&*store, user.as_ref(), &id, status)
                .map_err(|e| format!("{}: {}", t.t("statusUpdateFailed"), action_message(&t, &e)))?;
            Ok((t.t("statusUpdated").to_string(), TaskOutcome::IssuePatched { id, patch }))
        });
    }

    fn confirm_delete(&mut self) {
        let Some(issue) = self.selected_admin_issue() else {
            return;
        };
        let subject = format!("{} {}", issue.category.icon(), issue.description);
        self.confirm_dialog = Some(ConfirmDialog::delete_issue(issue.id.clone(), subject));
        self.mode = AppMode::Confirm;
    }

    fn run_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteIssue { id } => {
                let store = self.backend.clone();
                let user = self.user.clone();
                let t = self.translator.clone();
                self.task_manager.spawn(TaskType::DeleteIssue, 1, move |_| {
                    actions::delete(&*store, user.as_ref(), &id).map_err(|e| {
                        format!("{}: {}", t.t("deleteFailed"), action_message(&t, &e))
                    })?;
                    Ok((t.t("issueDeleted").to_string(), TaskOutcome::IssueDeleted(id)))
                });
            }
        }
    }

    fn export(&mut self, format: ExportFormat) {
        if self.task_manager.is_running(TaskType::Export) {
            return;
        }
        let issues = self.issues.clone();
        let path = default_export_path(&self.config.ui.export_dir, format);
        let t = self.translator.clone();
        self.task_manager.spawn(TaskType::Export, 1, move |_| {
            let count = export_issues(&issues, &path, format).map_err(|e| e.to_string())?;
            Ok((
                format!("{} ({}, {}): {}", t.t("exportDone"), count, format.name(), path.display()),
                TaskOutcome::Exported,
            ))
        });
    }

    fn validation_message(&self, err: ValidationError) -> String {
        match err {
            ValidationError::MissingCategory
            | ValidationError::MissingDescription
            | ValidationError::IncompleteRatings => self.t("fillRequired").to_string(),
            ValidationError::PasswordMismatch => self.t("passwordMismatch").to_string(),
            _ => err.to_string(),
        }
    }

    // --- Input ---

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.mode {
            AppMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.mode = AppMode::Normal;
                }
                return Ok(());
            }
            AppMode::EditingDescription => return self.handle_description_key(key),
            AppMode::Feedback => return self.handle_feedback_key(key),
            AppMode::Confirm => return self.handle_confirm_key(key),
            AppMode::Normal => {}
        }

        if self.screen == Screen::Auth {
            return self.handle_auth_key(key);
        }

        if key.code == KeyCode::Esc {
            if self.task_manager.has_running_tasks() {
                if self.task_manager.cancel_most_recent() {
                    self.status_message = Some("Task cancelled".to_string());
                }
            } else {
                self.status_message = None;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('l') => self.cycle_language(),
            KeyCode::Char('1') => self.set_screen(Screen::Home),
            KeyCode::Char('2') => self.set_screen(Screen::Report),
            KeyCode::Char('3') => self.set_screen(Screen::Issues),
            KeyCode::Char('4') => self.set_screen(Screen::MyIssues),
            KeyCode::Char('5') => self.set_screen(Screen::Admin),
            KeyCode::Tab => self.next_tab(),
            KeyCode::Char('a') if self.user.is_none() => {
                self.after_auth = self.screen;
                self.set_screen(Screen::Auth);
            }
            KeyCode::Char('o') => self.sign_out(),
            _ => match self.screen {
                Screen::Home => self.handle_home_key(key),
                Screen::Report => self.handle_report_key(key),
                Screen::Issues => self.handle_feed_key(key),
                Screen::MyIssues => self.handle_my_issues_key(key),
                Screen::Admin => self.handle_admin_key(key),
                Screen::Auth => {}
            },
        }
        Ok(())
    }

    fn next_tab(&mut self) {
        let tabs: Vec<Screen> = Screen::TABS
            .into_iter()
            .filter(|s| match s {
                Screen::MyIssues => self.user.is_some(),
                Screen::Admin => self.is_admin(),
                _ => true,
            })
            .collect();
        let index = tabs.iter().position(|s| *s == self.screen).map_or(0, |i| (i + 1) % tabs.len());
        self.set_screen(tabs[index]);
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => self.set_screen(Screen::Report),
            KeyCode::Char('v') => self.set_screen(Screen::Issues),
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => self.capture_photo(),
            KeyCode::Char('t') => self.retake_photo(),
            KeyCode::Char('x') => self.workflow.retry_camera(),
            KeyCode::Char(']') | KeyCode::Right => self.step_category(true),
            KeyCode::Char('[') | KeyCode::Left => self.step_category(false),
            KeyCode::Char('e') | KeyCode::Char('i') => self.mode = AppMode::EditingDescription,
            KeyCode::Char('s') | KeyCode::Enter => self.submit_report(),
            _ => {}
        }
    }

    fn handle_description_key(&mut self, key: KeyEvent) -> Result<()> {
        let input = &mut self.description_input;
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = AppMode::Normal,
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_cursor_left(),
            KeyCode::Right => input.move_cursor_right(),
            KeyCode::Home => input.move_cursor_home(),
            KeyCode::End => input.move_cursor_end(),
            KeyCode::Char(c) => input.handle_char(c),
            _ => {}
        }
        self.draft.description = self.description_input.as_str().to_string();
        Ok(())
    }

    fn handle_feed_key(&mut self, key: KeyEvent) {
        let count = self.visible_issues().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.feed_selected + 1 < count {
                    self.feed_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.feed_selected = self.feed_selected.saturating_sub(1);
            }
            KeyCode::Char('c') => {
                self.feed_query.cycle_category();
                self.feed_selected = 0;
            }
            KeyCode::Char('f') => {
                self.feed_query.cycle_status();
                self.feed_selected = 0;
            }
            KeyCode::Char('s') => {
                self.feed_query.sort = self.feed_query.sort.toggle();
                self.feed_selected = 0;
            }
            KeyCode::Char('u') => self.support_selected(false),
            KeyCode::Char('R') => self.support_selected(true),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('n') => self.set_screen(Screen::Report),
            _ => {}
        }
    }

    fn handle_my_issues_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.my_selected + 1 < self.my_issues.len() {
                    self.my_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.my_selected = self.my_selected.saturating_sub(1);
            }
            KeyCode::Char('f') | KeyCode::Enter => self.open_feedback(),
            KeyCode::Char('r') => self.load_my_issues(),
            KeyCode::Char('n') => self.set_screen(Screen::Report),
            _ => {}
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.admin_selected + 1 < self.issues.len() {
                    self.admin_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.admin_selected = self.admin_selected.saturating_sub(1);
            }
            KeyCode::Char('s') => self.advance_status(),
            KeyCode::Char('d') => self.confirm_delete(),
            KeyCode::Char('x') => self.export(ExportFormat::Csv),
            KeyCode::Char('X') => self.export(ExportFormat::Json),
            KeyCode::Char('r') => self.load_issues(),
            _ => {}
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.task_manager.is_running(TaskType::Auth) {
            return Ok(());
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            self.auth_form.toggle_mode();
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.auth_form.reset();
                self.set_screen(Screen::Home);
            }
            KeyCode::Tab | KeyCode::Down => self.auth_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.auth_form.prev_field(),
            KeyCode::Enter => self.submit_auth(),
            KeyCode::Backspace => self.auth_form.input_mut().backspace(),
            KeyCode::Delete => self.auth_form.input_mut().delete(),
            KeyCode::Left => self.auth_form.input_mut().move_cursor_left(),
            KeyCode::Right => self.auth_form.input_mut().move_cursor_right(),
            KeyCode::Home => self.auth_form.input_mut().move_cursor_home(),
            KeyCode::End => self.auth_form.input_mut().move_cursor_end(),
            KeyCode::Char(c) => self.auth_form.input_mut().handle_char(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_feedback_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.task_manager.is_running(TaskType::SubmitFeedback) {
            return Ok(());
        }
        let Some(dialog) = self.feedback_dialog.as_mut() else {
            self.mode = AppMode::Normal;
            return Ok(());
        };

        match key.code {
            KeyCode::Esc => {
                self.feedback_dialog = None;
                self.mode = AppMode::Normal;
            }
            KeyCode::Enter => self.submit_feedback(),
            KeyCode::Tab | KeyCode::Down => dialog.next_row(),
            KeyCode::BackTab | KeyCode::Up => dialog.prev_row(),
            _ if dialog.on_comments() => match key.code {
                KeyCode::Backspace => dialog.comments.backspace(),
                KeyCode::Delete => dialog.comments.delete(),
                KeyCode::Left => dialog.comments.move_cursor_left(),
                KeyCode::Right => dialog.comments.move_cursor_right(),
                KeyCode::Char(c) => dialog.comments.handle_char(c),
                _ => {}
            },
            KeyCode::Char(c @ '1'..='5') => dialog.rate(c as u8 - b'0'),
            KeyCode::Char('j') => dialog.next_row(),
            KeyCode::Char('k') => dialog.prev_row(),
            KeyCode::Char('h') | KeyCode::Left => dialog.adjust(-1),
            KeyCode::Char('l') | KeyCode::Right => dialog.adjust(1),
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = AppMode::Normal;
                if let Some(dialog) = self.confirm_dialog.take() {
                    self.run_confirmed(dialog.action);
                }
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.confirm_dialog = None;
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != AppMode::Normal {
            return;
        }
        let code = match mouse.kind {
            MouseEventKind::ScrollDown => KeyCode::Down,
            MouseEventKind::ScrollUp => KeyCode::Up,
            _ => return,
        };
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        match self.screen {
            Screen::Issues => self.handle_feed_key(key),
            Screen::MyIssues => self.handle_my_issues_key(key),
            Screen::Admin => self.handle_admin_key(key),
            _ => {}
        }
    }
}

/// Notification text for a failed issue action
fn action_message(t: &Translator, err: &ActionError) -> String {
    match err.message_key() {
        Some(key) => t.t(key).to_string(),
        None => err.to_string(),
    }
}
