//! SessionController — role-gated flow wiring for one session
//!
//! Every operation converts recoverable failures into a [`Notice`] for the
//! presentation layer. Only `ConfigUnavailable` comes back as an `Err`.

use tracing::{info, warn};

use crate::auth::{AuthActor, AuthHandle, Role};
use crate::config::FormsConfig;
use crate::error::{FormsError, Result};
use crate::records::{RecordActor, RecordHandle};
use crate::schema::{Gender, Record, RecordTable};
use crate::session::{Session, SessionState};

/// User-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Warning(String),
    Info(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(s) | Self::Error(s) | Self::Warning(s) | Self::Info(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// What a view request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Table(RecordTable),
    Notice(Notice),
}

pub struct SessionController {
    auth: AuthHandle,
    records: RecordHandle,
    session: Session,
}

impl SessionController {
    /// Wrap existing handles; handles may be shared between sessions
    pub fn new(auth: AuthHandle, records: RecordHandle) -> Self {
        let session = Session::new();
        info!(session = %session.id, "Session started");
        Self {
            auth,
            records,
            session,
        }
    }

    /// Spawn both actors and open a session
    ///
    /// Fails with `ConfigUnavailable` when the credential file is missing.
    pub async fn start(config: &FormsConfig) -> Result<Self> {
        let auth = AuthActor::spawn(config).await?;
        let records = RecordActor::spawn(config);
        Ok(Self::new(auth, records))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// "Logged in as …" line, once authenticated
    pub fn banner(&self) -> Option<String> {
        self.session.state.role().map(|role| {
            format!(
                "Logged in as {role} (session started {})",
                self.session.started_at.format("%Y-%m-%d %H:%M UTC")
            )
        })
    }

    pub fn select_role(&mut self, choice: Role) {
        self.session.state = self.session.state.select_role(choice);
    }

    // ─── Authentication ───

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Notice> {
        let Some(choice) = self.session.state.choice() else {
            return Ok(Notice::Error(match self.session.state {
                SessionState::Authenticated(_) => "Already logged in.".to_string(),
                _ => "Select a role before logging in.".to_string(),
            }));
        };

        let role = match self
            .auth
            .authenticate(username.to_string(), password.to_string())
            .await
        {
            Ok(role) => role,
            Err(e) => return recover(&self.session, e, "Login failed."),
        };

        if role == Some(choice) {
            self.session.state = self.session.state.login_succeeded(choice);
            info!(session = %self.session.id, username, role = %choice, "Session authenticated");
            return Ok(Notice::Success(match choice {
                Role::Admin => "Admin logged in successfully!".to_string(),
                Role::User => "Logged in successfully as a user!".to_string(),
            }));
        }

        let err = FormsError::AuthenticationFailure(format!(
            "no {choice} entry matches username '{username}'"
        ));
        warn!(session = %self.session.id, error = %err, "Login rejected");
        Ok(Notice::Error(match choice {
            Role::Admin => "Invalid Admin credentials.".to_string(),
            Role::User => "Invalid user credentials.".to_string(),
        }))
    }

    /// Register a new user; the session stays unauthenticated
    pub async fn sign_up(&mut self, username: &str, password: &str) -> Result<Notice> {
        if self.session.state.choice() != Some(Role::User) {
            return Ok(Notice::Error("Sign-up is only available on the User path.".into()));
        }

        match self
            .auth
            .sign_up(username.to_string(), password.to_string())
            .await
        {
            Ok(entry) => {
                info!(session = %self.session.id, username = %entry.username, "Sign-up completed");
                Ok(Notice::Success("Sign-up successful! You can now log in.".into()))
            }
            Err(FormsError::DuplicateUsername(_)) => {
                Ok(Notice::Error("Username already exists!".into()))
            }
            Err(FormsError::IncompleteInput(_)) => {
                Ok(Notice::Error("Please fill in both username and password.".into()))
            }
            Err(e) => recover(&self.session, e, "Sign-up failed."),
        }
    }

    // ─── Records ───

    /// Admin-only form submission
    pub async fn submit(&mut self, name: &str, gender: Option<Gender>) -> Result<Notice> {
        if let Err(e) = self.session.state.require_submit() {
            return recover(&self.session, e, "Only admins can submit data.");
        }

        let record = match Record::from_form(name, gender) {
            Ok(record) => record,
            Err(_) => return Ok(Notice::Error("Please fill out the form completely.".into())),
        };

        let summary = format!("Data saved! Name: {}, Gender: {}", record.name, record.gender);
        match self.records.append(record).await {
            Ok(rows) => {
                info!(session = %self.session.id, rows, "Submission stored");
                Ok(Notice::Success(summary))
            }
            Err(e) => recover(&self.session, e, "An error occurred"),
        }
    }

    /// Current contents of the record spreadsheet
    pub async fn view(&self) -> Result<View> {
        if let Err(e) = self.session.state.require_view() {
            return recover(&self.session, e, "Log in to view data.").map(View::Notice);
        }

        match self.records.load_all().await {
            Ok(Some(table)) => Ok(View::Table(table)),
            Ok(None) => Ok(View::Notice(Notice::Warning(
                "No data found. Please submit the form first.".into(),
            ))),
            Err(e) => recover(&self.session, e, "An error occurred").map(View::Notice),
        }
    }
}

/// Fatal errors propagate; everything else becomes an error notice
fn recover(session: &Session, err: FormsError, context: &str) -> Result<Notice> {
    if err.is_fatal() {
        return Err(err);
    }
    warn!(session = %session.id, error = %err, "{context}");
    let text = match &err {
        FormsError::StorageWriteFailure(_) | FormsError::Spreadsheet(_) | FormsError::Io(_) => {
            format!("{context}: {err}")
        }
        _ => context.to_string(),
    };
    Ok(Notice::Error(text))
}
