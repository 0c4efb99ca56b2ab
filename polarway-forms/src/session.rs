//! Session state machine
//!
//! ```text
//!  Anonymous ──select──▶ AuthenticatingAs(role) ──login ok──▶ Authenticated(role)
//!                          ▲        │
//!                          └────────┘ select / login failed / sign-up
//! ```
//!
//! `Authenticated` is terminal for the session. Transitions consume the old
//! value and return the next one.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{FormsError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    AuthenticatingAs(Role),
    Authenticated(Role),
}

impl SessionState {
    /// Pick the login path; ignored once authenticated
    pub fn select_role(self, choice: Role) -> Self {
        match self {
            Self::Anonymous | Self::AuthenticatingAs(_) => Self::AuthenticatingAs(choice),
            authenticated @ Self::Authenticated(_) => authenticated,
        }
    }

    /// Apply a successful credential check for `role`
    ///
    /// Only the path that was chosen can be completed; any other combination
    /// leaves the state as it was.
    pub fn login_succeeded(self, role: Role) -> Self {
        match self {
            Self::AuthenticatingAs(choice) if choice == role => Self::Authenticated(role),
            other => other,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated(role) => Some(*role),
            _ => None,
        }
    }

    /// Path currently being authenticated, if any
    pub fn choice(&self) -> Option<Role> {
        match self {
            Self::AuthenticatingAs(role) => Some(*role),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn can_submit(&self) -> bool {
        self.role().is_some_and(|r| r.can_submit())
    }

    pub fn can_view(&self) -> bool {
        self.is_authenticated()
    }

    /// Gate for admin-only actions
    pub fn require_submit(&self) -> Result<()> {
        if self.can_submit() {
            Ok(())
        } else {
            Err(FormsError::AccessDenied {
                required: Role::Admin.to_string(),
                actual: self.describe(),
            })
        }
    }

    /// Gate for actions open to every authenticated role
    pub fn require_view(&self) -> Result<()> {
        if self.can_view() {
            Ok(())
        } else {
            Err(FormsError::AccessDenied {
                required: Role::User.to_string(),
                actual: self.describe(),
            })
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Anonymous => "anonymous".to_string(),
            Self::AuthenticatingAs(_) => "unauthenticated".to_string(),
            Self::Authenticated(role) => role.to_string(),
        }
    }
}

/// One interactive use of the application
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: SessionState::Anonymous,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
