use chrono::{DateTime, Utc};

use crate::models::{Role, User};

/// Session
///
/// The signed-in state of one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
    // Decides which storage area holds `user` and `authToken`.
    pub remember_me: bool,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User, token: String, remember_me: bool) -> Self {
        Self {
            user,
            token,
            remember_me,
            started_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.user.effective_role()
    }
}

/// SessionContext
///
/// Holds at most one live session. Passed explicitly to every guard and
/// handler; there is no process-wide "current user".
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: Some(session),
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Session> {
        self.current.as_mut()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    /// Role of the signed-in user (student when the record has none), or
    /// `None` when nobody is signed in.
    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(Session::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Starts `session`, returning whichever session it replaced.
    pub fn begin(&mut self, session: Session) -> Option<Session> {
        self.current.replace(session)
    }

    pub fn end(&mut self) -> Option<Session> {
        self.current.take()
    }
}
