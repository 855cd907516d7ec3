use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::error::SubmissionError;

/// FormKind
///
/// The forms whose submission is faked with a delayed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Signup,
    PasswordReset,
    ProfileUpdate,
    RoleApplication,
}

impl FormKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::PasswordReset => "password_reset",
            Self::ProfileUpdate => "profile_update",
            Self::RoleApplication => "role_application",
        }
    }
}

// 1. SubmissionService Contract
/// SubmissionService
///
/// Stands in for the network round-trip a form would make. There is no
/// backend: the only observable effect is the delay (or a simulated failure).
/// Not cancellable, never retried, no ordering guarantee between forms.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, form: FormKind) -> Result<(), SubmissionError>;
}

/// SubmissionState
pub type SubmissionState = Arc<dyn SubmissionService>;

// 2. The Runtime Implementation
/// SimulatedSubmission
///
/// Resolves after a fixed delay on the tokio timer.
#[derive(Clone)]
pub struct SimulatedSubmission {
    delay: Duration,
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SubmissionService for SimulatedSubmission {
    async fn submit(&self, form: FormKind) -> Result<(), SubmissionError> {
        tracing::debug!(form = form.as_str(), delay_ms = self.delay.as_millis() as u64, "simulated submission");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

// 3. The Mock Implementation (For Tests)
/// MockSubmission
///
/// Completes immediately; `new_failing` makes every submission fail.
#[derive(Clone, Default)]
pub struct MockSubmission {
    pub should_fail: bool,
}

impl MockSubmission {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl SubmissionService for MockSubmission {
    async fn submit(&self, form: FormKind) -> Result<(), SubmissionError> {
        if self.should_fail {
            return Err(SubmissionError::Failed(format!(
                "mock failure for {}",
                form.as_str()
            )));
        }
        Ok(())
    }
}
