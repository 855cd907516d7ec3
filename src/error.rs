use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> inline message, in a stable order for display.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Raised when a status change would leave both mentor and counsellor approved.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("a user cannot be an approved mentor and an approved counsellor at the same time")]
pub struct ApprovalConflict;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixtures are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture user '{username}' is approved as both mentor and counsellor")]
    Invariant { username: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Something went wrong. Please try again.")]
    Failed(String),
}

/// AuthError
///
/// Display strings double as the inline text shown on the auth screens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please correct the highlighted fields.")]
    Validation(FieldErrors),

    #[error("No account found with that email or username.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    InvalidCredentials,

    #[error("Your session is invalid. Please sign in again.")]
    InvalidToken,

    #[error("Your session has expired. Please sign in again.")]
    TokenExpired,

    #[error("could not issue a session token: {0}")]
    TokenIssue(jsonwebtoken::errors::Error),

    #[error("session lifetime is out of range")]
    TokenLifetime,

    #[error("Please sign in first.")]
    NotAuthenticated,

    #[error("You do not have access to this action.")]
    Forbidden,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Please correct the highlighted fields.")]
    Validation(FieldErrors),

    #[error("Please sign in first.")]
    NotAuthenticated,

    #[error("This account no longer exists.")]
    UserNotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagingError {
    #[error("Please sign in first.")]
    NotAuthenticated,

    #[error("Conversation not found.")]
    ConversationNotFound,

    #[error("Message cannot be empty.")]
    EmptyMessage,

    #[error("Message is too long (max {max} characters).")]
    MessageTooLong { max: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("Please sign in first.")]
    NotAuthenticated,

    #[error("You do not have access to this action.")]
    Forbidden,

    #[error("An application is already pending or approved.")]
    AlreadyApplied,

    #[error("There is no pending application to review.")]
    NoPendingApplication,

    #[error("User not found.")]
    UserNotFound,

    #[error(transparent)]
    Conflict(#[from] ApprovalConflict),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
