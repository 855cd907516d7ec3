use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::ApprovalConflict;

// --- Roles & Approval ---

/// Role
///
/// The RBAC attribute of a user record. A record with no role at all is a
/// student (see `User::effective_role`), never an anonymous visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Mentor,
    #[serde(alias = "counselor", alias = "counsellor", alias = "career_counsellor")]
    CareerCounselor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Mentor, Role::CareerCounselor, Role::Admin];

    /// Wire/storage name, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Mentor => "mentor",
            Self::CareerCounselor => "career_counselor",
            Self::Admin => "admin",
        }
    }

    /// Human label used in notices.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Mentor => "Mentor",
            Self::CareerCounselor => "Career Counselor",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "student" => Ok(Self::Student),
            "mentor" => Ok(Self::Mentor),
            "career_counselor" | "career_counsellor" | "counselor" | "counsellor" => {
                Ok(Self::CareerCounselor)
            }
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// ApprovalStatus
///
/// Lifecycle of a mentor or counsellor application: `none -> pending -> approved`,
/// with rejection moving `pending` back to `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    None,
    Pending,
    Approved,
}

impl ApprovalStatus {
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

// --- Identity ---

/// User
///
/// The identity record supplied by the identity store. Field names follow the
/// camelCase keys of the fixture document and of the `user` storage entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    // Mock credential from the fixtures. Never written back to storage.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub mentor_status: ApprovalStatus,
    #[serde(default)]
    pub counsellor_status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl User {
    /// The role used for every authorization decision. Unset means student.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Fails if both application statuses are approved.
    pub fn check_approvals(&self) -> Result<(), ApprovalConflict> {
        if self.mentor_status.is_approved() && self.counsellor_status.is_approved() {
            return Err(ApprovalConflict);
        }
        Ok(())
    }

    /// Sets the mentor status, refusing to create a second approval.
    pub fn set_mentor_status(&mut self, status: ApprovalStatus) -> Result<(), ApprovalConflict> {
        if status.is_approved() && self.counsellor_status.is_approved() {
            return Err(ApprovalConflict);
        }
        self.mentor_status = status;
        Ok(())
    }

    /// Sets the counsellor status, refusing to create a second approval.
    pub fn set_counsellor_status(
        &mut self,
        status: ApprovalStatus,
    ) -> Result<(), ApprovalConflict> {
        if status.is_approved() && self.mentor_status.is_approved() {
            return Err(ApprovalConflict);
        }
        self.counsellor_status = status;
        Ok(())
    }
}

/// UserProfile
///
/// Output view of a user for profile pages and `whoami`. Carries no credential.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub mentor_status: ApprovalStatus,
    pub counsellor_status: ApprovalStatus,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.effective_role(),
            mentor_status: user.mentor_status,
            counsellor_status: user.counsellor_status,
            headline: user.headline.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            skills: user.skills.clone(),
        }
    }
}

// --- Request Payloads (Form Inputs) ---

/// LoginRequest
///
/// `identifier` is either an email address or a username.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// SignupRequest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

/// ProfileUpdate
///
/// Partial profile edit. `None` leaves the field untouched; an empty string
/// clears an optional field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// ApplicationKind
///
/// Which elevated role a student is applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    Mentor,
    Counsellor,
}

impl FromStr for ApplicationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mentor" => Ok(Self::Mentor),
            "counsellor" | "counselor" | "career_counselor" => Ok(Self::Counsellor),
            other => Err(format!("unknown application kind '{other}'")),
        }
    }
}

/// ReviewDecision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            other => Err(format!("unknown decision '{other}'")),
        }
    }
}

// --- Dashboard Schemas ---

/// AdminDashboardStats
///
/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardStats {
    pub total_users: usize,
    pub students: usize,
    pub mentors: usize,
    pub counselors: usize,
    pub admins: usize,
    pub pending_mentor_applications: usize,
    pub pending_counsellor_applications: usize,
    pub unread_notifications: usize,
}

// --- Notifications ---

/// NotificationKind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Connection,
    Message,
    Mentorship,
    Application,
    System,
}

/// Notification
///
/// A single notification addressed to `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    // Exposed as "type" in the fixture document.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub text: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// --- Messaging ---

/// Message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Conversation
///
/// Messages are kept in the order they were sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub participants: Vec<Uuid>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.sent_at)
    }
}

/// ConversationSummary
///
/// Row of the inbox list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: Uuid,
    pub with: Vec<Uuid>,
    pub last_message: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
}

// --- Learning Roadmaps ---

/// RoadmapStep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Roadmap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub id: String,
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: String,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

// --- Career Tips ---

/// CareerTip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareerTip {
    pub id: u32,
    pub text: String,
    pub category: String,
}
