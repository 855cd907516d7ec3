//! Role switching between the student, mentor and counselor personas.
//!
//! ```text
//! student <-> mentor <-> career_counselor
//! ```
//!
//! Approvals lock users in: an approved counsellor can no longer switch at
//! all, and an approved mentor can no longer go back to student.

use std::str::FromStr;

use thiserror::Error;

use crate::{
    models::{Role, User},
    routes::Route,
    session::SessionContext,
};

/// SwitchTarget
///
/// The roles a user can ask to switch to. Admin is not part of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchTarget {
    Student,
    Mentor,
    CareerCounselor,
}

impl From<SwitchTarget> for Role {
    fn from(target: SwitchTarget) -> Self {
        match target {
            SwitchTarget::Student => Role::Student,
            SwitchTarget::Mentor => Role::Mentor,
            SwitchTarget::CareerCounselor => Role::CareerCounselor,
        }
    }
}

impl TryFrom<Role> for SwitchTarget {
    type Error = SwitchDenied;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Student => Ok(Self::Student),
            Role::Mentor => Ok(Self::Mentor),
            Role::CareerCounselor => Ok(Self::CareerCounselor),
            Role::Admin => Err(SwitchDenied::NotSwitchable),
        }
    }
}

impl FromStr for SwitchTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role: Role = s.parse()?;
        Self::try_from(role).map_err(|_| format!("cannot switch to '{s}'"))
    }
}

/// SwitchDenied
///
/// Why a switch was refused. The display text is the message shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDenied {
    #[error("Please sign in to switch roles.")]
    NotAuthenticated,

    #[error("Approved career counsellors cannot switch roles.")]
    CounsellorLocked,

    #[error("Approved mentors cannot switch back to student.")]
    MentorLocked,

    #[error("This account cannot switch roles.")]
    NotSwitchable,
}

/// RoleSwitch
///
/// A successful transition: the new role, the transient notice and, when the
/// new role has its own home, where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSwitch {
    pub from: Role,
    pub role: Role,
    pub notice: String,
    pub navigate_to: Option<Route>,
}

/// SwitchOutcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched(RoleSwitch),
    Blocked(SwitchDenied),
}

impl SwitchOutcome {
    /// The text to flash at the user either way.
    pub fn message(&self) -> String {
        match self {
            Self::Switched(switch) => switch.notice.clone(),
            Self::Blocked(reason) => reason.to_string(),
        }
    }
}

/// evaluate
///
/// The lock-in rules, in precedence order. Pure: reads the user, changes nothing.
pub fn evaluate(user: &User, target: SwitchTarget) -> Result<(), SwitchDenied> {
    if user.counsellor_status.is_approved() {
        return Err(SwitchDenied::CounsellorLocked);
    }
    if user.mentor_status.is_approved() && target == SwitchTarget::Student {
        return Err(SwitchDenied::MentorLocked);
    }
    if user.effective_role() == Role::Admin {
        return Err(SwitchDenied::NotSwitchable);
    }
    Ok(())
}

/// Page to open after switching. Counselors stay on the current page.
pub const fn destination(target: SwitchTarget) -> Option<Route> {
    match target {
        SwitchTarget::Student => Some(Route::Home),
        SwitchTarget::Mentor => Some(Route::MentorDashboard),
        SwitchTarget::CareerCounselor => None,
    }
}

/// switch_role
///
/// Applies a switch to the live session. A blocked switch leaves the session
/// exactly as it was.
pub fn switch_role(session: &mut SessionContext, target: SwitchTarget) -> SwitchOutcome {
    let Some(current) = session.current_mut() else {
        return SwitchOutcome::Blocked(SwitchDenied::NotAuthenticated);
    };

    if let Err(reason) = evaluate(&current.user, target) {
        tracing::warn!(user_id = %current.user.id, ?target, %reason, "role switch blocked");
        return SwitchOutcome::Blocked(reason);
    }

    let from = current.role();
    let role = Role::from(target);
    current.user.role = Some(role);

    tracing::info!(user_id = %current.user.id, %from, to = %role, "role switched");
    SwitchOutcome::Switched(RoleSwitch {
        from,
        role,
        notice: format!("Switched to {} mode.", role.label()),
        navigate_to: destination(target),
    })
}
