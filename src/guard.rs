use crate::{models::Role, routes::Route, session::SessionContext};

/// GuardDecision
///
/// Outcome of a guard: show the page, or send the visitor elsewhere.
/// Computed on every navigation and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
}

/// Access
///
/// The policy attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
    AnyOf {
        allowed: &'static [Role],
        fallback: Route,
    },
}

impl Access {
    pub fn evaluate(&self, session: &SessionContext) -> GuardDecision {
        match *self {
            Self::Public => GuardDecision::Render,
            Self::Authenticated => require_authenticated(session),
            Self::Role(required) => require_role(session, required),
            Self::AnyOf { allowed, fallback } => require_any_role(session, allowed, fallback),
        }
    }
}

/// Any signed-in user; everyone else goes to the login page.
pub fn require_authenticated(session: &SessionContext) -> GuardDecision {
    match session.role() {
        Some(_) => GuardDecision::Render,
        None => GuardDecision::Redirect(Route::Login),
    }
}

/// Exactly `required`. Anonymous visitors and every other role go home.
pub fn require_role(session: &SessionContext, required: Role) -> GuardDecision {
    match session.role() {
        Some(role) if role == required => GuardDecision::Render,
        Some(role) => {
            tracing::debug!(%role, %required, "role guard redirect");
            GuardDecision::Redirect(Route::Home)
        }
        None => GuardDecision::Redirect(Route::Home),
    }
}

/// One of `allowed`. Anonymous visitors go home; signed-in users with
/// another role go to `fallback`.
pub fn require_any_role(
    session: &SessionContext,
    allowed: &[Role],
    fallback: Route,
) -> GuardDecision {
    match session.role() {
        Some(role) if allowed.contains(&role) => GuardDecision::Render,
        Some(role) => {
            tracing::debug!(%role, fallback = fallback.path(), "role-set guard redirect");
            GuardDecision::Redirect(fallback)
        }
        None => GuardDecision::Redirect(Route::Home),
    }
}
