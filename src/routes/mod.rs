//! Route Table
//!
//! Every page of the client, grouped by access tier: pages anyone may open,
//! pages for any signed-in user, and pages gated on a role.

use crate::{
    guard::{Access, GuardDecision},
    models::Role,
    session::SessionContext,
};

/// Pages reachable without signing in.
pub mod public;

/// Pages for any signed-in user.
pub mod authenticated;

/// Role dashboards and role-restricted pages.
pub mod dashboards;

/// Route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    ForgotPassword,
    Terms,
    Privacy,
    About,
    Profile,
    Messages,
    Notifications,
    Roadmaps,
    Settings,
    MentorDashboard,
    CounsellorDashboard,
    AdminDashboard,
    Mentorship,
    CareerGuidance,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::ForgotPassword => "/forgot-password",
            Self::Terms => "/terms",
            Self::Privacy => "/privacy",
            Self::About => "/about",
            Self::Profile => "/profile",
            Self::Messages => "/messages",
            Self::Notifications => "/notifications",
            Self::Roadmaps => "/roadmaps",
            Self::Settings => "/settings",
            Self::MentorDashboard => "/mentor-dashboard",
            Self::CounsellorDashboard => "/counsellor-dashboard",
            Self::AdminDashboard => "/admin",
            Self::Mentorship => "/mentorship",
            Self::CareerGuidance => "/career-guidance",
        }
    }

    /// Matches a location against the table. Query strings, fragments and a
    /// trailing slash are ignored.
    pub fn from_path(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        route_table()
            .into_iter()
            .map(|entry| entry.route)
            .find(|route| route.path() == path)
    }

    /// Where a user with `role` lands after signing in.
    pub const fn home_for(role: Role) -> Self {
        match role {
            Role::Student => Self::Home,
            Role::Mentor => Self::MentorDashboard,
            Role::CareerCounselor => Self::CounsellorDashboard,
            Role::Admin => Self::AdminDashboard,
        }
    }

    pub fn access(self) -> Access {
        route_table()
            .into_iter()
            .find(|entry| entry.route == self)
            .map(|entry| entry.access)
            // Every variant is listed in one of the tiers.
            .unwrap_or(Access::Authenticated)
    }
}

/// RouteEntry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub route: Route,
    pub access: Access,
}

impl RouteEntry {
    pub const fn new(route: Route, access: Access) -> Self {
        Self { route, access }
    }
}

/// The full table, public tier first.
pub fn route_table() -> Vec<RouteEntry> {
    let mut table = public::public_routes();
    table.extend(authenticated::authenticated_routes());
    table.extend(dashboards::dashboard_routes());
    table
}

/// Navigation
///
/// Result of opening a location in the tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect { from: Route, to: Route },
    NotFound(String),
}

/// resolve
///
/// Looks the location up and runs its guard against the session.
pub fn resolve(location: &str, session: &SessionContext) -> Navigation {
    let Some(route) = Route::from_path(location) else {
        return Navigation::NotFound(location.to_string());
    };
    match route.access().evaluate(session) {
        GuardDecision::Render => Navigation::Render(route),
        GuardDecision::Redirect(to) => Navigation::Redirect { from: route, to },
    }
}
