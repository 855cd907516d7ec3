use super::{Route, RouteEntry};
use crate::{guard::Access, models::Role};

const MENTORSHIP_ROLES: &[Role] = &[Role::Student, Role::Mentor];
const GUIDANCE_ROLES: &[Role] = &[Role::Student, Role::CareerCounselor];

/// Role tier
///
/// Single-role dashboards redirect every other role home. The shared pages
/// take an allowed set and a fallback instead.
pub fn dashboard_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new(Route::MentorDashboard, Access::Role(Role::Mentor)),
        RouteEntry::new(Route::CounsellorDashboard, Access::Role(Role::CareerCounselor)),
        RouteEntry::new(Route::AdminDashboard, Access::Role(Role::Admin)),
        RouteEntry::new(
            Route::Mentorship,
            Access::AnyOf {
                allowed: MENTORSHIP_ROLES,
                fallback: Route::Home,
            },
        ),
        RouteEntry::new(
            Route::CareerGuidance,
            Access::AnyOf {
                allowed: GUIDANCE_ROLES,
                fallback: Route::Home,
            },
        ),
    ]
}
