use super::{Route, RouteEntry};
use crate::guard::Access;

/// Authenticated tier
///
/// Pages every signed-in user has regardless of role. Anonymous visitors are
/// sent to the login page.
pub fn authenticated_routes() -> Vec<RouteEntry> {
    [
        Route::Profile,
        Route::Messages,
        Route::Notifications,
        Route::Roadmaps,
        Route::Settings,
    ]
    .into_iter()
    .map(|route| RouteEntry::new(route, Access::Authenticated))
    .collect()
}
