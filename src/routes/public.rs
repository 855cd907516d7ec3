use super::{Route, RouteEntry};
use crate::guard::Access;

/// Public tier
///
/// Landing feed, the auth screens and the legal pages. The home page must stay
/// public: it is where every failed guard sends the visitor.
pub fn public_routes() -> Vec<RouteEntry> {
    [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::ForgotPassword,
        Route::Terms,
        Route::Privacy,
        Route::About,
    ]
    .into_iter()
    .map(|route| RouteEntry::new(route, Access::Public))
    .collect()
}
