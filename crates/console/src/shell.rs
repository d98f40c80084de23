//! Route gate.

use serde::Serialize;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Users,
}

impl Route {
    /// Resolve a path. Unknown paths fall back to the login screen.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/users" | "users" => Route::Users,
            _ => Route::Login,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Users => "/users",
        }
    }

    pub fn requires_session(self) -> bool {
        matches!(self, Route::Users)
    }
}

/// Screen actually shown for `requested`.
///
/// Protected routes redirect to login without a session.
pub fn gate(requested: Route, authenticated: bool) -> Route {
    if requested.requires_session() && !authenticated {
        Route::Login
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_paths_resolve_to_login() {
        assert_eq!(Route::from_path("/"), Route::Login);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("/settings"), Route::Login);
        assert_eq!(Route::from_path("/users"), Route::Users);
        assert_eq!(Route::from_path("/users/"), Route::Users);
    }

    #[test]
    fn gate_redirects_without_session() {
        assert_eq!(gate(Route::Users, false), Route::Login);
        assert_eq!(gate(Route::Login, false), Route::Login);
        assert_eq!(gate(Route::Users, true), Route::Users);
        assert_eq!(gate(Route::Login, true), Route::Login);
    }

    #[test]
    fn path_round_trips() {
        for route in [Route::Login, Route::Users] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
