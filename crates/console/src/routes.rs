//! Navigable routes and the login guard.
//!
//! Every console command names the route it belongs to and is resolved here
//! before any request goes out.

use std::fmt;

use tracing::debug;

use crate::session::Session;

/// A screen of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Terminals,
    Groups,
    Chats,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Dashboard,
        Route::Terminals,
        Route::Groups,
        Route::Chats,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Terminals => "/terminales",
            Route::Groups => "/grupos",
            Route::Chats => "/chats",
        }
    }

    /// Exact match on a known path. Trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    /// Whether the route is only reachable with a session token.
    pub fn is_private(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the route.
    Render(Route),
    /// Go to another route instead.
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen.
    pub fn target(&self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => *route,
        }
    }
}

/// Resolves `path` for the given session.
///
/// The login screen is always reachable. Everything else requires a token;
/// without one the user is sent to the login screen. With a token, the root
/// and any unknown path land on the dashboard.
pub fn resolve(path: &str, session: &Session) -> Navigation {
    let route = Route::from_path(path);

    if route == Some(Route::Login) {
        return Navigation::Render(Route::Login);
    }

    if !session.is_authenticated() {
        debug!(path = %path, "No session token, redirecting to login");
        return Navigation::Redirect(Route::Login);
    }

    match route {
        Some(route) => Navigation::Render(route),
        None => {
            debug!(path = %path, "Unknown route, redirecting to dashboard");
            Navigation::Redirect(Route::Dashboard)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/grupos/"), Some(Route::Groups));
        assert_eq!(Route::from_path("/groups"), None);
    }

    #[test]
    fn test_unauthenticated_private_route_goes_to_login() {
        let session = Session::anonymous();
        assert_eq!(
            resolve("/grupos", &session),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(resolve("/", &session), Navigation::Redirect(Route::Login));
        assert_eq!(
            resolve("/nowhere", &session),
            Navigation::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_login_always_renders() {
        assert_eq!(
            resolve("/login", &Session::anonymous()),
            Navigation::Render(Route::Login)
        );
        assert_eq!(
            resolve("/login", &Session::with_token("t")),
            Navigation::Render(Route::Login)
        );
    }

    #[test]
    fn test_authenticated_root_goes_to_dashboard() {
        let session = Session::with_token("t");
        assert_eq!(resolve("/", &session), Navigation::Redirect(Route::Dashboard));
        assert_eq!(
            resolve("/unknown", &session),
            Navigation::Redirect(Route::Dashboard)
        );
        assert_eq!(resolve("/chats", &session), Navigation::Render(Route::Chats));
    }

    #[test]
    fn test_navigation_target() {
        assert_eq!(Navigation::Redirect(Route::Login).target(), Route::Login);
        assert_eq!(Navigation::Render(Route::Chats).target(), Route::Chats);
        assert!(!Route::Login.is_private());
        assert!(Route::Terminals.is_private());
    }
}
