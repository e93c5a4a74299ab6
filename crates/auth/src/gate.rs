//! Navigation-time authorization gate.
//!
//! - No IO
//! - No panics
//! - Token *presence* only: an expired token still passes until an API call
//!   rejects it.

use serde::Serialize;

/// Destinations reachable without a session.
pub const PUBLIC_PATHS: [&str; 2] = ["/signin", "/signup"];

/// Client-side route surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Dashboard,
    SignUp,
    SignIn,
    /// Catch-all for any unknown path.
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match normalize(path) {
            "/" => Route::Dashboard,
            "/signup" => Route::SignUp,
            "/signin" => Route::SignIn,
            _ => Route::NotFound,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::SignUp => "signup",
            Route::SignIn => "signin",
            Route::NotFound => "not-found",
        }
    }

    /// Canonical path; the catch-all has none.
    pub fn path(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("/"),
            Route::SignUp => Some("/signup"),
            Route::SignIn => Some("/signin"),
            Route::NotFound => None,
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum GateDecision {
    Allow(Route),
    Redirect(Route),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }

    /// Where the navigation actually lands.
    pub fn route(&self) -> Route {
        match self {
            GateDecision::Allow(route) | GateDecision::Redirect(route) => *route,
        }
    }
}

/// Decide a single navigation.
pub fn authorize_navigation(path: &str, has_token: bool) -> GateDecision {
    let normalized = normalize(path);
    let route = Route::resolve(path);

    if PUBLIC_PATHS.contains(&normalized) {
        return GateDecision::Allow(route);
    }

    if has_token {
        GateDecision::Allow(route)
    } else {
        tracing::debug!(path = normalized, "navigation redirected to sign-in");
        GateDecision::Redirect(Route::SignIn)
    }
}

/// Drop query/fragment and a trailing slash (except on the root).
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ if path.is_empty() => "/",
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_path_without_token_redirects_to_signin() {
        assert_eq!(
            authorize_navigation("/", false),
            GateDecision::Redirect(Route::SignIn)
        );
        assert_eq!(
            authorize_navigation("/reports/monthly", false),
            GateDecision::Redirect(Route::SignIn)
        );
    }

    #[test]
    fn protected_path_with_token_is_allowed() {
        assert_eq!(
            authorize_navigation("/", true),
            GateDecision::Allow(Route::Dashboard)
        );
        assert_eq!(
            authorize_navigation("/nowhere", true),
            GateDecision::Allow(Route::NotFound)
        );
    }

    #[test]
    fn public_paths_are_always_allowed() {
        for has_token in [false, true] {
            assert_eq!(
                authorize_navigation("/signin", has_token),
                GateDecision::Allow(Route::SignIn)
            );
            assert_eq!(
                authorize_navigation("/signup", has_token),
                GateDecision::Allow(Route::SignUp)
            );
        }
    }

    #[test]
    fn query_and_trailing_slash_are_ignored() {
        assert_eq!(
            authorize_navigation("/signin/?next=/", false),
            GateDecision::Allow(Route::SignIn)
        );
        assert_eq!(Route::resolve(""), Route::Dashboard);
        assert_eq!(Route::resolve("/#top"), Route::Dashboard);
    }

    #[test]
    fn route_names_and_paths() {
        assert_eq!(Route::SignIn.path(), Some("/signin"));
        assert_eq!(Route::NotFound.path(), None);
        assert_eq!(Route::Dashboard.to_string(), "dashboard");
    }

    #[test]
    fn decision_exposes_landing_route() {
        let decision = authorize_navigation("/", false);
        assert!(!decision.is_allowed());
        assert_eq!(decision.route(), Route::SignIn);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: with a token, every path is allowed and lands on its own route.
            #[test]
            fn token_allows_everything(path in "/[a-z0-9/?#=]{0,30}") {
                let decision = authorize_navigation(&path, true);
                prop_assert_eq!(decision, GateDecision::Allow(Route::resolve(&path)));
            }

            /// Property: without a token, only the public routes are reachable.
            #[test]
            fn no_token_only_reaches_public_routes(path in "/[a-z0-9/?#=]{0,30}") {
                let decision = authorize_navigation(&path, false);
                match Route::resolve(&path) {
                    Route::SignIn | Route::SignUp => prop_assert!(decision.is_allowed()),
                    _ => prop_assert_eq!(decision, GateDecision::Redirect(Route::SignIn)),
                }
            }
        }
    }
}
