//! Role-gated navigation.
//!
//! Mirrors the dashboard's route map: which logical destination a user in a
//! given auth state may visit, and where to send them otherwise.

use crate::domain::Role;

pub const LOGIN: &str = "/login";
pub const DASHBOARD_HOME: &str = "/dashboard/home";
pub const DASHBOARD_DAILY: &str = "/dashboard/daily";
pub const DASHBOARD_HOURLY: &str = "/dashboard/hourly";
pub const CHATBOT: &str = "/chatbot";
pub const USERS: &str = "/users";

/// Where a role-denied navigation lands.
pub const DEFAULT_AUTHORIZED: &str = DASHBOARD_DAILY;

/// Authentication lifecycle. `Authenticating` covers the window between
/// app start and the session-restore attempt resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated(Role),
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Permit,
    /// Session restore still in flight; the caller should wait, not redirect.
    Pending,
    RedirectTo(String),
}

struct Route {
    path: &'static str,
    public: bool,
    /// Empty means any authenticated role.
    required: &'static [Role],
}

/// Declarative route map with required-role lists.
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                Route { path: LOGIN, public: true, required: &[] },
                Route { path: DASHBOARD_HOME, public: false, required: &[] },
                Route { path: DASHBOARD_DAILY, public: false, required: &[] },
                Route { path: DASHBOARD_HOURLY, public: false, required: &[] },
                Route { path: CHATBOT, public: false, required: &[Role::Analyst, Role::Admin] },
                Route { path: USERS, public: false, required: &[Role::Admin] },
            ],
        }
    }
}

impl RouteTable {
    /// Decide a navigation request. Unauthenticated users are sent to the
    /// login entry point with the intended destination preserved; users
    /// whose role is not in the route's required list are sent to the
    /// default authorized route.
    pub fn decide(&self, state: &AuthState, path: &str) -> NavigationOutcome {
        let Some(route) = self.routes.iter().find(|r| r.path == path) else {
            return match state {
                AuthState::Unauthenticated => redirect_to_login(path),
                AuthState::Authenticating => NavigationOutcome::Pending,
                AuthState::Authenticated(_) => {
                    NavigationOutcome::RedirectTo(DEFAULT_AUTHORIZED.to_string())
                }
            };
        };

        if route.public {
            return NavigationOutcome::Permit;
        }

        match state {
            AuthState::Unauthenticated => redirect_to_login(path),
            AuthState::Authenticating => NavigationOutcome::Pending,
            AuthState::Authenticated(role) => {
                if route.required.is_empty() || route.required.contains(role) {
                    NavigationOutcome::Permit
                } else {
                    NavigationOutcome::RedirectTo(DEFAULT_AUTHORIZED.to_string())
                }
            }
        }
    }

    pub fn required_roles(&self, path: &str) -> Option<&'static [Role]> {
        self.routes.iter().find(|r| r.path == path).map(|r| r.required)
    }
}

fn redirect_to_login(intended: &str) -> NavigationOutcome {
    NavigationOutcome::RedirectTo(format!("{LOGIN}?next={intended}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DASHBOARD_HOME)]
    #[case(DASHBOARD_DAILY)]
    #[case(DASHBOARD_HOURLY)]
    fn any_authenticated_role_reaches_the_dashboards(#[case] path: &str) {
        let table = RouteTable::default();
        for role in [Role::Admin, Role::Analyst, Role::Viewer] {
            assert_eq!(
                table.decide(&AuthState::Authenticated(role), path),
                NavigationOutcome::Permit,
            );
        }
    }

    #[test]
    fn viewer_is_redirected_from_analyst_routes_to_the_default() {
        let table = RouteTable::default();
        assert_eq!(
            table.decide(&AuthState::Authenticated(Role::Viewer), CHATBOT),
            NavigationOutcome::RedirectTo(DASHBOARD_DAILY.to_string()),
        );
        assert_eq!(
            table.decide(&AuthState::Authenticated(Role::Analyst), CHATBOT),
            NavigationOutcome::Permit,
        );
    }

    #[test]
    fn users_route_is_admin_only() {
        let table = RouteTable::default();
        assert_eq!(
            table.decide(&AuthState::Authenticated(Role::Admin), USERS),
            NavigationOutcome::Permit,
        );
        for role in [Role::Analyst, Role::Viewer] {
            assert_eq!(
                table.decide(&AuthState::Authenticated(role), USERS),
                NavigationOutcome::RedirectTo(DASHBOARD_DAILY.to_string()),
            );
        }
    }

    #[test]
    fn unauthenticated_is_sent_to_login_preserving_destination() {
        let table = RouteTable::default();
        assert_eq!(
            table.decide(&AuthState::Unauthenticated, DASHBOARD_HOURLY),
            NavigationOutcome::RedirectTo("/login?next=/dashboard/hourly".to_string()),
        );
    }

    #[test]
    fn login_is_public_in_every_state() {
        let table = RouteTable::default();
        for state in [
            AuthState::Unauthenticated,
            AuthState::Authenticating,
            AuthState::Authenticated(Role::Viewer),
        ] {
            assert_eq!(table.decide(&state, LOGIN), NavigationOutcome::Permit);
        }
    }

    #[test]
    fn authenticating_holds_navigation() {
        let table = RouteTable::default();
        assert_eq!(
            table.decide(&AuthState::Authenticating, DASHBOARD_HOME),
            NavigationOutcome::Pending,
        );
    }

    #[test]
    fn unknown_paths_redirect_by_state() {
        let table = RouteTable::default();
        assert_eq!(
            table.decide(&AuthState::Authenticated(Role::Admin), "/nowhere"),
            NavigationOutcome::RedirectTo(DASHBOARD_DAILY.to_string()),
        );
        assert_eq!(
            table.decide(&AuthState::Unauthenticated, "/nowhere"),
            NavigationOutcome::RedirectTo("/login?next=/nowhere".to_string()),
        );
    }
}
