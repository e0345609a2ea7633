pub mod auth;
pub mod error;
pub mod response;
pub mod users;
pub mod views;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::domain::Session;
use crate::routing::{AuthState, NavigationOutcome};
use crate::state::AppState;

use error::ApiError;

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/views/home", get(views::home))
        .route("/api/views/daily", get(views::daily))
        .route("/api/views/hourly", get(views::hourly))
        .route("/api/users", get(users::list))
        .route("/api/users/:id/role", put(users::update_role))
        .route("/api/users/:id", delete(users::remove))
        .with_state(state);

    if cfg.server.enable_cors {
        use tower_http::cors::{Any, CorsLayer};
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}

/// Resolve the bearer token (if any) and run the navigation decision for
/// the logical route backing a handler. Denials map onto the API error
/// taxonomy: no/expired session is 401 with the login redirect, a role
/// mismatch is 403 with the default authorized route.
pub(crate) fn authorize(
    state: &AppState,
    bearer: Option<&str>,
    route: &'static str,
) -> Result<Session, ApiError> {
    let session = bearer.and_then(|token| state.sessions.verify(token));
    let auth_state = match &session {
        Some(s) => AuthState::Authenticated(s.role),
        None => AuthState::Unauthenticated,
    };

    match state.routes.decide(&auth_state, route) {
        NavigationOutcome::Permit => session.ok_or_else(|| ApiError::Internal(
            "permit without session on a gated route".to_string(),
        )),
        NavigationOutcome::Pending => Err(ApiError::Internal(
            "navigation pending outside session restore".to_string(),
        )),
        NavigationOutcome::RedirectTo(redirect) => {
            if session.is_some() {
                Err(ApiError::Forbidden { redirect })
            } else {
                Err(ApiError::Unauthorized { redirect })
            }
        }
    }
}
