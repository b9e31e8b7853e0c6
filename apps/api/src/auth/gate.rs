//! Session gate — runs on every request ahead of the router.
//!
//! 1. OPTIONS pre-flight: answered here with CORS headers, no session lookup.
//! 2. Attach a `SessionContext` to the request.
//! 3. Non-public path without a session: 303 to the login path.
//! 4. Otherwise run the handler.
//! 5. Stamp CORS headers on whatever response comes back.

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::context::SessionContext;
use crate::auth::session::extract_access_token;
use crate::state::AppState;

/// Which paths may be reached without a session.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public_paths: Vec<String>,
    login_path: String,
}

impl AccessPolicy {
    pub fn new(public_paths: Vec<String>, login_path: String) -> Self {
        Self {
            public_paths,
            login_path,
        }
    }

    /// Prefix match against the public list. The login path is always public.
    pub fn is_public(&self, path: &str) -> bool {
        path.starts_with(self.login_path.as_str())
            || self
                .public_paths
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

pub async fn session_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let cors = &state.config.cors;

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        cors.apply(response.headers_mut(), origin.as_deref(), true);
        return response;
    }

    let token = extract_access_token(request.headers(), &state.config.auth_cookie_name);
    let context = SessionContext::new(state.auth.clone(), token);
    request.extensions_mut().insert(context.clone());

    let access = &state.config.access;
    let path = request.uri().path().to_owned();
    let mut response = if !access.is_public(&path) && context.session().await.is_none() {
        debug!("No session for protected path {path}, redirecting");
        Redirect::to(access.login_path()).into_response()
    } else {
        next.run(request).await
    };

    cors.apply(response.headers_mut(), origin.as_deref(), false);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    use crate::state::testing::{test_state, StaticSessions};

    fn app(sessions: StaticSessions) -> Router {
        let state = test_state(sessions);
        Router::new()
            .route("/dashboard", get(|| async { "dashboard" }))
            .route("/api/leads", get(|| async { "leads" }))
            .route(
                "/whoami",
                get(|ctx: SessionContext| async move {
                    ctx.session()
                        .await
                        .and_then(|s| s.user.email)
                        .unwrap_or_default()
                }),
            )
            .layer(middleware::from_fn_with_state(state.clone(), session_gate))
            .with_state(state)
    }

    fn get_request(uri: &str) -> axum::http::request::Builder {
        HttpRequest::builder().method(Method::GET).uri(uri)
    }

    #[test]
    fn test_public_prefix_match() {
        let policy = AccessPolicy::new(vec!["/api/leads".to_string()], "/login".to_string());
        assert!(policy.is_public("/api/leads"));
        assert!(policy.is_public("/api/leads/extra"));
        assert!(policy.is_public("/login"));
        assert!(!policy.is_public("/api/estimate/analyze"));
        assert!(!policy.is_public("/"));
    }

    #[tokio::test]
    async fn test_protected_path_without_session_redirects() {
        let response = app(StaticSessions::signed_out())
            .oneshot(get_request("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://tracerlabs.io"
        );
    }

    #[tokio::test]
    async fn test_provider_failure_redirects() {
        let response = app(StaticSessions::failing())
            .oneshot(
                get_request("/dashboard")
                    .header(header::AUTHORIZATION, "Bearer token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_protected_path_with_session_runs_handler() {
        let response = app(StaticSessions::signed_in())
            .oneshot(
                get_request("/dashboard")
                    .header(header::COOKIE, "sb-access-token=token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_path_without_session_runs_handler() {
        let response = app(StaticSessions::signed_out())
            .oneshot(get_request("/api/leads").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_allowed_origin_echoed() {
        let response = app(StaticSessions::signed_out())
            .oneshot(
                get_request("/api/leads")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_fallback() {
        let response = app(StaticSessions::signed_out())
            .oneshot(
                get_request("/api/leads")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://tracerlabs.io"
        );
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let sessions = StaticSessions::signed_in();
        let response = app(sessions.clone())
            .oneshot(
                HttpRequest::builder()
                    .method(Method::OPTIONS)
                    .uri("/dashboard")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::AUTHORIZATION, "Bearer token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::ACCESS_CONTROL_MAX_AGE).is_some());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(sessions.calls(), 0);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_handler_reads_session_from_context() {
        let sessions = StaticSessions::signed_in();
        let response = app(sessions.clone())
            .oneshot(
                get_request("/whoami")
                    .header(header::AUTHORIZATION, "Bearer token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"user@example.com");
        // gate and handler share one lookup
        assert_eq!(sessions.calls(), 1);
    }
}
