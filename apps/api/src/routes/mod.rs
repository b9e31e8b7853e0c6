pub mod embed;
pub mod health;
pub mod session;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::gate::session_gate;
use crate::estimation::handlers as estimation;
use crate::leads::handlers as leads;
use crate::state::AppState;

/// JSON API routes, without the session gate.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(session::session_handler))
        // Lead forwarding (public)
        .route("/api/leads", post(leads::handle_lead))
        .route("/api/hubspot", post(leads::handle_crm_lead))
        .route(
            "/api/beastmode-earlyaccess",
            post(leads::handle_early_access),
        )
        // Estimator (session required)
        .route("/api/estimate/analyze", post(estimation::handle_analyze))
        .route(
            "/api/estimate/recalculate",
            post(estimation::handle_recalculate),
        )
}

/// Full application router. Every route, including the fallback, runs
/// behind the session gate.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api_routes())
        .merge(embed::embed_routes(&state.config.embed))
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
}
