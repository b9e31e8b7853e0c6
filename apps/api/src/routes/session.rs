use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::context::SessionContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Option<SessionView>,
}

/// GET /api/session
///
/// The current session for the page layer, or `null`. Never exposes the token.
pub async fn session_handler(context: SessionContext) -> Json<SessionResponse> {
    let session = context.session().await.map(|s| SessionView {
        user_id: s.user.id,
        email: s.user.email,
        expires_at: s.expires_at,
    });
    Json(SessionResponse { session })
}
