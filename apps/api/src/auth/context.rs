//! Per-request session context, inserted into request extensions by the gate.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::auth::session::{Session, SessionProvider};
use crate::errors::AppError;

/// Session-aware client for one request: the provider handle plus the
/// request's access token. The lookup runs at most once and is shared by the
/// gate and every downstream handler.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn SessionProvider>,
    access_token: Option<String>,
    session: OnceCell<Option<Session>>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn SessionProvider>, access_token: Option<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                access_token,
                session: OnceCell::new(),
            }),
        }
    }

    pub fn provider(&self) -> &dyn SessionProvider {
        self.inner.provider.as_ref()
    }

    /// The request's session, if any.
    ///
    /// Provider failures are logged and treated as no session.
    pub async fn session(&self) -> Option<Session> {
        self.inner
            .session
            .get_or_init(|| async {
                let token = self.inner.access_token.as_deref()?;
                match self.provider().get_session(token).await {
                    Ok(Some(session)) if session.is_expired(Utc::now()) => None,
                    Ok(session) => session,
                    Err(e) => {
                        warn!("Session lookup failed, treating request as signed out: {e}");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "SessionContext missing: route is not behind the session gate"
                ))
            })
    }
}
