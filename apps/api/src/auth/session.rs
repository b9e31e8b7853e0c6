//! Session lookup against the external auth provider.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth provider error (status {status}): {message}")]
    Provider { status: u16, message: String },
}

/// The provider's view of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A validated session. Never mutated locally.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: AuthUser,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Resolves an access token to a session.
///
/// `Ok(None)` means the token is unknown or revoked; `Err` means the provider
/// could not answer.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError>;
}

/// Supabase GoTrue client: `GET {url}/auth/v1/user`.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(client: Client, base_url: String, anon_key: String) -> Self {
        Self {
            client,
            base_url,
            anon_key,
        }
    }
}

#[async_trait]
impl SessionProvider for SupabaseAuth {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            debug!("Auth provider rejected access token ({status})");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let user: AuthUser = response.json().await?;
        Ok(Some(Session {
            access_token: access_token.to_string(),
            user,
            expires_at: token_expiry(access_token),
        }))
    }
}

/// Finds the access token: bearer header first, then the auth cookie.
pub fn extract_access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Reads the `exp` claim without verifying the signature; the provider has
/// already vouched for the token.
fn token_expiry(access_token: &str) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Claims {
        exp: i64,
    }

    let payload = access_token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&decoded).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    #[test]
    fn test_bearer_header_preferred_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=xyz"));
        assert_eq!(
            extract_access_token(&headers, "sb-access-token").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        for value in ["bearer abc", "BEARER abc", "BeArEr  abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
            assert_eq!(
                extract_access_token(&headers, "sb-access-token").as_deref(),
                Some("abc"),
                "{value}"
            );
        }
    }

    #[test]
    fn test_other_scheme_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=xyz"));
        assert_eq!(
            extract_access_token(&headers, "sb-access-token").as_deref(),
            Some("xyz")
        );
    }

    #[test]
    fn test_cookie_token_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sb-access-token=xyz; other=1"),
        );
        assert_eq!(
            extract_access_token(&headers, "sb-access-token").as_deref(),
            Some("xyz")
        );
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token="));
        assert_eq!(extract_access_token(&headers, "sb-access-token"), None);
    }

    #[test]
    fn test_token_expiry_from_payload() {
        // {"exp":1700000000}
        let token = "eyJhbGciOiJIUzI1NiJ9.eyJleHAiOjE3MDAwMDAwMDB9.sig";
        let expected = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(token_expiry(token), Some(expected));
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        assert_eq!(token_expiry("opaque-token"), None);
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            access_token: "t".to_string(),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: None,
            },
            expires_at: Some(now - chrono::Duration::seconds(1)),
        };
        assert!(session.is_expired(now));
        assert!(!Session {
            expires_at: None,
            ..session
        }
        .is_expired(now));
    }
}
