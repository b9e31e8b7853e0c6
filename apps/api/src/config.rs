use anyhow::{ensure, Context, Result};
use axum::http::HeaderValue;

use crate::auth::cors::CorsPolicy;
use crate::auth::gate::AccessPolicy;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://tracerlabs.io,https://www.tracerlabs.io,http://localhost:5173";
const DEFAULT_PUBLIC_PATHS: &str = "/login,/signup,/auth,/health,/lead-capture,\
    /api/session,/api/leads,/api/hubspot,/api/beastmode-earlyaccess";
const DEFAULT_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const DEFAULT_ALLOW_HEADERS: &str = "Content-Type, Authorization";
const DEFAULT_FRAME_ANCESTORS: &str = "'self' https://*.vercel.app";

/// Application configuration loaded from environment variables.
/// Built once at startup and shared read-only through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub hubspot_api_key: String,
    pub hubspot_api_url: String,
    pub anthropic_api_key: String,
    pub notify: NotifyConfig,
    pub cors: CorsPolicy,
    pub access: AccessPolicy,
    pub auth_cookie_name: String,
    pub embed: EmbedPolicy,
    pub port: u16,
    pub rust_log: String,
}

/// Addressing for the lead notification emails.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub from: String,
    pub to: String,
}

/// Framing headers sent with the embeddable lead-capture page.
#[derive(Debug, Clone)]
pub struct EmbedPolicy {
    pub content_security_policy: HeaderValue,
    pub x_frame_options: HeaderValue,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let cors = CorsPolicy::new(
            split_list(&var("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)),
            &var("CORS_ALLOW_METHODS", DEFAULT_ALLOW_METHODS),
            &var("CORS_ALLOW_HEADERS", DEFAULT_ALLOW_HEADERS),
            var("CORS_MAX_AGE_SECS", "86400")
                .parse::<u64>()
                .context("CORS_MAX_AGE_SECS must be a whole number of seconds")?,
        )?;

        let login_path = var("LOGIN_PATH", "/login");
        ensure!(login_path.starts_with('/'), "LOGIN_PATH must start with '/'");
        let access = AccessPolicy::new(split_list(&var("PUBLIC_PATHS", DEFAULT_PUBLIC_PATHS)), login_path);

        let frame_ancestors = var("EMBED_FRAME_ANCESTORS", DEFAULT_FRAME_ANCESTORS);
        let embed = EmbedPolicy {
            content_security_policy: HeaderValue::from_str(&format!(
                "frame-ancestors {frame_ancestors}"
            ))
            .context("EMBED_FRAME_ANCESTORS is not a valid header value")?,
            x_frame_options: HeaderValue::from_str(&var("EMBED_X_FRAME_OPTIONS", "SAMEORIGIN"))
                .context("EMBED_X_FRAME_OPTIONS is not a valid header value")?,
        };

        Ok(Config {
            supabase_url: require("SUPABASE_URL")?.trim_end_matches('/').to_string(),
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            resend_api_key: require("RESEND_API_KEY")?,
            resend_api_url: var("RESEND_API_URL", "https://api.resend.com/emails"),
            hubspot_api_key: require("HUBSPOT_API_KEY")?,
            hubspot_api_url: var(
                "HUBSPOT_API_URL",
                "https://api.hubapi.com/crm/v3/objects/leads",
            ),
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            notify: NotifyConfig {
                from: var("LEAD_NOTIFY_FROM", "info@tracerlabs.io"),
                to: require("LEAD_NOTIFY_TO")?,
            },
            cors,
            access,
            auth_cookie_name: var("AUTH_COOKIE_NAME", "sb-access-token"),
            embed,
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

/// Splits a comma-separated setting, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
