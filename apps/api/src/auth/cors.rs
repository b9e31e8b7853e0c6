//! CORS policy applied by the session gate to every response.
//!
//! Unlike `tower_http::cors::CorsLayer`, a request from an origin outside the
//! allow-list still gets an `Access-Control-Allow-Origin` header: the first
//! allow-list entry. Every response carries exactly one value.

use anyhow::{ensure, Context, Result};
use axum::http::{header, HeaderMap, HeaderValue};

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    /// Non-empty; the first entry is the fallback origin.
    allowed_origins: Vec<String>,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn new(
        allowed_origins: Vec<String>,
        allow_methods: &str,
        allow_headers: &str,
        max_age_secs: u64,
    ) -> Result<Self> {
        ensure!(
            !allowed_origins.is_empty(),
            "ALLOWED_ORIGINS must contain at least one origin"
        );
        for origin in &allowed_origins {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Allowed origin '{origin}' is not a valid header value"))?;
        }

        Ok(Self {
            allowed_origins,
            allow_methods: HeaderValue::from_str(allow_methods)
                .context("CORS_ALLOW_METHODS is not a valid header value")?,
            allow_headers: HeaderValue::from_str(allow_headers)
                .context("CORS_ALLOW_HEADERS is not a valid header value")?,
            max_age: HeaderValue::from(max_age_secs),
        })
    }

    pub fn fallback_origin(&self) -> &str {
        &self.allowed_origins[0]
    }

    /// The origin to echo back: the request origin when it matches an
    /// allow-list entry exactly, otherwise the fallback origin.
    pub fn allow_origin_for(&self, request_origin: Option<&str>) -> &str {
        request_origin
            .and_then(|origin| {
                self.allowed_origins
                    .iter()
                    .find(|allowed| allowed.as_str() == origin)
            })
            .map(String::as_str)
            .unwrap_or_else(|| self.fallback_origin())
    }

    /// Writes the CORS headers, replacing any set downstream. `Vary` is
    /// extended rather than replaced. Pre-flight responses also get the
    /// max-age directive.
    pub fn apply(&self, headers: &mut HeaderMap, request_origin: Option<&str>, preflight: bool) {
        // allow-list entries are validated in `new`
        if let Ok(origin) = HeaderValue::from_str(self.allow_origin_for(request_origin)) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allow_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        if !varies_on_origin(headers) {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
        if preflight {
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        }
    }
}

fn varies_on_origin(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|name| name == "*" || name.eq_ignore_ascii_case("origin"))
}
