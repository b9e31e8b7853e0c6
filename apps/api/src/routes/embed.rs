//! Embeddable lead-capture page. Framing headers come from `EmbedPolicy`.

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::EmbedPolicy;
use crate::state::AppState;

const LEAD_CAPTURE_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Tell us about your project</title></head>
<body>
<form id="lead-capture">
  <input name="name" placeholder="Name">
  <input name="email" type="email" placeholder="Email">
  <input name="businessName" placeholder="Business name">
  <textarea name="projectGoal" placeholder="What are you building?"></textarea>
  <button type="submit">Send</button>
</form>
<script>
document.getElementById('lead-capture').addEventListener('submit', async (event) => {
  event.preventDefault();
  const body = Object.fromEntries(new FormData(event.target));
  await fetch('/api/leads', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body)
  });
  event.target.reset();
});
</script>
</body>
</html>"#;

async fn lead_capture_page() -> impl IntoResponse {
    Html(LEAD_CAPTURE_PAGE)
}

/// GET /lead-capture with the configured framing headers.
pub fn embed_routes(policy: &EmbedPolicy) -> Router<AppState> {
    Router::new()
        .route("/lead-capture", get(lead_capture_page))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            policy.content_security_policy.clone(),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            policy.x_frame_options.clone(),
        ))
}
