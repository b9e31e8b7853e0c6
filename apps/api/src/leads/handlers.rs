//! Axum route handlers that forward form submissions to email and CRM.
//!
//! Bodies are taken raw so a malformed payload becomes the route's own error
//! response instead of Axum's extractor rejection.

use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::leads::email::OutboundEmail;
use crate::leads::models::{decode_submission, CrmLeadProperties, EarlyAccessRequest, LeadInfo};
use crate::leads::provider::ProviderError;
use crate::leads::render::{render_early_access_email, render_lead_email};
use crate::state::AppState;

const LEAD_SUBJECT: &str = "New Lead from Website Chat";
const EARLY_ACCESS_SUBJECT: &str = "Beastmode - New Early Access Request";

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<Value>,
}

impl SubmissionResponse {
    fn ok() -> Self {
        Self {
            success: true,
            lead: None,
        }
    }
}

/// POST /api/leads
///
/// Emails the lead and its chat transcript to the sales inbox.
pub async fn handle_lead(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>, AppError> {
    info!("Lead submission received");
    let failed = || AppError::submission(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process lead");

    let lead: LeadInfo = decode_submission(&body).map_err(|e| {
        error!("Lead body could not be parsed: {e}");
        failed()
    })?;
    debug!(?lead, "Lead payload");

    let email = OutboundEmail {
        from: state.config.notify.from.clone(),
        to: state.config.notify.to.clone(),
        subject: LEAD_SUBJECT.to_string(),
        html: render_lead_email(&lead),
    };
    state.mailer.send(&email).await.map_err(|e| {
        log_provider_error("Lead email", &e);
        failed()
    })?;

    Ok(Json(SubmissionResponse::ok()))
}

/// POST /api/beastmode-earlyaccess
pub async fn handle_early_access(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>, AppError> {
    info!("Early access submission received");
    let failed =
        || AppError::submission(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request");

    let request: EarlyAccessRequest = decode_submission(&body).map_err(|e| {
        error!("Early access body could not be parsed: {e}");
        failed()
    })?;
    debug!(?request, "Early access payload");

    let email = OutboundEmail {
        from: state.config.notify.from.clone(),
        to: state.config.notify.to.clone(),
        subject: EARLY_ACCESS_SUBJECT.to_string(),
        html: render_early_access_email(&request),
    };
    state.mailer.send(&email).await.map_err(|e| {
        log_provider_error("Early access email", &e);
        failed()
    })?;

    Ok(Json(SubmissionResponse::ok()))
}

/// POST /api/hubspot
///
/// Creates a CRM lead. Provider rejections keep the provider's status code
/// and body.
pub async fn handle_crm_lead(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>, AppError> {
    info!("CRM lead submission received");

    let lead: LeadInfo = decode_submission(&body).map_err(|e| {
        error!("CRM lead body could not be parsed: {e}");
        AppError::Submission {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to process request",
            details: Some(Value::String(e.to_string())),
        }
    })?;

    let properties = CrmLeadProperties::from(&lead);
    let created = state.crm.create_lead(&properties).await.map_err(|e| {
        log_provider_error("CRM lead creation", &e);
        match e {
            ProviderError::Rejected { status, details } => AppError::Submission {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: "Failed to create lead",
                details: Some(details),
            },
            ProviderError::Transport(message) => AppError::Submission {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to process request",
                details: Some(Value::String(message)),
            },
        }
    })?;
    info!("CRM lead created");

    Ok(Json(SubmissionResponse {
        success: true,
        lead: Some(created),
    }))
}

fn log_provider_error(what: &str, e: &ProviderError) {
    match e {
        ProviderError::Rejected { status, details } => {
            error!("{what} rejected by provider (status {status}): {details}")
        }
        ProviderError::Transport(e) => error!("{what} failed: {e}"),
    }
}
