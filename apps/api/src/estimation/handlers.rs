//! Axum route handlers for the project estimator. Both routes sit behind the
//! session gate.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::context::SessionContext;
use crate::errors::AppError;
use crate::estimation::calculations::{
    months_to_weeks, percentage_of, risk_level_for, weeks_to_months, RiskLevel,
};
use crate::estimation::prompts::{
    build_initial_analysis_prompt, build_recalculation_prompt, RecalculationInput,
    ESTIMATION_SYSTEM,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub requirements: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// How far the requested constraints sit below the optimal figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSummary {
    pub timeline_weeks: i64,
    /// Weeks (and months, one decimal) cut from the optimal timeline.
    pub timeline_reduction_weeks: i64,
    pub timeline_reduction_months: f64,
    pub timeline_percentage: i64,
    pub budget_percentage: i64,
    pub risk: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub analysis: String,
    #[serde(flatten)]
    pub summary: ConstraintSummary,
}

/// POST /api/estimate/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    session: SessionContext,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = body?;
    if request.requirements.trim().is_empty() {
        return Err(AppError::Validation(
            "requirements cannot be empty".to_string(),
        ));
    }

    let user = session.session().await.map(|s| s.user.id);
    info!(?user, "Running initial estimate");

    let prompt = build_initial_analysis_prompt(&request.requirements);
    let analysis = state
        .llm
        .complete(&prompt, ESTIMATION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(AnalyzeResponse { analysis }))
}

/// POST /api/estimate/recalculate
pub async fn handle_recalculate(
    State(state): State<AppState>,
    session: SessionContext,
    body: Result<Json<RecalculationInput>, JsonRejection>,
) -> Result<Json<RecalculateResponse>, AppError> {
    let Json(input) = body?;
    let summary = summarize_constraints(&input)?;

    let user = session.session().await.map(|s| s.user.id);
    info!(
        ?user,
        timeline_percentage = summary.timeline_percentage,
        budget_percentage = summary.budget_percentage,
        "Recalculating estimate under constraints"
    );

    let prompt = build_recalculation_prompt(&input);
    let analysis = state
        .llm
        .complete(&prompt, ESTIMATION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(RecalculateResponse { analysis, summary }))
}

/// Validates the constraints and scores them against the optimal figures.
/// Risk follows the tighter of the two constraints.
pub fn summarize_constraints(input: &RecalculationInput) -> Result<ConstraintSummary, AppError> {
    if input.saved_context.trim().is_empty() {
        return Err(AppError::Validation(
            "savedContext cannot be empty".to_string(),
        ));
    }
    let figures = [
        ("timelineMonths", input.timeline_months),
        ("totalBudget", input.total_budget),
        ("maxTimelineMonths", input.max_timeline_months),
        ("maxBudget", input.max_budget),
    ];
    if let Some((name, _)) = figures.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
        return Err(AppError::Validation(format!(
            "{name} must be a positive number"
        )));
    }
    if input.timeline_months > input.max_timeline_months {
        return Err(AppError::Validation(
            "timelineMonths cannot exceed maxTimelineMonths".to_string(),
        ));
    }
    if input.total_budget > input.max_budget {
        return Err(AppError::Validation(
            "totalBudget cannot exceed maxBudget".to_string(),
        ));
    }

    let timeline_percentage = percentage_of(input.timeline_months, input.max_timeline_months);
    let budget_percentage = percentage_of(input.total_budget, input.max_budget);

    let timeline_weeks = months_to_weeks(input.timeline_months);
    let timeline_reduction_weeks = months_to_weeks(input.max_timeline_months) - timeline_weeks;

    Ok(ConstraintSummary {
        timeline_weeks,
        timeline_reduction_weeks,
        timeline_reduction_months: weeks_to_months(timeline_reduction_weeks as f64),
        timeline_percentage,
        budget_percentage,
        risk: risk_level_for(timeline_percentage.min(budget_percentage) as f64),
    })
}
