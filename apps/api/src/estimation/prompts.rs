// Prompt templates for the project estimator.
// Builders only produce text; the handlers send it through llm_client.

use serde::Deserialize;

use crate::estimation::calculations::{format_currency, months_to_weeks};

/// System prompt for both estimator calls.
pub const ESTIMATION_SYSTEM: &str = "You are a senior project manager and technical architect \
    producing software project estimates. Be concrete: name phases, durations, \
    deliverables and costs. Use plain prose and simple lists.";

/// Initial analysis template. Replace `{requirements}` before sending.
pub const INITIAL_ANALYSIS_TEMPLATE: &str = r#"You are a senior project manager and technical architect.
Based on the following requirements, provide a detailed breakdown of project phases and associated costs.
Consider this as the OPTIMAL timeline and budget - the maximum recommended values.

For each phase:
- Specify exact duration and timing
- List key deliverables
- Detail required resources
- Consider dependencies between phases

For costs:
- Break down by category and phase
- Include both one-time and recurring costs
- Consider resource costs based on market rates
- Account for tools, infrastructure, and overhead

Requirements Document:
{requirements}

Provide a comprehensive analysis following software development best practices.
Ensure the phases and costs are realistic and well-structured."#;

/// Recalculation template.
/// Replace: {timeline_months}, {timeline_weeks}, {budget}, {max_timeline_months},
///          {max_budget}, {saved_context}
pub const RECALCULATION_TEMPLATE: &str = r#"You are a senior project manager and technical architect.
Based on the following requirements and new constraints, provide a detailed breakdown
of project phases and associated costs.

New Constraints:
- Timeline: {timeline_months} months ({timeline_weeks} weeks)
- Budget: {budget}

These constraints are shorter/lower than the optimal values:
- Optimal Timeline: {max_timeline_months} months
- Optimal Budget: {max_budget}

Provide a realistic restructuring of the project that:
1. Fits within both time and budget constraints
2. Identifies scope adjustments needed
3. Highlights risks and tradeoffs
4. Maintains critical functionality
5. Suggests process optimizations

Original Requirements:
{saved_context}

Format the response to include:
1. Revised phase breakdown with durations
2. Adjusted resource allocation
3. Prioritized deliverables
4. Risk mitigation strategies"#;

/// Inputs for a constrained re-estimate. The maximums are the optimal figures
/// from the initial analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationInput {
    pub saved_context: String,
    pub timeline_months: f64,
    pub total_budget: f64,
    pub max_timeline_months: f64,
    pub max_budget: f64,
}

pub fn build_initial_analysis_prompt(requirements: &str) -> String {
    INITIAL_ANALYSIS_TEMPLATE.replace("{requirements}", requirements)
}

pub fn build_recalculation_prompt(input: &RecalculationInput) -> String {
    // saved_context goes last so user text is never re-scanned for placeholders
    RECALCULATION_TEMPLATE
        .replace("{timeline_months}", &input.timeline_months.to_string())
        .replace(
            "{timeline_weeks}",
            &months_to_weeks(input.timeline_months).to_string(),
        )
        .replace("{budget}", &format_currency(input.total_budget))
        .replace(
            "{max_timeline_months}",
            &input.max_timeline_months.to_string(),
        )
        .replace("{max_budget}", &format_currency(input.max_budget))
        .replace("{saved_context}", &input.saved_context)
}
