//! HTML bodies for the lead notification emails.

use std::fmt::Write as _;

use crate::leads::models::{EarlyAccessRequest, LeadInfo};

pub const NOT_PROVIDED: &str = "Not provided";
const NO_HISTORY: &str = "No conversation history";

pub fn render_lead_email(lead: &LeadInfo) -> String {
    let mut html = String::from("<h2>New Lead Details</h2>\n");
    field(&mut html, "Name", lead.name.as_deref());
    field(&mut html, "Email", lead.email.as_deref());
    field(&mut html, "Business Name", lead.business_name.as_deref());
    field(&mut html, "Project Goal", lead.project_goal.as_deref());
    field(&mut html, "Timeline", lead.timeline.as_deref());
    field(&mut html, "Budget", lead.budget.as_deref());
    field(&mut html, "Tech Preferences", lead.tech_preferences.as_deref());
    field(&mut html, "Agency Experience", lead.agency_experience.as_deref());

    html.push_str("\n<h3>Complete Conversation History</h3>\n");
    if lead.conversation_history.is_empty() {
        html.push_str(NO_HISTORY);
    } else {
        for turn in &lead.conversation_history {
            let _ = write!(
                html,
                "<p><strong>{}:</strong> {}</p>",
                escape(turn.role.as_deref().unwrap_or("unknown")),
                escape(turn.content.as_deref().unwrap_or_default()),
            );
        }
    }
    html
}

pub fn render_early_access_email(request: &EarlyAccessRequest) -> String {
    let mut html = String::from("<h2>New Early Access Request</h2>\n");
    field(&mut html, "Name", request.name.as_deref());
    field(&mut html, "Email", request.email.as_deref());
    field(&mut html, "User Type", request.user_type.as_deref());
    field(&mut html, "Interest", request.interest.as_deref());
    html
}

fn field(html: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(
        html,
        "<p><strong>{label}:</strong> {}</p>",
        escape(value.unwrap_or(NOT_PROVIDED))
    );
}

/// Escapes text for an HTML element body.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
