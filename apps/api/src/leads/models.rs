use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One turn of the website chat that produced the lead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConversationTurn {
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

/// A lead submitted from the chat widget or a contact form.
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_goal: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tech_preferences: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub agency_experience: Option<String>,
    #[serde(default, deserialize_with = "lenient_turns")]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Beastmode early-access signup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyAccessRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub interest: Option<String>,
}

/// CRM lead properties. Absent fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrmLeadProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_experience: Option<String>,
}

impl From<&LeadInfo> for CrmLeadProperties {
    fn from(lead: &LeadInfo) -> Self {
        // Explicit first/last win; otherwise split the single name field.
        let (split_first, split_last) = match lead.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => match name.split_once(char::is_whitespace) {
                Some((first, last)) => (Some(first.to_string()), Some(last.trim().to_string())),
                None => (Some(name.to_string()), None),
            },
            _ => (None, None),
        };

        CrmLeadProperties {
            email: lead.email.clone(),
            firstname: lead.first_name.clone().or(split_first),
            lastname: lead.last_name.clone().or(split_last),
            company: lead.company.clone().or_else(|| lead.business_name.clone()),
            project_goal: lead.project_goal.clone(),
            timeline: lead.timeline.clone(),
            budget: lead.budget.clone(),
            technology_preferences: lead.tech_preferences.clone(),
            agency_experience: lead.agency_experience.clone(),
        }
    }
}

/// Parses a submission body. An empty or whitespace-only body is an empty
/// submission, not an error.
pub fn decode_submission<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

/// Accepts strings, numbers and booleans; null and blank strings become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Accepts an array of turns; anything else (null, a string) is no history.
fn lenient_turns<'de, D>(deserializer: D) -> Result<Vec<ConversationTurn>, D::Error>
where
    D: Deserializer<'de>,
{
    let turns = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(mut fields) => Some(ConversationTurn {
                    role: fields.remove("role").and_then(scalar_text),
                    content: fields.remove("content").and_then(scalar_text),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(turns)
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
