//! Savings-tip instruction template and response validation.
//!
//! The template renderer and the reply parser are separate pure functions
//! so each can be tested on its own.

use crate::services::advisor::{GenerationError, TipRequest};
use serde::Deserialize;
use serde_json::json;

/// Render the fixed instruction for one tips generation call.
pub fn render_savings_prompt(request: &TipRequest) -> String {
    format!(
        "You are a personal finance advisor. Analyze the user's expense data and provide personalized saving tips.

The user has a spending limit of {limit} and is currently spending {current}.

Here is the user's expense data:
{expenses}

Provide specific, actionable tips to help the user reduce spending and save money.
Focus on the highest spending areas and suggest practical ways to cut costs.
Format the tips as a bulleted list.
Keep the tips concise and easy to understand.
Limit the total length of tips under 200 words.
Do not tell them to simply reduce spending, but give concrete suggestions.
For example, instead of saying \"Reduce your eating out budget\", tell them \"Try eating out only once a week to save money.\"
The tips must be personalized to the user's expense data, for example:

\"Consider switching to a cheaper internet plan by calling your internet provider.\"
\"Pack lunch three times a week instead of buying lunch to save on food costs.\"
\"Look at reducing your transportation costs such as biking to work instead of driving.\"
",
        limit = request.spending_limit,
        current = request.current_spending,
        expenses = request.expense_data,
    )
}

/// Response schema handed to the provider so the backend is constrained to
/// reply with `{ "savingsTips": string }`.
pub fn savings_tips_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "savingsTips": {
                "type": "STRING",
                "description": "Personalized savings tips based on the user expenses."
            }
        },
        "required": ["savingsTips"]
    })
}

#[derive(Debug, Deserialize)]
struct SavingsTipsPayload {
    #[serde(rename = "savingsTips")]
    savings_tips: String,
}

/// Validate the backend reply against `{ "savingsTips": string }` and
/// unwrap the tips text.
pub fn parse_tips_response(raw: &str) -> Result<String, GenerationError> {
    let payload: SavingsTipsPayload =
        serde_json::from_str(raw).map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    Ok(payload.savings_tips)
}
