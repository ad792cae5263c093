//! Savings tips handler.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Instant;
use validator::Validate;

use crate::services::{
    build_tip_request, record_tip_generation, record_tip_generation_duration,
};
use crate::startup::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct TipsRequest {
    #[validate(range(min = 0.0, message = "Spending limit must not be negative"))]
    pub spending_limit: f64,
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub tips: String,
}

/// Generate personalized savings tips from the current bill list.
///
/// Resolves to `{ "tips": ... }` on success and the standard
/// `{ "error": ... }` body on failure; a second request while one is in
/// flight gets 409.
#[axum::debug_handler]
pub async fn generate_tips(
    State(state): State<AppState>,
    Json(req): Json<TipsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let Some(_guard) = state.tip_gate.try_begin() else {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "A tips generation request is already in flight"
        )));
    };

    let bills = state.store.list().await;
    let request = build_tip_request(&bills, req.spending_limit);

    tracing::info!(
        bill_count = bills.len(),
        spending_limit = request.spending_limit,
        current_spending = request.current_spending,
        "Generating savings tips"
    );

    let started = Instant::now();
    match state.advisor.generate(&request).await {
        Ok(tips) => {
            record_tip_generation("success");
            record_tip_generation_duration(
                state.config.advisor.provider.as_str(),
                started.elapsed().as_secs_f64(),
            );
            Ok(Json(TipsResponse { tips }))
        }
        Err(e) => {
            record_tip_generation("error");
            tracing::warn!(error = %e, "Savings tips generation failed");
            Err(AppError::BadGateway(e.to_string()))
        }
    }
}
