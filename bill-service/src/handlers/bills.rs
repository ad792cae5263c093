//! Bill CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateBill, UpdateBill};
use crate::services::record_bill_operation;
use crate::startup::AppState;

#[axum::debug_handler]
pub async fn list_bills(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let bills = state.store.list().await;
    Ok(Json(bills))
}

#[axum::debug_handler]
pub async fn create_bill(
    State(state): State<AppState>,
    Json(req): Json<CreateBill>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let bill = state.store.create(req).await;
    record_bill_operation("create");
    tracing::info!(
        bill_id = %bill.bill_id,
        category = bill.category.as_str(),
        "Bill created"
    );

    Ok((StatusCode::CREATED, Json(bill)))
}

#[axum::debug_handler]
pub async fn get_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bill = state.store.get(bill_id).await?;
    Ok(Json(bill))
}

#[axum::debug_handler]
pub async fn update_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(req): Json<UpdateBill>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let bill = state.store.update(bill_id, req).await?;
    record_bill_operation("update");
    tracing::info!(bill_id = %bill.bill_id, "Bill updated");

    Ok(Json(bill))
}

#[axum::debug_handler]
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(bill_id).await?;
    record_bill_operation("delete");
    tracing::info!(bill_id = %bill_id, "Bill deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn toggle_paid(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bill = state.store.toggle_paid(bill_id).await?;
    record_bill_operation("toggle_paid");
    tracing::info!(bill_id = %bill.bill_id, is_paid = bill.is_paid, "Bill payment state toggled");

    Ok(Json(bill))
}

#[derive(Debug, Deserialize)]
pub struct SetRemindersRequest {
    pub reminders: bool,
}

#[axum::debug_handler]
pub async fn set_reminders(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(req): Json<SetRemindersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bill = state.store.set_reminders(bill_id, req.reminders).await?;
    record_bill_operation("set_reminders");
    tracing::info!(bill_id = %bill.bill_id, reminders = bill.reminders, "Bill reminders updated");

    Ok(Json(bill))
}

#[axum::debug_handler]
pub async fn bill_summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = state.store.summary(Utc::now().date_naive()).await;
    Ok(Json(summary))
}
