use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::chef::{ChefResponse, NewChef, RegisterChefRequest, validate_register_request};
use crate::state::AppState;
use crate::utils::hash;

/// Register a chef.
#[utoipa::path(
    post,
    path = "/api/v1/chefs",
    tag = "Chefs",
    operation_id = "registerChef",
    summary = "Register a chef",
    description = "Creates a chef account. Names and emails are unique; \
        emails compare case-insensitively.",
    request_body = RegisterChefRequest,
    responses(
        (status = 201, description = "Chef created", body = ChefResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name or email taken (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn register_chef(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterChefRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let chef = state
        .store
        .create_chef(NewChef {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            password_hash,
        })
        .await?;

    tracing::info!(chef_id = %chef.id, "chef registered");

    Ok((StatusCode::CREATED, Json(ChefResponse::from(chef))))
}
