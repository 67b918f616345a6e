use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::plant::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Plants",
    operation_id = "createPlant",
    summary = "Create a new plant",
    description = "Creates a plant owned by `user_id`. The owner is confirmed with the user service first; if the user service denies the user or cannot be reached, the request fails with USER_NOT_FOUND.",
    request_body = PlantRequest,
    responses(
        (status = 201, description = "Plant created", body = PlantResponse),
        (status = 400, description = "Invalid body (VALIDATION_ERROR) or unknown owner (USER_NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = payload.user_id))]
pub async fn create_plant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PlantRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_plant_request(&payload)?;
    require_owner(&state, payload.user_id).await?;

    let model = state.plants.insert(payload.into()).await?;
    info!(id = model.id, "Plant created");

    Ok((StatusCode::CREATED, Json(PlantResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Plants",
    operation_id = "listPlants",
    summary = "List all plants",
    description = "Returns every plant ordered by id. No pagination.",
    responses(
        (status = 200, description = "All plants", body = Vec<PlantResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_plants(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlantResponse>>, AppError> {
    let plants = state.plants.list_all().await?;
    Ok(Json(plants.into_iter().map(PlantResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Plants",
    operation_id = "getPlant",
    summary = "Get a plant by ID",
    params(("id" = i32, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Plant details", body = PlantResponse),
        (status = 400, description = "Non-numeric id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Plant not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_plant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<PlantResponse>, AppError> {
    let model = state.plants.get(id).await?.ok_or_else(plant_not_found)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Plants",
    operation_id = "updatePlant",
    summary = "Replace a plant",
    description = "Replaces name, description and owner. Existence is checked before the owner, so an unknown plant id yields 404 without contacting the user service.",
    params(("id" = i32, Path, description = "Plant ID")),
    request_body = PlantRequest,
    responses(
        (status = 200, description = "Plant updated", body = PlantResponse),
        (status = 400, description = "Invalid body (VALIDATION_ERROR) or unknown owner (USER_NOT_FOUND)", body = ErrorBody),
        (status = 404, description = "Plant not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(user_id = payload.user_id))]
pub async fn update_plant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<PlantRequest>,
) -> Result<Json<PlantResponse>, AppError> {
    validate_plant_request(&payload)?;

    let existing = state.plants.get(id).await?.ok_or_else(plant_not_found)?;
    require_owner(&state, payload.user_id).await?;

    let model = state
        .plants
        .update(existing, payload.into())
        .await?
        .ok_or_else(plant_not_found)?;
    info!("Plant updated");

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Plants",
    operation_id = "deletePlant",
    summary = "Delete a plant by ID",
    params(("id" = i32, Path, description = "Plant ID")),
    responses(
        (status = 200, description = "Plant deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Plant not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_plant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.plants.delete(id).await? {
        return Err(plant_not_found());
    }
    info!("Plant deleted");

    Ok(Json(MessageResponse {
        message: "Plant deleted".into(),
    }))
}

fn plant_not_found() -> AppError {
    AppError::NotFound("Plant not found".into())
}

async fn require_owner(state: &AppState, user_id: i32) -> Result<(), AppError> {
    if state.users.user_exists(user_id).await {
        Ok(())
    } else {
        Err(AppError::UserNotFound)
    }
}
