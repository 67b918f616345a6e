use serde::{Deserialize, Serialize};

use crate::entity::plant;
use crate::error::AppError;
use crate::store::PlantDraft;

/// Request body for creating or replacing a plant.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PlantRequest {
    /// Display name (1-100 characters).
    #[schema(example = "Fern")]
    pub name: String,
    /// Free-form notes. May be omitted or `null`.
    #[serde(default)]
    #[schema(example = "Indoor")]
    pub description: Option<String>,
    /// Owner id in the user service. Must exist at the time of the request.
    #[schema(example = 1)]
    pub user_id: i32,
}

/// Validate the request shape before any outbound call is made.
pub fn validate_plant_request(payload: &PlantRequest) -> Result<(), AppError> {
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }
    Ok(())
}

impl From<PlantRequest> for PlantDraft {
    fn from(payload: PlantRequest) -> Self {
        PlantDraft {
            name: payload.name.trim().to_string(),
            description: payload.description,
            user_id: payload.user_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PlantResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Fern")]
    pub name: String,
    #[schema(example = "Indoor")]
    pub description: Option<String>,
    #[schema(example = 1)]
    pub user_id: i32,
}

impl From<plant::Model> for PlantResponse {
    fn from(m: plant::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            user_id: m.user_id,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Plant deleted")]
    pub message: String,
}
