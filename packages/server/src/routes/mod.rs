use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::plant::*;
use crate::state::AppState;

pub fn plant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_plants, create_plant))
        .routes(routes!(get_plant, update_plant, delete_plant))
}
