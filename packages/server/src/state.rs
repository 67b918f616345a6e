use std::sync::Arc;

use crate::ownership::UserDirectory;
use crate::store::PlantStore;

#[derive(Clone)]
pub struct AppState {
    pub plants: PlantStore,
    pub users: Arc<dyn UserDirectory>,
}
