use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};

use plant_service::config::AppConfig;
use plant_service::ownership::HttpUserDirectory;
use plant_service::registry::RegistryAnnouncer;
use plant_service::state::AppState;
use plant_service::store::PlantStore;
use plant_service::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    database::migrate(&db)
        .await
        .context("Failed to sync database schema")?;

    let http = reqwest::Client::new();
    let state = AppState {
        plants: PlantStore::new(db),
        users: Arc::new(HttpUserDirectory::new(
            http.clone(),
            config.user_service.base_url.clone(),
        )),
    };

    let app = build_router(state, &config.server.cors);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let addr = listener.local_addr()?;
    info!("Server running at http://{}", addr);

    if config.registry.enabled {
        // Detached; startup does not wait for the registry.
        let _registration =
            RegistryAnnouncer::new(http, config.registry.clone(), addr.port()).spawn();
    } else {
        info!("Service registration disabled");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
