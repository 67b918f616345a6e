use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Open the connection pool. Does not touch the schema; call [`migrate`] before serving.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// Create any missing tables for the registered entities. Safe to run on every start.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("plant_service::entity::*")
        .sync(db)
        .await?;
    info!("Database schema is up to date");
    Ok(())
}
