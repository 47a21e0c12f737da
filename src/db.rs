use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub url: String,
    pub pool_size: u32,
    pub timeout: Duration,
}

/// Opens the process-wide pool and pings it, so a bad connection string or
/// unreachable store fails at startup rather than on the first request.
pub async fn connect(opts: &StoreOptions) -> anyhow::Result<DatabaseConnection> {
    let mut connect = ConnectOptions::new(opts.url.clone());
    connect
        .max_connections(opts.pool_size.max(1))
        .connect_timeout(opts.timeout)
        .acquire_timeout(opts.timeout)
        .sqlx_logging(false);

    let db = Database::connect(connect).await.context("connect to movie store")?;
    db.ping().await.context("ping movie store")?;
    tracing::info!(pool_size = opts.pool_size, "connected to movie store");
    Ok(db)
}

pub async fn connect_and_migrate(opts: &StoreOptions) -> anyhow::Result<DatabaseConnection> {
    let db = connect(opts).await?;
    Migrator::up(&db, None).await.context("migrate movie store")?;
    Ok(db)
}

pub async fn disconnect(db: DatabaseConnection) -> anyhow::Result<()> {
    db.close().await.context("close movie store")?;
    tracing::info!("disconnected from movie store");
    Ok(())
}
