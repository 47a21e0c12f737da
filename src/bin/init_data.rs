use anyhow::Context;

use movie_catalog::{config::SeedConfig, db, seed, store::SeaOrmMovieRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_catalog::init_tracing();

    let config = SeedConfig::from_env()?;
    let movies = seed::load_movies(&config.movies_json_path).await?;
    tracing::info!(count = movies.len(), path = %config.movies_json_path, "loaded movies");

    let db = db::connect_and_migrate(&config.store.store_options()).await?;
    let repo = SeaOrmMovieRepository::new(db.clone(), config.store.timeout);
    let seeded = repo.seed_if_empty(&movies).await;
    db::disconnect(db).await?;

    let inserted = seeded.context("seed movies")?;
    tracing::info!(inserted, "database initialization completed");
    Ok(())
}
