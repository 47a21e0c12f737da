use anyhow::Context;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;

use movie_catalog::{
    config::ServiceConfig,
    db,
    rpc::{self, MovieRpcServer},
    service::MovieService,
    store::SeaOrmMovieRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_catalog::init_tracing();

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        database = %config.store.database_name,
        "starting movies service"
    );

    let reflection = rpc::reflection_service().context("build reflection service")?;
    let db = db::connect_and_migrate(&config.store.store_options()).await?;
    let repo = SeaOrmMovieRepository::new(db.clone(), config.store.timeout);
    let movies = MovieRpcServer::new(MovieService::new(repo)).into_service();

    tracing::info!(addr = %config.addr, "rpc server listening");
    let served = Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_service(movies)
        .add_service(reflection)
        .serve_with_shutdown(config.addr, movie_catalog::shutdown_signal())
        .await
        .context("serve movies rpc");

    db::disconnect(db).await?;
    served?;

    tracing::info!("server stopped");
    Ok(())
}
