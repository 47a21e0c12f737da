use std::sync::Arc;

use movie_catalog::{
    config::GatewayConfig, gateway::GatewayService, routes, rpc::RpcMovieClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    movie_catalog::init_tracing();

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        backend = %config.movie_service_address,
        "starting api gateway"
    );

    let client = RpcMovieClient::connect(
        &config.movie_service_address,
        config.connect_timeout,
        config.request_timeout,
    )
    .await?;
    let app = routes::router(GatewayService::new(Arc::new(client)));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(movie_catalog::shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}
