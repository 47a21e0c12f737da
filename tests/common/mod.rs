// Shared helpers for the integration tests.
#![allow(dead_code)]

use std::time::Duration;

use movie_catalog::{
    db::{self, StoreOptions},
    models::Movie,
    rpc::{MovieRpcServer, RpcMovieClient},
    repository::MovieRepository,
    service::MovieService,
    store::SeaOrmMovieRepository,
};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

/// Fresh in-memory SQLite store with the schema applied.
pub async fn sqlite_repo() -> SeaOrmMovieRepository {
    let opts = StoreOptions {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: Duration::from_secs(5),
    };
    let db = db::connect_and_migrate(&opts).await.expect("in-memory store");
    SeaOrmMovieRepository::new(db, opts.timeout)
}

pub fn movie(id: i32, title: &str, year: &str) -> Movie {
    Movie::new(id, title, year).expect("valid fixture movie")
}

/// Serves `repo` over gRPC on a loopback port and returns a connected client.
pub async fn spawn_backend<R: MovieRepository + 'static>(repo: R) -> RpcMovieClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let svc = MovieRpcServer::new(MovieService::new(repo)).into_service();

    tokio::spawn(async move {
        Server::builder()
            .add_service(svc)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("rpc server");
    });

    RpcMovieClient::connect(&format!("http://{addr}"), Duration::from_secs(5), Duration::from_secs(5))
        .await
        .expect("connect rpc client")
}
