use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tonic::{Request, transport::Channel, transport::Endpoint};
use tracing::{error, info};

use super::{
    pb::{
        CreateMovieRequest, DeleteMovieRequest, GetMovieRequest, GetMoviesRequest,
        movie_service_client::MovieServiceClient,
    },
    reported_kind,
};
use crate::{
    error::{FailureKind, MovieError, MovieResult},
    gateway::MovieBackend,
    models::{Movie, MovieFilter, MoviesPage},
};

/// gRPC connection to the movies service.
#[derive(Clone)]
pub struct RpcMovieClient {
    client: MovieServiceClient<Channel>,
    request_timeout: Duration,
}

impl RpcMovieClient {
    /// Connects eagerly so an unreachable backend is a startup error.
    pub async fn connect(
        address: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let endpoint = Endpoint::from_shared(address.to_string())
            .with_context(|| format!("invalid movie service address {address}"))?
            .connect_timeout(connect_timeout)
            .timeout(request_timeout);
        let channel = endpoint
            .connect()
            .await
            .with_context(|| format!("connect to movie service at {address}"))?;
        info!(address, "connected to movie service");
        Ok(Self::from_channel(channel, request_timeout))
    }

    pub fn from_channel(channel: Channel, request_timeout: Duration) -> Self {
        Self { client: MovieServiceClient::new(channel), request_timeout }
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut req = Request::new(message);
        req.set_timeout(self.request_timeout);
        req
    }
}

fn transport_err(op: &'static str, status: tonic::Status) -> MovieError {
    error!(code = ?status.code(), message = status.message(), "rpc {op} failed");
    MovieError::remote(FailureKind::Transport, format!("failed to {op}: {}", status.message()))
}

fn reported_err(op: &'static str, reason: String, kind: i32) -> MovieError {
    error!(error = %reason, "movie service rejected {op}");
    MovieError::remote(reported_kind(kind), reason)
}

#[async_trait]
impl MovieBackend for RpcMovieClient {
    async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage> {
        let req = GetMoviesRequest {
            page: i32::try_from(filter.page).unwrap_or(i32::MAX),
            limit: i32::try_from(filter.limit).unwrap_or(i32::MAX),
        };
        let resp = self
            .client
            .clone()
            .get_movies(self.request(req))
            .await
            .map_err(|status| transport_err("get movies", status))?
            .into_inner();
        if !resp.success {
            return Err(reported_err("get movies", resp.error, resp.error_kind));
        }

        let movies: Vec<Movie> = resp.movies.into_iter().map(Movie::from).collect();
        info!(count = movies.len(), "rpc retrieved movies");
        Ok(MoviesPage { movies, total: resp.total })
    }

    async fn get_movie(&self, id: i32) -> MovieResult<Movie> {
        let resp = self
            .client
            .clone()
            .get_movie(self.request(GetMovieRequest { id }))
            .await
            .map_err(|status| transport_err("get movie", status))?
            .into_inner();
        if !resp.success {
            return Err(reported_err("get movie", resp.error, resp.error_kind));
        }
        resp.movie
            .map(Movie::from)
            .ok_or_else(|| MovieError::remote(FailureKind::Storage, "response carried no movie"))
    }

    async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie> {
        let req = CreateMovieRequest { title: title.to_string(), year: year.to_string() };
        let resp = self
            .client
            .clone()
            .create_movie(self.request(req))
            .await
            .map_err(|status| transport_err("create movie", status))?
            .into_inner();
        if !resp.success {
            return Err(reported_err("create movie", resp.error, resp.error_kind));
        }
        let movie = resp
            .movie
            .map(Movie::from)
            .ok_or_else(|| MovieError::remote(FailureKind::Storage, "response carried no movie"))?;
        info!(id = movie.id, "rpc created movie");
        Ok(movie)
    }

    async fn delete_movie(&self, id: i32) -> MovieResult<()> {
        let resp = self
            .client
            .clone()
            .delete_movie(self.request(DeleteMovieRequest { id }))
            .await
            .map_err(|status| transport_err("delete movie", status))?
            .into_inner();
        if !resp.success {
            return Err(reported_err("delete movie", resp.error, resp.error_kind));
        }
        info!(id, "rpc deleted movie");
        Ok(())
    }
}
