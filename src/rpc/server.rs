use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::pb::{
    self, CreateMovieRequest, CreateMovieResponse, DeleteMovieRequest, DeleteMovieResponse,
    GetMovieRequest, GetMovieResponse, GetMoviesRequest, GetMoviesResponse,
    movie_service_server::{MovieService as MovieServiceRpc, MovieServiceServer},
};
use crate::{
    error::MovieError,
    models::MovieFilter,
    repository::MovieRepository,
    service::MovieService,
};

/// Exposes [`MovieService`] over gRPC. Every business failure is answered
/// with `success = false`; `Err(Status)` is never returned.
pub struct MovieRpcServer<R> {
    service: MovieService<R>,
}

impl<R: MovieRepository + 'static> MovieRpcServer<R> {
    pub fn new(service: MovieService<R>) -> Self {
        Self { service }
    }

    pub fn into_service(self) -> MovieServiceServer<Self> {
        MovieServiceServer::new(self)
    }
}

fn failure(err: &MovieError) -> (bool, String, i32) {
    (false, err.to_string(), pb::ErrorKind::from(err) as i32)
}

fn rejected(reason: &str) -> (bool, String, i32) {
    (false, reason.to_string(), pb::ErrorKind::InvalidData as i32)
}

#[tonic::async_trait]
impl<R: MovieRepository + 'static> MovieServiceRpc for MovieRpcServer<R> {
    async fn get_movies(
        &self,
        request: Request<GetMoviesRequest>,
    ) -> Result<Response<GetMoviesResponse>, Status> {
        let req = request.into_inner();
        info!(page = req.page, limit = req.limit, "rpc GetMovies called");

        let filter = MovieFilter::new(i64::from(req.page), i64::from(req.limit));
        let resp = match self.service.get_movies(filter).await {
            Ok(page) => GetMoviesResponse {
                movies: page.movies.into_iter().map(pb::Movie::from).collect(),
                total: page.total,
                success: true,
                ..Default::default()
            },
            Err(err) => {
                let (success, error, error_kind) = failure(&err);
                GetMoviesResponse { success, error, error_kind, ..Default::default() }
            },
        };
        Ok(Response::new(resp))
    }

    async fn get_movie(
        &self,
        request: Request<GetMovieRequest>,
    ) -> Result<Response<GetMovieResponse>, Status> {
        let id = request.into_inner().id;
        info!(id, "rpc GetMovie called");

        if id <= 0 {
            warn!(id, "invalid movie id");
            let (success, error, error_kind) = rejected("invalid movie id");
            return Ok(Response::new(GetMovieResponse { success, error, error_kind, movie: None }));
        }

        let resp = match self.service.get_movie(id).await {
            Ok(movie) => GetMovieResponse {
                movie: Some(movie.into()),
                success: true,
                ..Default::default()
            },
            Err(err) => {
                let (success, error, error_kind) = failure(&err);
                GetMovieResponse { success, error, error_kind, movie: None }
            },
        };
        Ok(Response::new(resp))
    }

    async fn create_movie(
        &self,
        request: Request<CreateMovieRequest>,
    ) -> Result<Response<CreateMovieResponse>, Status> {
        let req = request.into_inner();
        info!(title = %req.title, year = %req.year, "rpc CreateMovie called");

        if req.title.is_empty() || req.year.is_empty() {
            warn!(title = %req.title, year = %req.year, "missing movie fields");
            let (success, error, error_kind) = rejected("title and year are required");
            return Ok(Response::new(CreateMovieResponse {
                success,
                error,
                error_kind,
                movie: None,
            }));
        }

        let resp = match self.service.create_movie(&req.title, &req.year).await {
            Ok(movie) => CreateMovieResponse {
                movie: Some(movie.into()),
                success: true,
                ..Default::default()
            },
            Err(err) => {
                let (success, error, error_kind) = failure(&err);
                CreateMovieResponse { success, error, error_kind, movie: None }
            },
        };
        Ok(Response::new(resp))
    }

    async fn delete_movie(
        &self,
        request: Request<DeleteMovieRequest>,
    ) -> Result<Response<DeleteMovieResponse>, Status> {
        let id = request.into_inner().id;
        info!(id, "rpc DeleteMovie called");

        if id <= 0 {
            warn!(id, "invalid movie id");
            let (success, error, error_kind) = rejected("invalid movie id");
            return Ok(Response::new(DeleteMovieResponse { success, error, error_kind }));
        }

        let resp = match self.service.delete_movie(id).await {
            Ok(()) => DeleteMovieResponse { success: true, ..Default::default() },
            Err(err) => {
                let (success, error, error_kind) = failure(&err);
                DeleteMovieResponse { success, error, error_kind }
            },
        };
        Ok(Response::new(resp))
    }
}
