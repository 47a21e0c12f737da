use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, OpenApi};

use crate::{
    error::{AppError, AppResult, ErrorBody},
    gateway::GatewayService,
    models::{CreateMovieRequest, HealthStatus, Movie, MovieFilter, MoviesPage},
};

pub fn router(gateway: GatewayService) -> Router {
    Router::new()
        .route("/api/v1/movies", get(list_movies).post(create_movie))
        .route("/api/v1/movies/{id}", get(get_movie).delete(delete_movie))
        .route("/health", get(health))
        .route("/swagger/doc.json", get(openapi_doc))
        .with_state(gateway)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
}

/// REST surface of the gateway, served at `/swagger/doc.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Movie API Gateway", description = "API Gateway for Movie Microservice"),
    paths(list_movies, get_movie, create_movie, delete_movie, health),
    components(schemas(Movie, MoviesPage, CreateMovieRequest, HealthStatus, ErrorBody)),
    tags((name = "movies", description = "Movie catalog"))
)]
pub struct ApiDoc;

/// Raw query values; anything unparsable falls back to 0 and is then coerced.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1.
    page: Option<String>,
    /// Page size, 1 to 100; defaults to 10.
    limit: Option<String>,
}

fn lenient(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse().map_err(|_| AppError::bad_request("invalid movie id"))
}

#[utoipa::path(
    get,
    path = "/api/v1/movies",
    tag = "movies",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of movies", body = MoviesPage),
        (status = 500, description = "Store failure", body = ErrorBody),
        (status = 502, description = "Movie service unreachable", body = ErrorBody),
    )
)]
pub async fn list_movies(
    State(gateway): State<GatewayService>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<MoviesPage>> {
    let filter = MovieFilter::new(lenient(q.page.as_deref()), lenient(q.limit.as_deref()));
    Ok(Json(gateway.get_movies(filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = Movie),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "No such movie", body = ErrorBody),
    )
)]
pub async fn get_movie(
    State(gateway): State<GatewayService>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let id = parse_id(&id)?;
    Ok(Json(gateway.get_movie(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/movies",
    tag = "movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Created with an assigned id", body = Movie),
        (status = 400, description = "Invalid title or year", body = ErrorBody),
        (status = 409, description = "Id already taken", body = ErrorBody),
    )
)]
pub async fn create_movie(
    State(gateway): State<GatewayService>,
    body: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(req) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "failed to decode create movie request");
        AppError::bad_request("invalid request body")
    })?;
    let movie = gateway.create_movie(&req.title, &req.year).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "No such movie", body = ErrorBody),
    )
)]
pub async fn delete_movie(
    State(gateway): State<GatewayService>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    gateway.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthStatus))
)]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy", timestamp: jiff::Timestamp::now() })
}

pub async fn openapi_doc() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_defaults_to_zero() {
        assert_eq!(lenient(None), 0);
        assert_eq!(lenient(Some("abc")), 0);
        assert_eq!(lenient(Some(" 7 ")), 7);
        assert_eq!(lenient(Some("-3")), -3);
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("twelve").is_err());
        assert!(parse_id("99999999999").is_err());
    }

    #[test]
    fn openapi_documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, ["/api/v1/movies", "/api/v1/movies/{id}", "/health"]);

        let movies = &doc.paths.paths["/api/v1/movies"];
        assert!(movies.get.is_some() && movies.post.is_some());
        let by_id = &doc.paths.paths["/api/v1/movies/{id}"];
        assert!(by_id.get.is_some() && by_id.delete.is_some());
    }
}
