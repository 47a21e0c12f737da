use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which side of a remote call went wrong, as reported back to the gateway.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    InvalidData,
    NotFound,
    AlreadyExists,
    Storage,
    /// The call itself never produced a response.
    Transport,
}

#[derive(Debug, thiserror::Error)]
pub enum MovieError {
    #[error("invalid movie data: {0}")]
    InvalidData(String),

    #[error("movie not found")]
    NotFound,

    #[error("movie already exists")]
    AlreadyExists,

    #[error("failed to {context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("movie service error: {reason}")]
    Remote { kind: FailureKind, reason: String },
}

impl MovieError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidData(reason.into())
    }

    pub fn storage(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Storage { context, source: source.into() }
    }

    pub fn remote(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self::Remote { kind, reason: reason.into() }
    }

    /// Collapses local and remote errors onto one kind so callers can branch
    /// on it without caring which layer produced the failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            MovieError::InvalidData(_) => FailureKind::InvalidData,
            MovieError::NotFound => FailureKind::NotFound,
            MovieError::AlreadyExists => FailureKind::AlreadyExists,
            MovieError::Storage { .. } => FailureKind::Storage,
            MovieError::Remote { kind, .. } => *kind,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            FailureKind::InvalidData => StatusCode::BAD_REQUEST,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::AlreadyExists => StatusCode::CONFLICT,
            FailureKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            FailureKind::Transport => StatusCode::BAD_GATEWAY,
        }
    }
}

pub type MovieResult<T> = Result<T, MovieError>;

/// HTTP-facing wrapper so handlers can return `AppResult` and use `?`.
#[derive(Debug)]
pub struct AppError(MovieError);

impl AppError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self(MovieError::invalid(reason))
    }

    pub fn inner(&self) -> &MovieError {
        &self.0
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<MovieError> for AppError {
    fn from(err: MovieError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Body of every failed REST response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
