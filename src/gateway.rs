use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    error::{MovieError, MovieResult},
    models::{Movie, MovieFilter, MoviesPage},
    repository::MovieRepository,
    service::{MovieService, ensure_positive_id},
};

/// What the gateway needs from the backend, however it is reached.
#[async_trait]
pub trait MovieBackend: Send + Sync {
    async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage>;
    async fn get_movie(&self, id: i32) -> MovieResult<Movie>;
    async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie>;
    async fn delete_movie(&self, id: i32) -> MovieResult<()>;
}

/// In-process backend, used when gateway and service share a process.
#[async_trait]
impl<R: MovieRepository> MovieBackend for MovieService<R> {
    async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage> {
        MovieService::get_movies(self, filter).await
    }

    async fn get_movie(&self, id: i32) -> MovieResult<Movie> {
        MovieService::get_movie(self, id).await
    }

    async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie> {
        MovieService::create_movie(self, title, year).await
    }

    async fn delete_movie(&self, id: i32) -> MovieResult<()> {
        MovieService::delete_movie(self, id).await
    }
}

/// Rejects obviously bad requests before they cross the wire. The backend
/// stays authoritative for every other rule.
#[derive(Clone)]
pub struct GatewayService {
    backend: Arc<dyn MovieBackend>,
}

impl GatewayService {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self { backend }
    }

    pub async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage> {
        let filter = filter.normalized();
        info!(page = filter.page, limit = filter.limit, "gateway getting movies");

        let page = self.backend.get_movies(filter).await.inspect_err(|err| {
            error!(error = %err, "gateway failed to get movies");
        })?;

        info!(count = page.movies.len(), total = page.total, "gateway retrieved movies");
        Ok(page)
    }

    pub async fn get_movie(&self, id: i32) -> MovieResult<Movie> {
        info!(id, "gateway getting movie");
        ensure_positive_id(id)?;

        let movie = self.backend.get_movie(id).await.inspect_err(|err| {
            error!(id, error = %err, "gateway failed to get movie");
        })?;

        info!(id, title = %movie.title, "gateway retrieved movie");
        Ok(movie)
    }

    pub async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie> {
        info!(title, year, "gateway creating movie");
        if title.is_empty() || year.is_empty() {
            return Err(MovieError::invalid("title and year are required"));
        }

        let movie = self.backend.create_movie(title, year).await.inspect_err(|err| {
            error!(title, year, error = %err, "gateway failed to create movie");
        })?;

        info!(id = movie.id, title = %movie.title, "gateway created movie");
        Ok(movie)
    }

    pub async fn delete_movie(&self, id: i32) -> MovieResult<()> {
        info!(id, "gateway deleting movie");
        ensure_positive_id(id)?;

        self.backend.delete_movie(id).await.inspect_err(|err| {
            error!(id, error = %err, "gateway failed to delete movie");
        })?;

        info!(id, "gateway deleted movie");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::FailureKind;

    /// Records what reached the backend and answers with canned results.
    #[derive(Default)]
    struct RecordingBackend {
        filters: Mutex<Vec<MovieFilter>>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl MovieBackend for RecordingBackend {
        async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage> {
            self.filters.lock().unwrap().push(filter);
            Ok(MoviesPage { movies: vec![], total: 0 })
        }

        async fn get_movie(&self, _id: i32) -> MovieResult<Movie> {
            *self.calls.lock().unwrap() += 1;
            Err(MovieError::remote(FailureKind::NotFound, "movie not found"))
        }

        async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie> {
            *self.calls.lock().unwrap() += 1;
            Ok(Movie { id: 1, title: title.into(), year: year.into() })
        }

        async fn delete_movie(&self, _id: i32) -> MovieResult<()> {
            *self.calls.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn gateway() -> (Arc<RecordingBackend>, GatewayService) {
        let backend = Arc::new(RecordingBackend::default());
        (backend.clone(), GatewayService::new(backend))
    }

    #[tokio::test]
    async fn pagination_is_coerced_before_forwarding() {
        let (backend, gw) = gateway();
        gw.get_movies(MovieFilter::new(-2, 500)).await.unwrap();
        assert_eq!(*backend.filters.lock().unwrap(), vec![MovieFilter::new(1, 10)]);
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_backend() {
        let (backend, gw) = gateway();
        assert_eq!(gw.get_movie(0).await.unwrap_err().kind(), FailureKind::InvalidData);
        assert_eq!(gw.delete_movie(-1).await.unwrap_err().kind(), FailureKind::InvalidData);
        assert_eq!(gw.create_movie("", "2020").await.unwrap_err().kind(), FailureKind::InvalidData);
        assert_eq!(gw.create_movie("Up", "").await.unwrap_err().kind(), FailureKind::InvalidData);
        assert_eq!(*backend.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn backend_failures_keep_their_kind() {
        let (_, gw) = gateway();
        let err = gw.get_movie(4).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert_eq!(err.to_string(), "movie service error: movie not found");
    }

    #[tokio::test]
    async fn year_rules_are_left_to_backend() {
        let (backend, gw) = gateway();
        let movie = gw.create_movie("Odd", "abc").await.unwrap();
        assert_eq!(movie.year, "abc");
        assert_eq!(*backend.calls.lock().unwrap(), 1);
    }
}
