use async_trait::async_trait;

use crate::{
    error::MovieResult,
    models::{Movie, MovieFilter},
};

/// Persistence contract for the movie collection.
///
/// Implementations return owned values; nothing handed back may alias
/// internal state.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Page of movies in ascending id order. An empty page is not an error.
    async fn find_all(&self, filter: MovieFilter) -> MovieResult<Vec<Movie>>;

    async fn find_by_id(&self, id: i32) -> MovieResult<Movie>;

    /// Fails with `AlreadyExists` when the id is taken. The store's
    /// uniqueness constraint is what makes this race-safe.
    async fn create(&self, movie: &Movie) -> MovieResult<Movie>;

    /// Fails with `NotFound` when nothing was deleted.
    async fn delete(&self, id: i32) -> MovieResult<()>;

    async fn count(&self) -> MovieResult<u64>;

    async fn exists_by_id(&self, id: i32) -> MovieResult<bool>;

    /// Highest stored id plus one, or 1 for an empty collection.
    ///
    /// Not reserved: two callers may be handed the same value.
    async fn next_id(&self) -> MovieResult<i32>;
}

#[async_trait]
impl<R: MovieRepository + ?Sized> MovieRepository for std::sync::Arc<R> {
    async fn find_all(&self, filter: MovieFilter) -> MovieResult<Vec<Movie>> {
        (**self).find_all(filter).await
    }

    async fn find_by_id(&self, id: i32) -> MovieResult<Movie> {
        (**self).find_by_id(id).await
    }

    async fn create(&self, movie: &Movie) -> MovieResult<Movie> {
        (**self).create(movie).await
    }

    async fn delete(&self, id: i32) -> MovieResult<()> {
        (**self).delete(id).await
    }

    async fn count(&self) -> MovieResult<u64> {
        (**self).count().await
    }

    async fn exists_by_id(&self, id: i32) -> MovieResult<bool> {
        (**self).exists_by_id(id).await
    }

    async fn next_id(&self) -> MovieResult<i32> {
        (**self).next_id().await
    }
}

pub(crate) fn next_after(max_id: Option<i32>) -> MovieResult<i32> {
    match max_id {
        None => Ok(1),
        Some(id) => id
            .checked_add(1)
            .ok_or_else(|| crate::error::MovieError::storage("get next movie id", "id space exhausted")),
    }
}
