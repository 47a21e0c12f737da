use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{MovieError, MovieResult},
    models::{Movie, MovieFilter},
    repository::{MovieRepository, next_after},
};

/// Map-backed repository for tests and local runs without a database.
///
/// Every read and write clones, so callers can never reach the stored
/// values through what they were handed.
#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: RwLock<BTreeMap<i32, Movie>>,
    is_offline: bool,
    count_offline: bool,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let movies = movies.into_iter().map(|m| (m.id, m)).collect();
        Self { movies: RwLock::new(movies), ..Self::default() }
    }

    /// Makes every operation fail with a storage error.
    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Makes only `count` fail.
    pub fn toggle_count_offline(&mut self) {
        self.count_offline = !self.count_offline;
    }

    fn check(&self, context: &'static str) -> MovieResult<()> {
        if self.is_offline {
            return Err(MovieError::storage(context, "movie repository offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_all(&self, filter: MovieFilter) -> MovieResult<Vec<Movie>> {
        self.check("find movies")?;
        let guard = self.movies.read().await;
        let skip = usize::try_from(filter.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit.max(0)).unwrap_or(usize::MAX);
        Ok(guard.values().skip(skip).take(limit).cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> MovieResult<Movie> {
        self.check("find movie by id")?;
        self.movies.read().await.get(&id).cloned().ok_or(MovieError::NotFound)
    }

    async fn create(&self, movie: &Movie) -> MovieResult<Movie> {
        self.check("create movie")?;
        movie.validate()?;
        let mut guard = self.movies.write().await;
        if guard.contains_key(&movie.id) {
            return Err(MovieError::AlreadyExists);
        }
        guard.insert(movie.id, movie.clone());
        Ok(movie.clone())
    }

    async fn delete(&self, id: i32) -> MovieResult<()> {
        self.check("delete movie")?;
        self.movies.write().await.remove(&id).map(|_| ()).ok_or(MovieError::NotFound)
    }

    async fn count(&self) -> MovieResult<u64> {
        self.check("count movies")?;
        if self.count_offline {
            return Err(MovieError::storage("count movies", "movie repository offline"));
        }
        Ok(self.movies.read().await.len() as u64)
    }

    async fn exists_by_id(&self, id: i32) -> MovieResult<bool> {
        self.check("check movie existence")?;
        Ok(self.movies.read().await.contains_key(&id))
    }

    async fn next_id(&self) -> MovieResult<i32> {
        self.check("get next movie id")?;
        let max = self.movies.read().await.keys().next_back().copied();
        next_after(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn seeded(n: i32) -> InMemoryMovieRepository {
        InMemoryMovieRepository::with_movies(
            (1..=n).map(|id| Movie::new(id, format!("Movie {id}"), "2000").unwrap()),
        )
    }

    #[tokio::test]
    async fn find_all_pages_in_id_order() {
        let repo = seeded(7);
        let page = repo.find_all(MovieFilter::new(2, 3)).await.unwrap();
        assert_eq!(page.iter().map(|m| m.id).collect::<Vec<_>>(), vec![4, 5, 6]);

        let page = repo.find_all(MovieFilter::new(3, 3)).await.unwrap();
        assert_eq!(page.iter().map(|m| m.id).collect::<Vec<_>>(), vec![7]);

        assert!(repo.find_all(MovieFilter::new(9, 3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn returned_values_do_not_alias_storage() {
        let repo = seeded(1);
        let mut got = repo.find_by_id(1).await.unwrap();
        got.title = "changed".into();
        assert_eq!(repo.find_by_id(1).await.unwrap().title, "Movie 1");
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_invalid_values() {
        let repo = seeded(1);
        let dup = Movie::new(1, "Other", "2001").unwrap();
        assert!(matches!(repo.create(&dup).await, Err(MovieError::AlreadyExists)));

        let bad = Movie { id: 2, title: "Bad".into(), year: "12".into() };
        assert!(matches!(repo.create(&bad).await, Err(MovieError::InvalidData(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn next_id_follows_highest_id() {
        let repo = InMemoryMovieRepository::new();
        assert_eq!(repo.next_id().await.unwrap(), 1);

        let repo = InMemoryMovieRepository::with_movies([Movie::new(41, "Gap", "1999").unwrap()]);
        assert_eq!(repo.next_id().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn offline_repository_fails_with_storage_errors() {
        let mut repo = seeded(2);
        repo.toggle_offline();
        let err = repo.find_by_id(1).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Storage);
        assert!(repo.delete(1).await.is_err());
    }
}
