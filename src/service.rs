use tracing::{error, info, warn};

use crate::{
    error::{MovieError, MovieResult},
    models::{Movie, MovieFilter, MoviesPage},
    repository::MovieRepository,
};

/// Business rules for the movie catalog. Holds no state of its own.
#[derive(Clone)]
pub struct MovieService<R> {
    repo: R,
}

impl<R: MovieRepository> MovieService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists one page. A failing count degrades to `total = 0` instead of
    /// failing a page that was already read.
    pub async fn get_movies(&self, filter: MovieFilter) -> MovieResult<MoviesPage> {
        let filter = filter.normalized();
        info!(page = filter.page, limit = filter.limit, "getting movies");

        let movies = self.repo.find_all(filter).await.inspect_err(|err| {
            error!(error = %err, "failed to get movies");
        })?;

        let total = match self.repo.count().await {
            Ok(total) => total,
            Err(err) => {
                error!(error = %err, "failed to count movies");
                0
            },
        };

        info!(count = movies.len(), total, "retrieved movies");
        Ok(MoviesPage { movies, total })
    }

    pub async fn get_movie(&self, id: i32) -> MovieResult<Movie> {
        info!(id, "getting movie");
        ensure_positive_id(id)?;

        let movie = self.repo.find_by_id(id).await.inspect_err(|err| {
            error!(id, error = %err, "failed to get movie");
        })?;

        info!(id, title = %movie.title, "retrieved movie");
        Ok(movie)
    }

    /// Assigns the next id, validates, then persists.
    ///
    /// The id read and the insert are not atomic. The existence check narrows
    /// the window; the store's uniqueness constraint closes it, so a losing
    /// racer gets `AlreadyExists` rather than overwriting.
    pub async fn create_movie(&self, title: &str, year: &str) -> MovieResult<Movie> {
        info!(title, year, "creating movie");

        let next_id = self.repo.next_id().await.inspect_err(|err| {
            error!(error = %err, "failed to generate movie id");
        })?;

        let movie = Movie::new(next_id, title, year).inspect_err(|err| {
            warn!(title, year, error = %err, "invalid movie data");
        })?;

        let exists = self.repo.exists_by_id(movie.id).await.inspect_err(|err| {
            error!(id = movie.id, error = %err, "failed to check movie existence");
        })?;
        if exists {
            warn!(id = movie.id, "movie id already taken");
            return Err(MovieError::AlreadyExists);
        }

        let created = self.repo.create(&movie).await.inspect_err(|err| {
            error!(id = movie.id, error = %err, "failed to create movie");
        })?;

        info!(id = created.id, title = %created.title, "created movie");
        Ok(created)
    }

    pub async fn delete_movie(&self, id: i32) -> MovieResult<()> {
        info!(id, "deleting movie");
        ensure_positive_id(id)?;

        let exists = self.repo.exists_by_id(id).await.inspect_err(|err| {
            error!(id, error = %err, "failed to check movie existence");
        })?;
        if !exists {
            return Err(MovieError::NotFound);
        }

        self.repo.delete(id).await.inspect_err(|err| {
            error!(id, error = %err, "failed to delete movie");
        })?;

        info!(id, "deleted movie");
        Ok(())
    }
}

pub fn ensure_positive_id(id: i32) -> MovieResult<()> {
    if id <= 0 {
        return Err(MovieError::invalid(format!("invalid movie id: {id}")));
    }
    Ok(())
}
