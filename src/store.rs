use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, SqlErr,
};
use tracing::{debug, error, info, warn};

use crate::{
    entities::movie,
    error::{MovieError, MovieResult},
    models::{Movie, MovieFilter},
    repository::{MovieRepository, next_after},
};

/// Movie collection backed by a sea-orm connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct SeaOrmMovieRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl SeaOrmMovieRepository {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs one store call under the per-operation deadline.
    async fn run<T>(
        &self,
        context: &'static str,
        fut: impl Future<Output = Result<T, DbErr>>,
    ) -> MovieResult<T> {
        self.run_mapped(context, fut, |context, err| MovieError::storage(context, err)).await
    }

    /// Like [`Self::run`], with `map` deciding what a store error becomes.
    async fn run_mapped<T>(
        &self,
        context: &'static str,
        fut: impl Future<Output = Result<T, DbErr>>,
        map: fn(&'static str, DbErr) -> MovieError,
    ) -> MovieResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                let err = map(context, err);
                match &err {
                    MovieError::AlreadyExists => warn!("failed to {context}: id already taken"),
                    _ => error!(error = %err, "failed to {context}"),
                }
                Err(err)
            },
            Err(elapsed) => {
                error!(timeout = ?self.timeout, "failed to {context}: deadline exceeded");
                Err(MovieError::storage(context, elapsed))
            },
        }
    }

    /// Loads `movies` in one insert when the collection is empty.
    ///
    /// Returns how many rows were written; a non-empty collection is left
    /// alone and yields 0.
    pub async fn seed_if_empty(&self, movies: &[Movie]) -> MovieResult<u64> {
        let existing = self.count().await?;
        if existing > 0 {
            info!(existing, "collection already populated, skipping seed");
            return Ok(0);
        }
        if movies.is_empty() {
            return Ok(0);
        }
        for m in movies {
            m.validate()?;
        }

        let rows = movies.iter().map(movie::ActiveModel::from);
        let inserted = self
            .run_mapped(
                "seed movies",
                movie::Entity::insert_many(rows).exec_without_returning(&self.db),
                map_insert_err,
            )
            .await?;
        info!(inserted, "seeded movie collection");
        Ok(inserted)
    }
}

fn map_insert_err(context: &'static str, err: DbErr) -> MovieError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => MovieError::AlreadyExists,
        _ => MovieError::storage(context, err),
    }
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn find_all(&self, filter: MovieFilter) -> MovieResult<Vec<Movie>> {
        let limit = filter.limit.max(0) as u64;
        let rows = self
            .run(
                "find movies",
                movie::Entity::find()
                    .order_by_asc(movie::Column::Id)
                    .offset(filter.skip())
                    .limit(limit)
                    .all(&self.db),
            )
            .await?;

        info!(count = rows.len(), page = filter.page, limit = filter.limit, "found movies");
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> MovieResult<Movie> {
        let row = self.run("find movie by id", movie::Entity::find_by_id(id).one(&self.db)).await?;
        match row {
            Some(row) => {
                info!(id, title = %row.title, "found movie");
                Ok(row.into())
            },
            None => {
                info!(id, "movie not found");
                Err(MovieError::NotFound)
            },
        }
    }

    async fn create(&self, m: &Movie) -> MovieResult<Movie> {
        m.validate()?;

        self.run_mapped(
            "create movie",
            movie::Entity::insert(movie::ActiveModel::from(m)).exec_without_returning(&self.db),
            map_insert_err,
        )
        .await?;

        info!(id = m.id, title = %m.title, "created movie");
        Ok(m.clone())
    }

    async fn delete(&self, id: i32) -> MovieResult<()> {
        let res = self.run("delete movie", movie::Entity::delete_by_id(id).exec(&self.db)).await?;
        if res.rows_affected == 0 {
            info!(id, "movie not found for deletion");
            return Err(MovieError::NotFound);
        }
        info!(id, "deleted movie");
        Ok(())
    }

    async fn count(&self) -> MovieResult<u64> {
        let count = self.run("count movies", movie::Entity::find().count(&self.db)).await?;
        debug!(count, "counted movies");
        Ok(count)
    }

    async fn exists_by_id(&self, id: i32) -> MovieResult<bool> {
        let count = self
            .run("check movie existence", movie::Entity::find_by_id(id).count(&self.db))
            .await?;
        debug!(id, exists = count > 0, "checked movie existence");
        Ok(count > 0)
    }

    async fn next_id(&self) -> MovieResult<i32> {
        let top = self
            .run(
                "get next movie id",
                movie::Entity::find().order_by_desc(movie::Column::Id).limit(1).one(&self.db),
            )
            .await?;
        let next = next_after(top.map(|row| row.id))?;
        debug!(next_id = next, "generated next movie id");
        Ok(next)
    }
}
