use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{MovieError, MovieResult};

pub const MIN_YEAR: i32 = 1800;
/// How far past the current year a release year may lie.
pub const FUTURE_YEARS: i32 = 10;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
}

impl Movie {
    /// Builds a movie, rejecting anything that could not be stored.
    pub fn new(id: i32, title: impl Into<String>, year: impl Into<String>) -> MovieResult<Self> {
        let movie = Self { id, title: title.into(), year: year.into() };
        movie.validate()?;
        Ok(movie)
    }

    /// Re-checks every field constraint on an existing value.
    ///
    /// Values can be built without going through [`Movie::new`] (struct
    /// literals, rows read back from the store, deserialized payloads), so
    /// the store adapters call this again right before writing.
    pub fn validate(&self) -> MovieResult<()> {
        if self.title.is_empty() {
            return Err(MovieError::invalid("title cannot be empty"));
        }
        validate_year(&self.year, current_year())
    }

    /// Replaces the supplied non-empty fields. On error `self` is unchanged.
    pub fn update(&mut self, title: Option<&str>, year: Option<&str>) -> MovieResult<()> {
        let mut next = self.clone();
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            next.title = title.to_string();
        }
        if let Some(year) = year.filter(|y| !y.is_empty()) {
            next.year = year.to_string();
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn year_number(&self) -> Option<i32> {
        self.year.parse().ok()
    }
}

pub fn current_year() -> i32 {
    let today: jiff::civil::Date = jiff::Zoned::now().into();
    i32::from(today.year())
}

pub fn validate_year(year: &str, current_year: i32) -> MovieResult<()> {
    if year.is_empty() {
        return Err(MovieError::invalid("year cannot be empty"));
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MovieError::invalid("invalid year format"));
    }
    let value: i32 = year.parse().map_err(|_| MovieError::invalid("invalid year format"))?;
    let max = current_year + FUTURE_YEARS;
    if !(MIN_YEAR..=max).contains(&value) {
        return Err(MovieError::invalid(format!("year must be between {MIN_YEAR} and {max}")));
    }
    Ok(())
}

/// Pagination request. Out-of-range values are coerced, never rejected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MovieFilter {
    pub page: i64,
    pub limit: i64,
}

impl MovieFilter {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    pub fn normalized(self) -> Self {
        let page = self.page.max(1);
        let limit = if (1..=i64::from(MAX_LIMIT)).contains(&self.limit) {
            self.limit
        } else {
            i64::from(DEFAULT_LIMIT)
        };
        Self { page, limit }
    }

    /// Rows to skip. Only meaningful on a normalized filter.
    ///
    /// Capped at `i64::MAX`, the largest offset SQL engines accept.
    pub fn skip(&self) -> u64 {
        let page = self.page.max(1);
        (page - 1).saturating_mul(self.limit.max(0)) as u64
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MoviesPage {
    pub movies: Vec<Movie>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(value_type = String, example = "healthy")]
    pub status: &'static str,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: jiff::Timestamp,
}
