// Business rules exercised against the in-memory repository.

use std::sync::Arc;

use rstest::rstest;

use movie_catalog::{
    error::{FailureKind, MovieError},
    memory::InMemoryMovieRepository,
    models::{Movie, MovieFilter, current_year},
    repository::MovieRepository,
    service::MovieService,
};

mod common;

type Service = MovieService<Arc<InMemoryMovieRepository>>;

fn service() -> (Arc<InMemoryMovieRepository>, Service) {
    let repo = Arc::new(InMemoryMovieRepository::new());
    (repo.clone(), MovieService::new(repo))
}

fn seeded(n: i32) -> (Arc<InMemoryMovieRepository>, Service) {
    let repo = Arc::new(InMemoryMovieRepository::with_movies(
        (1..=n).map(|id| common::movie(id, &format!("Movie {id}"), "2001")),
    ));
    (repo.clone(), MovieService::new(repo))
}

#[tokio::test]
async fn create_in_empty_store_starts_at_one() {
    let (repo, svc) = service();
    let movie = svc.create_movie("Test Movie", "2023").await.unwrap();
    assert_eq!(movie.id, 1);
    assert_eq!(movie.title, "Test Movie");
    assert_eq!(movie.year, "2023");
    assert_eq!(repo.find_by_id(1).await.unwrap(), movie);
}

#[rstest]
#[case("Test Movie", "1800")]
#[case("Test Movie", "1999")]
#[case("A", "2000")]
#[tokio::test]
async fn valid_input_is_persisted_verbatim(#[case] title: &str, #[case] year: &str) {
    let (_, svc) = service();
    let movie = svc.create_movie(title, year).await.unwrap();
    assert!(movie.id > 0);
    assert_eq!((movie.title.as_str(), movie.year.as_str()), (title, year));
}

#[tokio::test]
async fn year_up_to_ten_years_ahead_is_accepted() {
    let (_, svc) = service();
    let year = (current_year() + 10).to_string();
    assert!(svc.create_movie("Future", &year).await.is_ok());

    let year = (current_year() + 11).to_string();
    let err = svc.create_movie("Too Far", &year).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidData);
}

#[rstest]
#[case("", "2023")]
#[case("Test Movie", "")]
#[case("Test Movie", "abc")]
#[case("Test Movie", "1700")]
#[case("Test Movie", "20233")]
#[case("Test Movie", "20a3")]
#[tokio::test]
async fn invalid_input_persists_nothing(#[case] title: &str, #[case] year: &str) {
    let (repo, svc) = service();
    let err = svc.create_movie(title, year).await.unwrap_err();
    assert!(matches!(err, MovieError::InvalidData(_)), "{err}");
    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(matches!(repo.find_by_id(1).await, Err(MovieError::NotFound)));
}

#[tokio::test]
async fn get_movie_edge_cases() {
    let (_, svc) = service();
    assert_eq!(svc.get_movie(0).await.unwrap_err().kind(), FailureKind::InvalidData);
    assert!(matches!(svc.get_movie(999).await, Err(MovieError::NotFound)));
}

#[tokio::test]
async fn deleting_missing_movie_is_always_not_found() {
    let (_, svc) = seeded(2);
    for _ in 0..3 {
        assert!(matches!(svc.delete_movie(42).await, Err(MovieError::NotFound)));
    }

    svc.delete_movie(2).await.unwrap();
    assert!(matches!(svc.delete_movie(2).await, Err(MovieError::NotFound)));
    assert!(matches!(svc.get_movie(2).await, Err(MovieError::NotFound)));
}

#[rstest]
#[case(1, 10, 1..=10)]
#[case(2, 10, 11..=20)]
#[case(3, 10, 21..=25)]
#[case(5, 5, 21..=25)]
#[tokio::test]
async fn pages_are_contiguous_id_ranges(
    #[case] page: i64,
    #[case] limit: i64,
    #[case] want: std::ops::RangeInclusive<i32>,
) {
    let (_, svc) = seeded(25);
    let got = svc.get_movies(MovieFilter::new(page, limit)).await.unwrap();
    assert_eq!(got.movies.iter().map(|m| m.id).collect::<Vec<_>>(), want.collect::<Vec<_>>());
    assert_eq!(got.total, 25);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let (_, svc) = seeded(3);
    let got = svc.get_movies(MovieFilter::new(4, 10)).await.unwrap();
    assert!(got.movies.is_empty());
    assert_eq!(got.total, 3);
}

#[tokio::test]
async fn new_ids_follow_the_highest_existing_id() {
    let repo = Arc::new(InMemoryMovieRepository::with_movies([
        common::movie(3, "Three", "2003"),
        common::movie(10, "Ten", "2010"),
    ]));
    let svc = MovieService::new(repo);
    assert_eq!(svc.create_movie("Eleven", "2011").await.unwrap().id, 11);
}

#[tokio::test]
async fn returned_movies_are_detached_from_the_store() {
    let (repo, svc) = seeded(1);
    let mut page = svc.get_movies(MovieFilter::new(1, 10)).await.unwrap();
    page.movies[0].title = "Overwritten".into();
    assert_eq!(repo.find_by_id(1).await.unwrap(), Movie::new(1, "Movie 1", "2001").unwrap());
}
