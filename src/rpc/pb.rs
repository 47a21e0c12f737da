//! Wire messages for `movies.MovieService`.
//!
//! Business failures travel inside the response (`success = false` plus a
//! reason and kind); a non-OK gRPC status always means the call itself did
//! not complete.

#[derive(Clone, PartialEq, prost::Message)]
pub struct Movie {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub year: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ErrorKind {
    Unspecified = 0,
    InvalidData = 1,
    NotFound = 2,
    AlreadyExists = 3,
    Storage = 4,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMoviesRequest {
    #[prost(int32, tag = "1")]
    pub page: i32,
    #[prost(int32, tag = "2")]
    pub limit: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMoviesResponse {
    #[prost(message, repeated, tag = "1")]
    pub movies: Vec<Movie>,
    #[prost(uint64, tag = "2")]
    pub total: u64,
    #[prost(bool, tag = "3")]
    pub success: bool,
    #[prost(string, tag = "4")]
    pub error: String,
    #[prost(enumeration = "ErrorKind", tag = "5")]
    pub error_kind: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMovieRequest {
    #[prost(int32, tag = "1")]
    pub id: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMovieResponse {
    #[prost(message, optional, tag = "1")]
    pub movie: Option<Movie>,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, tag = "3")]
    pub error: String,
    #[prost(enumeration = "ErrorKind", tag = "4")]
    pub error_kind: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateMovieRequest {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub year: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateMovieResponse {
    #[prost(message, optional, tag = "1")]
    pub movie: Option<Movie>,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, tag = "3")]
    pub error: String,
    #[prost(enumeration = "ErrorKind", tag = "4")]
    pub error_kind: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteMovieRequest {
    #[prost(int32, tag = "1")]
    pub id: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteMovieResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub error: String,
    #[prost(enumeration = "ErrorKind", tag = "3")]
    pub error_kind: i32,
}

include!(concat!(env!("OUT_DIR"), "/movies.MovieService.rs"));

impl From<crate::models::Movie> for Movie {
    fn from(m: crate::models::Movie) -> Self {
        Movie { id: m.id, title: m.title, year: m.year }
    }
}

impl From<Movie> for crate::models::Movie {
    fn from(m: Movie) -> Self {
        crate::models::Movie { id: m.id, title: m.title, year: m.year }
    }
}
