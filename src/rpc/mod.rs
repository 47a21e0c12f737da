pub mod client;
pub mod pb;
pub mod server;

use crate::error::{FailureKind, MovieError};

pub use client::RpcMovieClient;
pub use server::MovieRpcServer;

/// Encoded descriptor of `movies.MovieService`, written by the build script.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("movies_descriptor");

/// gRPC server reflection over [`FILE_DESCRIPTOR_SET`], for grpcurl and
/// similar tools.
pub fn reflection_service() -> Result<
    tonic_reflection::server::v1::ServerReflectionServer<
        impl tonic_reflection::server::v1::ServerReflection,
    >,
    tonic_reflection::server::Error,
> {
    tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()
}

impl From<&MovieError> for pb::ErrorKind {
    fn from(err: &MovieError) -> Self {
        match err.kind() {
            FailureKind::InvalidData => pb::ErrorKind::InvalidData,
            FailureKind::NotFound => pb::ErrorKind::NotFound,
            FailureKind::AlreadyExists => pb::ErrorKind::AlreadyExists,
            FailureKind::Storage => pb::ErrorKind::Storage,
            FailureKind::Transport => pb::ErrorKind::Unspecified,
        }
    }
}

/// Kind of a failure the backend reported in-band. Unknown or unset kinds
/// are treated as internal failures.
pub(crate) fn reported_kind(raw: i32) -> FailureKind {
    match pb::ErrorKind::try_from(raw) {
        Ok(pb::ErrorKind::InvalidData) => FailureKind::InvalidData,
        Ok(pb::ErrorKind::NotFound) => FailureKind::NotFound,
        Ok(pb::ErrorKind::AlreadyExists) => FailureKind::AlreadyExists,
        Ok(pb::ErrorKind::Storage | pb::ErrorKind::Unspecified) | Err(_) => FailureKind::Storage,
    }
}
