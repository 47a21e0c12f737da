use std::path::Path;

use anyhow::Context;

use crate::models::Movie;

/// Reads a JSON array of `{id, title, year}` documents.
pub async fn load_movies(path: impl AsRef<Path>) -> anyhow::Result<Vec<Movie>> {
    let path = path.as_ref();
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    parse_movies(&data).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_movies(data: &[u8]) -> anyhow::Result<Vec<Movie>> {
    Ok(serde_json::from_slice(data)?)
}
