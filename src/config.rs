use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, bail};

use crate::db::StoreOptions;

pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
/// Longer than the store deadline, so a slow store reports its own failure
/// before the gateway gives up on the call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parsed<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{name}={raw:?}")),
        None => Ok(default),
    }
}

/// Unset takes the default; set-but-empty is a configuration error.
fn required(name: &str, default: impl FnOnce() -> String) -> anyhow::Result<String> {
    match var(name) {
        Some(v) if v.trim().is_empty() => bail!("{name} is required"),
        Some(v) => Ok(v.trim().to_string()),
        None => Ok(default()),
    }
}

fn bind_addr(host_var: &str, port_var: &str, default_port: u16) -> anyhow::Result<SocketAddr> {
    let host = var(host_var).unwrap_or_else(|| "0.0.0.0".to_string());
    let port: u16 = parsed(port_var, default_port)?;
    format!("{host}:{port}").parse().with_context(|| format!("{host_var}/{port_var}"))
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub database_url: String,
    pub database_name: String,
    pub max_pool_size: u32,
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_name = var("DATABASE_NAME").unwrap_or_else(|| "movies_db".to_string());
        if database_name.trim().is_empty() {
            bail!("DATABASE_NAME is required");
        }
        let database_url =
            required("DATABASE_URL", || format!("sqlite://{database_name}.db?mode=rwc"))?;

        Ok(Self {
            database_url,
            database_name,
            max_pool_size: parsed("MAX_POOL_SIZE", 10)?,
            timeout: Duration::from_secs(parsed(
                "DB_TIMEOUT_SECS",
                DEFAULT_STORE_TIMEOUT_SECS,
            )?),
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            url: self.database_url.clone(),
            pool_size: self.max_pool_size,
            timeout: self.timeout,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub store: StoreConfig,
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self { addr: bind_addr("GRPC_HOST", "GRPC_PORT", 50051)?, store: StoreConfig::from_env()? })
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    pub movie_service_address: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let address = required("MOVIE_SERVICE_GRPC_ADDRESS", || {
            "http://movies-service:50051".to_string()
        })?;

        Ok(Self {
            addr: bind_addr("HOST", "SERVER_PORT", 8080)?,
            movie_service_address: with_scheme(address),
            connect_timeout: Duration::from_secs(parsed("CONNECT_TIMEOUT_SECS", 10)?),
            request_timeout: Duration::from_secs(parsed(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        })
    }
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub store: StoreConfig,
    pub movies_json_path: String,
}

impl SeedConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            store: StoreConfig::from_env()?,
            movies_json_path: var("MOVIES_JSON_PATH").unwrap_or_else(|| "movies.json".to_string()),
        })
    }
}

/// tonic endpoints need a scheme; compose files usually give `host:port`.
fn with_scheme(address: String) -> String {
    if address.contains("://") { address } else { format!("http://{address}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_added_when_missing() {
        assert_eq!(with_scheme("movies-service:50051".into()), "http://movies-service:50051");
        assert_eq!(with_scheme("https://backend:443".into()), "https://backend:443");
    }

    #[test]
    fn store_deadline_expires_before_rpc_deadline() {
        assert!(DEFAULT_STORE_TIMEOUT_SECS < DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
