//! Runtime configuration, read from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const BIND_ADDR_ENV: &str = "COURIER_BIND_ADDR";
pub const PORT_ENV: &str = "PORT";
pub const README_PATH_ENV: &str = "COURIER_README_PATH";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_README_PATH: &str = "README.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Markdown file rendered at `GET /`.
    pub readme_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            readme_path: PathBuf::from(DEFAULT_README_PATH),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_or(&lookup, BIND_ADDR_ENV, defaults.bind_addr)?,
            port: parse_or(&lookup, PORT_ENV, defaults.port)?,
            readme_path: lookup(README_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.readme_path),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}
